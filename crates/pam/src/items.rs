//! # PAM items module
//!
//! This module defines the `ItemType` enum, identifying the pieces of data
//! that can be attached to a PAM transaction with `pam_set_item`.
//!
//! The client uses [`ItemType::Tty`] to associate the controlling terminal
//! with the transaction before authenticating, so that terminal-gated
//! modules (`pam_securetty` checking `/etc/securetty` for root logins)
//! see the right device.
//!
//!  ## License
//!
//! Copyright 2023 34n0
//!
//! Use of this source code is governed by an MIT-style
//! license that can be found in the LICENSE file or at
//! https://opensource.org/licenses/MIT.

#[derive(Debug, Clone, Copy)]
#[repr(i32)]
pub enum ItemType {
    /// The service name
    Service = 1,
    /// The user name
    User = 2,
    /// The terminal name
    Tty = 3,
    /// The pam_conv structure
    Conv = 5,
}
