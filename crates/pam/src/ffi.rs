//! Raw `repr(C)` mirrors of the libpam conversation structures.
//!
//!  ## License
//!
//! Copyright 2023 34n0
//!
//! Use of this source code is governed by an MIT-style
//! license that can be found in the LICENSE file or at
//! https://opensource.org/licenses/MIT.

use libc::{c_char, c_int, c_void};

use crate::PamMessageStyle;

#[repr(C)]
pub struct PamMessage {
    pub msg_style: PamMessageStyle,
    pub msg: *const c_char,
}

#[repr(C)]
pub struct PamResponse {
    pub resp: *mut c_char,
    pub resp_retcode: c_int,
}

/// Conversation entry point handed to `pam_start`. The stack calls it
/// synchronously on the caller's thread during `pam_authenticate`.
pub type ConvFn = unsafe extern "C" fn(
    num_msg: c_int,
    msg: *const *const PamMessage,
    resp: *mut *mut PamResponse,
    appdata_ptr: *mut c_void,
) -> c_int;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct PamConv {
    pub conv: ConvFn,
    pub appdata_ptr: *mut c_void,
}
