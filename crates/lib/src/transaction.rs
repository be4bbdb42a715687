//! # Transaction Module
//!
//! The `transaction` module sequences one PAM transaction and guarantees its
//! teardown. A [`Transaction`] owns the opaque handle from `pam_start` until
//! `pam_end`; the phases run strictly in the order
//! start → TTY item → authenticate → account management → credential reset →
//! end, with the optional phases gated as [`run`] documents.
//!
//! Teardown happens in `Drop`, so the handle is released on every exit path,
//! including unwinding. Hosts without `pam_end` get the no-op substitute the
//! binding layer provides.
//!
//! ## License
//!
//! pam-authkit
//! Copyright (C) 2023 github.com/34N0
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::ffi::{CStr, CString};
use std::ptr;

use libc::c_int;
use pam::conv::ConvContext;
use pam::ffi::PamConv;
use pam::items::ItemType;
use pam::{PamApi, PamHandle, PamResultCode, PAM_REINITIALIZE_CRED};

use crate::AuthResult;

const SUCCESS: c_int = PamResultCode::PAM_SUCCESS as c_int;

/// One PAM transaction. Holds the handle and the code of the last phase,
/// which `pam_end` receives as the transaction status on drop.
struct Transaction<'l, L: PamApi> {
    lib: &'l L,
    handle: *mut PamHandle,
    code: c_int,
}

impl<'l, L: PamApi> Transaction<'l, L> {
    fn start(lib: &'l L, service: &CStr, user: &CStr, conv: &PamConv) -> Self {
        let mut handle: *mut PamHandle = ptr::null_mut();
        let code = lib.start(service, user, conv, &mut handle);
        Transaction { lib, handle, code }
    }

    fn set_tty(&mut self, tty: &CStr) {
        // item failures never gate authentication
        let _ = self.lib.set_item(self.handle, ItemType::Tty, tty);
    }

    fn authenticate(&mut self) -> c_int {
        self.code = self.lib.authenticate(self.handle, 0);
        self.code
    }

    fn acct_mgmt(&mut self) -> c_int {
        self.code = self.lib.acct_mgmt(self.handle, 0);
        self.code
    }

    fn reinitialize_credentials(&mut self) -> c_int {
        self.code = self.lib.setcred(self.handle, PAM_REINITIALIZE_CRED);
        self.code
    }

    // Resolved while the handle is still valid; hosts also tolerate a null
    // handle here per protocol.
    fn reason(&self) -> String {
        self.lib.strerror(self.handle, self.code)
    }
}

impl<L: PamApi> Drop for Transaction<'_, L> {
    fn drop(&mut self) {
        // exactly once per transaction, on every branch; a handle the
        // stack never handed out needs no teardown
        if !self.handle.is_null() {
            let _ = self.lib.end(self.handle, self.code);
        }
    }
}

/// Runs the full phase sequence for one authentication attempt.
///
/// `acct_mgmt` only runs after a successful `authenticate`, and the
/// credential reset only after a successful `acct_mgmt` when `resetcreds`
/// is set. The reset's code overwrites the reported code even though
/// `success` already reflects the auth/account outcome; callers depend on
/// this reporting.
pub(crate) fn run<L: PamApi>(
    lib: &L,
    service: &CStr,
    user: &CStr,
    password: &[u8],
    resetcreds: bool,
    tty: Option<&CStr>,
) -> AuthResult {
    let mut ctx = ConvContext::new(password);
    let conv = ctx.as_conv();

    let mut tx = Transaction::start(lib, service, user, &conv);
    if tx.code != SUCCESS {
        // This is not an authentication error, something has gone wrong
        // starting up PAM
        log::error!("pam_start() failed with code {}", tx.code);
        return AuthResult {
            success: false,
            code: tx.code,
            reason: String::from("pam_start() failed"),
        };
    }

    // Associate the controlling terminal, required when pam_securetty is
    // used for checking /etc/securetty on root logins. No terminal is fine;
    // the item is simply not set.
    if let Some(tty) = tty {
        tx.set_tty(tty);
    }

    let mut success = tx.authenticate() == SUCCESS;

    if success {
        success = tx.acct_mgmt() == SUCCESS;
    }

    if success && resetcreds {
        tx.reinitialize_credentials();
    }

    let reason = tx.reason();
    log::debug!("transaction finished with code {}", tx.code);
    AuthResult {
        success,
        code: tx.code,
        reason,
    }
}

/// Discovers the terminal to attach to the transaction.
///
/// An X display takes precedence; otherwise the terminal on stdin is used
/// when stdin is one. Returns `None` when neither exists.
pub(crate) fn controlling_tty() -> Option<CString> {
    if let Ok(display) = std::env::var("DISPLAY") {
        if !display.is_empty() {
            return CString::new(display).ok();
        }
    }

    let mut buf = [0u8; 1024];
    // SAFETY: fd 0 is queried read-only; ttyname_r writes at most buf.len()
    // bytes including the terminator.
    unsafe {
        if libc::isatty(0) == 1
            && libc::ttyname_r(0, buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) == 0
        {
            return CStr::from_bytes_until_nul(&buf).ok().map(CStr::to_owned);
        }
    }
    None
}
