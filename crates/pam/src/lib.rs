//! # PAM Client Binding
//!
//! This is the main module of the PAM binding library. It provides the data
//! structures and entry points needed to drive a PAM transaction from the
//! client side of the protocol.
//!
//! The main types provided by this module are:
//! - `PamHandle`: An opaque type that represents a handle to one PAM
//!   transaction. The handle is produced by `pam_start` and consumed by
//!   every subsequent API call.
//! - `PamResultCode`: An enum covering the result codes a PAM call can
//!   return. The raw integer is preserved wherever a code crosses the
//!   library boundary, since hosts may return values outside this list.
//! - `PamLibrary`: The runtime binding to the host's `libpam` shared
//!   object. Entry points are resolved by name when the binding is opened,
//!   so a missing library or symbol surfaces as a [`BindError`] instead of
//!   a link failure. `pam_end` is absent on some hosts and is therefore
//!   bound as an optional capability.
//!
//! The `PamApi` trait abstracts the handful of foreign calls the
//! transaction layer performs, allowing the protocol sequencing to be
//! exercised against a simulated stack.
//!
//!  ## License
//!
//! Copyright 2023 34n0
//!
//! Use of this source code is governed by an MIT-style
//! license that can be found in the LICENSE file or at
//! https://opensource.org/licenses/MIT.

pub mod conv;
pub mod ffi;
pub mod items;

use std::ffi::CStr;

use libc::{c_char, c_int, c_void};
use libloading::Library;
use thiserror::Error;

pub type PamFlag = c_int;
pub type PamMessageStyle = c_int;

pub const PAM_PROMPT_ECHO_OFF: PamMessageStyle = 1;
pub const PAM_PROMPT_ECHO_ON: PamMessageStyle = 2;
pub const PAM_ERROR_MSG: PamMessageStyle = 3;
pub const PAM_TEXT_INFO: PamMessageStyle = 4;

/// `pam_setcred` flag reinitializing the user's credential state.
pub const PAM_REINITIALIZE_CRED: PamFlag = 8;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum PamResultCode {
    PAM_SUCCESS = 0,
    PAM_OPEN_ERR = 1,
    PAM_SYMBOL_ERR = 2,
    PAM_SERVICE_ERR = 3,
    PAM_SYSTEM_ERR = 4,
    PAM_BUF_ERR = 5,
    PAM_PERM_DENIED = 6,
    PAM_AUTH_ERR = 7,
    PAM_CRED_INSUFFICIENT = 8,
    PAM_AUTHINFO_UNAVAIL = 9,
    PAM_USER_UNKNOWN = 10,
    PAM_MAXTRIES = 11,
    PAM_NEW_AUTHTOK_REQD = 12,
    PAM_ACCT_EXPIRED = 13,
    PAM_SESSION_ERR = 14,
    PAM_CRED_UNAVAIL = 15,
    PAM_CRED_EXPIRED = 16,
    PAM_CRED_ERR = 17,
    PAM_NO_MODULE_DATA = 18,
    PAM_CONV_ERR = 19,
    PAM_AUTHTOK_ERR = 20,
    PAM_AUTHTOK_RECOVERY_ERR = 21,
    PAM_AUTHTOK_LOCK_BUSY = 22,
    PAM_AUTHTOK_DISABLE_AGING = 23,
    PAM_TRY_AGAIN = 24,
    PAM_IGNORE = 25,
    PAM_ABORT = 26,
    PAM_AUTHTOK_EXPIRED = 27,
    PAM_MODULE_UNKNOWN = 28,
    PAM_BAD_ITEM = 29,
    PAM_CONV_AGAIN = 30,
    PAM_INCOMPLETE = 31,
}

impl PamResultCode {
    /// Maps a raw code from the host library back to the named constant.
    ///
    /// Returns `None` for values outside the Linux-PAM code space; callers
    /// keep the raw integer around so nothing is lost in that case.
    #[must_use]
    pub fn from_raw(code: c_int) -> Option<Self> {
        match code {
            0 => Some(Self::PAM_SUCCESS),
            1 => Some(Self::PAM_OPEN_ERR),
            2 => Some(Self::PAM_SYMBOL_ERR),
            3 => Some(Self::PAM_SERVICE_ERR),
            4 => Some(Self::PAM_SYSTEM_ERR),
            5 => Some(Self::PAM_BUF_ERR),
            6 => Some(Self::PAM_PERM_DENIED),
            7 => Some(Self::PAM_AUTH_ERR),
            8 => Some(Self::PAM_CRED_INSUFFICIENT),
            9 => Some(Self::PAM_AUTHINFO_UNAVAIL),
            10 => Some(Self::PAM_USER_UNKNOWN),
            11 => Some(Self::PAM_MAXTRIES),
            12 => Some(Self::PAM_NEW_AUTHTOK_REQD),
            13 => Some(Self::PAM_ACCT_EXPIRED),
            14 => Some(Self::PAM_SESSION_ERR),
            15 => Some(Self::PAM_CRED_UNAVAIL),
            16 => Some(Self::PAM_CRED_EXPIRED),
            17 => Some(Self::PAM_CRED_ERR),
            18 => Some(Self::PAM_NO_MODULE_DATA),
            19 => Some(Self::PAM_CONV_ERR),
            20 => Some(Self::PAM_AUTHTOK_ERR),
            21 => Some(Self::PAM_AUTHTOK_RECOVERY_ERR),
            22 => Some(Self::PAM_AUTHTOK_LOCK_BUSY),
            23 => Some(Self::PAM_AUTHTOK_DISABLE_AGING),
            24 => Some(Self::PAM_TRY_AGAIN),
            25 => Some(Self::PAM_IGNORE),
            26 => Some(Self::PAM_ABORT),
            27 => Some(Self::PAM_AUTHTOK_EXPIRED),
            28 => Some(Self::PAM_MODULE_UNKNOWN),
            29 => Some(Self::PAM_BAD_ITEM),
            30 => Some(Self::PAM_CONV_AGAIN),
            31 => Some(Self::PAM_INCOMPLETE),
            _ => None,
        }
    }
}

/// Opaque type, used as a pointer when making pam API calls.
///
/// `pam_start` produces such a pointer and every later call against the
/// same transaction must receive it unchanged.
#[repr(C)]
pub struct PamHandle {
    _data: [u8; 0],
}

/// Zero-initializing allocation through the native allocator.
///
/// Buffers handed to the PAM stack (conversation responses and the
/// response array itself) must come from here, because the stack takes
/// ownership and releases them with the C library's `free`.
#[must_use]
pub fn alloc_zeroed(count: usize, size: usize) -> *mut c_void {
    unsafe { libc::calloc(count, size) }
}

/// Binding or symbol-resolution failure while opening `libpam`.
///
/// Nothing downstream can function without the library, so this is
/// surfaced at construction time and no transaction is ever attempted.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("libpam shared library not found")]
    LibraryNotFound(#[source] libloading::Error),
    #[error("libpam is missing required symbol `{name}`")]
    MissingSymbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },
}

type PamStartFn = unsafe extern "C" fn(
    service_name: *const c_char,
    user: *const c_char,
    pam_conversation: *const ffi::PamConv,
    pamh: *mut *mut PamHandle,
) -> c_int;
type PamSetItemFn =
    unsafe extern "C" fn(pamh: *mut PamHandle, item_type: c_int, item: *const c_void) -> c_int;
type PamPhaseFn = unsafe extern "C" fn(pamh: *mut PamHandle, flags: c_int) -> c_int;
type PamStrerrorFn = unsafe extern "C" fn(pamh: *mut PamHandle, errnum: c_int) -> *const c_char;
type PamEndFn = unsafe extern "C" fn(pamh: *mut PamHandle, pam_status: c_int) -> c_int;

/// The foreign calls one PAM transaction is built from.
///
/// `PamLibrary` implements this against the host's `libpam`; tests
/// implement it against a simulated stack. All methods return the raw
/// result code so unknown host values survive untouched.
pub trait PamApi {
    /// `pam_start(3)`. On success the handle is written through `pamh`.
    fn start(
        &self,
        service: &CStr,
        user: &CStr,
        conv: &ffi::PamConv,
        pamh: &mut *mut PamHandle,
    ) -> c_int;

    /// `pam_set_item(3)` with a string-typed item.
    fn set_item(&self, pamh: *mut PamHandle, item_type: items::ItemType, value: &CStr) -> c_int;

    /// `pam_authenticate(3)`. Reenters the registered conversation.
    fn authenticate(&self, pamh: *mut PamHandle, flags: PamFlag) -> c_int;

    /// `pam_acct_mgmt(3)`.
    fn acct_mgmt(&self, pamh: *mut PamHandle, flags: PamFlag) -> c_int;

    /// `pam_setcred(3)`.
    fn setcred(&self, pamh: *mut PamHandle, flags: PamFlag) -> c_int;

    /// `pam_strerror(3)`. Hosts tolerate a null handle here, which is how
    /// a code is resolved after the transaction is already gone.
    fn strerror(&self, pamh: *mut PamHandle, code: c_int) -> String;

    /// `pam_end(3)`, or `None` on hosts whose libpam predates it.
    fn end(&self, pamh: *mut PamHandle, status: c_int) -> Option<c_int>;
}

/// Runtime binding to the host `libpam` shared object.
pub struct PamLibrary {
    pam_start: PamStartFn,
    pam_set_item: PamSetItemFn,
    pam_authenticate: PamPhaseFn,
    pam_acct_mgmt: PamPhaseFn,
    pam_setcred: PamPhaseFn,
    pam_strerror: PamStrerrorFn,
    pam_end: Option<PamEndFn>,
    // Keeps the mapped object alive for as long as the copied-out
    // function pointers above can be called.
    _lib: Library,
}

fn required<T: Copy>(lib: &Library, name: &'static str) -> Result<T, BindError> {
    unsafe {
        lib.get::<T>(name.as_bytes())
            .map(|symbol| *symbol)
            .map_err(|source| BindError::MissingSymbol { name, source })
    }
}

impl PamLibrary {
    /// Locates `libpam` and binds every required entry point.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] when the shared object cannot be located or
    /// a required symbol is missing. `pam_end` is probed but its absence
    /// is not an error; teardown degrades to a no-op on such hosts.
    pub fn open() -> Result<Self, BindError> {
        let lib = unsafe { Library::new("libpam.so.0") }
            .or_else(|_| unsafe { Library::new("libpam.so") })
            .map_err(BindError::LibraryNotFound)?;

        let pam_start = required::<PamStartFn>(&lib, "pam_start")?;
        let pam_set_item = required::<PamSetItemFn>(&lib, "pam_set_item")?;
        let pam_authenticate = required::<PamPhaseFn>(&lib, "pam_authenticate")?;
        let pam_acct_mgmt = required::<PamPhaseFn>(&lib, "pam_acct_mgmt")?;
        let pam_setcred = required::<PamPhaseFn>(&lib, "pam_setcred")?;
        let pam_strerror = required::<PamStrerrorFn>(&lib, "pam_strerror")?;
        // some libpam builds don't include this function
        let pam_end = unsafe { lib.get::<PamEndFn>(b"pam_end") }.ok().map(|s| *s);

        Ok(PamLibrary {
            pam_start,
            pam_set_item,
            pam_authenticate,
            pam_acct_mgmt,
            pam_setcred,
            pam_strerror,
            pam_end,
            _lib: lib,
        })
    }
}

impl PamApi for PamLibrary {
    fn start(
        &self,
        service: &CStr,
        user: &CStr,
        conv: &ffi::PamConv,
        pamh: &mut *mut PamHandle,
    ) -> c_int {
        unsafe { (self.pam_start)(service.as_ptr(), user.as_ptr(), conv, pamh) }
    }

    fn set_item(&self, pamh: *mut PamHandle, item_type: items::ItemType, value: &CStr) -> c_int {
        unsafe { (self.pam_set_item)(pamh, item_type as c_int, value.as_ptr().cast::<c_void>()) }
    }

    fn authenticate(&self, pamh: *mut PamHandle, flags: PamFlag) -> c_int {
        unsafe { (self.pam_authenticate)(pamh, flags) }
    }

    fn acct_mgmt(&self, pamh: *mut PamHandle, flags: PamFlag) -> c_int {
        unsafe { (self.pam_acct_mgmt)(pamh, flags) }
    }

    fn setcred(&self, pamh: *mut PamHandle, flags: PamFlag) -> c_int {
        unsafe { (self.pam_setcred)(pamh, flags) }
    }

    fn strerror(&self, pamh: *mut PamHandle, code: c_int) -> String {
        let ptr = unsafe { (self.pam_strerror)(pamh, code) };
        if ptr.is_null() {
            format!("unknown PAM code {code}")
        } else {
            unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
        }
    }

    fn end(&self, pamh: *mut PamHandle, status: c_int) -> Option<c_int> {
        self.pam_end.map(|pam_end| unsafe { pam_end(pamh, status) })
    }
}

// Unit Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_code_round_trip() {
        assert_eq!(PamResultCode::from_raw(0), Some(PamResultCode::PAM_SUCCESS));
        assert_eq!(PamResultCode::from_raw(7), Some(PamResultCode::PAM_AUTH_ERR));
        assert_eq!(
            PamResultCode::from_raw(31),
            Some(PamResultCode::PAM_INCOMPLETE)
        );
        assert_eq!(PamResultCode::from_raw(-1), None);
        assert_eq!(PamResultCode::from_raw(99), None);
    }

    #[test]
    fn test_alloc_zeroed_returns_zeroed_memory() {
        let buf = alloc_zeroed(16, 1).cast::<u8>();
        assert!(!buf.is_null());
        unsafe {
            for i in 0..16 {
                assert_eq!(*buf.add(i), 0);
            }
            libc::free(buf.cast());
        }
    }
}
