//! Simulated PAM stack for the unit tests.
//!
//! Implements [`PamApi`] with scripted per-phase result codes and records
//! every foreign call, so phase sequencing and the teardown contract can be
//! asserted without a host PAM configuration. When `expected_password` is
//! set, `authenticate` reenters the registered conversation with a single
//! echo-off prompt the way a real stack does, and frees the returned
//! buffers like the native consumer would.

use std::cell::{Cell, RefCell};
use std::ffi::{CStr, CString};
use std::ptr::NonNull;

use libc::{c_int, c_void};
use pam::ffi::{PamConv, PamMessage, PamResponse};
use pam::items::ItemType;
use pam::{PamApi, PamFlag, PamHandle, PamResultCode, PAM_PROMPT_ECHO_OFF};

pub(crate) struct MockPam {
    pub(crate) start_code: c_int,
    pub(crate) auth_code: c_int,
    pub(crate) acct_code: c_int,
    pub(crate) setcred_code: c_int,
    pub(crate) has_end: bool,
    /// When set, `authenticate` prompts through the conversation and
    /// compares the reply against this password.
    pub(crate) expected_password: Option<Vec<u8>>,
    pub(crate) calls: RefCell<Vec<&'static str>>,
    pub(crate) conv: Cell<Option<PamConv>>,
}

impl MockPam {
    /// A stack that accepts every phase.
    pub(crate) fn accepting() -> Self {
        MockPam {
            start_code: 0,
            auth_code: 0,
            acct_code: 0,
            setcred_code: 0,
            has_end: true,
            expected_password: None,
            calls: RefCell::new(Vec::new()),
            conv: Cell::new(None),
        }
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }

    // Never dereferenced; stands in for the opaque token a host hands out.
    fn dummy_handle() -> *mut PamHandle {
        NonNull::dangling().as_ptr()
    }

    /// Plays the native side of the conversation: one echo-off prompt,
    /// reply compared to `expected`, buffers freed as the stack would.
    fn converse(&self, expected: &[u8]) -> c_int {
        let conv = self.conv.get().expect("conversation not registered");
        let prompt = CString::new("Password: ").unwrap();
        let message = PamMessage {
            msg_style: PAM_PROMPT_ECHO_OFF,
            msg: prompt.as_ptr(),
        };
        let messages = [&message as *const PamMessage];
        let mut responses: *mut PamResponse = std::ptr::null_mut();

        let status = unsafe { (conv.conv)(1, messages.as_ptr(), &mut responses, conv.appdata_ptr) };
        if status != 0 || responses.is_null() {
            return PamResultCode::PAM_CONV_ERR as c_int;
        }

        unsafe {
            let slot = &*responses;
            let matches =
                !slot.resp.is_null() && CStr::from_ptr(slot.resp).to_bytes() == expected;
            if !slot.resp.is_null() {
                libc::free(slot.resp.cast::<c_void>());
            }
            libc::free(responses.cast::<c_void>());
            if matches {
                self.auth_code
            } else {
                PamResultCode::PAM_AUTH_ERR as c_int
            }
        }
    }
}

impl PamApi for MockPam {
    fn start(
        &self,
        _service: &CStr,
        _user: &CStr,
        conv: &PamConv,
        pamh: &mut *mut PamHandle,
    ) -> c_int {
        self.record("start");
        self.conv.set(Some(*conv));
        // hand out a handle even on failure so the teardown-once contract
        // is observable on the start-fail branch
        *pamh = Self::dummy_handle();
        self.start_code
    }

    fn set_item(&self, _pamh: *mut PamHandle, _item_type: ItemType, _value: &CStr) -> c_int {
        self.record("set_item");
        0
    }

    fn authenticate(&self, _pamh: *mut PamHandle, _flags: PamFlag) -> c_int {
        self.record("authenticate");
        match &self.expected_password {
            Some(expected) => self.converse(expected),
            None => self.auth_code,
        }
    }

    fn acct_mgmt(&self, _pamh: *mut PamHandle, _flags: PamFlag) -> c_int {
        self.record("acct_mgmt");
        self.acct_code
    }

    fn setcred(&self, _pamh: *mut PamHandle, _flags: PamFlag) -> c_int {
        self.record("setcred");
        self.setcred_code
    }

    fn strerror(&self, _pamh: *mut PamHandle, code: c_int) -> String {
        self.record("strerror");
        match PamResultCode::from_raw(code) {
            Some(PamResultCode::PAM_SUCCESS) => String::from("Success"),
            Some(PamResultCode::PAM_AUTH_ERR) => String::from("Authentication failure"),
            Some(PamResultCode::PAM_ACCT_EXPIRED) => String::from("User account has expired"),
            Some(PamResultCode::PAM_CRED_ERR) => String::from("Failure setting user credentials"),
            _ => format!("PAM error {code}"),
        }
    }

    fn end(&self, _pamh: *mut PamHandle, _status: c_int) -> Option<c_int> {
        self.record("end");
        self.has_end.then_some(0)
    }
}
