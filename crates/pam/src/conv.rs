//! # PAM conversation module
//!
//! This module provides the client half of the PAM conversation.
//!
//! The PAM conversation function is a callback provided by the application,
//! which is used by the PAM library to communicate with the user. During
//! `pam_authenticate` the stack reenters the calling thread through this
//! callback with a batch of messages and expects a parallel array of
//! responses.
//!
//! [`password_conv`] is a non-interactive conversation: it answers every
//! echo-off prompt with a pre-supplied password and leaves all other
//! message styles unanswered. The password travels through the
//! `appdata_ptr` slot of the `pam_conv` structure via [`ConvContext`], so
//! nothing is stored globally and concurrent transactions stay independent.
//!
//! Response memory is allocated through the native allocator because the
//! PAM stack takes ownership of both the response array and every response
//! buffer, and releases them with the C library's `free`.
//!
//!  ## License
//!
//! Copyright 2023 34n0
//!
//! Use of this source code is governed by an MIT-style
//! license that can be found in the LICENSE file or at
//! https://opensource.org/licenses/MIT.

use std::mem;

use libc::{c_char, c_int, c_void};

use crate::ffi::{PamConv, PamMessage, PamResponse};
use crate::{alloc_zeroed, PamResultCode, PAM_PROMPT_ECHO_OFF};

/// Caller-scoped context crossing the foreign boundary.
///
/// Borrows the password from the enclosing `authenticate` call; the
/// pointer handed out by [`as_conv`](Self::as_conv) is only valid while
/// that call is on the stack.
pub struct ConvContext<'a> {
    password: &'a [u8],
}

impl<'a> ConvContext<'a> {
    #[must_use]
    pub fn new(password: &'a [u8]) -> Self {
        Self { password }
    }

    /// Builds the `pam_conv` structure registering [`password_conv`] with
    /// this context as its application data.
    pub fn as_conv(&mut self) -> PamConv {
        PamConv {
            conv: password_conv,
            appdata_ptr: (self as *mut Self).cast::<c_void>(),
        }
    }
}

/// Conversation callback answering echo-off prompts with the password.
///
/// For `num_msg` messages a zero-initialized array of `num_msg` response
/// slots is allocated, so every slot is dereferenceable whatever styles
/// arrive. Echo-off prompts get a copy of the password (status 0); every
/// other style keeps the absent response the zeroed slot already encodes.
///
/// # Safety
///
/// Must only be invoked by the PAM stack with the arguments `pam_conv`
/// promises: `msg` pointing at `num_msg` valid messages, `resp` writable,
/// and `appdata_ptr` carrying the [`ConvContext`] registered alongside
/// this function, still alive on the calling stack.
pub unsafe extern "C" fn password_conv(
    num_msg: c_int,
    msg: *const *const PamMessage,
    resp: *mut *mut PamResponse,
    appdata_ptr: *mut c_void,
) -> c_int {
    let Ok(count) = usize::try_from(num_msg) else {
        return PamResultCode::PAM_CONV_ERR as c_int;
    };
    if count == 0 || msg.is_null() || resp.is_null() || appdata_ptr.is_null() {
        return PamResultCode::PAM_CONV_ERR as c_int;
    }
    let ctx = &*appdata_ptr.cast::<ConvContext>();

    let reply = alloc_zeroed(count, mem::size_of::<PamResponse>()).cast::<PamResponse>();
    if reply.is_null() {
        return PamResultCode::PAM_BUF_ERR as c_int;
    }
    // Ownership of the array transfers to the stack here, whatever the
    // return value ends up being.
    *resp = reply;

    let mut status = PamResultCode::PAM_SUCCESS as c_int;
    for i in 0..count {
        let message = *msg.add(i);
        if message.is_null() || (*message).msg_style != PAM_PROMPT_ECHO_OFF {
            continue;
        }
        let buf = alloc_zeroed(ctx.password.len() + 1, 1).cast::<c_char>();
        if buf.is_null() {
            // the slot stays absent; the array as a whole is still valid
            status = PamResultCode::PAM_BUF_ERR as c_int;
            continue;
        }
        std::ptr::copy_nonoverlapping(ctx.password.as_ptr(), buf.cast::<u8>(), ctx.password.len());
        let slot = &mut *reply.add(i);
        slot.resp = buf;
        slot.resp_retcode = 0;
    }
    status
}

// Unit Tests
#[cfg(test)]
mod tests {
    use std::ffi::{CStr, CString};
    use std::ptr;

    use super::*;
    use crate::{PAM_ERROR_MSG, PAM_PROMPT_ECHO_ON, PAM_TEXT_INFO};

    fn message(style: crate::PamMessageStyle, text: &CString) -> PamMessage {
        PamMessage {
            msg_style: style,
            msg: text.as_ptr(),
        }
    }

    #[test]
    fn test_mixed_styles_fill_only_echo_off() {
        let prompt = CString::new("Password: ").unwrap();
        let notice = CString::new("last login yesterday").unwrap();
        let msgs = [
            message(PAM_PROMPT_ECHO_OFF, &prompt),
            message(PAM_PROMPT_ECHO_ON, &prompt),
            message(PAM_ERROR_MSG, &notice),
            message(PAM_TEXT_INFO, &notice),
        ];
        let ptrs: Vec<*const PamMessage> = msgs.iter().map(|m| m as *const PamMessage).collect();

        let mut ctx = ConvContext::new(b"hunter2");
        let conv = ctx.as_conv();
        let mut resp: *mut PamResponse = ptr::null_mut();
        let status = unsafe { (conv.conv)(4, ptrs.as_ptr(), &mut resp, conv.appdata_ptr) };

        assert_eq!(status, PamResultCode::PAM_SUCCESS as c_int);
        assert!(!resp.is_null());
        unsafe {
            let first = &*resp;
            assert!(!first.resp.is_null());
            assert_eq!(CStr::from_ptr(first.resp).to_bytes(), b"hunter2");
            assert_eq!(first.resp_retcode, 0);
            for i in 1..4 {
                let slot = &*resp.add(i);
                assert!(slot.resp.is_null(), "slot {i} should be absent");
                assert_eq!(slot.resp_retcode, 0);
            }
            libc::free(first.resp.cast::<c_void>());
            libc::free(resp.cast::<c_void>());
        }
    }

    #[test]
    fn test_empty_password_still_answers_prompt() {
        let prompt = CString::new("Password: ").unwrap();
        let msg = message(PAM_PROMPT_ECHO_OFF, &prompt);
        let ptrs = [&msg as *const PamMessage];

        let mut ctx = ConvContext::new(b"");
        let conv = ctx.as_conv();
        let mut resp: *mut PamResponse = ptr::null_mut();
        let status = unsafe { (conv.conv)(1, ptrs.as_ptr(), &mut resp, conv.appdata_ptr) };

        assert_eq!(status, PamResultCode::PAM_SUCCESS as c_int);
        unsafe {
            let first = &*resp;
            assert!(!first.resp.is_null());
            assert_eq!(CStr::from_ptr(first.resp).to_bytes(), b"");
            libc::free(first.resp.cast::<c_void>());
            libc::free(resp.cast::<c_void>());
        }
    }

    #[test]
    fn test_degenerate_invocation_is_rejected() {
        let mut ctx = ConvContext::new(b"pw");
        let conv = ctx.as_conv();
        let mut resp: *mut PamResponse = ptr::null_mut();

        let status = unsafe { (conv.conv)(0, ptr::null(), &mut resp, conv.appdata_ptr) };
        assert_eq!(status, PamResultCode::PAM_CONV_ERR as c_int);
        assert!(resp.is_null());

        let status = unsafe { (conv.conv)(-3, ptr::null(), &mut resp, conv.appdata_ptr) };
        assert_eq!(status, PamResultCode::PAM_CONV_ERR as c_int);
        assert!(resp.is_null());
    }
}
