//! # `AuthKit` PAM Client Library
//!
//! `AuthKit` authenticates a user's credentials against the host's Pluggable
//! Authentication Modules (PAM) stack. It drives the PAM client protocol over
//! a dynamically resolved `libpam`: one call opens a transaction, registers a
//! conversation that answers echo-off prompts with the supplied password,
//! runs the authentication and account-management phases, optionally
//! reinitializes the user's credentials, and tears the transaction down
//! again.
//!
//! ## Usage
//!
//! ```no_run
//! use pam_authkit::Authenticator;
//!
//! let authenticator = Authenticator::new().expect("libpam not available");
//! let result = authenticator.authenticate("alice", "hunter2");
//! println!("{} {}", result.code, result.reason);
//! ```
//!
//! The default service is `login` (configurable through
//! `/etc/security/authkit.conf`); [`Authenticator::authenticate_with`] takes
//! explicit [`Settings`] instead.
//!
//! Each call owns an independent PAM transaction and no state survives the
//! call, so an `Authenticator` may be shared across threads as long as the
//! host `libpam` is reentrant.
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

mod transaction;

#[cfg(test)]
mod mock;

use std::ffi::CString;

use libc::c_int;

pub use common::settings::Settings;
pub use pam::{BindError, PamApi, PamLibrary, PamResultCode};

/// Outcome of one authentication attempt.
///
/// `code` is the raw result of the last foreign call of the transaction and
/// `reason` its `pam_strerror` rendering; both are populated on every path.
/// `success` classifies the authentication and account-management phases
/// and is *not* derivable from `code` alone: a failed credential reset
/// overwrites `code` while `success` stays `true`.
#[derive(Debug)]
pub struct AuthResult {
    pub success: bool,
    pub code: c_int,
    pub reason: String,
}

impl AuthResult {
    /// The named constant for [`code`](Self::code), when the host returned
    /// a value inside the known code space.
    #[must_use]
    pub fn result_code(&self) -> Option<PamResultCode> {
        PamResultCode::from_raw(self.code)
    }

    // Pre-flight rejection; nothing has crossed the foreign boundary.
    fn rejected_nul() -> Self {
        AuthResult {
            success: false,
            code: PamResultCode::PAM_SYSTEM_ERR as c_int,
            reason: String::from("strings may not contain NUL"),
        }
    }
}

/// PAM client authenticator.
///
/// Holds the `libpam` binding; every [`authenticate`](Self::authenticate)
/// call runs one self-contained PAM transaction on the calling thread.
pub struct Authenticator<L = PamLibrary> {
    lib: L,
}

impl Authenticator<PamLibrary> {
    /// Binds the host's `libpam`.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] when the shared library or one of its
    /// required entry points cannot be resolved. No authentication is
    /// possible on such a host, so this is checked once up front.
    pub fn new() -> Result<Self, BindError> {
        Ok(Self {
            lib: PamLibrary::open()?,
        })
    }
}

impl<L: PamApi> Authenticator<L> {
    /// Creates an authenticator over any [`PamApi`] implementation.
    ///
    /// This is the seam the test suite injects a simulated stack through;
    /// production callers want [`Authenticator::new`].
    pub fn with_api(lib: L) -> Self {
        Self { lib }
    }

    /// Authenticates `username` with `password` using the configured
    /// defaults (service `login` unless overridden on the host).
    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult {
        self.authenticate_with(username, password, &Settings::default())
    }

    /// Authenticates `username` with `password` against
    /// `settings.service`, reinitializing credentials afterwards when
    /// `settings.resetcreds` is set.
    ///
    /// Username, password and service must not contain NUL bytes; the
    /// transport is NUL-terminated, so such input is rejected with code 4
    /// (`PAM_SYSTEM_ERR`) before any foreign call is made.
    pub fn authenticate_with(
        &self,
        username: &str,
        password: &str,
        settings: &Settings,
    ) -> AuthResult {
        let Ok(user) = CString::new(username) else {
            return AuthResult::rejected_nul();
        };
        let Ok(password) = CString::new(password) else {
            return AuthResult::rejected_nul();
        };
        let Ok(service) = CString::new(settings.service.as_str()) else {
            return AuthResult::rejected_nul();
        };

        transaction::run(
            &self.lib,
            &service,
            &user,
            password.as_bytes(),
            settings.resetcreds,
            transaction::controlling_tty().as_deref(),
        )
    }
}
