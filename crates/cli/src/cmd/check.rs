//! # Check Module
//!
//! The `check` module authenticates a username and password against the host's
//! PAM stack from the command line. The username defaults to the invoking user
//! and the password is read from the terminal with echo off. The native result
//! code and its `pam_strerror` rendering are always printed, so a failed check
//! can be told apart from an operational error.
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

use colored::Colorize;
use common::settings::Settings;
use pam_authkit::Authenticator;

use crate::{AkCliError, AkCliInfo, AkCliResult as Acr, AkCliSuccess};

/// Checks the given (or invoking) user's credentials against the PAM stack.
///
/// # Arguments
///
/// - `user`: The username to check; the invoking user when absent.
/// - `service`: PAM service overriding the configured default.
/// - `no_resetcreds`: Skips credential reinitialization after the check.
/// - `config`: Alternative configuration file path.
///
/// # Returns
///
/// A result for the CLI to render.
///
/// - `AkCliResult::Success` when the stack accepted the credentials.
/// - `AkCliResult::Info` when the stack denied them (wrong password,
///   expired or locked account).
/// - `AkCliResult::Error` for operational failures (no usable libpam,
///   no terminal, unknown invoking user).
pub fn user(
    user: Option<&str>,
    service: Option<String>,
    no_resetcreds: bool,
    config: Option<&str>,
) -> Acr {
    let settings = Settings::build(service, no_resetcreds, config);

    let username = match user {
        Some(name) => name.to_string(),
        None => match uzers::get_current_username().and_then(|name| name.into_string().ok()) {
            Some(name) => name,
            None => {
                return Acr::Error(AkCliError {
                    message: "could not determine the invoking user".to_string(),
                })
            }
        },
    };

    let password = match rpassword::prompt_password(format!("Password for {username}: ")) {
        Ok(password) => password,
        Err(e) => {
            return Acr::Error(AkCliError {
                message: format!("{e}"),
            })
        }
    };

    let authenticator = match Authenticator::new() {
        Ok(authenticator) => authenticator,
        Err(e) => {
            return Acr::Error(AkCliError {
                message: format!("{e}"),
            })
        }
    };

    let result = authenticator.authenticate_with(&username, &password, &settings);

    if result.success {
        Acr::Success(Some(AkCliSuccess {
            message: format!(
                "authenticated user: '{}' ({} {})",
                username.yellow(),
                result.code,
                result.reason
            ),
        }))
    } else {
        Acr::Info(AkCliInfo {
            message: format!(
                "authentication failed for user: '{}' ({} {})",
                username.yellow(),
                result.code,
                result.reason
            ),
        })
    }
}
