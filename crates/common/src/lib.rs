//! # `AuthKit` Utility Crate
//!
//! The `common` crate provides types, utility modules and functionality used across the `AuthKit` library,
//! including configuration management, settings handling and syslog initialization.
//!
//! # Modules
//!
//! ## `config`
//!
//! The `config` module provides functionality for loading and accessing configuration settings
//! used by the `AuthKit` library and CLI binary. It includes a `Config` struct that represents
//! the configuration settings for `AuthKit`.
//!
//! ## `settings`
//!
//! The `settings` module provides functionality for managing and accessing settings used for
//! one authentication attempt. It includes a `Settings` struct that encapsulates the PAM
//! service name and the credential-reset behavior, merged from the configuration file and
//! caller overrides.
//!
//! ## `util`
//!
//! The `util` module provides syslog initialization for the CLI binary, ensuring that log
//! messages are sent to the appropriate syslog facility, making it easy to monitor
//! authentication activity.
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

pub mod config;
pub mod settings;
pub mod util;
