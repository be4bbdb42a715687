//! # Settings Module
//!
//! The `settings` module is responsible for managing the settings of one
//! authentication attempt.
//!
//! ## Overview
//!
//! The `Settings` structure carries the PAM service name and the
//! credential-reset behavior. Values come from the configuration file and
//! may be overridden per call by the library consumer or the CLI.
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

use crate::config::Config;

// Settings struct represents the configuration loaded from default values,
// configuration file and caller overrides
#[derive(Debug, Clone)]
pub struct Settings {
    // PAM service to authenticate against
    pub service: String,
    // Reinitialize credentials after a successful check
    pub resetcreds: bool,
}

impl Default for Settings {
    /// Creates a 'Settings' struct from the host configuration file, falling
    /// back to built-in defaults when the file is absent.
    fn default() -> Self {
        let config = Config::load_file(None);
        Settings {
            service: config.service,
            resetcreds: config.resetcreds,
        }
    }
}

impl Settings {
    /// Constructs a `Settings` instance from caller overrides layered over
    /// the configuration file.
    ///
    /// # Arguments
    ///
    /// * `service`: An optional PAM service name overriding the configured one.
    /// * `no_resetcreds`: Disables credential reinitialization regardless of
    ///   the configured value.
    /// * `config_file`: An optional path to the TOML file. If not provided,
    ///   the default configuration file path is used.
    #[must_use]
    pub fn build(
        service: Option<String>,
        no_resetcreds: bool,
        config_file: Option<&str>,
    ) -> Settings {
        let config = Config::load_file(config_file);
        Settings {
            service: service.unwrap_or(config.service),
            resetcreds: !no_resetcreds && config.resetcreds,
        }
    }
}

// Unit Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_settings_overrides_service() {
        let settings = Settings::build(Some("sshd".to_string()), false, Some("/nonexistent"));
        assert_eq!(settings.service, "sshd");
        assert!(settings.resetcreds);
    }

    #[test]
    fn test_build_settings_disables_resetcreds() {
        let settings = Settings::build(None, true, Some("/nonexistent"));
        assert_eq!(settings.service, "login");
        assert!(!settings.resetcreds);
    }
}
