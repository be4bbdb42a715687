//! # Configuration Module
//!
//! The `config` module provides functionality for loading and accessing configuration settings
//! used by the `AuthKit` library and CLI binary.
//!
//! # Usage
//!
//! To use the `config` module, create a `Config` struct using the `load_file` function, providing
//! the path to the configuration file. The `Config` struct allows accessing the default PAM
//! service name and credential-reset behavior.
//!
//! # Structs
//!
//! - [`Config`](struct.Config.html): Represents the configuration settings for `AuthKit`.
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

use std::{fs, path::PathBuf};

const DEFAULT_CONFIG_FILE_PATH: &str = "/etc/security/authkit.conf";

#[derive(Debug)]
pub struct Config {
    // PAM service to authenticate against when the caller names none.
    pub service: String,
    // Reinitialize the user's credentials after a successful check.
    pub resetcreds: bool,
}

impl Default for Config {
    /// Creates a default 'Config' struct. Default configruation values are set here.
    fn default() -> Self {
        Config {
            service: String::from("login"),
            resetcreds: true,
        }
    }
}

impl Config {
    /// Loads configuration config from an TOML file, returning a `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `path`: An optional path to the TOML file. If not provided, the default
    ///   configuration file path is used.
    ///
    /// # Returns
    ///
    /// A `Config` instance populated with values from the configuration file, or the
    /// default values if the file is not present or cannot be loaded.
    #[must_use]
    pub fn load_file(path: Option<&str>) -> Config {
        // Read TOML file using the toml crate
        let content =
            fs::read_to_string(PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE_PATH))).ok();

        // Parse TOML content into a TomlTable
        let toml_table: Option<toml::value::Table> =
            content.and_then(|c| toml::de::from_str(&c).ok());

        // Extract the "Configuration" section from the TOML table
        let config = toml_table.and_then(|t| t.get("Configuration").cloned());

        // Map the config to the Config struct
        config.map_or_else(Config::default, |s| Config {
            service: s
                .get("service")
                .and_then(|val| val.as_str().map(ToString::to_string))
                .unwrap_or_else(|| Config::default().service),

            resetcreds: s
                .get("resetcreds")
                .and_then(toml::Value::as_bool)
                .unwrap_or_else(|| Config::default().resetcreds),
        })
    }
}
