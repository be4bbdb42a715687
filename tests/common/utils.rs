//! # Test Utilities Module
//!
//! The `utils` module provides utility functions for the end-to-end tests of the
//! `AuthKit` library. It includes functions to create and remove a PAM service file
//! and to initialize and clear the testing environment.
//!
//! ## PAM Service File
//!
//! The PAM service file is a configuration file used to define PAM services. The module
//! includes functions to create and remove a PAM service file backed by `pam_unix`
//! during tests, so the checks run against the host's real account database.
//!
//! ## Test Credentials
//!
//! The credentials of an existing host user are read from the `TEST_USER_NAME` and
//! `TEST_USER_PWD` environment variables at runtime; tests skip with a notice when
//! they are unset.
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

use std::io;
use std::path::PathBuf;

use std::{
    fs::{remove_file, File},
    io::Write,
};

pub const SRV_DIR: &str = "/etc/pam.d";
pub const PAM_SRV: &str = "test-authkit";

fn create_pam_service_file() -> io::Result<()> {
    let mut file = File::create(PathBuf::from(SRV_DIR).join(PAM_SRV))?;

    let content = "auth        required      pam_unix.so nullok \n\
                  account     required      pam_unix.so";

    file.write_all(content.as_bytes())?;
    Ok(())
}

fn remove_pam_service_file() -> io::Result<()> {
    remove_file(PathBuf::from(SRV_DIR).join(PAM_SRV))?;
    Ok(())
}

pub fn init_and_clear_test<F>(test: F)
where
    F: FnOnce(),
{
    create_pam_service_file().expect("Failed to create PAM service file");
    test();
    remove_pam_service_file().expect("Failed to remove PAM service file");
}

pub fn test_credentials() -> Option<(String, String)> {
    let name = std::env::var("TEST_USER_NAME").ok()?;
    let pwd = std::env::var("TEST_USER_PWD").ok()?;
    Some((name, pwd))
}
