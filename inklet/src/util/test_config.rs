// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{AuthMode, Config, ValidatedConfig};

/// Builder for test configurations shared by unit and integration suites.
pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.config.auth.secret = secret.to_string();
        self
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.config.auth.mode = AuthMode::Basic;
        self.config.auth.basic_username = Some(username.to_string());
        self.config.auth.basic_password = Some(password.to_string());
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config.validate().expect("test config should validate")
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_config(secret: &str) -> ValidatedConfig {
    TestConfigBuilder::new().with_secret(secret).build()
}
