// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::assets::AssetStore;
use crate::cache::{LABEL_COUNT_TTL, ResponseCache};
use crate::config::ValidatedConfig;
use crate::iam::CredentialVerifier;
use crate::runtime_paths::RuntimePaths;
use crate::sanitize::HtmlSanitizer;

pub struct AppState {
    pub html_sanitizer: HtmlSanitizer,
    pub label_cache: ResponseCache,
    pub assets: AssetStore,
    pub verifier: CredentialVerifier,
}

impl AppState {
    pub fn new(config: &ValidatedConfig, runtime_paths: &RuntimePaths) -> Self {
        Self {
            html_sanitizer: HtmlSanitizer::new(),
            label_cache: ResponseCache::with_ttl(LABEL_COUNT_TTL),
            assets: AssetStore::new(runtime_paths.assets_dir.clone()),
            verifier: CredentialVerifier::from_config(&config.auth),
        }
    }
}
