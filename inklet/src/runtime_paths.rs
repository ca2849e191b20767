// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{ConfigError, ValidatedConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
    pub assets_dir: PathBuf,
}

impl RuntimePaths {
    pub fn from_root(root: &Path, config: &ValidatedConfig) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        if !root_path.exists() {
            fs::create_dir_all(&root_path).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Failed to create runtime root '{}': {}",
                    root_path.display(),
                    e
                ))
            })?;
        }

        let root_canonical = root_path.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize runtime root '{}': {}",
                root_path.display(),
                e
            ))
        })?;

        let config_file = root_canonical.join("config.yaml");
        let database_file = root_canonical.join(&config.database.file);
        let assets_dir = root_canonical.join(&config.assets.dir);
        ensure_dir_exists(&assets_dir)?;

        Ok(Self {
            root: root_canonical,
            config_file,
            database_file,
            assets_dir,
        })
    }
}

fn ensure_dir_exists(dir: &Path) -> Result<(), ConfigError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "Path exists but is not a directory: {}",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| {
        ConfigError::ValidationError(format!(
            "Failed to create directory '{}': {}",
            dir.display(),
            e
        ))
    })
}
