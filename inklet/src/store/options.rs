// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::StoreError;
use sqlx::QueryBuilder;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

pub const ADMIN_USERNAME_KEY: &str = "adminUsername";
pub const ADMIN_PASSWORD_KEY: &str = "adminPassword";

/// A per-key update. Deletion is an explicit operation, not a sentinel
/// value, so an empty string remains a legitimate stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionUpdate {
    Set(String),
    Delete,
}

pub async fn all_options(pool: &SqlitePool) -> Result<HashMap<String, String>, StoreError> {
    let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM options")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().collect())
}

pub async fn option_value(pool: &SqlitePool, key: &str) -> Result<Option<String>, StoreError> {
    let row = sqlx::query_as::<_, (String,)>("SELECT value FROM options WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(value,)| value))
}

/// Apply a batch of tagged updates: one batched delete, then an upsert per
/// set key (at most one row per key).
pub async fn apply_updates(
    pool: &SqlitePool,
    updates: &[(String, OptionUpdate)],
) -> Result<(), StoreError> {
    let deletions: Vec<&String> = updates
        .iter()
        .filter(|(_, update)| *update == OptionUpdate::Delete)
        .map(|(key, _)| key)
        .collect();

    if !deletions.is_empty() {
        let mut builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("DELETE FROM options WHERE key IN (");
        {
            let mut keys = builder.separated(", ");
            for key in &deletions {
                keys.push_bind((*key).clone());
            }
        }
        builder.push(")");
        builder.build().execute(pool).await?;
    }

    for (key, update) in updates {
        if let OptionUpdate::Set(value) = update {
            sqlx::query(
                "INSERT INTO options (key, value) VALUES ($1, $2) \
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            )
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// The signed-token representation created at install time, never a
    /// plaintext password.
    pub password_token: String,
}

pub async fn admin_credentials(
    pool: &SqlitePool,
) -> Result<Option<AdminCredentials>, StoreError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT key, value FROM options WHERE key = $1 OR key = $2",
    )
    .bind(ADMIN_USERNAME_KEY)
    .bind(ADMIN_PASSWORD_KEY)
    .fetch_all(pool)
    .await?;

    let mut username = None;
    let mut password_token = None;
    for (key, value) in rows {
        match key.as_str() {
            ADMIN_USERNAME_KEY => username = Some(value),
            ADMIN_PASSWORD_KEY => password_token = Some(value),
            _ => {}
        }
    }

    match (username, password_token) {
        (Some(username), Some(password_token)) => Ok(Some(AdminCredentials {
            username,
            password_token,
        })),
        _ => Ok(None),
    }
}

/// Installed means either credential row exists, matching the install
/// route's conflict check.
pub async fn is_installed(pool: &SqlitePool) -> Result<bool, StoreError> {
    let row = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM options WHERE key = $1 OR key = $2",
    )
    .bind(ADMIN_USERNAME_KEY)
    .bind(ADMIN_PASSWORD_KEY)
    .fetch_one(pool)
    .await?;
    Ok(row.0 > 0)
}
