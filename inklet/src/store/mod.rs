// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod labels;
pub mod options;
pub mod posts;
pub mod replies;

pub use labels::{LabelCount, LabelDelta, diff_labels};
pub use options::{AdminCredentials, OptionUpdate};
pub use posts::{NewPost, Post, PostFilter, PostKind, PostPatch, PostStatus, PostWithLabels};
pub use replies::Reply;

use crate::runtime_paths::RuntimePaths;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Open (creating if missing) the database file and ensure the schema.
pub async fn connect(runtime_paths: &RuntimePaths) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(&runtime_paths.database_file)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Millisecond-epoch default used for the published/updated columns.
const NOW_MS: &str = "(CAST(unixepoch() * 1000 AS INTEGER))";

pub async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    let statements = [
        format!(
            "CREATE TABLE IF NOT EXISTS posts (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                type TEXT NOT NULL DEFAULT 'post',\
                status TEXT NOT NULL DEFAULT 'publish',\
                published INTEGER NOT NULL DEFAULT {NOW_MS},\
                updated INTEGER NOT NULL DEFAULT {NOW_MS},\
                title TEXT NOT NULL,\
                content TEXT NOT NULL\
            )"
        ),
        "CREATE INDEX IF NOT EXISTS posts_type_status_published_idx \
            ON posts (type, status, published, id)"
            .to_string(),
        "CREATE TABLE IF NOT EXISTS labels (\
            post_id INTEGER NOT NULL REFERENCES posts (id) ON DELETE CASCADE,\
            name TEXT NOT NULL\
        )"
        .to_string(),
        "CREATE INDEX IF NOT EXISTS labels_post_id_name_idx ON labels (post_id, name)"
            .to_string(),
        "CREATE INDEX IF NOT EXISTS labels_name_idx ON labels (name)".to_string(),
        format!(
            "CREATE TABLE IF NOT EXISTS replies (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                post_id INTEGER NOT NULL REFERENCES posts (id) ON DELETE CASCADE,\
                content TEXT NOT NULL,\
                published INTEGER NOT NULL DEFAULT {NOW_MS}\
            )"
        ),
        "CREATE INDEX IF NOT EXISTS replies_post_id_idx ON replies (post_id)".to_string(),
        "CREATE TABLE IF NOT EXISTS options (\
            key TEXT PRIMARY KEY,\
            value TEXT NOT NULL\
        )"
        .to_string(),
    ];

    for statement in &statements {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
