// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::StoreError;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

/// Replies are read-only attachments of a post; they are created outside the
/// API surface and removed by the post-deletion cascade.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: i64,
    #[sqlx(rename = "post_id")]
    pub post_id: i64,
    pub content: String,
    pub published: i64,
}

pub async fn replies_for_post(pool: &SqlitePool, post_id: i64) -> Result<Vec<Reply>, StoreError> {
    let replies = sqlx::query_as::<_, Reply>(
        "SELECT id, post_id, content, published FROM replies \
         WHERE post_id = $1 ORDER BY published ASC, id ASC",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    Ok(replies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_serializes_post_id_as_camel_case() {
        let reply = Reply {
            id: 1,
            post_id: 2,
            content: "hello".to_string(),
            published: 3,
        };
        let value = serde_json::to_value(&reply).expect("json");
        assert_eq!(value.get("postId").and_then(|v| v.as_i64()), Some(2));
        assert!(value.get("post_id").is_none());
    }
}
