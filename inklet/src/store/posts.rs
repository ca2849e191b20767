// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::StoreError;
use super::labels::labels_for_posts;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PostKind {
    Post,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: PostKind,
    pub status: PostStatus,
    pub published: i64,
    pub updated: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PostWithLabels {
    #[serde(flatten)]
    pub post: Post,
    pub labels: Vec<String>,
}

/// Fields for a new post. Timestamps default store-side unless explicitly
/// supplied.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub kind: Option<PostKind>,
    pub status: Option<PostStatus>,
    pub published: Option<i64>,
    pub updated: Option<i64>,
}

/// Partial update. Only supplied fields reach the store; the identifier and
/// published timestamp never do.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<PostKind>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub kind: Option<PostKind>,
    pub status: Option<PostStatus>,
    pub query: Option<String>,
}

/// A free-text query string, with an optional `label:<name>` token extracted.
/// At most one label token is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuery {
    Label(String),
    Text(String),
}

pub fn parse_query(raw: &str) -> Option<ParsedQuery> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    if let Some(label_word) = words.iter().find(|word| word.starts_with("label:")) {
        return Some(ParsedQuery::Label(label_word["label:".len()..].to_string()));
    }
    Some(ParsedQuery::Text(words.join(" ")))
}

const POST_COLUMNS: &str = "p.id, p.type, p.status, p.published, p.updated, p.title, p.content";

/// List posts, newest first. A free-text query restricts the result to
/// published posts (title substring, case-insensitive); a `label:` query
/// joins the label table and is also restricted to published posts.
pub async fn list_posts(pool: &SqlitePool, filter: &PostFilter) -> Result<Vec<Post>, StoreError> {
    let parsed = filter.query.as_deref().and_then(parse_query);

    let mut builder: QueryBuilder<sqlx::Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM posts p", POST_COLUMNS));

    if let Some(ParsedQuery::Label(name)) = &parsed {
        builder.push(" INNER JOIN labels l ON l.post_id = p.id AND l.name = ");
        builder.push_bind(name.clone());
    }

    builder.push(" WHERE 1 = 1");

    if let Some(kind) = filter.kind {
        builder.push(" AND p.type = ");
        builder.push_bind(kind);
    }
    if let Some(status) = filter.status {
        builder.push(" AND p.status = ");
        builder.push_bind(status);
    }

    match &parsed {
        Some(ParsedQuery::Label(_)) => {
            builder.push(" AND p.status = ");
            builder.push_bind(PostStatus::Publish);
        }
        Some(ParsedQuery::Text(text)) => {
            builder.push(" AND p.type = ");
            builder.push_bind(PostKind::Post);
            builder.push(" AND p.status = ");
            builder.push_bind(PostStatus::Publish);
            builder.push(" AND p.title LIKE ");
            builder.push_bind(format!("%{}%", text));
        }
        None => {}
    }

    builder.push(" ORDER BY p.published DESC, p.id DESC");

    let posts = builder
        .build_query_as::<Post>()
        .fetch_all(pool)
        .await?;
    Ok(posts)
}

pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, StoreError> {
    let post = sqlx::query_as::<_, Post>(
        "SELECT id, type, status, published, updated, title, content FROM posts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

pub async fn insert_post(pool: &SqlitePool, new_post: &NewPost) -> Result<Post, StoreError> {
    let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("INSERT INTO posts (title, content");
    if new_post.kind.is_some() {
        builder.push(", type");
    }
    if new_post.status.is_some() {
        builder.push(", status");
    }
    if new_post.published.is_some() {
        builder.push(", published");
    }
    if new_post.updated.is_some() {
        builder.push(", updated");
    }
    builder.push(") VALUES (");
    {
        let mut values = builder.separated(", ");
        values.push_bind(new_post.title.clone());
        values.push_bind(new_post.content.clone());
        if let Some(kind) = new_post.kind {
            values.push_bind(kind);
        }
        if let Some(status) = new_post.status {
            values.push_bind(status);
        }
        if let Some(published) = new_post.published {
            values.push_bind(published);
        }
        if let Some(updated) = new_post.updated {
            values.push_bind(updated);
        }
    }
    builder.push(") RETURNING id, type, status, published, updated, title, content");

    let post = builder.build_query_as::<Post>().fetch_one(pool).await?;
    Ok(post)
}

/// Apply the supplied fields and refresh the updated timestamp. Returns
/// false when no row with the given id exists.
pub async fn update_post(
    pool: &SqlitePool,
    id: i64,
    patch: &PostPatch,
) -> Result<bool, StoreError> {
    let mut builder: QueryBuilder<sqlx::Sqlite> =
        QueryBuilder::new("UPDATE posts SET updated = (CAST(unixepoch() * 1000 AS INTEGER))");
    if let Some(title) = &patch.title {
        builder.push(", title = ");
        builder.push_bind(title.clone());
    }
    if let Some(content) = &patch.content {
        builder.push(", content = ");
        builder.push_bind(content.clone());
    }
    if let Some(kind) = patch.kind {
        builder.push(", type = ");
        builder.push_bind(kind);
    }
    if let Some(status) = patch.status {
        builder.push(", status = ");
        builder.push_bind(status);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Labels and replies go with the post via the schema's cascades.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Attach each post's labels with a single batched lookup.
pub async fn with_labels(
    pool: &SqlitePool,
    posts: Vec<Post>,
) -> Result<Vec<PostWithLabels>, StoreError> {
    let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
    let mut label_map = labels_for_posts(pool, &ids).await?;
    Ok(posts
        .into_iter()
        .map(|post| {
            let labels = label_map.remove(&post.id).unwrap_or_default();
            PostWithLabels { post, labels }
        })
        .collect())
}
