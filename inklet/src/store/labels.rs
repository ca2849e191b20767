// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::StoreError;
use serde::Serialize;
use sqlx::QueryBuilder;
use sqlx::sqlite::SqlitePool;
use std::collections::{HashMap, HashSet};

/// The changes needed to move a post's label set to a target set. The two
/// sides are disjoint by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDelta {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl LabelDelta {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

pub fn diff_labels(current: &[String], target: &[String]) -> LabelDelta {
    let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
    let target_set: HashSet<&str> = target.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let to_add = target
        .iter()
        .filter(|name| !current_set.contains(name.as_str()) && seen.insert(name.as_str()))
        .cloned()
        .collect();
    let to_remove = current
        .iter()
        .filter(|name| !target_set.contains(name.as_str()))
        .cloned()
        .collect();

    LabelDelta { to_add, to_remove }
}

pub async fn current_labels(pool: &SqlitePool, post_id: i64) -> Result<Vec<String>, StoreError> {
    let rows = sqlx::query_as::<_, (String,)>("SELECT name FROM labels WHERE post_id = $1")
        .bind(post_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

pub async fn insert_labels(
    pool: &SqlitePool,
    post_id: i64,
    names: &[String],
) -> Result<(), StoreError> {
    if names.is_empty() {
        return Ok(());
    }
    let mut builder: QueryBuilder<sqlx::Sqlite> =
        QueryBuilder::new("INSERT INTO labels (post_id, name) ");
    builder.push_values(names, |mut row, name| {
        row.push_bind(post_id).push_bind(name.clone());
    });
    builder.build().execute(pool).await?;
    Ok(())
}

/// One batched insert for the additions, one batched delete for the
/// removals. The read and the writes are separate statements; concurrent
/// reconciliations of the same post can interleave.
pub async fn apply_delta(
    pool: &SqlitePool,
    post_id: i64,
    delta: &LabelDelta,
) -> Result<(), StoreError> {
    insert_labels(pool, post_id, &delta.to_add).await?;

    if !delta.to_remove.is_empty() {
        let mut builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("DELETE FROM labels WHERE post_id = ");
        builder.push_bind(post_id);
        builder.push(" AND name IN (");
        {
            let mut names = builder.separated(", ");
            for name in &delta.to_remove {
                names.push_bind(name.clone());
            }
        }
        builder.push(")");
        builder.build().execute(pool).await?;
    }

    Ok(())
}

pub async fn reconcile_labels(
    pool: &SqlitePool,
    post_id: i64,
    target: &[String],
) -> Result<(), StoreError> {
    let current = current_labels(pool, post_id).await?;
    let delta = diff_labels(&current, target);
    if delta.is_empty() {
        return Ok(());
    }
    apply_delta(pool, post_id, &delta).await
}

/// Labels for a batch of posts, grouped by post id.
pub async fn labels_for_posts(
    pool: &SqlitePool,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, StoreError> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut builder: QueryBuilder<sqlx::Sqlite> =
        QueryBuilder::new("SELECT post_id, name FROM labels WHERE post_id IN (");
    {
        let mut ids = builder.separated(", ");
        for post_id in post_ids {
            ids.push_bind(*post_id);
        }
    }
    builder.push(")");

    let rows = builder
        .build_query_as::<(i64, String)>()
        .fetch_all(pool)
        .await?;

    let mut map: HashMap<i64, Vec<String>> = HashMap::new();
    for (post_id, name) in rows {
        map.entry(post_id).or_default().push(name);
    }
    Ok(map)
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LabelCount {
    pub name: String,
    pub count: i64,
}

pub async fn label_counts(pool: &SqlitePool) -> Result<Vec<LabelCount>, StoreError> {
    let counts = sqlx::query_as::<_, LabelCount>(
        "SELECT name, COUNT(*) AS count FROM labels GROUP BY name \
         ORDER BY count DESC, name ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(counts)
}
