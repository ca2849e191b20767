// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde_json::json;
use sqlx::sqlite::SqlitePool;

use super::store_failure;
use crate::app_state::AppState;
use crate::store::labels::label_counts;

const CACHE_CONTROL_ONE_HOUR: &str = "public, max-age=3600";

/// Label names with usage counts, served through the URL-keyed response
/// cache. Write paths never invalidate it; entries age out after an hour.
pub async fn list_labels(
    req: HttpRequest,
    state: web::Data<AppState>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    let cache_key = req.uri().to_string();
    if let Some(body) = state.label_cache.lookup(&cache_key) {
        return Ok(cached_json(body));
    }

    let items = match label_counts(pool.get_ref()).await {
        Ok(items) => items,
        Err(err) => return Ok(store_failure(&err)),
    };

    let body = json!({ "items": items }).to_string();
    state.label_cache.store(cache_key, body.clone());
    Ok(cached_json(body))
}

fn cached_json(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(("Cache-Control", CACHE_CONTROL_ONE_HOUR))
        .body(body)
}
