// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, Result, web};
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

use super::store_failure;
use crate::app_state::AppState;
use crate::store::options::{ADMIN_PASSWORD_KEY, OptionUpdate, all_options, apply_updates};

const PASSWORD_MASK: &str = "********";
const CACHE_CONTROL_ONE_HOUR: &str = "public, max-age=3600";

pub async fn get_options(pool: web::Data<SqlitePool>) -> Result<HttpResponse> {
    let mut options = match all_options(pool.get_ref()).await {
        Ok(options) => options,
        Err(err) => return Ok(store_failure(&err)),
    };

    // The stored credential token never leaves the server.
    if let Some(value) = options.get_mut(ADMIN_PASSWORD_KEY) {
        *value = PASSWORD_MASK.to_string();
    }

    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", CACHE_CONTROL_ONE_HOUR))
        .json(options))
}

/// Write options. A JSON `null` deletes the key; everything else upserts.
pub async fn update_options(
    req: HttpRequest,
    body: web::Json<HashMap<String, Option<String>>>,
    state: web::Data<AppState>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    if let Some(denied) = state.verifier.require(&req) {
        return Ok(denied);
    }

    let updates: Vec<(String, OptionUpdate)> = body
        .into_inner()
        .into_iter()
        .map(|(key, value)| {
            let update = match value {
                Some(value) => OptionUpdate::Set(value),
                None => OptionUpdate::Delete,
            };
            (key, update)
        })
        .collect();

    if let Err(err) = apply_updates(pool.get_ref(), &updates).await {
        return Ok(store_failure(&err));
    }

    Ok(HttpResponse::NoContent().finish())
}
