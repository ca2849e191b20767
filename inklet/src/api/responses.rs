// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::store::StoreError;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use log::error;
use serde_json::json;

pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

pub fn not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

/// Store failures surface their message to the caller. Acceptable for a
/// single-admin tool; handlers never retry.
pub fn store_failure(err: &StoreError) -> HttpResponse {
    error!("Store operation failed: {}", err);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}
