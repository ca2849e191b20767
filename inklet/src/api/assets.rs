// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::body::SizedStream;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use log::{debug, error};
use serde_json::json;
use std::io::SeekFrom;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::{json_error, not_found};
use crate::app_state::AppState;
use crate::assets::AssetStoreError;
use crate::util::range::{ByteRange, content_range, unsatisfiable_content_range};

const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Upload bypasses sanitization and labels entirely: the body is streamed
/// to the object store under a fresh opaque key.
pub async fn upload_asset(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let declared_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    match state.assets.put(declared_type, payload).await {
        Ok(stored) => Ok(HttpResponse::Ok().json(json!({ "id": stored.id }))),
        Err(err) => {
            error!("Asset upload failed: {}", err);
            Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &err.to_string(),
            ))
        }
    }
}

pub async fn download_asset(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut object = match state.assets.open(&path).await {
        Ok(object) => object,
        Err(AssetStoreError::NotFound) => return Ok(not_found()),
        Err(err) => {
            error!("Asset read failed: {}", err);
            return Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &err.to_string(),
            ));
        }
    };

    if let Some(range_value) = req.headers().get(header::RANGE)
        && let Ok(range_str) = range_value.to_str()
        && let Some(range) = ByteRange::parse(range_str)
    {
        let Some((start, end)) = range.resolve(object.size) else {
            debug!(
                "Unsatisfiable range for asset {}: {:?}, size {}",
                path, range, object.size
            );
            return Ok(HttpResponse::build(StatusCode::RANGE_NOT_SATISFIABLE)
                .insert_header((header::CONTENT_RANGE, unsatisfiable_content_range(object.size)))
                .finish());
        };

        let range_size = end - start + 1;
        if object.file.seek(SeekFrom::Start(start)).await.is_err() {
            return Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to seek asset",
            ));
        }
        let stream = ReaderStream::new(object.file.take(range_size));
        return Ok(HttpResponse::PartialContent()
            .content_type(object.content_type)
            .insert_header((header::ACCEPT_RANGES, "bytes"))
            .insert_header((header::CONTENT_RANGE, content_range(start, end, object.size)))
            .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE))
            .body(SizedStream::new(range_size, stream)));
    }

    let stream = ReaderStream::new(object.file);
    Ok(HttpResponse::Ok()
        .content_type(object.content_type)
        .insert_header((header::ACCEPT_RANGES, "bytes"))
        .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE))
        .body(SizedStream::new(object.size, stream)))
}
