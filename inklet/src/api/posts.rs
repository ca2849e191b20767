// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use log::info;
use serde::Deserialize;
use serde_json::json;
use sqlx::sqlite::SqlitePool;

use super::{json_error, not_found, store_failure};
use crate::app_state::AppState;
use crate::store::{
    self, NewPost, PostFilter, PostKind, PostPatch, PostStatus,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    kind: Option<PostKind>,
    status: Option<PostStatus>,
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

/// Request bodies carry no identifier field at all, so a client-supplied id
/// can never reach the store.
#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    title: String,
    content: String,
    #[serde(rename = "type")]
    kind: Option<PostKind>,
    status: Option<PostStatus>,
    published: Option<i64>,
    updated: Option<i64>,
    labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostBody {
    title: Option<String>,
    content: Option<String>,
    #[serde(rename = "type")]
    kind: Option<PostKind>,
    status: Option<PostStatus>,
    labels: Option<Vec<String>>,
}

fn parse_post_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

pub async fn list_posts(
    query: web::Query<ListQuery>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    let filter = PostFilter {
        kind: query.kind,
        status: query.status,
        query: query.q.clone(),
    };
    let posts = match store::posts::list_posts(pool.get_ref(), &filter).await {
        Ok(posts) => posts,
        Err(err) => return Ok(store_failure(&err)),
    };
    let items = match store::posts::with_labels(pool.get_ref(), posts).await {
        Ok(items) => items,
        Err(err) => return Ok(store_failure(&err)),
    };
    Ok(HttpResponse::Ok().json(json!({ "items": items })))
}

pub async fn search_posts(
    query: web::Query<SearchQuery>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(json_error(StatusCode::BAD_REQUEST, "Missing query"));
    };

    let filter = PostFilter {
        query: Some(q.to_string()),
        ..PostFilter::default()
    };
    let posts = match store::posts::list_posts(pool.get_ref(), &filter).await {
        Ok(posts) => posts,
        Err(err) => return Ok(store_failure(&err)),
    };
    let items = match store::posts::with_labels(pool.get_ref(), posts).await {
        Ok(items) => items,
        Err(err) => return Ok(store_failure(&err)),
    };
    Ok(HttpResponse::Ok().json(json!({ "items": items })))
}

pub async fn get_post(
    path: web::Path<String>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    let Some(id) = parse_post_id(&path) else {
        return Ok(json_error(StatusCode::BAD_REQUEST, "Invalid post id"));
    };

    let post = match store::posts::get_post(pool.get_ref(), id).await {
        Ok(Some(post)) => post,
        Ok(None) => return Ok(not_found()),
        Err(err) => return Ok(store_failure(&err)),
    };
    let labels = match store::labels::current_labels(pool.get_ref(), id).await {
        Ok(labels) => labels,
        Err(err) => return Ok(store_failure(&err)),
    };
    let replies = match store::replies::replies_for_post(pool.get_ref(), id).await {
        Ok(replies) => replies,
        Err(err) => return Ok(store_failure(&err)),
    };

    let mut body = serde_json::to_value(&post).map_err(actix_web::error::ErrorInternalServerError)?;
    body["labels"] = json!(labels);
    body["replies"] = json!(replies);
    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_post(
    req: HttpRequest,
    body: web::Json<CreatePostBody>,
    state: web::Data<AppState>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    if let Some(denied) = state.verifier.require(&req) {
        return Ok(denied);
    }

    let body = body.into_inner();
    let content = state.html_sanitizer.clean(&body.content);
    let new_post = NewPost {
        title: body.title,
        content,
        kind: body.kind,
        status: body.status,
        published: body.published,
        updated: body.updated,
    };

    let post = match store::posts::insert_post(pool.get_ref(), &new_post).await {
        Ok(post) => post,
        Err(err) => return Ok(store_failure(&err)),
    };

    let labels = body.labels.unwrap_or_default();
    if !labels.is_empty()
        && let Err(err) = store::labels::insert_labels(pool.get_ref(), post.id, &labels).await
    {
        return Ok(store_failure(&err));
    }

    info!("Created post {} ({:?})", post.id, post.kind);

    let mut value = serde_json::to_value(&post).map_err(actix_web::error::ErrorInternalServerError)?;
    value["labels"] = json!(labels);
    Ok(HttpResponse::Created().json(value))
}

pub async fn update_post(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdatePostBody>,
    state: web::Data<AppState>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    if let Some(denied) = state.verifier.require(&req) {
        return Ok(denied);
    }

    let Some(id) = parse_post_id(&path) else {
        return Ok(json_error(StatusCode::BAD_REQUEST, "Invalid post id"));
    };

    let body = body.into_inner();

    // Omitting the labels field means "leave labels unchanged", not "clear".
    if let Some(target) = &body.labels
        && let Err(err) = store::labels::reconcile_labels(pool.get_ref(), id, target).await
    {
        return Ok(store_failure(&err));
    }

    let patch = PostPatch {
        title: body.title,
        content: body
            .content
            .as_deref()
            .map(|content| state.html_sanitizer.clean(content)),
        kind: body.kind,
        status: body.status,
    };

    match store::posts::update_post(pool.get_ref(), id, &patch).await {
        Ok(true) => {}
        Ok(false) => return Ok(not_found()),
        Err(err) => return Ok(store_failure(&err)),
    }

    let post = match store::posts::get_post(pool.get_ref(), id).await {
        Ok(Some(post)) => post,
        Ok(None) => return Ok(not_found()),
        Err(err) => return Ok(store_failure(&err)),
    };
    let labels = match store::labels::current_labels(pool.get_ref(), id).await {
        Ok(labels) => labels,
        Err(err) => return Ok(store_failure(&err)),
    };

    let mut value = serde_json::to_value(&post).map_err(actix_web::error::ErrorInternalServerError)?;
    value["labels"] = json!(labels);
    Ok(HttpResponse::Ok().json(value))
}

pub async fn delete_post(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    if let Some(denied) = state.verifier.require(&req) {
        return Ok(denied);
    }

    let Some(id) = parse_post_id(&path) else {
        return Ok(json_error(StatusCode::BAD_REQUEST, "Invalid post id"));
    };

    match store::posts::delete_post(pool.get_ref(), id).await {
        Ok(true) => {
            info!("Deleted post {}", id);
            Ok(HttpResponse::NoContent().finish())
        }
        Ok(false) => Ok(not_found()),
        Err(err) => Ok(store_failure(&err)),
    }
}
