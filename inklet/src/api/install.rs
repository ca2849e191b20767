// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::json;
use sqlx::sqlite::SqlitePool;

use super::{json_error, store_failure};
use crate::iam::{Claims, sign_token};
use crate::store::options::{
    ADMIN_PASSWORD_KEY, ADMIN_USERNAME_KEY, OptionUpdate, apply_updates, is_installed,
};

#[derive(Debug, Deserialize)]
pub struct InstallBody {
    #[serde(rename = "blogName")]
    blog_name: String,
    #[serde(rename = "adminUsername")]
    admin_username: String,
    #[serde(rename = "adminPassword")]
    admin_password: String,
}

/// One-time setup. The admin password is never stored; what lands in the
/// options table is a token signed with the password as key, which login
/// later verifies against the presented password.
pub async fn install(
    body: web::Json<InstallBody>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    match is_installed(pool.get_ref()).await {
        Ok(true) => return Ok(json_error(StatusCode::BAD_REQUEST, "Already installed")),
        Ok(false) => {}
        Err(err) => return Ok(store_failure(&err)),
    }

    let body = body.into_inner();
    let claims = Claims {
        username: body.admin_username.clone(),
        exp: None,
    };
    let password_token = match sign_token(&body.admin_password, &claims) {
        Ok(token) => token,
        Err(err) => {
            return Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &err.to_string(),
            ));
        }
    };

    let seeds = vec![
        ("blogName".to_string(), OptionUpdate::Set(body.blog_name)),
        (
            "blogPublished".to_string(),
            OptionUpdate::Set(Utc::now().to_rfc3339()),
        ),
        (
            ADMIN_USERNAME_KEY.to_string(),
            OptionUpdate::Set(body.admin_username.clone()),
        ),
        (
            ADMIN_PASSWORD_KEY.to_string(),
            OptionUpdate::Set(password_token),
        ),
    ];
    if let Err(err) = apply_updates(pool.get_ref(), &seeds).await {
        return Ok(store_failure(&err));
    }

    info!("Installed blog for admin '{}'", body.admin_username);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
