// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use sqlx::sqlite::SqlitePool;

use super::{json_error, store_failure};
use crate::config::ValidatedConfig;
use crate::iam::{session_claims, sign_token, verify_token};
use crate::store::options::admin_credentials;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(rename = "adminUsername")]
    admin_username: String,
    #[serde(rename = "adminPassword")]
    admin_password: String,
}

/// Exchange the admin credentials for a short-lived session token. The
/// stored credential is a token signed with the admin password, so a
/// successful verification with the presented password proves the password.
pub async fn login(
    body: web::Json<LoginBody>,
    config: web::Data<ValidatedConfig>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse> {
    if config.auth.secret.is_empty() {
        // The front end treats this as its signal to start the setup flow.
        return Ok(json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Secret not set",
        ));
    }

    let credentials = match admin_credentials(pool.get_ref()).await {
        Ok(credentials) => credentials,
        Err(err) => return Ok(store_failure(&err)),
    };

    let body = body.into_inner();
    let authenticated = credentials
        .as_ref()
        .map(|stored| {
            stored.username == body.admin_username
                && verify_token(&body.admin_password, &stored.password_token).is_ok()
        })
        .unwrap_or(false);

    if !authenticated {
        warn!("Rejected login for '{}'", body.admin_username);
        return Ok(json_error(
            StatusCode::UNAUTHORIZED,
            "Wrong username or password",
        ));
    }

    let claims = session_claims(&body.admin_username, config.auth.session_ttl_days);
    let token = match sign_token(&config.auth.secret, &claims) {
        Ok(token) => token,
        Err(err) => {
            return Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &err.to_string(),
            ));
        }
    };

    info!("Issued session token for '{}'", body.admin_username);
    Ok(HttpResponse::Ok().json(json!({ "token": token })))
}
