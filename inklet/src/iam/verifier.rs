// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpRequest, HttpResponse};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use super::tokens::verify_token;
use crate::config::{AuthConfig, AuthMode};

/// Decides whether a request may mutate content. One scheme is active at a
/// time, selected by configuration; absence or malformation of the
/// Authorization header always yields a plain `false`.
#[derive(Debug, Clone)]
enum AuthScheme {
    Bearer {
        secret: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    scheme: AuthScheme,
}

impl CredentialVerifier {
    pub fn from_config(auth: &AuthConfig) -> Self {
        let scheme = match auth.mode {
            AuthMode::Bearer => AuthScheme::Bearer {
                secret: auth.secret.clone(),
            },
            AuthMode::Basic => AuthScheme::Basic {
                username: auth.basic_username.clone().unwrap_or_default(),
                password: auth.basic_password.clone().unwrap_or_default(),
            },
        };
        Self { scheme }
    }

    pub fn authorize(&self, header: Option<&HeaderValue>) -> bool {
        let Some(value) = header.and_then(|value| value.to_str().ok()) else {
            return false;
        };
        let Some((kind, credential)) = value.split_once(' ') else {
            return false;
        };

        match &self.scheme {
            AuthScheme::Bearer { secret } => {
                if kind != "Bearer" || secret.is_empty() {
                    return false;
                }
                verify_token(secret, credential).is_ok()
            }
            AuthScheme::Basic { username, password } => {
                if kind != "Basic" {
                    return false;
                }
                let Ok(decoded) = BASE64.decode(credential) else {
                    return false;
                };
                let Ok(decoded) = String::from_utf8(decoded) else {
                    return false;
                };
                let Some((given_username, given_password)) = decoded.split_once(':') else {
                    return false;
                };
                given_username == username && given_password == password
            }
        }
    }

    /// Authorize the request or produce the 401 response to return instead.
    pub fn require(&self, req: &HttpRequest) -> Option<HttpResponse> {
        if self.authorize(req.headers().get(header::AUTHORIZATION)) {
            return None;
        }
        Some(self.unauthorized_response())
    }

    fn unauthorized_response(&self) -> HttpResponse {
        match &self.scheme {
            AuthScheme::Bearer { .. } => {
                HttpResponse::Unauthorized().json(json!({"error": "Unauthorized"}))
            }
            AuthScheme::Basic { .. } => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Basic"))
                .finish(),
        }
    }
}
