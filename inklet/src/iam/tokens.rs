// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Token payload. The expiry claim is optional: the stored admin-password
/// credential is signed without one, session tokens always carry one.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Clone)]
pub enum TokenError {
    Creation(String),
    Verification(String),
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Creation(msg) => write!(f, "Token creation error: {}", msg),
            TokenError::Verification(msg) => write!(f, "Token verification error: {}", msg),
            TokenError::Expired => write!(f, "Token expired"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Sign claims with the given secret. The secret is always passed in
/// explicitly; there is no process-wide signing key.
pub fn sign_token(secret: &str, claims: &Claims) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Creation(e.to_string()))
}

/// Verify a token's signature and, when an expiry claim is present, that it
/// has not passed.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // The expiry claim is optional here; it is checked by hand below.
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| TokenError::Verification(e.to_string()))?;

    let claims = token_data.claims;
    if let Some(exp) = claims.exp
        && exp <= Utc::now().timestamp()
    {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Claims for a login session token expiring after the configured number of
/// days.
pub fn session_claims(username: &str, ttl_days: u64) -> Claims {
    let expiration = Utc::now() + Duration::days(ttl_days as i64);
    Claims {
        username: username.to_string(),
        exp: Some(expiration.timestamp()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret";

    #[test]
    fn sign_and_verify_round_trip() {
        let claims = session_claims("admin", 7);
        let token = sign_token(SECRET, &claims).expect("sign");
        let verified = verify_token(SECRET, &token).expect("verify");
        assert_eq!(verified.username, "admin");
        assert_eq!(verified.exp, claims.exp);
    }

    #[test]
    fn verify_accepts_token_without_expiry() {
        let claims = Claims {
            username: "admin".to_string(),
            exp: None,
        };
        let token = sign_token(SECRET, &claims).expect("sign");
        let verified = verify_token(SECRET, &token).expect("verify");
        assert!(verified.exp.is_none());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let claims = session_claims("admin", 7);
        let token = sign_token(SECRET, &claims).expect("sign");
        assert!(matches!(
            verify_token("another-secret", &token),
            Err(TokenError::Verification(_))
        ));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let claims = Claims {
            username: "admin".to_string(),
            exp: Some(Utc::now().timestamp() - 60),
        };
        let token = sign_token(SECRET, &claims).expect("sign");
        assert!(matches!(
            verify_token(SECRET, &token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(matches!(
            verify_token(SECRET, "not-a-token"),
            Err(TokenError::Verification(_))
        ));
    }

    #[test]
    fn session_claims_expire_in_the_future() {
        let claims = session_claims("admin", 7);
        let exp = claims.exp.expect("expiry");
        let seven_days = 7 * 24 * 60 * 60;
        let now = Utc::now().timestamp();
        assert!(exp > now + seven_days - 60);
        assert!(exp <= now + seven_days + 60);
    }
}
