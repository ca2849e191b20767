// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use inklet::api;
use inklet::app_state::AppState;
use inklet::config::ValidatedConfig;
use inklet::iam::{session_claims, sign_token};
use inklet::runtime_paths::RuntimePaths;
use inklet::store::init_schema;
use inklet::util::test_config::{TestConfigBuilder, test_config};
use inklet::util::test_fixtures::TestFixtureRoot;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const BASIC_USERNAME: &str = "admin";
pub const BASIC_PASSWORD: &str = "basic-password";

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct AppBundle {
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
    pub pool: SqlitePool,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_config(test_config(TEST_SECRET)).await
    }

    pub async fn with_basic_auth() -> Self {
        let config = TestConfigBuilder::new()
            .with_basic_auth(BASIC_USERNAME, BASIC_PASSWORD)
            .build();
        Self::with_config(config).await
    }

    /// A harness whose signing secret is not configured.
    pub async fn without_secret() -> Self {
        Self::with_config(TestConfigBuilder::new().build()).await
    }

    pub async fn with_config(config: ValidatedConfig) -> Self {
        let fixture = TestFixtureRoot::new_unique("api-test-suite").expect("fixture root");
        fixture.init_runtime_layout().expect("fixture layout");

        let config = Arc::new(config);
        let runtime_paths =
            RuntimePaths::from_root(fixture.path(), &config).expect("runtime paths");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("connect options")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("database pool");
        init_schema(&pool).await.expect("schema");

        let app_state = Arc::new(AppState::new(&config, &runtime_paths));

        Self {
            fixture,
            config,
            runtime_paths,
            app_state,
            pool,
        }
    }

    pub fn bundle(&self) -> AppBundle {
        AppBundle {
            config: self.config.clone(),
            app_state: self.app_state.clone(),
            pool: self.pool.clone(),
        }
    }

    pub fn session_token(&self) -> String {
        sign_token(TEST_SECRET, &session_claims("admin", 7)).expect("session token")
    }

    pub fn bearer_header(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.session_token()))
    }
}

pub fn build_test_app(
    bundle: AppBundle,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(bundle.config))
        .app_data(web::Data::from(bundle.app_state))
        .app_data(web::Data::new(bundle.pool))
        .configure(api::configure)
}

/// Create a post through the API and return its id.
pub async fn create_post_via_api<S>(
    app: &S,
    harness: &TestHarness,
    body: serde_json::Value,
) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(harness.bearer_header())
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let json: serde_json::Value = test::read_body_json(resp).await;
    json.get("id").and_then(serde_json::Value::as_i64).expect("post id")
}
