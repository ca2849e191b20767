// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

pub mod assets;
pub mod install;
pub mod labels;
pub mod login;
pub mod options;
pub mod posts;
mod responses;

pub use responses::{json_error, not_found, store_failure};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts", web::post().to(posts::create_post))
            .route("/posts/search", web::get().to(posts::search_posts))
            .route("/posts/{id}", web::get().to(posts::get_post))
            .route("/posts/{id}", web::patch().to(posts::update_post))
            .route("/posts/{id}", web::delete().to(posts::delete_post))
            .route("/labels", web::get().to(labels::list_labels))
            .route("/options", web::get().to(options::get_options))
            .route("/options", web::post().to(options::update_options))
            .route("/install", web::post().to(install::install))
            .route("/login", web::post().to(login::login))
            .route("/assets", web::post().to(assets::upload_asset))
            .route("/assets/{id}", web::get().to(assets::download_asset)),
    );
}
