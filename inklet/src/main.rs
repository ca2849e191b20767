// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::sync::Arc;

mod api;
mod app_state;
mod assets;
mod bootstrap;
mod cache;
mod config;
mod iam;
mod runtime_paths;
mod sanitize;
mod store;
mod util;

use app_state::AppState;
use config::{Config, ValidatedConfig};
use runtime_paths::RuntimePaths;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", help_text());
        return 0;
    }

    if let Err(error) = bootstrap::ensure_config(&parsed_args.runtime_root) {
        eprintln!("❌ Bootstrap error: {}", error);
        eprintln!("❌ Application cannot start with invalid configuration.");
        return 1;
    }

    let validated_config = match Config::load_and_validate(&parsed_args.runtime_root) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("❌ Configuration error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    let runtime_paths = match RuntimePaths::from_root(&parsed_args.runtime_root, &validated_config)
    {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("❌ Runtime path error: {}", error);
            return 1;
        }
    };

    if let Err(error) = init_logging(&validated_config) {
        eprintln!("❌ Failed to initialize logger: {}", error);
        return 1;
    }

    let result = System::new().block_on(run_server(validated_config, runtime_paths));
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn init_logging(config: &ValidatedConfig) -> Result<(), log::SetLoggerError> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    // Stable log format shared by foreground and service runs
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
}

async fn run_server(
    validated_config: ValidatedConfig,
    runtime_paths: RuntimePaths,
) -> std::io::Result<()> {
    let validated_config = Arc::new(validated_config);

    log_startup_info(&validated_config, &runtime_paths);

    let pool = match store::connect(&runtime_paths).await {
        Ok(pool) => pool,
        Err(error) => {
            eprintln!("❌ Failed to open the database: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!("✅ Database ready at {}", runtime_paths.database_file.display());

    let app_state = Arc::new(AppState::new(&validated_config, &runtime_paths));
    info!("✅ App state initialized");

    let host = validated_config.server.host.clone();
    let port = validated_config.server.port;
    let workers = validated_config.server.workers;

    let factory = {
        let config_for_app = validated_config.clone();
        let app_state_for_app = app_state.clone();
        let pool_for_app = pool.clone();

        move || {
            App::new()
                .app_data(web::Data::from(config_for_app.clone()))
                .app_data(web::Data::from(app_state_for_app.clone()))
                .app_data(web::Data::new(pool_for_app.clone()))
                .wrap(Logger::new(
                    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
                ))
                .configure(api::configure)
        }
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind((host, port))?
        .run()
        .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    info!("Runtime root: {}", runtime_paths.root.display());
    info!("Config file: {}", runtime_paths.config_file.display());
    info!(
        "Database file: {}",
        runtime_paths.database_file.display()
    );
    info!(
        "Assets directory: {}",
        runtime_paths.assets_dir.display()
    );
}

enum RunMode {
    Serve,
    Help,
}

struct ParsedArgs {
    runtime_root: std::path::PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: std::path::PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = std::path::PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = std::path::PathBuf::from(value);
        } else if arg.eq_ignore_ascii_case("help") {
            return Ok(ParsedArgs {
                runtime_root,
                mode: RunMode::Help,
            });
        } else {
            return Err(format!("Unknown argument: {}", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;

    Ok(ParsedArgs {
        runtime_root,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn make_runtime_root_absolute(
    runtime_root: std::path::PathBuf,
) -> Result<std::path::PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}

fn help_text() -> String {
    [
        "inklet - a minimal blogging platform server",
        "",
        "Usage: inklet [-C <root>]",
        "",
        "  -C <root>   Runtime directory holding config.yaml, the database",
        "              and the assets directory (default: current directory)",
        "  -h, --help  Show this help",
        "",
    ]
    .join("\n")
}
