use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};
use service::runtime;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load config from config.toml, falling back to env vars when absent
fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                cfg.server.port = port;
            }
            cfg.database.normalize_from_env();
            cfg.auth.normalize_from_env();
            cfg
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();

    runtime::ensure_env(&cfg.server.static_dir).await?;

    // DB connection: pool options from config when a valid URL is present,
    // otherwise the env-driven default
    let db = if cfg.database.validate().is_ok() {
        models::db::connect_with_config(&cfg.database).await?
    } else {
        models::db::connect().await?
    };

    // JWT secret
    let jwt_secret = cfg
        .auth
        .jwt_secret
        .clone()
        .unwrap_or_else(|| "dev-secret-change-me".to_string());
    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret },
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state, &cfg.server.static_dir);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting e-commerce api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
