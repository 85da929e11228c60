use std::sync::Arc;

use tracing::{info, warn};

use nestly::auth::TokenIssuer;
use nestly::web::{create_router, AppState};
use nestly::{Config, Database};

#[tokio::main]
async fn main() -> nestly::Result<()> {
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    nestly::logging::init(&config.logging)?;

    if config.auth.jwt_secret == "insecure-dev-secret" {
        warn!("Using the default JWT secret; set [auth] jwt_secret in production");
    }

    let db = Database::open(&config.database.path).await?;
    let issuer = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
    let state = Arc::new(AppState::new(db, issuer));
    let router = create_router(state, &config.server.cors_origins);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(
        "Nestly listening on {}:{}",
        config.server.host, config.server.port
    );

    axum::serve(listener, router).await?;
    Ok(())
}
