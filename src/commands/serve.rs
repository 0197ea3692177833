//! `serve` - run the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    let database = Database::connect(&config)
        .await
        .map(Arc::new)
        .map_err(AppError::from)?;

    let state = AppState::from_config(database, &config);
    let router = create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Cannot bind {}: {}", addr, e)))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))
}
