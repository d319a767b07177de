//! API router configuration.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_favorite, api_info, get_recipe, health, list_favorites, list_recipes, match_recipes,
    remove_favorite, AppState,
};
use crate::error::RecipeBoxError;

/// Create the API router with an empty catalog.
pub fn create_router() -> Router {
    create_router_with_state(AppState::default())
}

/// Create the API router serving `state`.
pub fn create_router_with_state(state: AppState) -> Router {
    let recipe_routes = Router::new()
        .route("/", get(list_recipes).post(match_recipes))
        .route("/{id}", get(get_recipe));

    let favorite_routes = Router::new()
        .route("/", get(list_favorites))
        .route("/{id}", post(add_favorite).delete(remove_favorite));

    let api = Router::new()
        .route("/", get(api_info))
        .route("/match", post(match_recipes))
        .nest("/recipes", recipe_routes)
        .nest("/favorites", favorite_routes);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Start the API server, stopping on Ctrl+C.
pub async fn serve(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(RecipeBoxError::Io)?;
    tracing::info!("recipe-box API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RecipeBoxError::Io(std::io::Error::other(e.to_string())))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_server_config_custom() {
        let config = ServerConfig::new("0.0.0.0", 8080);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
