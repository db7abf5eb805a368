use crate::handlers;
use crate::query::PlayerIndex;
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Everything a request handler can see: the snapshot and when it was loaded.
#[derive(Debug)]
pub struct AppState {
    pub index: PlayerIndex,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;

pub struct ApiServer {
    state: SharedState,
}

impl ApiServer {
    #[must_use]
    pub fn new(index: PlayerIndex) -> Self {
        Self {
            state: Arc::new(AppState {
                index,
                started_at: Utc::now(),
            }),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/player/:name", get(handlers::player_by_name))
            .route("/players", get(handlers::list_players))
            .route("/player_id/:player_id", get(handlers::player_by_id))
            .route("/skills", get(handlers::skills_summary))
            .route("/top/:skill", get(handlers::top_by_skill))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until `shutdown` resolves.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(
        self,
        addr: &str,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            "Skills API listening on {} with {} players",
            listener.local_addr()?,
            self.state.index.len()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
