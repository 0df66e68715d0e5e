use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::middleware::handle_time;
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        let routes = Router::new()
            .route("/health", get(health_handler))
            .route("/short", post(shorten_handler))
            .route("/{token}", get(redirect_handler))
            .with_state(state);

        Self::with_middleware(routes)
    }

    /// Wraps `routes` in the gateway's middleware stack.
    pub fn with_middleware(routes: Router) -> Router {
        routes
            .layer(middleware::from_fn(handle_time))
            .layer(CatchPanicLayer::new())
            .layer(CompressionLayer::new())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }
}
