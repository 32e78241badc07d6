pub mod clock;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub base_path: Arc<String>,
}

pub fn create_app(state: AppState) -> Router {
    let base_path = state.base_path.clone();

    let app_routes = Router::new()
        .route("/todos", get(handlers::todos::list))
        .route("/todos", post(handlers::todos::create))
        .route("/todos/{id}", get(handlers::todos::get_one))
        .route("/todos/{id}", put(handlers::todos::update))
        .route("/todos/{id}/markComplete", put(handlers::todos::complete))
        .route("/todos/{id}", delete(handlers::todos::delete))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state);

    tracing::info!("base_path: {base_path:?}");

    if base_path.is_empty() {
        app_routes
    } else {
        Router::new().nest(&*base_path, app_routes)
    }
}
