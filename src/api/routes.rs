//! Route configuration.

use crate::api::{handlers, middleware};
use crate::bot::WEBHOOK_PATH;
use crate::config::NotifierMode;
use crate::state::AppState;
use axum::Router;
use axum::routing::{delete, get, post};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

/// Creates the API router.
///
/// The bot webhook route is only mounted when the notifier runs in webhook
/// mode.
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Orders
        .route("/status", get(handlers::get_status))
        .route("/order", post(handlers::place_order))
        .route("/order/{guest}/{coffee}", delete(handlers::delete_order))
        .route("/orders", delete(handlers::clear_orders));

    if state.config.notifier.mode == NotifierMode::Webhook {
        router = router.route(WEBHOOK_PATH, post(handlers::telegram_webhook));
    }

    router
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .with_state(state)
}
