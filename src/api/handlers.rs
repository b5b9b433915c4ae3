//! API request handlers.

use crate::bot;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{
    ActionResponse, HealthResponse, PlaceOrderRequest, PlaceOrderResponse, StatusResponse,
    WebhookAck,
};
use crate::notifier::telegram::Update;
use crate::service;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::{info, warn};


/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(service::health(&state))
}

/// Lists open orders with per-drink counts.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Open orders", body = StatusResponse)
    ),
    tag = "Orders"
)]
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(service::status(&state))
}

/// Places a new order or updates the guest's order for the same drink.
#[utoipa::path(
    post,
    path = "/order",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed or updated", body = PlaceOrderResponse),
        (status = 400, description = "Missing guest or coffee", body = ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Json<PlaceOrderResponse>, ApiError> {
    let Json(request) = payload?;
    let response = service::place_order(&state, request).await?;
    info!(
        "Order {}: {} / {}",
        response.action, response.order.guest, response.order.coffee
    );
    Ok(Json(response))
}

/// Removes one order.
#[utoipa::path(
    delete,
    path = "/order/{guest}/{coffee}",
    params(
        ("guest" = String, Path, description = "Guest name"),
        ("coffee" = String, Path, description = "Drink name")
    ),
    responses(
        (status = 200, description = "Order removed", body = ActionResponse),
        (status = 404, description = "No such order", body = ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path((guest, coffee)): Path<(String, String)>,
) -> Result<Json<ActionResponse>, ApiError> {
    let response = service::complete_order(&state, &guest, &coffee).await?;
    info!("Order removed: {} / {}", guest, coffee);
    Ok(Json(response))
}

/// Removes every open order.
#[utoipa::path(
    delete,
    path = "/orders",
    responses(
        (status = 200, description = "All orders removed", body = ActionResponse)
    ),
    tag = "Orders"
)]
pub async fn clear_orders(State(state): State<Arc<AppState>>) -> Json<ActionResponse> {
    let response = service::clear_orders(&state).await;
    info!("{}", response.message);
    Json(response)
}

/// Receives bot updates pushed by the Bot API.
///
/// Always acknowledges, so that the Bot API does not redeliver updates we
/// cannot parse.
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Update>, JsonRejection>,
) -> Json<WebhookAck> {
    match payload {
        Ok(Json(update)) => bot::handle_update(&state, update).await,
        Err(rejection) => warn!("Ignoring malformed bot update: {}", rejection.body_text()),
    }
    Json(WebhookAck { ok: true })
}
