//! Unit tests for the order service.

use super::*;
use crate::notifier::{Notifier, NotifierState, RecordingTransport};
use crate::store::OrderStore;
use std::sync::Arc;

fn request(guest: &str, coffee: &str, options: Option<&str>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        guest: Some(guest.to_string()),
        coffee: Some(coffee.to_string()),
        options: options.map(OrderOptions::from),
        ..PlaceOrderRequest::default()
    }
}

fn state_with(transport: Arc<RecordingTransport>) -> AppState {
    AppState::new(OrderStore::in_memory(), Notifier::new(transport))
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_order_input_requires_guest_and_coffee() {
    let missing_guest = PlaceOrderRequest {
        coffee: Some("Espresso".to_string()),
        ..PlaceOrderRequest::default()
    };
    assert!(matches!(
        OrderInput::try_from(missing_guest),
        Err(ApiError::InvalidRequest(_))
    ));

    let blank_coffee = request("Ana", "   ", None);
    assert!(matches!(
        OrderInput::try_from(blank_coffee),
        Err(ApiError::InvalidRequest(_))
    ));
}

#[test]
fn test_order_input_trims_values() {
    let input = OrderInput::try_from(request("  Ana ", " Espresso", Some(" decaf "))).unwrap();
    assert_eq!(input.guest, "Ana");
    assert_eq!(input.coffee, "Espresso");
    assert_eq!(input.options.as_deref(), Some("decaf"));
}

#[test]
fn test_merge_options_flags() {
    assert_eq!(merge_options(None, false, false), None);
    assert_eq!(merge_options(Some("  ".to_string()), false, false), None);
    assert_eq!(
        merge_options(None, true, true).as_deref(),
        Some("decaf, oat milk")
    );
    assert_eq!(
        merge_options(Some("extra hot".to_string()), false, true).as_deref(),
        Some("extra hot, oat milk")
    );
    assert_eq!(
        merge_options(Some("Decaf please".to_string()), true, false).as_deref(),
        Some("Decaf please")
    );
}

// ============================================================================
// Place order
// ============================================================================

#[tokio::test]
async fn test_place_order_creates_and_notifies() {
    let transport = Arc::new(RecordingTransport::new());
    let state = state_with(transport.clone());

    let response = place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.action, OrderAction::Created);
    assert!(response.telegram.sent);
    assert_eq!(state.store.len(), 1);

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].text.contains("New order"));
    assert!(sent[1].text.contains("Espresso: 1"));
}

#[tokio::test]
async fn test_place_order_twice_updates() {
    let transport = Arc::new(RecordingTransport::new());
    let state = state_with(transport.clone());

    place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();
    let response = place_order(&state, request("ana", "espresso", Some("decaf")))
        .await
        .unwrap();

    assert_eq!(response.action, OrderAction::Updated);
    assert_eq!(response.message, "Order updated");
    assert_eq!(state.store.len(), 1);
    assert_eq!(state.store.list()[0].options.as_deref(), Some("decaf"));
    assert!(transport.sent()[2].text.contains("Order updated"));
}

#[tokio::test]
async fn test_place_order_invalid_sends_nothing() {
    let transport = Arc::new(RecordingTransport::new());
    let state = state_with(transport.clone());

    let result = place_order(&state, PlaceOrderRequest::default()).await;

    assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    assert!(state.store.is_empty());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_place_order_succeeds_when_notifier_fails() {
    let transport = Arc::new(RecordingTransport::failing());
    let state = state_with(transport.clone());

    let response = place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();

    assert!(response.success);
    assert!(!response.telegram.sent);
    assert!(response.telegram.reason.is_some());
    assert_eq!(state.store.len(), 1);
    assert_eq!(state.notifier.state(), NotifierState::Degraded);
}

#[tokio::test]
async fn test_place_order_with_disabled_notifier() {
    let state = AppState::in_memory();

    let response = place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();

    assert!(!response.telegram.sent);
    assert_eq!(response.telegram.reason.as_deref(), Some("notifier disabled"));
}

// ============================================================================
// Complete / clear
// ============================================================================

#[tokio::test]
async fn test_complete_order_not_found() {
    let transport = Arc::new(RecordingTransport::new());
    let state = state_with(transport.clone());
    place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();

    let result = complete_order(&state, "Bob", "Espresso").await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
    assert_eq!(state.store.len(), 1);
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn test_complete_order_notifies_done_and_summary() {
    let transport = Arc::new(RecordingTransport::new());
    let state = state_with(transport.clone());
    place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();

    let response = complete_order(&state, "ANA", "ESPRESSO").await.unwrap();

    assert!(response.success);
    assert!(state.store.is_empty());
    let sent = transport.sent();
    assert_eq!(sent.len(), 4);
    assert!(sent[2].text.contains("Done"));
    assert!(sent[3].text.contains("Espresso: 0"));
}

#[tokio::test]
async fn test_clear_orders_empty_is_noop() {
    let transport = Arc::new(RecordingTransport::new());
    let state = state_with(transport.clone());

    let response = clear_orders(&state).await;

    assert!(response.success);
    assert_eq!(response.message, "No open orders");
    assert!(response.telegram.is_none());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_clear_orders_removes_all() {
    let transport = Arc::new(RecordingTransport::new());
    let state = state_with(transport.clone());
    place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();
    place_order(&state, request("Bob", "Americano", None))
        .await
        .unwrap();

    let response = clear_orders(&state).await;

    assert_eq!(response.message, "All 2 orders deleted");
    assert!(state.store.is_empty());
    assert!(transport.sent().iter().any(|m| m.text.contains("All orders cleared")));
}

// ============================================================================
// Status / health
// ============================================================================

#[tokio::test]
async fn test_status_counts_known_kinds_only() {
    let state = AppState::in_memory();
    place_order(&state, request("Ana", "Espresso", None))
        .await
        .unwrap();
    place_order(&state, request("Bob", "Matcha", None))
        .await
        .unwrap();

    let status = status(&state);

    assert_eq!(status.orders_count, 2);
    assert_eq!(status.counts["Espresso"], 1);
    assert_eq!(status.counts.values().sum::<usize>(), 1);
    assert_eq!(status.bot_status, NotifierState::Unconfigured);
}

#[test]
fn test_health_reports_notifier() {
    let state = AppState::in_memory();
    let health = health(&state);

    assert_eq!(health.status, "OK");
    assert!(!health.bot_functional);
    assert_eq!(health.orders_count, 0);
    assert!(!health.version.is_empty());
}
