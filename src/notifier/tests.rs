//! Unit tests for the notifier state machine.

use super::*;

// ============================================================================
// State machine
// ============================================================================

#[tokio::test]
async fn test_disabled_notifier_never_sends() {
    let notifier = Notifier::disabled();

    assert_eq!(notifier.state(), NotifierState::Unconfigured);
    assert!(!notifier.probe().await);

    let report = notifier.send(OutboundMessage::text("hello")).await;
    assert!(!report.sent);
    assert_eq!(report.reason.as_deref(), Some("notifier disabled"));
    assert_eq!(notifier.state(), NotifierState::Unconfigured);
}

#[tokio::test]
async fn test_new_notifier_starts_probing() {
    let notifier = Notifier::new(Arc::new(RecordingTransport::new()));
    assert_eq!(notifier.state(), NotifierState::Probing);
    assert!(!notifier.is_functional());
}

#[tokio::test]
async fn test_probe_success_marks_functional() {
    let notifier = Notifier::new(Arc::new(RecordingTransport::new()));

    assert!(notifier.probe().await);
    assert_eq!(notifier.state(), NotifierState::Functional);
    assert!(notifier.is_functional());
}

#[tokio::test]
async fn test_probe_failure_marks_degraded() {
    let notifier = Notifier::new(Arc::new(RecordingTransport::failing()));

    assert!(!notifier.probe().await);
    assert_eq!(notifier.state(), NotifierState::Degraded);
}

#[tokio::test]
async fn test_send_before_probe_is_attempted() {
    let transport = Arc::new(RecordingTransport::new());
    let notifier = Notifier::new(transport.clone());

    let report = notifier.send(OutboundMessage::text("hello")).await;

    assert!(report.sent);
    assert_eq!(report.message_id, Some(1));
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(notifier.state(), NotifierState::Functional);
}

#[tokio::test]
async fn test_send_failure_degrades_and_reports_reason() {
    let transport = Arc::new(RecordingTransport::new());
    let notifier = Notifier::new(transport.clone());
    assert!(notifier.probe().await);

    transport.set_failing(true);
    let report = notifier.send(OutboundMessage::text("hello")).await;

    assert!(!report.sent);
    assert!(report.reason.unwrap().contains("bot unreachable"));
    assert_eq!(notifier.state(), NotifierState::Degraded);
}

#[tokio::test]
async fn test_degraded_notifier_recovers_on_next_successful_send() {
    let transport = Arc::new(RecordingTransport::failing());
    let notifier = Notifier::new(transport.clone());
    assert!(!notifier.probe().await);

    transport.set_failing(false);
    let report = notifier.send(OutboundMessage::text("hello")).await;

    assert!(report.sent);
    assert_eq!(notifier.state(), NotifierState::Functional);
}

#[tokio::test]
async fn test_acknowledge_is_forwarded() {
    let transport = Arc::new(RecordingTransport::new());
    let notifier = Notifier::new(transport.clone());

    notifier.acknowledge("cb-1", "Done").await;

    assert_eq!(
        transport.acknowledged(),
        vec![("cb-1".to_string(), "Done".to_string())]
    );
}

// ============================================================================
// Order keys
// ============================================================================

#[test]
fn test_order_key_callback_round_trip() {
    let key = OrderKey::new("Ana", "Latte Macchiato");
    let data = key.to_callback_data().unwrap();

    assert_eq!(data, "done:Ana:Latte+Macchiato");
    assert_eq!(OrderKey::from_callback_data(&data), Some(key));
}

#[test]
fn test_order_key_plain_data_still_decodes() {
    let key = OrderKey::from_callback_data("done:Ana:Espresso").unwrap();
    assert_eq!(key, OrderKey::new("Ana", "Espresso"));
}

#[test]
fn test_order_key_colons_in_either_part() {
    let drink = OrderKey::new("Ana", "Flat:White");
    let guest = OrderKey::new("Ana:Flat", "White");

    let drink_data = drink.to_callback_data().unwrap();
    let guest_data = guest.to_callback_data().unwrap();

    assert_eq!(drink_data, "done:Ana:Flat%3AWhite");
    assert_eq!(guest_data, "done:Ana%3AFlat:White");
    assert_eq!(OrderKey::from_callback_data(&drink_data), Some(drink));
    assert_eq!(OrderKey::from_callback_data(&guest_data), Some(guest));
}

#[test]
fn test_order_key_non_ascii_round_trip() {
    let key = OrderKey::new("Zoë & Jo", "Café=Crème");
    let data = key.to_callback_data().unwrap();

    assert!(!data.contains('&'));
    assert_eq!(OrderKey::from_callback_data(&data), Some(key));
}

#[test]
fn test_order_key_too_long_for_callback() {
    let key = OrderKey::new("A".repeat(60), "Espresso");
    assert!(key.to_callback_data().is_none());

    // Encoding expansion counts towards the limit.
    let key = OrderKey::new(":".repeat(19), "Espresso");
    assert!(key.to_callback_data().is_none());
}

#[test]
fn test_order_key_rejects_foreign_data() {
    assert!(OrderKey::from_callback_data("other:Ana:Espresso").is_none());
    assert!(OrderKey::from_callback_data("done:AnaEspresso").is_none());
    assert!(OrderKey::from_callback_data("done::Espresso").is_none());
    assert!(OrderKey::from_callback_data("done:Ana:").is_none());
    assert!(OrderKey::from_callback_data("done:Ana:Flat:White").is_none());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_delivery_report_serialization() {
    let json = serde_json::to_string(&DeliveryReport::delivered(Some(17))).unwrap();
    assert_eq!(json, r#"{"sent":true,"messageId":17}"#);

    let json = serde_json::to_string(&DeliveryReport::not_sent("notifier disabled")).unwrap();
    assert_eq!(json, r#"{"sent":false,"reason":"notifier disabled"}"#);
}

#[test]
fn test_notifier_state_serialization() {
    let json = serde_json::to_string(&NotifierState::Functional).unwrap();
    assert_eq!(json, "\"functional\"");
    assert_eq!(NotifierState::Degraded.to_string(), "degraded");
}
