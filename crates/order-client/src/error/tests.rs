//! Unit tests for error module.

use super::*;

#[test]
fn test_api_error_display() {
    let error = Error::Api {
        status: 400,
        message: "guest and coffee are required".to_string(),
    };

    let display = format!("{}", error);
    assert!(display.contains("400"));
    assert!(display.contains("guest and coffee are required"));
}

#[test]
fn test_not_found_error_display() {
    let error = Error::NotFound("Order not found: Ana / Espresso".to_string());

    let display = format!("{}", error);
    assert!(display.starts_with("Not found"));
    assert!(display.contains("Ana / Espresso"));
}

#[test]
fn test_json_error_from() {
    let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    let error: Error = json_err.into();
    assert!(matches!(error, Error::Json(_)));
}

#[test]
fn test_invalid_url_error_from() {
    let url_err = url::Url::parse("not a url").unwrap_err();
    let error: Error = url_err.into();
    assert!(format!("{}", error).contains("Invalid URL"));
}
