//! Unit tests for error module.

use super::*;

// ============================================================================
// ErrorResponse Tests
// ============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "Something went wrong".to_string(),
        code: "INTERNAL_ERROR".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"error\":\"Something went wrong\""));
    assert!(json.contains("\"code\":\"INTERNAL_ERROR\""));
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_invalid_request_display() {
    let error = ApiError::InvalidRequest("guest and coffee are required".to_string());
    assert_eq!(
        format!("{}", error),
        "Invalid request: guest and coffee are required"
    );
}

#[test]
fn test_api_error_not_found_display() {
    let error = ApiError::NotFound("Ana / Espresso".to_string());
    assert_eq!(format!("{}", error), "Order not found: Ana / Espresso");
}

#[test]
fn test_api_error_internal_display() {
    let error = ApiError::Internal("unexpected".to_string());
    assert_eq!(format!("{}", error), "Internal server error: unexpected");
}

// ============================================================================
// ApiError IntoResponse Tests
// ============================================================================

#[test]
fn test_api_error_invalid_request_into_response() {
    let error = ApiError::InvalidRequest("Bad input".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_api_error_not_found_into_response() {
    let error = ApiError::NotFound("Ana / Espresso".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_api_error_internal_into_response() {
    let error = ApiError::Internal("Server error".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_api_error_codes() {
    assert_eq!(
        ApiError::InvalidRequest(String::new()).status_and_code().1,
        "INVALID_REQUEST"
    );
    assert_eq!(
        ApiError::NotFound(String::new()).status_and_code().1,
        "NOT_FOUND"
    );
    assert_eq!(
        ApiError::Internal(String::new()).status_and_code().1,
        "INTERNAL_ERROR"
    );
}

// ============================================================================
// ApiError Debug Tests
// ============================================================================

#[test]
fn test_api_error_debug() {
    let error = ApiError::NotFound("Ana / Espresso".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("NotFound"));
    assert!(debug.contains("Ana / Espresso"));
}
