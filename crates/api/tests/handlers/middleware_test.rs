use axum::{body::to_bytes, http::StatusCode};
use barbershop_api::middleware::error_handling::{map_error, AppError};
use barbershop_core::errors::{BookingError, AUTHORIZATION_MESSAGE, CONFLICT_MESSAGE};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

async fn body_of(err: BookingError) -> (StatusCode, Value) {
    let response = map_error(err);
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[rstest]
#[case(BookingError::validation("Name is required"), StatusCode::BAD_REQUEST)]
#[case(BookingError::unauthorized(), StatusCode::FORBIDDEN)]
#[case(BookingError::NotFound("Barber".into()), StatusCode::NOT_FOUND)]
#[case(BookingError::conflict(), StatusCode::CONFLICT)]
#[case(BookingError::Transient(eyre::eyre!("pool timed out")), StatusCode::SERVICE_UNAVAILABLE)]
#[case(BookingError::Internal("broken invariant".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_status_mapping(#[case] err: BookingError, #[case] expected: StatusCode) {
    assert_eq!(AppError(err).status(), expected);
}

#[tokio::test]
async fn test_conflict_body_is_customer_facing() {
    let (status, body) = body_of(BookingError::conflict()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": CONFLICT_MESSAGE, "retryable": true }));
}

#[tokio::test]
async fn test_authorization_body_is_fixed() {
    let (_, body) = body_of(BookingError::unauthorized()).await;

    assert_eq!(body["error"], AUTHORIZATION_MESSAGE);
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_storage_reports_are_retryable() {
    let err: AppError = eyre::eyre!("connection reset").into();

    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    let (_, body) = body_of(err.0).await;
    assert_eq!(body["retryable"], true);
}
