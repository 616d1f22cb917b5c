use std::error::Error;
use barbershop_core::errors::{BookingError, BookingResult, AUTHORIZATION_MESSAGE, CONFLICT_MESSAGE};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Barber not found".to_string());
    let validation = BookingError::validation("Name is required");
    let authorization = BookingError::unauthorized();
    let conflict = BookingError::conflict();
    let transient = BookingError::Transient(eyre::eyre!("Database connection failed"));
    let internal = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Barber not found");
    assert_eq!(validation.to_string(), "Validation error: Name is required");
    assert_eq!(
        authorization.to_string(),
        format!("Authorization error: {}", AUTHORIZATION_MESSAGE)
    );
    assert_eq!(conflict.to_string(), format!("Conflict: {}", CONFLICT_MESSAGE));
    assert!(transient.to_string().contains("Service temporarily unavailable:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_only_conflict_and_transient_are_retryable() {
    assert!(BookingError::conflict().is_retryable());
    assert!(BookingError::Transient(eyre::eyre!("timeout")).is_retryable());
    assert!(!BookingError::validation("bad").is_retryable());
    assert!(!BookingError::unauthorized().is_retryable());
    assert!(!BookingError::NotFound("x".to_string()).is_retryable());
}

#[test]
fn test_eyre_report_converts_to_transient() {
    fn fails() -> BookingResult<()> {
        Err(eyre::eyre!("connection reset"))?
    }

    let error = fails().unwrap_err();
    assert!(matches!(error, BookingError::Transient(_)));
    assert!(error.to_string().contains("connection reset"));
}

#[test]
fn test_internal_error_keeps_source() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let boxed_error: Box<dyn Error + Send + Sync> = Box::new(io_error);
    let booking_error = BookingError::from(boxed_error);

    assert!(booking_error.source().is_some());
    assert!(booking_error.to_string().contains("IO error"));
}

#[test]
fn test_authorization_message_does_not_reveal_existence() {
    // Same text whether the id is unknown or the phone does not match.
    assert_eq!(
        BookingError::unauthorized().to_string(),
        BookingError::unauthorized().to_string()
    );
    assert!(!AUTHORIZATION_MESSAGE.contains("exist"));
}
