use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use barbershop_core::models::appointment::{
    Appointment, CancelAppointmentRequest, CreateAppointmentRequest,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub phone: String,
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.booking.book(payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Booked appointments for a phone number, in any of its spellings.
#[axum::debug_handler]
pub async fn lookup_by_phone(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = state.booking.find_by_phone(&query.phone).await?;
    Ok(Json(appointments))
}

/// Self-service cancellation; the phone number on file is the only credential.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state
        .booking
        .cancel_with_phone(id, &payload.phone, Utc::now())
        .await?;
    Ok(Json(appointment))
}
