//! # Admin Handlers
//!
//! Day view, edits and moves, cancellation and the one-click block toggle.
//! These routes carry no authentication of their own.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use barbershop_core::{
    booking::DaySchedule,
    models::appointment::{Appointment, ToggleSlotRequest, UpdateAppointmentRequest},
    scheduling::toggle::ToggleOutcome,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub barber_id: Uuid,
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn day_schedule(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<DaySchedule>, AppError> {
    let schedule = state.booking.day_schedule(query.barber_id, query.date).await?;
    Ok(Json(schedule))
}

/// Edits an appointment, possibly moving it to another barber, day or time.
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.booking.edit(id, payload, Utc::now()).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.booking.cancel(id, Utc::now()).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn toggle_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ToggleSlotRequest>,
) -> Result<Json<ToggleOutcome>, AppError> {
    let outcome = state
        .booking
        .toggle_slot(payload.barber_id, payload.date, payload.time, Utc::now())
        .await?;
    info!(
        "Toggled {} {} for barber {}: {:?}",
        payload.date, payload.time, payload.barber_id, outcome
    );
    Ok(Json(outcome))
}
