//! # Availability Handlers
//!
//! Lists, for one barber and day, whether each grid label can start a booking
//! of the requested length. The same evaluator backs the write path, so a slot
//! shown here as available is rejected on submit only if something changed in
//! between.

use axum::{
    extract::{Query, State},
    Json,
};
use barbershop_core::{
    booking::{DayAvailability, DurationSpec},
    errors::BookingError,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the availability endpoint
///
/// Exactly one of `service_id` and `duration_slots` must be given.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub service_id: Option<Uuid>,
    pub duration_slots: Option<u32>,
}

impl AvailabilityQuery {
    fn duration(&self) -> Result<DurationSpec, BookingError> {
        match (self.service_id, self.duration_slots) {
            (Some(id), None) => Ok(DurationSpec::Service(id)),
            (None, Some(slots)) => Ok(DurationSpec::Slots(slots)),
            _ => Err(BookingError::validation(
                "Provide exactly one of service_id and duration_slots",
            )),
        }
    }
}

/// ```text
/// GET /api/availability?barber_id=<uuid>&date=2024-06-11&service_id=<uuid>
/// ```
#[axum::debug_handler]
pub async fn day_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DayAvailability>, AppError> {
    let duration = query.duration()?;
    let availability = state
        .booking
        .day_availability(query.barber_id, query.date, duration, Utc::now())
        .await?;

    Ok(Json(availability))
}
