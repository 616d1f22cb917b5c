//! Authoritative re-check run immediately before a booked or blocked
//! appointment is written.
//!
//! Storage adapters receive a [`PlacementCheck`] together with the write and
//! call [`PlacementCheck::verify`] on the target day's appointments while they
//! hold that day's write lock, so the check and the write cannot interleave
//! with another writer for the same barber and date.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{
    availability::{calendar_reasons, layout_reasons, SlotEvaluation},
    grid::SlotLabel,
    occupancy::Occupancy,
};
use crate::{
    errors::{BookingError, BookingResult},
    models::appointment::{Appointment, AppointmentChanges, NewAppointment},
    settings::ShopSettings,
};

#[derive(Debug, Clone)]
pub struct PlacementCheck {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub start: SlotLabel,
    pub duration_slots: u32,
    /// Appointment whose own claim is ignored (the one being edited)
    pub exclude: Option<Uuid>,
    /// Whether the past-time and closed-day checks apply
    pub enforce_calendar: bool,
    pub now: DateTime<Utc>,
    pub settings: Arc<ShopSettings>,
}

impl PlacementCheck {
    pub fn for_new(new: &NewAppointment, settings: Arc<ShopSettings>, now: DateTime<Utc>) -> Self {
        Self {
            barber_id: new.barber_id,
            date: new.date,
            start: new.time,
            duration_slots: new.duration_slots,
            exclude: None,
            enforce_calendar: true,
            now,
            settings,
        }
    }

    /// Check for moving `current` to the placement in `changes`.
    ///
    /// When barber, date and start are unchanged only fit and conflict are
    /// checked, so an appointment can always be saved onto its own slot even
    /// after that slot has started.
    pub fn for_edit(
        current: &Appointment,
        changes: &AppointmentChanges,
        settings: Arc<ShopSettings>,
        now: DateTime<Utc>,
    ) -> Self {
        let unchanged = current.is_placed_at(changes.barber_id, changes.date, changes.time);
        Self {
            barber_id: changes.barber_id,
            date: changes.date,
            start: changes.time,
            duration_slots: changes.duration_slots,
            exclude: Some(current.id),
            enforce_calendar: !unchanged,
            now,
            settings,
        }
    }

    /// Evaluates the candidate against the target day without deciding.
    pub fn evaluate(&self, day: &[Appointment]) -> SlotEvaluation {
        let day: Vec<Appointment> = day
            .iter()
            .filter(|a| a.barber_id == self.barber_id && a.date == self.date)
            .cloned()
            .collect();
        let occupancy = Occupancy::compute_excluding(&day, &self.settings.grid, self.exclude);

        let mut reasons = layout_reasons(self.start, self.duration_slots, &occupancy, &self.settings.grid);
        if self.enforce_calendar {
            reasons.extend(calendar_reasons(self.start, self.date, &self.settings, self.now));
        }
        SlotEvaluation {
            available: reasons.is_empty(),
            reasons,
        }
    }

    /// Fails with a conflict when the candidate cannot be placed.
    pub fn verify(&self, day: &[Appointment]) -> BookingResult<()> {
        let evaluation = self.evaluate(day);
        if evaluation.available {
            return Ok(());
        }
        debug!(
            "Placement rejected: barber={}, date={}, start={}, slots={}, reasons={:?}",
            self.barber_id, self.date, self.start, self.duration_slots, evaluation.reasons
        );
        Err(BookingError::conflict())
    }
}
