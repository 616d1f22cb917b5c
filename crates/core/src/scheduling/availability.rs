//! Decides whether a candidate start label can be booked right now.
//!
//! A slot is available only when every check passes:
//!
//! 1. **Fit**: the full run of `duration_slots` labels lies on the grid.
//! 2. **No conflict**: no label of the run is occupied.
//! 3. **Not past**: the start, read as wall-clock time in the shop's timezone,
//!    is strictly after `now`.
//! 4. **Open**: the date is not one of the shop's closed weekdays.
//!
//! An unavailable slot is the normal state for most of the grid and is never
//! reported as an error.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{
    grid::{SlotLabel, TimeGrid},
    occupancy::Occupancy,
};
use crate::{models::appointment::AppointmentStatus, settings::ShopSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailability {
    /// The run would extend past the last grid label, or the start is off-grid
    DoesNotFit,
    /// Some label of the run is held by another appointment
    Conflict,
    /// The start is not in the future
    Past,
    /// The shop does not open on this weekday
    ClosedDay,
    /// The wall-clock time does not exist on this date (DST gap)
    NonexistentLocalTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEvaluation {
    pub available: bool,
    pub reasons: BTreeSet<Unavailability>,
}

impl SlotEvaluation {
    fn from_reasons(reasons: BTreeSet<Unavailability>) -> Self {
        Self {
            available: reasons.is_empty(),
            reasons,
        }
    }

    pub fn has(&self, reason: Unavailability) -> bool {
        self.reasons.contains(&reason)
    }
}

/// One cell of a public availability listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub time: SlotLabel,
    pub available: bool,
    pub reasons: Vec<Unavailability>,
    /// Status of the appointment holding this exact label, if any
    pub occupied: Option<AppointmentStatus>,
}

/// The absolute instant of `time` on `date` in the shop's timezone.
///
/// An ambiguous wall-clock time (DST fall-back) resolves to its earlier
/// instant; a time inside a DST gap has none.
pub fn local_instant(date: NaiveDate, time: SlotLabel, timezone: &Tz) -> Option<DateTime<Utc>> {
    timezone
        .from_local_datetime(&date.and_time(time.time()))
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Fit and conflict checks only.
pub fn layout_reasons(
    candidate: SlotLabel,
    duration_slots: u32,
    occupancy: &Occupancy,
    grid: &TimeGrid,
) -> BTreeSet<Unavailability> {
    let mut reasons = BTreeSet::new();
    let run = grid.required_slots(candidate, duration_slots);

    if run.len() != duration_slots.max(1) as usize {
        reasons.insert(Unavailability::DoesNotFit);
    }
    if occupancy.conflicts_with(run) {
        reasons.insert(Unavailability::Conflict);
    }
    reasons
}

/// Past-time and closed-day checks only.
pub fn calendar_reasons(
    candidate: SlotLabel,
    date: NaiveDate,
    settings: &ShopSettings,
    now: DateTime<Utc>,
) -> BTreeSet<Unavailability> {
    let mut reasons = BTreeSet::new();

    if settings.is_closed(date.weekday()) {
        reasons.insert(Unavailability::ClosedDay);
    }
    match local_instant(date, candidate, &settings.timezone) {
        Some(start) if start > now => {}
        Some(_) => {
            reasons.insert(Unavailability::Past);
        }
        None => {
            reasons.insert(Unavailability::NonexistentLocalTime);
        }
    }
    reasons
}

pub fn evaluate_slot(
    candidate: SlotLabel,
    duration_slots: u32,
    occupancy: &Occupancy,
    date: NaiveDate,
    settings: &ShopSettings,
    now: DateTime<Utc>,
) -> SlotEvaluation {
    let mut reasons = layout_reasons(candidate, duration_slots, occupancy, &settings.grid);
    reasons.extend(calendar_reasons(candidate, date, settings, now));
    SlotEvaluation::from_reasons(reasons)
}

/// Evaluates every grid label of `date` as a start for `duration_slots`.
pub fn day_availability(
    date: NaiveDate,
    duration_slots: u32,
    occupancy: &Occupancy,
    settings: &ShopSettings,
    now: DateTime<Utc>,
) -> Vec<SlotAvailability> {
    settings
        .grid
        .labels()
        .iter()
        .map(|label| {
            let evaluation = evaluate_slot(*label, duration_slots, occupancy, date, settings, now);
            SlotAvailability {
                time: *label,
                available: evaluation.available,
                reasons: evaluation.reasons.into_iter().collect(),
                occupied: occupancy.get(*label).map(|slot| slot.status),
            }
        })
        .collect()
}
