//! Reduces one barber's appointments for one day into per-label occupancy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grid::{SlotLabel, TimeGrid};
use crate::models::appointment::{Appointment, AppointmentStatus};

/// Which appointment holds a grid label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedSlot {
    pub owner_id: Uuid,
    pub status: AppointmentStatus,
    /// True on the first label of the owner's run
    pub is_range_head: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    cells: BTreeMap<SlotLabel, OccupiedSlot>,
}

impl Occupancy {
    /// Occupancy of every non-canceled appointment.
    ///
    /// Each appointment claims the run from [`TimeGrid::required_slots`], so a
    /// run that overhangs the grid is clamped and a start off the grid claims
    /// nothing. On overlapping data the later appointment wins the shared
    /// labels; the write path keeps real data free of such overlaps.
    pub fn compute(appointments: &[Appointment], grid: &TimeGrid) -> Self {
        Self::compute_excluding(appointments, grid, None)
    }

    /// Like [`Occupancy::compute`] but ignores the appointment `exclude`, so an
    /// appointment being edited never conflicts with its own current claim.
    pub fn compute_excluding(
        appointments: &[Appointment],
        grid: &TimeGrid,
        exclude: Option<Uuid>,
    ) -> Self {
        let mut cells = BTreeMap::new();

        for appointment in appointments
            .iter()
            .filter(|a| a.is_active())
            .filter(|a| Some(a.id) != exclude)
        {
            let run = grid.required_slots(appointment.time, appointment.duration_slots);
            for (index, label) in run.iter().enumerate() {
                cells.insert(
                    *label,
                    OccupiedSlot {
                        owner_id: appointment.id,
                        status: appointment.status,
                        is_range_head: index == 0,
                    },
                );
            }
        }

        Self { cells }
    }

    pub fn get(&self, label: SlotLabel) -> Option<&OccupiedSlot> {
        self.cells.get(&label)
    }

    pub fn is_free(&self, label: SlotLabel) -> bool {
        !self.cells.contains_key(&label)
    }

    /// True when any label of `run` is taken.
    pub fn conflicts_with(&self, run: &[SlotLabel]) -> bool {
        run.iter().any(|label| !self.is_free(*label))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotLabel, &OccupiedSlot)> {
        self.cells.iter()
    }
}
