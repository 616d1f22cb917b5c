//! Admin click on a single grid cell.
//!
//! | cell state | effect |
//! |---|---|
//! | free | insert a one-slot block |
//! | blocked | cancel every block starting at that label |
//! | booked | no write; point the UI at the owning appointment |

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{grid::SlotLabel, occupancy::Occupancy};
use crate::models::appointment::{Appointment, AppointmentStatus};

/// How long the UI keeps the navigated-to appointment highlighted.
pub const HIGHLIGHT_MS: u64 = 1600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Block,
    /// `holder` is the block currently occupying the cell, used when no block
    /// starts exactly at the label
    Unblock { holder: Uuid },
    Navigate { appointment_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Blocked { appointment: Box<Appointment> },
    AlreadyBlocked,
    Unblocked { count: usize },
    NothingToUnblock,
    Navigate { appointment_id: Uuid, highlight_ms: u64 },
}

pub fn decide(occupancy: &Occupancy, label: SlotLabel) -> ToggleAction {
    match occupancy.get(label) {
        None => ToggleAction::Block,
        Some(slot) => match slot.status {
            AppointmentStatus::Blocked => ToggleAction::Unblock {
                holder: slot.owner_id,
            },
            _ => ToggleAction::Navigate {
                appointment_id: slot.owner_id,
            },
        },
    }
}

/// Whether an active block already starts at `label` (double-click guard).
pub fn has_block_at(day: &[Appointment], label: SlotLabel) -> bool {
    day.iter()
        .any(|a| a.status == AppointmentStatus::Blocked && a.time == label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::grid::TimeGrid;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;

    fn appointment(time: &str, duration_slots: u32, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            barber_id: Uuid::nil(),
            service_id: None,
            service_name: "Bartrasur".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            time: time.parse().unwrap(),
            duration_slots,
            status,
            customer_name: None,
            customer_phone: None,
            created_at: Utc::now(),
            canceled_at: None,
        }
    }

    #[test]
    fn cell_state_selects_action() {
        let grid = TimeGrid::standard();
        let booked = appointment("10:00", 2, AppointmentStatus::Booked);
        let blocked = appointment("14:00", 1, AppointmentStatus::Blocked);
        let occupancy = Occupancy::compute(&[booked.clone(), blocked.clone()], &grid);

        assert_eq!(decide(&occupancy, "09:00".parse().unwrap()), ToggleAction::Block);
        assert_eq!(
            decide(&occupancy, "10:30".parse().unwrap()),
            ToggleAction::Navigate {
                appointment_id: booked.id
            }
        );
        assert_eq!(
            decide(&occupancy, "14:00".parse().unwrap()),
            ToggleAction::Unblock { holder: blocked.id }
        );
    }

    #[test]
    fn canceled_blocks_do_not_count() {
        let day = vec![appointment("14:00", 1, AppointmentStatus::Canceled)];
        assert!(!has_block_at(&day, "14:00".parse().unwrap()));
    }
}
