//! Slot availability and conflict rules shared by the booking flow and the
//! admin day view.

pub mod availability;
pub mod grid;
pub mod occupancy;
pub mod placement;
pub mod toggle;
