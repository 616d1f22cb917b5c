//! Slot availability and scheduling rules for a barbershop.
//!
//! Appointments live on a fixed grid of 30-minute labels. This crate decides
//! which labels can be booked, re-checks placements before they are written
//! and orchestrates customer and admin actions through
//! [`booking::BookingService`]. Storage is reached through the traits in
//! [`store`].

pub mod booking;
pub mod errors;
pub mod models;
pub mod phone;
pub mod scheduling;
pub mod settings;
pub mod store;
pub mod wizard;

pub use booking::BookingService;
pub use errors::{BookingError, BookingResult};
pub use settings::ShopSettings;
