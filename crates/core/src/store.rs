//! Storage seams consumed by [`crate::booking::BookingService`].
//!
//! Implementations live in the `barbershop-db` crate: a PostgreSQL store and an
//! in-memory store used by tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    errors::BookingResult,
    models::{
        appointment::{Appointment, AppointmentChanges, NewAppointment},
        barber::{Barber, BarberChanges},
        service::{Service, ServiceDraft, ServiceFilter},
    },
    scheduling::{grid::SlotLabel, placement::PlacementCheck},
};

/// Barbers and the service catalog.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Barbers ordered by display order, then name.
    async fn list_barbers(&self) -> BookingResult<Vec<Barber>>;

    async fn get_barber(&self, id: Uuid) -> BookingResult<Option<Barber>>;

    async fn create_barber(&self, name: &str) -> BookingResult<Barber>;

    /// Fails with `NotFound` for an unknown id.
    async fn update_barber(&self, id: Uuid, changes: &BarberChanges) -> BookingResult<Barber>;

    async fn delete_barber(&self, id: Uuid) -> BookingResult<()>;

    /// Replaces the set of services a barber offers.
    async fn set_barber_services(&self, barber_id: Uuid, service_ids: Vec<Uuid>) -> BookingResult<()>;

    /// Services ordered by display order.
    async fn list_services(&self, filter: &ServiceFilter) -> BookingResult<Vec<Service>>;

    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>>;

    async fn create_service(&self, draft: &ServiceDraft) -> BookingResult<Service>;

    async fn update_service(&self, id: Uuid, draft: &ServiceDraft) -> BookingResult<Service>;

    async fn delete_service(&self, id: Uuid) -> BookingResult<()>;
}

/// Appointment records.
///
/// `insert_appointment` and `update_appointment` must call
/// [`PlacementCheck::verify`] on the target day's appointments and perform the
/// write without another writer for the same barber and date in between.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Every appointment of a barber on a date, canceled ones included,
    /// ordered by start time.
    async fn list_appointments(&self, barber_id: Uuid, date: NaiveDate) -> BookingResult<Vec<Appointment>>;

    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
        check: &PlacementCheck,
    ) -> BookingResult<Appointment>;

    /// Fails with `NotFound` for an unknown id.
    async fn update_appointment(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
        check: &PlacementCheck,
    ) -> BookingResult<Appointment>;

    /// Marks one appointment canceled. Fails with `NotFound` for an unknown id.
    async fn cancel_appointment(&self, id: Uuid, canceled_at: DateTime<Utc>) -> BookingResult<Appointment>;

    /// Cancels every active block starting at `time` and returns their ids.
    async fn cancel_blocks_at(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        time: SlotLabel,
        canceled_at: DateTime<Utc>,
    ) -> BookingResult<Vec<Uuid>>;

    /// Booked appointments whose stored phone equals `phone`.
    async fn find_by_phone(&self, phone: &str) -> BookingResult<Vec<Appointment>>;
}
