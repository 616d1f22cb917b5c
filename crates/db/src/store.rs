//! PostgreSQL implementation of the storage traits.

use async_trait::async_trait;
use barbershop_core::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, AppointmentChanges, NewAppointment},
        barber::{Barber, BarberChanges},
        service::{Service, ServiceDraft, ServiceFilter},
    },
    scheduling::{grid::SlotLabel, placement::PlacementCheck},
    store::{AppointmentStore, Directory},
};
use chrono::{DateTime, NaiveDate, Utc};
use eyre::WrapErr;
use uuid::Uuid;

use crate::{
    models::into_appointments,
    repositories::{appointment, barber, service},
    DbPool,
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn not_found(kind: &str, id: Uuid) -> BookingError {
    BookingError::NotFound(format!("{} with ID {} not found", kind, id))
}

#[async_trait]
impl Directory for PgStore {
    async fn list_barbers(&self) -> BookingResult<Vec<Barber>> {
        let rows = barber::list_barbers(&self.pool).await?;
        Ok(rows.into_iter().map(Barber::from).collect())
    }

    async fn get_barber(&self, id: Uuid) -> BookingResult<Option<Barber>> {
        Ok(barber::get_barber_by_id(&self.pool, id).await?.map(Barber::from))
    }

    async fn create_barber(&self, name: &str) -> BookingResult<Barber> {
        Ok(barber::create_barber(&self.pool, name).await?.into())
    }

    async fn update_barber(&self, id: Uuid, changes: &BarberChanges) -> BookingResult<Barber> {
        barber::update_barber(&self.pool, id, changes.name.as_deref(), changes.display_order)
            .await?
            .map(Barber::from)
            .ok_or_else(|| not_found("Barber", id))
    }

    async fn delete_barber(&self, id: Uuid) -> BookingResult<()> {
        if !barber::delete_barber(&self.pool, id).await? {
            return Err(not_found("Barber", id));
        }
        Ok(())
    }

    async fn set_barber_services(&self, barber_id: Uuid, service_ids: Vec<Uuid>) -> BookingResult<()> {
        barber::set_barber_services(&self.pool, barber_id, &service_ids).await?;
        Ok(())
    }

    async fn list_services(&self, filter: &ServiceFilter) -> BookingResult<Vec<Service>> {
        let rows = service::list_services(&self.pool, filter.barber_id).await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>> {
        Ok(service::get_service_by_id(&self.pool, id).await?.map(Service::from))
    }

    async fn create_service(&self, draft: &ServiceDraft) -> BookingResult<Service> {
        Ok(service::create_service(&self.pool, draft).await?.into())
    }

    async fn update_service(&self, id: Uuid, draft: &ServiceDraft) -> BookingResult<Service> {
        service::update_service(&self.pool, id, draft)
            .await?
            .map(Service::from)
            .ok_or_else(|| not_found("Service", id))
    }

    async fn delete_service(&self, id: Uuid) -> BookingResult<()> {
        if !service::delete_service(&self.pool, id).await? {
            return Err(not_found("Service", id));
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn list_appointments(&self, barber_id: Uuid, date: NaiveDate) -> BookingResult<Vec<Appointment>> {
        let rows = appointment::list_for_day(&self.pool, barber_id, date).await?;
        Ok(into_appointments(rows))
    }

    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
        check: &PlacementCheck,
    ) -> BookingResult<Appointment> {
        let mut tx = self.pool.begin().await.wrap_err("Failed to start transaction")?;

        appointment::lock_day(&mut tx, check.barber_id, check.date).await?;
        let day = into_appointments(appointment::list_for_day(&mut *tx, check.barber_id, check.date).await?);
        check.verify(&day)?;

        let row = appointment::insert_appointment(&mut tx, new).await?;
        tx.commit().await.wrap_err("Failed to commit appointment")?;

        Appointment::try_from(row)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
        check: &PlacementCheck,
    ) -> BookingResult<Appointment> {
        let mut tx = self.pool.begin().await.wrap_err("Failed to start transaction")?;

        appointment::lock_day(&mut tx, check.barber_id, check.date).await?;
        let day = into_appointments(appointment::list_for_day(&mut *tx, check.barber_id, check.date).await?);
        check.verify(&day)?;

        let row = appointment::update_appointment(&mut tx, id, changes)
            .await?
            .ok_or_else(|| not_found("Appointment", id))?;
        tx.commit().await.wrap_err("Failed to commit appointment")?;

        Appointment::try_from(row)
    }

    async fn cancel_appointment(&self, id: Uuid, canceled_at: DateTime<Utc>) -> BookingResult<Appointment> {
        let row = appointment::cancel_appointment(&self.pool, id, canceled_at)
            .await?
            .ok_or_else(|| not_found("Appointment", id))?;
        Appointment::try_from(row)
    }

    async fn cancel_blocks_at(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        time: SlotLabel,
        canceled_at: DateTime<Utc>,
    ) -> BookingResult<Vec<Uuid>> {
        Ok(appointment::cancel_blocks_at(&self.pool, barber_id, date, time, canceled_at).await?)
    }

    async fn find_by_phone(&self, phone: &str) -> BookingResult<Vec<Appointment>> {
        let rows = appointment::find_booked_by_phone(&self.pool, phone).await?;
        Ok(into_appointments(rows))
    }
}
