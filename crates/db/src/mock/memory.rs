//! In-memory store backed by a single `tokio` mutex.
//!
//! Every write holds the lock for its whole check-then-write sequence, which
//! serializes writers exactly as the per-day advisory lock does in PostgreSQL.

use std::collections::BTreeSet;

use async_trait::async_trait;
use barbershop_core::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, AppointmentChanges, AppointmentStatus, NewAppointment},
        barber::{next_display_order, Barber, BarberChanges},
        service::{Service, ServiceDraft, ServiceDuration, ServiceFilter},
    },
    scheduling::{grid::SlotLabel, placement::PlacementCheck},
    store::{AppointmentStore, Directory},
};
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    barbers: Vec<Barber>,
    services: Vec<Service>,
    offers: BTreeSet<(Uuid, Uuid)>,
    appointments: Vec<Appointment>,
}

impl State {
    fn day(&self, barber_id: Uuid, date: NaiveDate) -> Vec<Appointment> {
        let mut day: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.barber_id == barber_id && a.date == date)
            .cloned()
            .collect();
        day.sort_by_key(|a| a.time);
        day
    }

    fn appointment_mut(&mut self, id: Uuid) -> BookingResult<&mut Appointment> {
        self.appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a barber directly, for seeding.
    pub async fn seed_barber(&self, name: &str) -> Barber {
        let mut state = self.state.lock().await;
        let barber = Barber {
            id: Uuid::new_v4(),
            name: name.to_string(),
            display_order: Some(next_display_order(state.barbers.iter().map(|b| b.display_order))),
            created_at: Utc::now(),
        };
        state.barbers.push(barber.clone());
        barber
    }

    /// Adds a service offered by every barber seeded so far.
    pub async fn seed_service(&self, name: &str, duration_slots: u32) -> Service {
        let mut state = self.state.lock().await;
        let duration = ServiceDuration::from_slots(duration_slots);
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: "20€".to_string(),
            description: None,
            duration_slots: duration.slots,
            duration_minutes: duration.minutes,
            is_combined: false,
            display_order: Some(next_display_order(state.services.iter().map(|s| s.display_order))),
            created_at: now,
            updated_at: now,
        };
        let barber_ids: Vec<Uuid> = state.barbers.iter().map(|b| b.id).collect();
        for barber_id in barber_ids {
            state.offers.insert((barber_id, service.id));
        }
        state.services.push(service.clone());
        service
    }

    /// Stores an appointment as given, skipping every check. Used to set up
    /// legacy or inconsistent data.
    pub async fn seed_appointment(&self, appointment: Appointment) {
        self.state.lock().await.appointments.push(appointment);
    }
}

#[async_trait]
impl Directory for MemoryStore {
    async fn list_barbers(&self) -> BookingResult<Vec<Barber>> {
        let mut barbers = self.state.lock().await.barbers.clone();
        barbers.sort_by(|a, b| {
            (a.display_order.is_none(), a.display_order, &a.name)
                .cmp(&(b.display_order.is_none(), b.display_order, &b.name))
        });
        Ok(barbers)
    }

    async fn get_barber(&self, id: Uuid) -> BookingResult<Option<Barber>> {
        Ok(self.state.lock().await.barbers.iter().find(|b| b.id == id).cloned())
    }

    async fn create_barber(&self, name: &str) -> BookingResult<Barber> {
        let mut state = self.state.lock().await;
        let barber = Barber {
            id: Uuid::new_v4(),
            name: name.to_string(),
            display_order: Some(next_display_order(state.barbers.iter().map(|b| b.display_order))),
            created_at: Utc::now(),
        };
        state.barbers.push(barber.clone());
        Ok(barber)
    }

    async fn update_barber(&self, id: Uuid, changes: &BarberChanges) -> BookingResult<Barber> {
        let mut state = self.state.lock().await;
        let barber = state
            .barbers
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BookingError::NotFound(format!("Barber with ID {} not found", id)))?;
        if let Some(name) = &changes.name {
            barber.name = name.clone();
        }
        if let Some(order) = changes.display_order {
            barber.display_order = Some(order);
        }
        Ok(barber.clone())
    }

    async fn delete_barber(&self, id: Uuid) -> BookingResult<()> {
        let mut state = self.state.lock().await;
        let before = state.barbers.len();
        state.barbers.retain(|b| b.id != id);
        if state.barbers.len() == before {
            return Err(BookingError::NotFound(format!("Barber with ID {} not found", id)));
        }
        state.offers.retain(|(barber_id, _)| *barber_id != id);
        state.appointments.retain(|a| a.barber_id != id);
        Ok(())
    }

    async fn set_barber_services(&self, barber_id: Uuid, service_ids: Vec<Uuid>) -> BookingResult<()> {
        let mut state = self.state.lock().await;
        state.offers.retain(|(b, _)| *b != barber_id);
        for service_id in service_ids {
            state.offers.insert((barber_id, service_id));
        }
        Ok(())
    }

    async fn list_services(&self, filter: &ServiceFilter) -> BookingResult<Vec<Service>> {
        let state = self.state.lock().await;
        let mut services: Vec<Service> = state
            .services
            .iter()
            .filter(|s| match filter.barber_id {
                Some(barber_id) => state.offers.contains(&(barber_id, s.id)),
                None => true,
            })
            .cloned()
            .collect();
        services.sort_by(|a, b| {
            (a.display_order.is_none(), a.display_order, &a.name)
                .cmp(&(b.display_order.is_none(), b.display_order, &b.name))
        });
        Ok(services)
    }

    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>> {
        Ok(self.state.lock().await.services.iter().find(|s| s.id == id).cloned())
    }

    async fn create_service(&self, draft: &ServiceDraft) -> BookingResult<Service> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            price: draft.price.clone(),
            description: draft.description.clone(),
            duration_slots: draft.duration.slots,
            duration_minutes: draft.duration.minutes,
            is_combined: draft.is_combined,
            display_order: Some(next_display_order(state.services.iter().map(|s| s.display_order))),
            created_at: now,
            updated_at: now,
        };
        state.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(&self, id: Uuid, draft: &ServiceDraft) -> BookingResult<Service> {
        let mut state = self.state.lock().await;
        let service = state
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", id)))?;
        service.name = draft.name.clone();
        service.price = draft.price.clone();
        service.description = draft.description.clone();
        service.duration_slots = draft.duration.slots;
        service.duration_minutes = draft.duration.minutes;
        service.is_combined = draft.is_combined;
        service.updated_at = Utc::now();
        Ok(service.clone())
    }

    async fn delete_service(&self, id: Uuid) -> BookingResult<()> {
        let mut state = self.state.lock().await;
        let before = state.services.len();
        state.services.retain(|s| s.id != id);
        if state.services.len() == before {
            return Err(BookingError::NotFound(format!("Service with ID {} not found", id)));
        }
        state.offers.retain(|(_, service_id)| *service_id != id);
        for appointment in state.appointments.iter_mut().filter(|a| a.service_id == Some(id)) {
            appointment.service_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn list_appointments(&self, barber_id: Uuid, date: NaiveDate) -> BookingResult<Vec<Appointment>> {
        Ok(self.state.lock().await.day(barber_id, date))
    }

    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        Ok(self
            .state
            .lock()
            .await
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
        check: &PlacementCheck,
    ) -> BookingResult<Appointment> {
        let mut state = self.state.lock().await;
        check.verify(&state.day(check.barber_id, check.date))?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            barber_id: new.barber_id,
            service_id: new.service_id,
            service_name: new.service_name.clone(),
            date: new.date,
            time: new.time,
            duration_slots: new.duration_slots,
            status: new.status,
            customer_name: new.customer_name.clone(),
            customer_phone: new.customer_phone.clone(),
            created_at: Utc::now(),
            canceled_at: None,
        };
        state.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
        check: &PlacementCheck,
    ) -> BookingResult<Appointment> {
        let mut state = self.state.lock().await;
        check.verify(&state.day(check.barber_id, check.date))?;

        let appointment = state.appointment_mut(id)?;
        appointment.barber_id = changes.barber_id;
        appointment.service_id = changes.service_id;
        appointment.service_name = changes.service_name.clone();
        appointment.date = changes.date;
        appointment.time = changes.time;
        appointment.duration_slots = changes.duration_slots;
        appointment.customer_name = changes.customer_name.clone();
        appointment.customer_phone = changes.customer_phone.clone();
        Ok(appointment.clone())
    }

    async fn cancel_appointment(&self, id: Uuid, canceled_at: DateTime<Utc>) -> BookingResult<Appointment> {
        let mut state = self.state.lock().await;
        let appointment = state.appointment_mut(id)?;
        appointment.status = AppointmentStatus::Canceled;
        appointment.canceled_at = Some(canceled_at);
        Ok(appointment.clone())
    }

    async fn cancel_blocks_at(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        time: SlotLabel,
        canceled_at: DateTime<Utc>,
    ) -> BookingResult<Vec<Uuid>> {
        let mut state = self.state.lock().await;
        let mut cleared = Vec::new();
        for appointment in state.appointments.iter_mut().filter(|a| {
            a.status == AppointmentStatus::Blocked && a.is_placed_at(barber_id, date, time)
        }) {
            appointment.status = AppointmentStatus::Canceled;
            appointment.canceled_at = Some(canceled_at);
            cleared.push(appointment.id);
        }
        Ok(cleared)
    }

    async fn find_by_phone(&self, phone: &str) -> BookingResult<Vec<Appointment>> {
        let state = self.state.lock().await;
        let mut found: Vec<Appointment> = state
            .appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Booked && a.customer_phone.as_deref() == Some(phone))
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.date, a.time));
        Ok(found)
    }
}
