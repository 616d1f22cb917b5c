//! # Booking Service
//!
//! The single entry point for every availability decision and every write that
//! places, moves or cancels an appointment. The public booking flow and the
//! admin day view both go through it, so what a customer sees as free and what
//! an admin sees as free come from the same evaluator.
//!
//! Reads (availability listings, the day schedule) are advisory: time passes
//! between showing a slot and submitting it. Writes therefore re-check the
//! placement inside the store, under the target day's write lock, through a
//! [`PlacementCheck`].

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{
            Appointment, AppointmentChanges, AppointmentStatus, CreateAppointmentRequest,
            NewAppointment, UpdateAppointmentRequest,
        },
        barber::{clean_barber_name, Barber, BarberChanges},
        service::{Service, ServiceDraft, ServiceFilter},
    },
    phone::{normalize_phone, PhoneNumber},
    scheduling::{
        availability::{day_availability, SlotAvailability},
        grid::SlotLabel,
        occupancy::{Occupancy, OccupiedSlot},
        placement::PlacementCheck,
        toggle::{decide, has_block_at, ToggleAction, ToggleOutcome, HIGHLIGHT_MS},
    },
    settings::ShopSettings,
    store::{AppointmentStore, Directory},
};

/// Availability of every start label for one barber, day and duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub duration_slots: u32,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Free,
    Booked,
    Blocked,
}

/// One grid cell of the admin day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub time: SlotLabel,
    pub state: CellState,
    pub appointment_id: Option<Uuid>,
    pub is_range_head: bool,
}

impl GridCell {
    fn new(time: SlotLabel, slot: Option<&OccupiedSlot>) -> Self {
        match slot {
            None => Self {
                time,
                state: CellState::Free,
                appointment_id: None,
                is_range_head: false,
            },
            Some(slot) => Self {
                time,
                state: match slot.status {
                    AppointmentStatus::Blocked => CellState::Blocked,
                    _ => CellState::Booked,
                },
                appointment_id: Some(slot.owner_id),
                is_range_head: slot.is_range_head,
            },
        }
    }
}

/// Admin view of one barber's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    /// Booked appointments in start order
    pub appointments: Vec<Appointment>,
    pub cells: Vec<GridCell>,
}

/// How the duration of an availability query is specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSpec {
    Service(Uuid),
    Slots(u32),
}

pub struct BookingService {
    appointments: Arc<dyn AppointmentStore>,
    directory: Arc<dyn Directory>,
    settings: Arc<ShopSettings>,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        directory: Arc<dyn Directory>,
        settings: Arc<ShopSettings>,
    ) -> Self {
        Self {
            appointments,
            directory,
            settings,
        }
    }

    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    pub fn normalize_phone(&self, raw: &str) -> BookingResult<PhoneNumber> {
        normalize_phone(raw, &self.settings.home_country_code)
    }

    async fn require_barber(&self, id: Uuid) -> BookingResult<Barber> {
        self.directory
            .get_barber(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Barber with ID {} not found", id)))
    }

    async fn require_service(&self, id: Uuid) -> BookingResult<Service> {
        self.directory
            .get_service(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", id)))
    }

    async fn require_appointment(&self, id: Uuid) -> BookingResult<Appointment> {
        self.appointments
            .get_appointment(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    /// Occupancy of one barber's day.
    pub async fn occupancy(&self, barber_id: Uuid, date: NaiveDate) -> BookingResult<Occupancy> {
        let day = self.appointments.list_appointments(barber_id, date).await?;
        Ok(Occupancy::compute(&day, &self.settings.grid))
    }

    /// Evaluates every start label of the day for the requested duration.
    pub async fn day_availability(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        duration: DurationSpec,
        now: DateTime<Utc>,
    ) -> BookingResult<DayAvailability> {
        self.require_barber(barber_id).await?;
        let duration_slots = match duration {
            DurationSpec::Service(id) => self.require_service(id).await?.duration_slots,
            DurationSpec::Slots(slots) => slots,
        };
        if duration_slots == 0 {
            return Err(BookingError::validation("Duration must be at least one slot"));
        }

        let occupancy = self.occupancy(barber_id, date).await?;
        let slots = day_availability(date, duration_slots, &occupancy, &self.settings, now);

        Ok(DayAvailability {
            barber_id,
            date,
            duration_slots,
            slots,
        })
    }

    /// Books a customer appointment.
    pub async fn book(
        &self,
        request: CreateAppointmentRequest,
        now: DateTime<Utc>,
    ) -> BookingResult<Appointment> {
        let customer_name = request.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(BookingError::validation("Name is required"));
        }
        let phone = self.normalize_phone(&request.customer_phone)?;
        if !self.settings.grid.contains(request.time) {
            return Err(BookingError::validation(format!(
                "Time {} is not a bookable slot",
                request.time
            )));
        }

        let service = self.require_service(request.service_id).await?;
        self.require_barber(request.barber_id).await?;

        let new = NewAppointment {
            barber_id: request.barber_id,
            service_id: Some(service.id),
            service_name: service.name,
            date: request.date,
            time: request.time,
            duration_slots: service.duration_slots.max(1),
            status: AppointmentStatus::Booked,
            customer_name: Some(customer_name),
            customer_phone: Some(phone.into_string()),
        };
        let check = PlacementCheck::for_new(&new, self.settings.clone(), now);
        let appointment = self.appointments.insert_appointment(&new, &check).await?;

        info!(
            "Booked appointment {} for barber {} on {} at {}",
            appointment.id, appointment.barber_id, appointment.date, appointment.time
        );
        Ok(appointment)
    }

    /// Admin edit, possibly moving the appointment to another barber, day or
    /// time. The appointment's own current claim never counts as a conflict.
    pub async fn edit(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
        now: DateTime<Utc>,
    ) -> BookingResult<Appointment> {
        let current = self.require_appointment(id).await?;
        if !current.is_active() {
            return Err(BookingError::validation("Canceled appointments cannot be edited"));
        }
        if !self.settings.grid.contains(request.time) {
            return Err(BookingError::validation(format!(
                "Time {} is not a bookable slot",
                request.time
            )));
        }
        self.require_barber(request.barber_id).await?;

        let (service_id, service_name, duration_slots) = match request.service_id {
            Some(service_id) => {
                let service = self.require_service(service_id).await?;
                (Some(service.id), service.name, service.duration_slots)
            }
            None => (
                current.service_id,
                current.service_name.clone(),
                current.duration_slots,
            ),
        };

        // Absent or blank contact fields keep what is on file.
        let customer_name = match request.customer_name.as_deref().map(str::trim) {
            None | Some("") => current.customer_name.clone(),
            Some(name) => Some(name.to_string()),
        };
        let customer_phone = match request.customer_phone.as_deref().map(str::trim) {
            None | Some("") => current.customer_phone.clone(),
            Some(raw) if current.customer_phone.as_deref() == Some(raw) => Some(raw.to_string()),
            Some(raw) => Some(self.normalize_phone(raw)?.into_string()),
        };

        let changes = AppointmentChanges {
            barber_id: request.barber_id,
            service_id,
            service_name,
            date: request.date,
            time: request.time,
            duration_slots: duration_slots.max(1),
            customer_name,
            customer_phone,
        };
        let check = PlacementCheck::for_edit(&current, &changes, self.settings.clone(), now);
        let updated = self.appointments.update_appointment(id, &changes, &check).await?;

        info!(
            "Updated appointment {}: barber {} on {} at {}",
            updated.id, updated.barber_id, updated.date, updated.time
        );
        Ok(updated)
    }

    /// Self-service cancellation authorized by the phone number on file.
    ///
    /// An unknown id and a wrong phone produce the same error so the endpoint
    /// cannot be used to probe for bookings.
    pub async fn cancel_with_phone(
        &self,
        id: Uuid,
        phone: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<Appointment> {
        let phone = self.normalize_phone(phone)?;
        let appointment = match self.appointments.get_appointment(id).await? {
            Some(a) if a.status == AppointmentStatus::Booked => a,
            _ => return Err(BookingError::unauthorized()),
        };
        if appointment.customer_phone.as_deref() != Some(phone.as_str()) {
            debug!("Phone mismatch on cancellation of {}", id);
            return Err(BookingError::unauthorized());
        }

        let canceled = self.appointments.cancel_appointment(id, now).await?;
        info!("Customer canceled appointment {}", id);
        Ok(canceled)
    }

    /// Admin cancellation, no phone check.
    pub async fn cancel(&self, id: Uuid, now: DateTime<Utc>) -> BookingResult<Appointment> {
        let appointment = self.require_appointment(id).await?;
        if !appointment.is_active() {
            return Ok(appointment);
        }
        let canceled = self.appointments.cancel_appointment(id, now).await?;
        info!("Admin canceled appointment {}", id);
        Ok(canceled)
    }

    /// Booked appointments for a customer's phone number.
    pub async fn find_by_phone(&self, phone: &str) -> BookingResult<Vec<Appointment>> {
        let phone = self.normalize_phone(phone)?;
        self.appointments.find_by_phone(phone.as_str()).await
    }

    /// Admin view of a barber's day.
    pub async fn day_schedule(&self, barber_id: Uuid, date: NaiveDate) -> BookingResult<DaySchedule> {
        self.require_barber(barber_id).await?;
        let day = self.appointments.list_appointments(barber_id, date).await?;
        let occupancy = Occupancy::compute(&day, &self.settings.grid);

        let cells = self
            .settings
            .grid
            .labels()
            .iter()
            .map(|label| GridCell::new(*label, occupancy.get(*label)))
            .collect();

        let mut appointments: Vec<Appointment> = day
            .into_iter()
            .filter(|a| a.status == AppointmentStatus::Booked)
            .collect();
        appointments.sort_by_key(|a| a.time);

        Ok(DaySchedule {
            barber_id,
            date,
            appointments,
            cells,
        })
    }

    /// Admin click on a grid cell: block a free cell, unblock a blocked one,
    /// or point at the appointment holding a booked one.
    pub async fn toggle_slot(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        time: SlotLabel,
        now: DateTime<Utc>,
    ) -> BookingResult<ToggleOutcome> {
        if !self.settings.grid.contains(time) {
            return Err(BookingError::validation(format!("Time {} is not on the grid", time)));
        }
        self.require_barber(barber_id).await?;

        let day = self.appointments.list_appointments(barber_id, date).await?;
        let occupancy = Occupancy::compute(&day, &self.settings.grid);

        match decide(&occupancy, time) {
            ToggleAction::Navigate { appointment_id } => Ok(ToggleOutcome::Navigate {
                appointment_id,
                highlight_ms: HIGHLIGHT_MS,
            }),
            ToggleAction::Block => {
                let new = NewAppointment::block(barber_id, date, time);
                let check = PlacementCheck::for_new(&new, self.settings.clone(), now);
                match self.appointments.insert_appointment(&new, &check).await {
                    Ok(appointment) => {
                        info!("Blocked {} {} for barber {}", date, time, barber_id);
                        Ok(ToggleOutcome::Blocked {
                            appointment: Box::new(appointment),
                        })
                    }
                    Err(BookingError::Conflict(message)) => {
                        // A second click racing the first finds its own block.
                        let fresh = self.appointments.list_appointments(barber_id, date).await?;
                        if has_block_at(&fresh, time) {
                            debug!("{} {} for barber {} was already blocked", date, time, barber_id);
                            Ok(ToggleOutcome::AlreadyBlocked)
                        } else {
                            Err(BookingError::Conflict(message))
                        }
                    }
                    Err(e) => Err(e),
                }
            }
            ToggleAction::Unblock { holder } => {
                let cleared = self
                    .appointments
                    .cancel_blocks_at(barber_id, date, time, now)
                    .await?;
                if !cleared.is_empty() {
                    if cleared.len() > 1 {
                        warn!(
                            "Cleared {} duplicate blocks at {} {} for barber {}",
                            cleared.len(),
                            date,
                            time,
                            barber_id
                        );
                    }
                    return Ok(ToggleOutcome::Unblocked {
                        count: cleared.len(),
                    });
                }

                // The cell is covered by a block that starts at another label.
                match self.appointments.cancel_appointment(holder, now).await {
                    Ok(_) => Ok(ToggleOutcome::Unblocked { count: 1 }),
                    Err(BookingError::NotFound(_)) => {
                        warn!("No block left to clear at {} {} for barber {}", date, time, barber_id);
                        Ok(ToggleOutcome::NothingToUnblock)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    pub async fn list_barbers(&self) -> BookingResult<Vec<Barber>> {
        self.directory.list_barbers().await
    }

    pub async fn create_barber(&self, name: &str) -> BookingResult<Barber> {
        let name = clean_barber_name(name)?;
        self.directory.create_barber(&name).await
    }

    pub async fn update_barber(&self, id: Uuid, changes: BarberChanges) -> BookingResult<Barber> {
        self.directory.update_barber(id, &changes).await
    }

    pub async fn delete_barber(&self, id: Uuid) -> BookingResult<()> {
        self.directory.delete_barber(id).await
    }

    pub async fn set_barber_services(&self, barber_id: Uuid, service_ids: Vec<Uuid>) -> BookingResult<()> {
        self.require_barber(barber_id).await?;
        for service_id in &service_ids {
            self.require_service(*service_id).await?;
        }
        self.directory.set_barber_services(barber_id, service_ids).await
    }

    pub async fn list_services(&self, filter: &ServiceFilter) -> BookingResult<Vec<Service>> {
        self.directory.list_services(filter).await
    }

    pub async fn create_service(&self, draft: ServiceDraft) -> BookingResult<Service> {
        self.directory.create_service(&draft).await
    }

    pub async fn update_service(&self, id: Uuid, draft: ServiceDraft) -> BookingResult<Service> {
        self.directory.update_service(id, &draft).await
    }

    pub async fn delete_service(&self, id: Uuid) -> BookingResult<()> {
        self.directory.delete_service(id).await
    }
}
