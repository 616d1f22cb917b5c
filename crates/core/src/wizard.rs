//! Public booking flow as an explicit state machine.
//!
//! This is the client-side half of booking: a booking UI (or any other
//! front end linking this crate) drives it step by step and hands the request
//! from [`BookingWizard::submit`] to `POST /api/appointments`. The server does
//! not keep wizard state.
//!
//! Each step carries exactly the choices collected so far, so a step that
//! needs a barber cannot be reached without one. Transitions are pure: they
//! take the current state and return the next one, leaving the caller's value
//! untouched on error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, CreateAppointmentRequest},
        barber::Barber,
        service::Service,
    },
    phone::normalize_phone,
    scheduling::{
        availability::evaluate_slot,
        grid::SlotLabel,
        occupancy::Occupancy,
    },
    settings::ShopSettings,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChoice {
    pub id: Uuid,
    pub name: String,
    pub duration_slots: u32,
}

impl From<&Service> for ServiceChoice {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            duration_slots: service.duration_slots.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarberChoice {
    pub id: Uuid,
    pub name: String,
}

impl From<&Barber> for BarberChoice {
    fn from(barber: &Barber) -> Self {
        Self {
            id: barber.id,
            name: barber.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum BookingWizard {
    ChooseService,
    ChooseBarber {
        service: ServiceChoice,
    },
    ChooseSlot {
        service: ServiceChoice,
        barber: BarberChoice,
        date: Option<NaiveDate>,
        time: Option<SlotLabel>,
    },
    ContactDetails {
        service: ServiceChoice,
        barber: BarberChoice,
        date: NaiveDate,
        time: SlotLabel,
    },
    Confirmed {
        appointment: Box<Appointment>,
    },
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::ChooseService
    }
}

fn out_of_order(action: &str) -> BookingError {
    BookingError::validation(format!("Cannot {} at this step", action))
}

impl BookingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based position in the flow, for progress indicators.
    pub fn step_number(&self) -> u8 {
        match self {
            Self::ChooseService => 1,
            Self::ChooseBarber { .. } => 2,
            Self::ChooseSlot { .. } => 3,
            Self::ContactDetails { .. } => 4,
            Self::Confirmed { .. } => 5,
        }
    }

    /// Picking a service starts the selection over from the barber step.
    pub fn choose_service(&self, service: ServiceChoice) -> BookingResult<Self> {
        match self {
            Self::Confirmed { .. } => Err(out_of_order("choose a service")),
            _ => Ok(Self::ChooseBarber { service }),
        }
    }

    pub fn choose_barber(&self, barber: BarberChoice) -> BookingResult<Self> {
        let service = match self {
            Self::ChooseBarber { service }
            | Self::ChooseSlot { service, .. }
            | Self::ContactDetails { service, .. } => service.clone(),
            _ => return Err(out_of_order("choose a barber")),
        };
        Ok(Self::ChooseSlot {
            service,
            barber,
            date: None,
            time: None,
        })
    }

    /// Picking a date drops any previously picked time.
    pub fn choose_date(&self, date: NaiveDate) -> BookingResult<Self> {
        match self {
            Self::ChooseSlot { service, barber, .. } | Self::ContactDetails { service, barber, .. } => {
                Ok(Self::ChooseSlot {
                    service: service.clone(),
                    barber: barber.clone(),
                    date: Some(date),
                    time: None,
                })
            }
            _ => Err(out_of_order("choose a date")),
        }
    }

    /// Accepts `time` only if it is bookable for the chosen service against
    /// `occupancy` of the chosen barber and date.
    pub fn choose_time(
        &self,
        time: SlotLabel,
        occupancy: &Occupancy,
        settings: &ShopSettings,
        now: DateTime<Utc>,
    ) -> BookingResult<Self> {
        let Self::ChooseSlot {
            service,
            barber,
            date: Some(date),
            ..
        } = self
        else {
            return Err(out_of_order("choose a time"));
        };

        let evaluation = evaluate_slot(time, service.duration_slots, occupancy, *date, settings, now);
        if !evaluation.available {
            return Err(BookingError::conflict());
        }

        Ok(Self::ContactDetails {
            service: service.clone(),
            barber: barber.clone(),
            date: *date,
            time,
        })
    }

    pub fn back(&self) -> Self {
        match self {
            Self::ChooseService | Self::ChooseBarber { .. } => Self::ChooseService,
            Self::ChooseSlot { service, .. } => Self::ChooseBarber {
                service: service.clone(),
            },
            Self::ContactDetails {
                service,
                barber,
                date,
                time,
            } => Self::ChooseSlot {
                service: service.clone(),
                barber: barber.clone(),
                date: Some(*date),
                time: Some(*time),
            },
            Self::Confirmed { .. } => self.clone(),
        }
    }

    /// Re-evaluates the selected time against freshly fetched occupancy.
    ///
    /// A selection that is no longer bookable is cleared and the flow returns
    /// to slot selection, so the customer has to pick again.
    pub fn refresh_occupancy(
        &self,
        occupancy: &Occupancy,
        settings: &ShopSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let (service, barber, date, time) = match self {
            Self::ChooseSlot {
                service,
                barber,
                date: Some(date),
                time: Some(time),
            }
            | Self::ContactDetails {
                service,
                barber,
                date,
                time,
            } => (service, barber, *date, *time),
            _ => return self.clone(),
        };

        let evaluation = evaluate_slot(time, service.duration_slots, occupancy, date, settings, now);
        if evaluation.available {
            return self.clone();
        }

        Self::ChooseSlot {
            service: service.clone(),
            barber: barber.clone(),
            date: Some(date),
            time: None,
        }
    }

    /// Validates contact details and produces the booking request.
    pub fn submit(
        &self,
        customer_name: &str,
        customer_phone: &str,
        settings: &ShopSettings,
    ) -> BookingResult<CreateAppointmentRequest> {
        let Self::ContactDetails {
            service,
            barber,
            date,
            time,
        } = self
        else {
            return Err(out_of_order("submit"));
        };

        let name = customer_name.trim();
        if name.is_empty() {
            return Err(BookingError::validation("Name is required"));
        }
        let phone = normalize_phone(customer_phone, &settings.home_country_code)?;

        Ok(CreateAppointmentRequest {
            service_id: service.id,
            barber_id: barber.id,
            date: *date,
            time: *time,
            customer_name: name.to_string(),
            customer_phone: phone.into_string(),
        })
    }

    pub fn confirm(&self, appointment: Appointment) -> BookingResult<Self> {
        match self {
            Self::ContactDetails { .. } => Ok(Self::Confirmed {
                appointment: Box::new(appointment),
            }),
            _ => Err(out_of_order("confirm")),
        }
    }

    pub fn reset(&self) -> Self {
        Self::ChooseService
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn service(slots: u32) -> ServiceChoice {
        ServiceChoice {
            id: Uuid::new_v4(),
            name: "Maschinenschnitt + Bartrasur".to_string(),
            duration_slots: slots,
        }
    }

    fn barber() -> BarberChoice {
        BarberChoice {
            id: Uuid::new_v4(),
            name: "Ali".to_string(),
        }
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()
    }

    fn monday_morning() -> DateTime<Utc> {
        chrono_tz::Europe::Berlin
            .with_ymd_and_hms(2024, 6, 10, 8, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn booked_at(time: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            barber_id: Uuid::new_v4(),
            service_id: None,
            service_name: "Bartrasur".to_string(),
            date: tuesday(),
            time: time.parse().unwrap(),
            duration_slots: 1,
            status: crate::models::appointment::AppointmentStatus::Booked,
            customer_name: Some("Mara".to_string()),
            customer_phone: Some("+491701234567".to_string()),
            created_at: Utc::now(),
            canceled_at: None,
        }
    }

    fn at_contact_step(slots: u32) -> BookingWizard {
        BookingWizard::new()
            .choose_service(service(slots))
            .unwrap()
            .choose_barber(barber())
            .unwrap()
            .choose_date(tuesday())
            .unwrap()
            .choose_time(
                "10:00".parse().unwrap(),
                &Occupancy::default(),
                &ShopSettings::default(),
                monday_morning(),
            )
            .unwrap()
    }

    #[test]
    fn steps_cannot_be_skipped() {
        let wizard = BookingWizard::new();
        assert!(wizard.choose_barber(barber()).is_err());
        assert!(wizard.choose_date(tuesday()).is_err());
        assert!(wizard.submit("Jonas", "+491512345678", &ShopSettings::default()).is_err());

        let slot_step = wizard
            .choose_service(service(1))
            .unwrap()
            .choose_barber(barber())
            .unwrap();
        // no date picked yet
        let result = slot_step.choose_time(
            "10:00".parse().unwrap(),
            &Occupancy::default(),
            &ShopSettings::default(),
            monday_morning(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn taken_time_cannot_be_chosen() {
        let settings = ShopSettings::default();
        let slot_step = BookingWizard::new()
            .choose_service(service(2))
            .unwrap()
            .choose_barber(barber())
            .unwrap()
            .choose_date(tuesday())
            .unwrap();
        let occupancy = Occupancy::compute(&[booked_at("10:30")], &settings.grid);

        let overlapping = slot_step.choose_time("10:00".parse().unwrap(), &occupancy, &settings, monday_morning());
        assert!(matches!(overlapping, Err(BookingError::Conflict(_))));

        // a two-slot run from 19:00 runs past the last label
        let too_late = slot_step.choose_time("19:00".parse().unwrap(), &occupancy, &settings, monday_morning());
        assert!(too_late.is_err());

        let free = slot_step
            .choose_time("11:00".parse().unwrap(), &occupancy, &settings, monday_morning())
            .unwrap();
        assert_eq!(free.step_number(), 4);
    }

    #[test]
    fn changing_date_drops_time() {
        let wizard = at_contact_step(1);
        let other_day = tuesday().succ_opt().unwrap();
        let next = wizard.choose_date(other_day).unwrap();
        assert!(matches!(
            next,
            BookingWizard::ChooseSlot { date: Some(d), time: None, .. } if d == other_day
        ));
    }

    #[test]
    fn conflicting_refresh_clears_selection() {
        let settings = ShopSettings::default();
        let wizard = at_contact_step(2);
        let BookingWizard::ContactDetails { barber, .. } = &wizard else {
            unreachable!()
        };

        let taken = Appointment {
            barber_id: barber.id,
            ..booked_at("10:30")
        };
        let occupancy = Occupancy::compute(&[taken], &settings.grid);

        let refreshed = wizard.refresh_occupancy(&occupancy, &settings, monday_morning());
        assert_eq!(refreshed.step_number(), 3);
        assert!(matches!(refreshed, BookingWizard::ChooseSlot { time: None, .. }));
    }

    #[test]
    fn unaffected_refresh_keeps_selection() {
        let settings = ShopSettings::default();
        let wizard = at_contact_step(1);
        let refreshed = wizard.refresh_occupancy(&Occupancy::default(), &settings, monday_morning());
        assert_eq!(refreshed, wizard);
    }

    #[test]
    fn submit_normalizes_phone() {
        let request = at_contact_step(1)
            .submit("  Jonas ", "0151 2345678", &ShopSettings::default())
            .unwrap();
        assert_eq!(request.customer_name, "Jonas");
        assert_eq!(request.customer_phone, "+491512345678");
    }

    #[test]
    fn submit_rejects_blank_name() {
        let result = at_contact_step(1).submit(" ", "0151 2345678", &ShopSettings::default());
        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[test]
    fn back_from_contact_keeps_choice() {
        let back = at_contact_step(1).back();
        assert!(matches!(back, BookingWizard::ChooseSlot { time: Some(_), date: Some(_), .. }));
    }
}
