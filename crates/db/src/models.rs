use barbershop_core::{
    errors::BookingError,
    models::{
        appointment::{Appointment, AppointmentStatus},
        barber::Barber,
        service::Service,
    },
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBarber {
    pub id: Uuid,
    pub name: String,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<DbBarber> for Barber {
    fn from(row: DbBarber) -> Self {
        Barber {
            id: row.id,
            name: row.name,
            display_order: row.display_order,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub price: String,
    pub description: Option<String>,
    pub duration_slots: i32,
    pub duration_minutes: Option<i32>,
    pub is_combined: Option<bool>,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        let duration_slots = row.duration_slots.max(1) as u32;
        Service {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            duration_slots,
            // Rows created before minutes were tracked only know their slots.
            duration_minutes: row
                .duration_minutes
                .map(|m| m.max(0) as u32)
                .unwrap_or(duration_slots * 30),
            is_combined: row.is_combined.unwrap_or(false),
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Option<Uuid>,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_slots: Option<i32>,
    pub status: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = BookingError;

    fn try_from(row: DbAppointment) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: row.id,
            barber_id: row.barber_id,
            service_id: row.service_id,
            service_name: row.service_name,
            date: row.date,
            time: row.time.into(),
            // Missing or non-positive durations count as one slot.
            duration_slots: row.duration_slots.unwrap_or(1).max(1) as u32,
            status: AppointmentStatus::from_stored(row.status.as_deref())?,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            created_at: row.created_at,
            canceled_at: row.canceled_at,
        })
    }
}

/// Converts a batch of rows. Unreadable rows are logged and left out, so one
/// bad row never hides the rest of a barber's day.
pub fn into_appointments(rows: Vec<DbAppointment>) -> Vec<Appointment> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Appointment::try_from(row) {
                Ok(appointment) => Some(appointment),
                Err(e) => {
                    warn!("Skipping unreadable appointment {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}
