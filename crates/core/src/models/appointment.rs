use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::BookingError, scheduling::grid::SlotLabel};

/// Service name recorded on admin-created blocks.
pub const BLOCK_SERVICE_NAME: &str = "Blocked slot";
/// Customer name recorded on admin-created blocks.
pub const BLOCK_CUSTOMER_NAME: &str = "Blocked";
/// Phone placeholder recorded on admin-created blocks.
pub const BLOCK_PHONE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Blocked,
    Canceled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Blocked => "blocked",
            AppointmentStatus::Canceled => "canceled",
        }
    }

    /// Booked and blocked appointments hold grid slots; canceled ones do not.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Canceled)
    }

    /// Reads a stored status. Rows written before the status column existed
    /// carry no value and count as booked.
    pub fn from_stored(raw: Option<&str>) -> Result<Self, BookingError> {
        match raw {
            None => Ok(AppointmentStatus::Booked),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "booked" => Ok(AppointmentStatus::Booked),
            "blocked" => Ok(AppointmentStatus::Blocked),
            "canceled" | "cancelled" => Ok(AppointmentStatus::Canceled),
            other => Err(BookingError::Internal(
                format!("Unknown appointment status '{}'", other).into(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Option<Uuid>,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: SlotLabel,
    pub duration_slots: u32,
    pub status: AppointmentStatus,
    pub customer_name: Option<String>,
    /// Normalized international number; the block placeholder for blocks
    pub customer_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether this appointment sits at the same barber, day and start time.
    pub fn is_placed_at(&self, barber_id: Uuid, date: NaiveDate, time: SlotLabel) -> bool {
        self.barber_id == barber_id && self.date == date && self.time == time
    }
}

/// Fields of an appointment about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub barber_id: Uuid,
    pub service_id: Option<Uuid>,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: SlotLabel,
    pub duration_slots: u32,
    pub status: AppointmentStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

impl NewAppointment {
    /// A one-slot manual block.
    pub fn block(barber_id: Uuid, date: NaiveDate, time: SlotLabel) -> Self {
        Self {
            barber_id,
            service_id: None,
            service_name: BLOCK_SERVICE_NAME.to_string(),
            date,
            time,
            duration_slots: 1,
            status: AppointmentStatus::Blocked,
            customer_name: Some(BLOCK_CUSTOMER_NAME.to_string()),
            customer_phone: Some(BLOCK_PHONE.to_string()),
        }
    }
}

/// Replacement fields for an admin edit or move. Status is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentChanges {
    pub barber_id: Uuid,
    pub service_id: Option<Uuid>,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: SlotLabel,
    pub duration_slots: u32,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub service_id: Uuid,
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub time: SlotLabel,
    pub customer_name: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    /// New service; keeps the current service and duration when absent
    pub service_id: Option<Uuid>,
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub time: SlotLabel,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSlotRequest {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub time: SlotLabel,
}
