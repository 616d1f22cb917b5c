use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    pub id: Uuid,
    pub name: String,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBarberRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBarberRequest {
    pub name: Option<String>,
    pub display_order: Option<i32>,
}

impl UpdateBarberRequest {
    pub fn into_changes(self) -> BookingResult<BarberChanges> {
        let name = self.name.as_deref().map(clean_barber_name).transpose()?;
        Ok(BarberChanges {
            name,
            display_order: self.display_order,
        })
    }
}

/// Validated barber fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarberChanges {
    pub name: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetBarberServicesRequest {
    pub service_ids: Vec<Uuid>,
}

/// Trims a barber name and rejects blank ones.
pub fn clean_barber_name(raw: &str) -> BookingResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(BookingError::validation("Barber name is required"));
    }
    Ok(name.to_string())
}

/// Display order for a newly appended entry: one past the current maximum.
pub fn next_display_order<I>(existing: I) -> i32
where
    I: IntoIterator<Item = Option<i32>>,
{
    existing
        .into_iter()
        .map(|order| order.unwrap_or(0))
        .max()
        .unwrap_or(0)
        + 1
}
