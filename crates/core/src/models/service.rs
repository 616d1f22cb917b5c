use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    scheduling::grid::SLOT_MINUTES,
};

/// Durations offered when an admin creates or edits a service.
pub const DURATION_OPTIONS: [u32; 8] = [10, 15, 20, 30, 45, 60, 75, 90];

/// Shortest service an admin may create.
pub const MIN_DURATION_MINUTES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    /// Display price, e.g. `12€`
    pub price: String,
    pub description: Option<String>,
    pub duration_slots: u32,
    pub duration_minutes: u32,
    pub is_combined: bool,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A service duration kept consistent in both minutes and grid slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDuration {
    pub minutes: u32,
    pub slots: u32,
}

impl ServiceDuration {
    /// Rounds minutes up to whole grid slots.
    pub fn from_minutes(minutes: u32) -> BookingResult<Self> {
        if minutes < MIN_DURATION_MINUTES {
            return Err(BookingError::validation(format!(
                "Duration must be at least {} minutes",
                MIN_DURATION_MINUTES
            )));
        }
        Ok(Self {
            minutes,
            slots: minutes.div_ceil(SLOT_MINUTES),
        })
    }

    pub fn from_slots(slots: u32) -> Self {
        let slots = slots.max(1);
        Self {
            minutes: slots * SLOT_MINUTES,
            slots,
        }
    }
}

/// Filter for catalog listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceFilter {
    /// Only services this barber offers
    pub barber_id: Option<Uuid>,
}

/// Validated fields for inserting or updating a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    pub name: String,
    pub price: String,
    pub description: Option<String>,
    pub duration: ServiceDuration,
    pub is_combined: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    pub price: String,
    pub description: Option<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub is_combined: bool,
}

impl ServiceRequest {
    pub fn into_draft(self) -> BookingResult<ServiceDraft> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(BookingError::validation("Service name is required"));
        }
        let price = normalize_price(&self.price)?;
        if !DURATION_OPTIONS.contains(&self.duration_minutes) {
            return Err(BookingError::validation(format!(
                "Duration must be one of {:?} minutes",
                DURATION_OPTIONS
            )));
        }
        let duration = ServiceDuration::from_minutes(self.duration_minutes)?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(ServiceDraft {
            name,
            price,
            description,
            duration,
            is_combined: self.is_combined,
        })
    }
}

/// Keeps digits and decimal separators and appends the euro sign.
pub fn normalize_price(raw: &str) -> BookingResult<String> {
    let amount: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if !amount.chars().any(|c| c.is_ascii_digit()) {
        return Err(BookingError::validation("Service price is required"));
    }
    Ok(format!("{}€", amount))
}
