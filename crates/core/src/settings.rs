//! Business settings shared by every scheduling decision.
//!
//! The shop has a single fixed timezone, a home country code for national
//! phone numbers and a set of weekdays on which it is closed. The time grid is
//! the process-wide constant from [`TimeGrid::standard`].

use std::env;

use chrono::Weekday;
use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};

use crate::scheduling::grid::TimeGrid;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;
pub const DEFAULT_COUNTRY_CODE: &str = "49";

#[derive(Debug, Clone)]
pub struct ShopSettings {
    /// Bookable time points, identical for every barber and every day
    pub grid: TimeGrid,

    /// Timezone used to turn a (date, time) pair into an absolute instant
    pub timezone: Tz,

    /// Country calling code assumed for numbers entered in national format
    pub home_country_code: String,

    /// Weekdays on which no slot is bookable
    pub closed_weekdays: Vec<Weekday>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            grid: TimeGrid::standard(),
            timezone: DEFAULT_TIMEZONE,
            home_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            closed_weekdays: vec![Weekday::Sun],
        }
    }
}

impl ShopSettings {
    /// Loads settings from `SHOP_TIMEZONE`, `SHOP_COUNTRY_CODE` and
    /// `SHOP_CLOSED_DAYS`, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let timezone = match env::var("SHOP_TIMEZONE") {
            Ok(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| eyre!("Invalid SHOP_TIMEZONE value: {}", e))?,
            Err(_) => defaults.timezone,
        };

        let home_country_code = match env::var("SHOP_COUNTRY_CODE") {
            Ok(code) => parse_country_code(&code)?,
            Err(_) => defaults.home_country_code,
        };

        let closed_weekdays = match env::var("SHOP_CLOSED_DAYS") {
            Ok(days) => parse_weekdays(&days).wrap_err("Invalid SHOP_CLOSED_DAYS value")?,
            Err(_) => defaults.closed_weekdays,
        };

        Ok(Self {
            grid: defaults.grid,
            timezone,
            home_country_code,
            closed_weekdays,
        })
    }

    pub fn is_closed(&self, weekday: Weekday) -> bool {
        self.closed_weekdays.contains(&weekday)
    }
}

fn parse_country_code(raw: &str) -> Result<String> {
    let code = raw.trim().trim_start_matches('+');
    let valid = !code.is_empty()
        && code.len() <= 3
        && code.chars().all(|c| c.is_ascii_digit())
        && !code.starts_with('0');
    if !valid {
        return Err(eyre!("Invalid SHOP_COUNTRY_CODE value: {}", raw));
    }
    Ok(code.to_string())
}

/// Parses a comma-separated weekday list such as `sat,sun`. An empty string
/// means the shop never closes.
pub fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| eyre!("Unknown weekday: {}", s))
        })
        .collect()
}
