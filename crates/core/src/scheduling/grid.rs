//! The day's grid of bookable time points.

use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{BookingError, BookingResult};

/// Minutes between two consecutive grid points.
pub const SLOT_MINUTES: u32 = 30;

/// One point on the grid, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotLabel(NaiveTime);

impl SlotLabel {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for SlotLabel {
    fn from(time: NaiveTime) -> Self {
        // Seconds never carry meaning on the grid.
        Self(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for SlotLabel {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map(SlotLabel::from)
            .map_err(|_| BookingError::validation(format!("Invalid time '{}', expected HH:MM", s)))
    }
}

impl Serialize for SlotLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Ordered, evenly spaced time labels shared by every barber and every day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    labels: Vec<SlotLabel>,
    interval_minutes: u32,
}

impl TimeGrid {
    /// The shop's grid: 09:00 through 19:00 every 30 minutes.
    pub fn standard() -> Self {
        let first = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        let last = NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::spanning(first, last, SLOT_MINUTES).unwrap_or_else(|_| Self {
            labels: Vec::new(),
            interval_minutes: SLOT_MINUTES,
        })
    }

    /// Builds a grid from `first` to `last` inclusive.
    pub fn spanning(first: NaiveTime, last: NaiveTime, interval_minutes: u32) -> BookingResult<Self> {
        if interval_minutes == 0 {
            return Err(BookingError::validation("Grid interval must be positive"));
        }
        if last < first {
            return Err(BookingError::validation("Grid must end after it starts"));
        }

        let step = Duration::minutes(i64::from(interval_minutes));
        let mut labels = Vec::new();
        let mut current = first;
        while current <= last {
            labels.push(SlotLabel::from(current));
            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            current = next;
        }

        Ok(Self {
            labels,
            interval_minutes,
        })
    }

    /// Builds a grid from explicit labels, which must be strictly increasing
    /// and evenly spaced by `interval_minutes`.
    pub fn from_labels(labels: Vec<SlotLabel>, interval_minutes: u32) -> BookingResult<Self> {
        let step = i64::from(interval_minutes);
        let evenly_spaced = labels
            .windows(2)
            .all(|pair| (pair[1].time() - pair[0].time()).num_minutes() == step);
        if interval_minutes == 0 || !evenly_spaced {
            return Err(BookingError::validation(
                "Grid labels must be increasing and evenly spaced",
            ));
        }
        Ok(Self {
            labels,
            interval_minutes,
        })
    }

    pub fn labels(&self) -> &[SlotLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn position(&self, label: SlotLabel) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }

    pub fn contains(&self, label: SlotLabel) -> bool {
        self.position(label).is_some()
    }

    /// The run of labels a service of `duration_slots` occupies when it starts
    /// at `start`.
    ///
    /// Returns an empty slice when `start` is not on the grid. The run is
    /// truncated at the end of the grid, so callers detect "does not fit" by
    /// comparing the length against the requested duration. A duration of zero
    /// is treated as one slot.
    pub fn required_slots(&self, start: SlotLabel, duration_slots: u32) -> &[SlotLabel] {
        let Some(index) = self.position(start) else {
            return &[];
        };
        let wanted = duration_slots.max(1) as usize;
        let end = (index + wanted).min(self.labels.len());
        &self.labels[index..end]
    }

    /// Whether the full run starting at `start` lies on the grid.
    pub fn fits(&self, start: SlotLabel, duration_slots: u32) -> bool {
        self.required_slots(start, duration_slots).len() == duration_slots.max(1) as usize
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::standard()
    }
}
