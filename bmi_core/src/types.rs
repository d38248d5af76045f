//! Core domain types for the BMI tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Weight-status bands
//! - Validated measurements and computation results
//! - History entries as read back from the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Classification
// ============================================================================

/// Weight-status band derived from a rounded BMI value
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeightStatus {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl WeightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightStatus::Underweight => "Underweight",
            WeightStatus::Healthy => "Healthy",
            WeightStatus::Overweight => "Overweight",
            WeightStatus::Obese => "Obese",
        }
    }
}

impl fmt::Display for WeightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Measurement and Result Types
// ============================================================================

/// A measurement that passed validation.
///
/// Keeps the raw field text alongside the parsed numbers so the label can
/// echo exactly what the user typed.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub weight: f64,
    pub height: f64,
    pub weight_text: String,
    pub height_text: String,
}

/// Outcome of a BMI computation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BmiResult {
    /// BMI rounded to one fractional digit
    pub bmi: f64,
    /// `None` only for values that fall between two bands
    pub status: Option<WeightStatus>,
    /// `"<bmi> (W:<weight>, H:<height>)"`
    pub label: String,
}

// ============================================================================
// History Types
// ============================================================================

/// Store-assigned identifier of a history entry
pub type EntryId = i64;

/// One recorded computation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    /// Always false on creation; only drives display colouring
    pub done: bool,
    pub value: String,
    /// Julian day at insertion
    pub created_at: f64,
    /// Calendar date (`YYYY-MM-DD`) of `created_at`
    pub date: String,
}

/// Julian day of the Unix epoch
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

impl HistoryEntry {
    /// Creation time as a UTC timestamp, millisecond precision
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        julian_day_to_utc(self.created_at)
    }
}

/// Convert a Julian day number into a UTC timestamp
pub fn julian_day_to_utc(julian_day: f64) -> Option<DateTime<Utc>> {
    if !julian_day.is_finite() {
        return None;
    }
    let millis = ((julian_day - UNIX_EPOCH_JULIAN_DAY) * MILLIS_PER_DAY).round();
    DateTime::from_timestamp_millis(millis as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_status_display() {
        assert_eq!(WeightStatus::Underweight.to_string(), "Underweight");
        assert_eq!(WeightStatus::Obese.to_string(), "Obese");
    }

    #[test]
    fn test_julian_day_epoch() {
        let dt = julian_day_to_utc(2_440_587.5).unwrap();
        assert_eq!(dt.timestamp(), 0);
    }

    #[test]
    fn test_julian_day_noon() {
        // 2000-01-01T12:00:00Z is J2000.0
        let dt = julian_day_to_utc(2_451_545.0).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2000, 1, 1));
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_julian_day_non_finite() {
        assert!(julian_day_to_utc(f64::NAN).is_none());
    }
}
