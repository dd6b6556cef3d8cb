use crate::domain::errors::{DomainError, DomainResult};
use chrono::NaiveTime;

/// Parse a booking time as entered on a form. Time inputs produce `HH:MM`;
/// the API stores second precision, so a missing seconds component is zero.
pub fn parse_booking_time(value: &str) -> DomainResult<NaiveTime> {
    let trimmed = value.trim();
    let normalized = if trimmed.len() == 5 {
        format!("{}:00", trimmed)
    } else {
        trimmed.to_string()
    };

    NaiveTime::parse_from_str(&normalized, "%H:%M:%S")
        .map_err(|_| DomainError::Validation(format!("Invalid booking time: {}", value)))
}
