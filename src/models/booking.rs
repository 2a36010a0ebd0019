//! Booking entities, status machine, and submission policy.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, RestaurantId, UserId};
use crate::error::{Result, TableTopError};

/// Serde adapter for `"HH:MM"` wire times.
///
/// The backend exchanges booking times as bare hour-minute strings
/// (`"19:00"`), not the `"19:00:00"` form chrono emits by default.
mod hm_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Wire format for booking times.
    const FORMAT: &str = "%H:%M";

    /// Serializes a time as `"HH:MM"`.
    pub(super) fn serialize<S: Serializer>(
        time: &NaiveTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    /// Deserializes a `"HH:MM"` time, tolerating a seconds component.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Status of a booking.
///
/// Transitions are server-confirmed only: `Pending → Confirmed →
/// Completed`, with cancellation reachable from `Pending` and
/// `Confirmed`. `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Submitted, awaiting restaurant confirmation.
    Pending,
    /// Confirmed by the restaurant.
    Confirmed,
    /// The reservation took place.
    Completed,
    /// Cancelled by the owner before completion.
    Cancelled,
}

impl BookingStatus {
    /// Returns `true` for states with no outgoing transitions.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Returns `true` if the owner may still request cancellation.
    #[inline]
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// A table reservation tied to one identity and one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// Owning user.
    pub user_id: UserId,
    /// Booked restaurant.
    pub restaurant_id: RestaurantId,
    /// Reservation date.
    pub date: NaiveDate,
    /// Reservation time (`"HH:MM"` on the wire).
    #[serde(with = "hm_time")]
    pub time: NaiveTime,
    /// Number of guests.
    pub party_size: u32,
    /// Free-text requests (dietary, seating, ...).
    #[serde(default)]
    pub special_requests: Option<String>,
    /// Current status.
    pub status: BookingStatus,
    /// Creation timestamp, set by the server.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last status-change timestamp, set by the server.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Owning user.
    pub user_id: UserId,
    /// Restaurant to book.
    pub restaurant_id: RestaurantId,
    /// Reservation date.
    pub date: NaiveDate,
    /// Reservation time (`"HH:MM"` on the wire).
    #[serde(with = "hm_time")]
    pub time: NaiveTime,
    /// Number of guests.
    pub party_size: u32,
    /// Free-text requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// Client-side submission policy for new bookings.
///
/// The observed bounds (party of 1..=10, dates up to three months out)
/// are UI conveniences rather than documented server rules, so they are
/// configurable here instead of being hard-wired. Violations are
/// rejected before any network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Smallest accepted party size.
    pub min_party_size: u32,
    /// Largest accepted party size.
    pub max_party_size: u32,
    /// How far ahead (in calendar months from today) a booking may be.
    pub max_months_ahead: u32,
}

impl Default for BookingPolicy {
    #[inline]
    fn default() -> Self {
        Self {
            min_party_size: 1,
            max_party_size: 10,
            max_months_ahead: 3,
        }
    }
}

impl BookingPolicy {
    /// Checks a submission against the policy.
    ///
    /// `today` is passed in explicitly so the window is testable and so
    /// callers in other time zones can supply their local date.
    ///
    /// # Errors
    ///
    /// Returns [`TableTopError::Policy`] describing the violated bound.
    pub fn validate(&self, date: NaiveDate, party_size: u32, today: NaiveDate) -> Result<()> {
        if party_size == 0 {
            return Err(TableTopError::Policy(
                "party size must be a positive integer".to_owned(),
            ));
        }
        if party_size < self.min_party_size || party_size > self.max_party_size {
            return Err(TableTopError::Policy(format!(
                "party size {party_size} outside the supported range {}..={}",
                self.min_party_size, self.max_party_size
            )));
        }
        if date < today {
            return Err(TableTopError::Policy(
                "booking date must not be in the past".to_owned(),
            ));
        }
        let horizon = today
            .checked_add_months(Months::new(self.max_months_ahead))
            .ok_or_else(|| {
                TableTopError::Policy("booking window end overflows the calendar".to_owned())
            })?;
        if date > horizon {
            return Err(TableTopError::Policy(format!(
                "booking date {date} beyond the allowed window ending {horizon}"
            )));
        }
        Ok(())
    }
}
