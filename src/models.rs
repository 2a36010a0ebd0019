//! Data models for TableTop API entities.
//!
//! This module contains strongly-typed representations of all TableTop
//! entities, newtype ID wrappers, and enumeration types for constrained
//! values.

mod booking;
mod identity;
mod ids;
mod restaurant;
mod review;
mod search;

pub use booking::{Booking, BookingPolicy, BookingRequest, BookingStatus};
pub use identity::{Identity, LoginRequest, RegisterRequest, Role};
pub use ids::{BookingId, RestaurantId, ReviewId, UserId};
pub use restaurant::{Restaurant, RestaurantDraft};
pub use review::{Review, ReviewDraft, ReviewStats};
pub use search::RestaurantQuery;

/// Re-exported date type used for booking dates.
pub use chrono::NaiveDate;
/// Re-exported time type used for booking times.
pub use chrono::NaiveTime;
