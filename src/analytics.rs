//! Pure aggregation for the admin analytics dashboard.
//!
//! The backend only provides the raw catalog, the full booking list,
//! and a top-rated feed; the dashboard figures (most-booked ranking,
//! totals, average rating) are derived client-side from those.

use std::collections::HashMap;

use crate::models::{Booking, Restaurant, RestaurantId};

/// How many entries the ranked lists keep.
const TOP_N: usize = 5;

/// A restaurant annotated with how often it was booked.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRestaurant {
    /// The ranked restaurant.
    pub restaurant: Restaurant,
    /// Number of bookings across all statuses.
    pub booking_count: u64,
}

/// Aggregated dashboard figures.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    /// Catalog size.
    pub total_restaurants: usize,
    /// Total bookings across all users and statuses.
    pub total_bookings: usize,
    /// Mean catalog rating; unrated listings count as zero, `None` for
    /// an empty catalog.
    pub average_rating: Option<f64>,
    /// Head of the server's top-rated feed.
    pub top_rated: Vec<Restaurant>,
    /// Restaurants ranked by booking count, descending.
    pub most_booked: Vec<RankedRestaurant>,
}

/// Divides a rating sum by a catalog size.
#[allow(
    clippy::cast_precision_loss,
    reason = "catalog sizes are far below f64 precision limits"
)]
fn mean(sum: f64, count: usize) -> f64 {
    sum / count as f64
}

impl AnalyticsSummary {
    /// Computes the dashboard figures from raw feeds.
    ///
    /// `top_rated` is the server's analytics feed and is trusted as-is
    /// (only truncated); the most-booked ranking is derived from the
    /// booking list, ties broken by restaurant id for determinism.
    #[must_use]
    pub fn compute(
        restaurants: &[Restaurant],
        bookings: &[Booking],
        top_rated: &[Restaurant],
    ) -> Self {
        let average_rating = if restaurants.is_empty() {
            None
        } else {
            let sum: f64 = restaurants
                .iter()
                .map(|restaurant| restaurant.rating.unwrap_or(0.0))
                .sum();
            Some(mean(sum, restaurants.len()))
        };

        let mut counts: HashMap<RestaurantId, u64> = HashMap::new();
        for booking in bookings {
            *counts.entry(booking.restaurant_id).or_insert(0) += 1;
        }

        let mut most_booked: Vec<RankedRestaurant> = restaurants
            .iter()
            .filter_map(|restaurant| {
                counts.get(&restaurant.id).map(|&booking_count| RankedRestaurant {
                    restaurant: restaurant.clone(),
                    booking_count,
                })
            })
            .collect();
        most_booked.sort_by(|a, b| {
            b.booking_count
                .cmp(&a.booking_count)
                .then(a.restaurant.id.cmp(&b.restaurant.id))
        });
        most_booked.truncate(TOP_N);

        Self {
            total_restaurants: restaurants.len(),
            total_bookings: bookings.len(),
            average_rating,
            top_rated: top_rated.iter().take(TOP_N).cloned().collect(),
            most_booked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingId, BookingStatus, UserId};
    use chrono::{NaiveDate, NaiveTime};

    fn restaurant(id: i64, rating: Option<f64>) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: format!("Restaurant {id}"),
            cuisine: "Sri Lankan".to_owned(),
            city: "Colombo".to_owned(),
            address: "1 Main Street".to_owned(),
            phone: None,
            price_range: None,
            rating,
            description: None,
            image_url: None,
            amenities: Vec::new(),
            opening_hours: None,
        }
    }

    fn booking(id: i64, restaurant_id: i64) -> Booking {
        Booking {
            id: BookingId::new(id),
            user_id: UserId::new(1),
            restaurant_id: RestaurantId::new(restaurant_id),
            date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size: 2,
            special_requests: None,
            status: BookingStatus::Pending,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn empty_inputs() {
        let summary = AnalyticsSummary::compute(&[], &[], &[]);
        assert_eq!(summary.total_restaurants, 0);
        assert_eq!(summary.total_bookings, 0);
        assert!(summary.average_rating.is_none());
        assert!(summary.top_rated.is_empty());
        assert!(summary.most_booked.is_empty());
    }

    #[test]
    fn average_counts_unrated_as_zero() {
        let catalog = [restaurant(1, Some(4.0)), restaurant(2, None)];
        let summary = AnalyticsSummary::compute(&catalog, &[], &[]);
        assert_eq!(summary.average_rating, Some(2.0));
    }

    #[test]
    fn most_booked_ranks_by_count() {
        let catalog = [
            restaurant(1, Some(4.0)),
            restaurant(2, Some(3.0)),
            restaurant(3, Some(5.0)),
        ];
        let bookings = [
            booking(1, 2),
            booking(2, 2),
            booking(3, 2),
            booking(4, 1),
            booking(5, 1),
            booking(6, 3),
        ];
        let summary = AnalyticsSummary::compute(&catalog, &bookings, &[]);
        assert_eq!(summary.total_bookings, 6);
        let ids: Vec<i64> = summary
            .most_booked
            .iter()
            .map(|ranked| ranked.restaurant.id.into_inner())
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(summary.most_booked.first().unwrap().booking_count, 3);
    }

    #[test]
    fn most_booked_keeps_top_five() {
        let catalog: Vec<Restaurant> = (1..=7).map(|id| restaurant(id, None)).collect();
        let bookings: Vec<Booking> = (1..=7).map(|id| booking(id, id)).collect();
        let summary = AnalyticsSummary::compute(&catalog, &bookings, &[]);
        assert_eq!(summary.most_booked.len(), 5);
        // Equal counts fall back to id order.
        let ids: Vec<i64> = summary
            .most_booked
            .iter()
            .map(|ranked| ranked.restaurant.id.into_inner())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn bookings_for_unknown_restaurants_still_count_in_total() {
        let catalog = [restaurant(1, None)];
        let bookings = [booking(1, 99)];
        let summary = AnalyticsSummary::compute(&catalog, &bookings, &[]);
        assert_eq!(summary.total_bookings, 1);
        assert!(summary.most_booked.is_empty());
    }

    #[test]
    fn top_rated_feed_is_truncated_not_resorted() {
        let feed: Vec<Restaurant> = (1..=7).map(|id| restaurant(id, Some(4.0))).collect();
        let summary = AnalyticsSummary::compute(&[], &[], &feed);
        assert_eq!(summary.top_rated.len(), 5);
        assert_eq!(summary.top_rated.first().unwrap().id, RestaurantId::new(1));
    }
}
