//! Review entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RestaurantId, ReviewId, UserId};

/// A diner's review of a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique identifier.
    pub id: ReviewId,
    /// Author.
    pub user_id: UserId,
    /// Reviewed restaurant.
    pub restaurant_id: RestaurantId,
    /// Star rating in `[0, 5]`.
    pub rating: f64,
    /// Review text.
    #[serde(default)]
    pub comment: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    /// Author.
    pub user_id: UserId,
    /// Reviewed restaurant.
    pub restaurant_id: RestaurantId,
    /// Star rating in `[0, 5]`.
    pub rating: f64,
    /// Review text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Aggregate rating statistics for one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Number of reviews.
    pub review_count: u64,
    /// Mean rating, absent when there are no reviews.
    #[serde(default)]
    pub average_rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_review() {
        let json = r#"{
            "id": 5,
            "userId": 1,
            "restaurantId": 7,
            "rating": 4.0,
            "comment": "Crab was excellent.",
            "createdAt": "2026-07-01T12:00:00Z"
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.id, ReviewId::new(5));
        assert_eq!(review.rating, 4.0);
        assert_eq!(review.comment.as_deref(), Some("Crab was excellent."));
    }

    #[test]
    fn draft_serializes_camel_case() {
        let draft = ReviewDraft {
            user_id: UserId::new(1),
            restaurant_id: RestaurantId::new(7),
            rating: 5.0,
            comment: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains(r#""restaurantId":7"#));
        assert!(!json.contains("comment"));
    }

    #[test]
    fn stats_roundtrip() {
        let stats = ReviewStats {
            review_count: 12,
            average_rating: Some(4.3),
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains(r#""reviewCount":12"#));
        let deserialized: ReviewStats = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, stats);
    }

    #[test]
    fn stats_without_average() {
        let stats: ReviewStats = serde_json::from_str(r#"{"reviewCount":0}"#).unwrap();
        assert_eq!(stats.review_count, 0);
        assert!(stats.average_rating.is_none());
    }
}
