//! Restaurant catalog entities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RestaurantId;
use crate::error::{Result, TableTopError};

/// A restaurant listing.
///
/// Read-mostly: the catalog is owned and mutated exclusively by the
/// backend. Clients only read it; admin identities may submit
/// [`RestaurantDraft`] create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Unique identifier.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Cuisine label (e.g. "Sri Lankan", "Seafood").
    pub cuisine: String,
    /// City the restaurant is located in.
    pub city: String,
    /// Street address.
    pub address: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Price tier label (e.g. "$$").
    #[serde(default)]
    pub price_range: Option<String>,
    /// Average rating in `[0, 5]`, absent when unrated.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Image reference.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Amenity labels.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Opening hours keyed by day name.
    #[serde(default)]
    pub opening_hours: Option<BTreeMap<String, String>>,
}

/// Payload for admin create/update requests on the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDraft {
    /// Display name.
    pub name: String,
    /// Cuisine label.
    pub cuisine: String,
    /// City.
    pub city: String,
    /// Street address.
    pub address: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Rating in `[0, 5]`, absent when unrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Price tier label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RestaurantDraft {
    /// Validates the draft before submission.
    ///
    /// The only client-side invariants are a non-empty name and the
    /// rating bound `[0, 5]`; everything else is the server's call.
    ///
    /// # Errors
    ///
    /// Returns [`TableTopError::Policy`] when a bound is violated.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TableTopError::Policy(
                "restaurant name must not be empty".to_owned(),
            ));
        }
        if let Some(rating) = self.rating
            && !(0.0..=5.0).contains(&rating)
        {
            return Err(TableTopError::Policy(format!(
                "rating {rating} outside the allowed range 0..=5"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_restaurant() {
        let json = r#"{
            "id": 7,
            "name": "Ministry of Crab",
            "cuisine": "Seafood",
            "city": "Colombo",
            "address": "Old Dutch Hospital",
            "phone": "+94 11 234 2722",
            "priceRange": "$$$",
            "rating": 4.8,
            "description": "Famous for lagoon crab.",
            "imageUrl": "https://example.com/crab.jpg",
            "amenities": ["Outdoor Seating", "Bar"],
            "openingHours": {"monday": "11:30-23:00", "sunday": "11:30-22:00"}
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.id, RestaurantId::new(7));
        assert_eq!(restaurant.cuisine, "Seafood");
        assert_eq!(restaurant.rating, Some(4.8));
        assert_eq!(restaurant.amenities.len(), 2);
        let hours = restaurant.opening_hours.unwrap();
        assert_eq!(hours.get("monday").map(String::as_str), Some("11:30-23:00"));
    }

    #[test]
    fn deserialize_minimal_restaurant() {
        let json = r#"{
            "id": 1,
            "name": "Upali's",
            "cuisine": "Sri Lankan",
            "city": "Colombo",
            "address": "65 C.W.W. Kannangara Mawatha"
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert!(restaurant.rating.is_none());
        assert!(restaurant.amenities.is_empty());
        assert!(restaurant.opening_hours.is_none());
    }

    #[test]
    fn serialize_roundtrip() {
        let restaurant = Restaurant {
            id: RestaurantId::new(3),
            name: "Kaema Sutra".to_owned(),
            cuisine: "Sri Lankan".to_owned(),
            city: "Colombo".to_owned(),
            address: "Shangri-La Hotel".to_owned(),
            phone: None,
            price_range: Some("$$$".to_owned()),
            rating: Some(4.2),
            description: None,
            image_url: None,
            amenities: vec!["Valet".to_owned()],
            opening_hours: None,
        };
        let json = serde_json::to_string(&restaurant).unwrap();
        assert!(json.contains(r#""priceRange":"$$$""#));
        let deserialized: Restaurant = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, restaurant);
    }

    fn draft(name: &str, rating: Option<f64>) -> RestaurantDraft {
        RestaurantDraft {
            name: name.to_owned(),
            cuisine: "Thai".to_owned(),
            city: "Kandy".to_owned(),
            address: "1 Temple Street".to_owned(),
            rating,
            ..RestaurantDraft::default()
        }
    }

    #[test]
    fn draft_valid() {
        assert!(draft("Siam House", Some(4.5)).validate().is_ok());
        assert!(draft("Siam House", None).validate().is_ok());
        assert!(draft("Siam House", Some(0.0)).validate().is_ok());
        assert!(draft("Siam House", Some(5.0)).validate().is_ok());
    }

    #[test]
    fn draft_rejects_out_of_range_rating() {
        let err = draft("Siam House", Some(5.1)).validate().unwrap_err();
        assert!(matches!(err, TableTopError::Policy(_)));
        assert!(draft("Siam House", Some(-0.1)).validate().is_err());
    }

    #[test]
    fn draft_rejects_empty_name() {
        let err = draft("   ", None).validate().unwrap_err();
        assert!(matches!(err, TableTopError::Policy(_)));
    }

    #[test]
    fn draft_skips_absent_optionals() {
        let json = serde_json::to_string(&draft("Siam House", None)).unwrap();
        assert!(!json.contains("rating"));
        assert!(!json.contains("imageUrl"));
    }
}
