//! Catalog search filters.

/// Composable filter for the restaurant catalog.
///
/// Use builder-style methods to chain criteria; each set criterion is
/// rendered as a URL query parameter and combined server-side. An empty
/// filter lists the whole catalog.
///
/// # Examples
///
/// ```
/// use tabletop_rs::models::RestaurantQuery;
///
/// let query = RestaurantQuery::new()
///     .city("Colombo")
///     .cuisine("Seafood")
///     .min_rating(4.0);
/// assert_eq!(query.to_query_pairs().len(), 3);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RestaurantQuery {
    /// Free-text search over name, cuisine, and city.
    pub search: Option<String>,
    /// Exact city filter.
    pub city: Option<String>,
    /// Exact cuisine filter.
    pub cuisine: Option<String>,
    /// Minimum average rating.
    pub min_rating: Option<f64>,
}

impl RestaurantQuery {
    /// Creates an empty query that matches the whole catalog.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to listings matching the free-text term.
    #[inline]
    #[must_use]
    pub fn search<T: Into<String>>(mut self, term: T) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Restricts to listings in the given city.
    #[inline]
    #[must_use]
    pub fn city<T: Into<String>>(mut self, city: T) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Restricts to listings with the given cuisine.
    #[inline]
    #[must_use]
    pub fn cuisine<T: Into<String>>(mut self, cuisine: T) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    /// Restricts to listings rated at least `rating`.
    #[inline]
    #[must_use]
    pub const fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    /// Returns `true` when no criterion is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.city.is_none()
            && self.cuisine.is_none()
            && self.min_rating.is_none()
    }

    /// Renders the set criteria as wire query parameters.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(term) = self.search.as_ref() {
            pairs.push(("search", term.clone()));
        }
        if let Some(city) = self.city.as_ref() {
            pairs.push(("city", city.clone()));
        }
        if let Some(cuisine) = self.cuisine.as_ref() {
            pairs.push(("cuisine", cuisine.clone()));
        }
        if let Some(rating) = self.min_rating {
            pairs.push(("minRating", rating.to_string()));
        }
        pairs
    }
}
