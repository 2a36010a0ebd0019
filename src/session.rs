//! In-memory session store — the single source of truth for the active
//! identity.
//!
//! Every component reads the signed-in [`Identity`] through this store
//! and writes updates back through its contract; nothing else may hold
//! its own copy of role, token, or favorites beyond a single render.
//! The store also carries the cached booking-list projection, which
//! lives and dies with the identity and is never persisted.

use std::sync::Mutex;

use secrecy::ExposeSecret;

use crate::error::{Result, TableTopError};
use crate::models::{Booking, BookingId, Identity, RestaurantId};

/// Partial update applied to the active identity.
///
/// Only the patchable projection fields are present; the credential
/// token and the role are never touched by an update.
#[derive(Debug, Default, Clone)]
pub struct SessionPatch {
    /// New given name, if changed.
    pub first_name: Option<String>,
    /// New family name, if changed.
    pub last_name: Option<String>,
    /// Replacement favorites projection (server-derived, never spliced
    /// locally).
    pub favorites: Option<Vec<RestaurantId>>,
}

impl SessionPatch {
    /// Creates an empty patch.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the given name.
    #[inline]
    #[must_use]
    pub fn first_name<T: Into<String>>(mut self, name: T) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the family name.
    #[inline]
    #[must_use]
    pub fn last_name<T: Into<String>>(mut self, name: T) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Replaces the favorites projection.
    #[inline]
    #[must_use]
    pub fn favorites(mut self, ids: Vec<RestaurantId>) -> Self {
        self.favorites = Some(ids);
        self
    }
}

/// Thread-safe holder of the session state.
///
/// At most one identity is active at a time. The store is mutated only
/// by login, logout, the global 401 clear, and favorites/booking-list
/// refreshes.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// All state behind a single mutex.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// The active identity, if any.
    identity: Option<Identity>,
    /// Cached booking-list projection for the active identity.
    bookings: Option<Vec<Booking>>,
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> TableTopError {
    TableTopError::Storage(err.to_string().into())
}

impl SessionStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }

    /// Returns a copy of the active identity, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[inline]
    pub fn get(&self) -> Result<Option<Identity>> {
        self.with_lock(|inner| inner.identity.clone())
    }

    /// Installs a new identity, dropping any cached projections of the
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[inline]
    pub fn set(&self, identity: Identity) -> Result<()> {
        self.with_lock(|inner| {
            inner.identity = Some(identity);
            inner.bookings = None;
        })
    }

    /// Clears all session state (logout or forced 401 clear).
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[inline]
    pub fn clear(&self) -> Result<()> {
        self.with_lock(|inner| *inner = Inner::default())
    }

    /// Merges a patch into the active identity and returns the result.
    ///
    /// The credential token is preserved; only name parts and the
    /// favorites projection can change.
    ///
    /// # Errors
    ///
    /// Returns [`TableTopError::Precondition`] when no identity is
    /// active, or a storage error if the lock is poisoned.
    pub fn update(&self, patch: SessionPatch) -> Result<Identity> {
        self.with_lock(|inner| {
            let identity = inner
                .identity
                .as_mut()
                .ok_or(TableTopError::Precondition(
                    "session update requires an active identity",
                ))?;
            if let Some(name) = patch.first_name {
                identity.first_name = name;
            }
            if let Some(name) = patch.last_name {
                identity.last_name = name;
            }
            if let Some(ids) = patch.favorites {
                identity.favorites = ids;
            }
            Ok(identity.clone())
        })?
    }

    /// Exposes the bearer token of the active identity.
    ///
    /// Used solely to build the `Authorization` header of outbound
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[inline]
    pub fn token(&self) -> Result<Option<String>> {
        self.with_lock(|inner| {
            inner
                .identity
                .as_ref()
                .map(|identity| identity.token.expose_secret().to_owned())
        })
    }

    /// Returns the cached favorite-id projection, or `None` when no
    /// identity is active.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[inline]
    pub fn favorite_ids(&self) -> Result<Option<Vec<RestaurantId>>> {
        self.with_lock(|inner| {
            inner
                .identity
                .as_ref()
                .map(|identity| identity.favorites.clone())
        })
    }

    /// Returns the cached booking projection, if one has been loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[inline]
    pub fn bookings(&self) -> Result<Option<Vec<Booking>>> {
        self.with_lock(|inner| inner.bookings.clone())
    }

    /// Replaces the cached booking projection wholesale (list refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[inline]
    pub fn set_bookings(&self, bookings: Vec<Booking>) -> Result<()> {
        self.with_lock(|inner| inner.bookings = Some(bookings))
    }

    /// Replaces the single cached booking with a matching id.
    ///
    /// The replacement is keyed strictly on [`BookingId`]; when the
    /// booking is not cached (or no list has been loaded) the cache is
    /// left untouched and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn replace_booking(&self, updated: &Booking) -> Result<bool> {
        self.with_lock(|inner| {
            let Some(bookings) = inner.bookings.as_mut() else {
                return false;
            };
            match bookings.iter_mut().find(|b| b.id == updated.id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => {
                    tracing::debug!(booking = %updated.id, "booking not cached, skipping replace");
                    false
                }
            }
        })
    }

    /// Convenience lookup: id of the cached booking, by position.
    ///
    /// Returns `None` when nothing is cached. Present for view code
    /// that renders from the projection.
    #[inline]
    pub fn booking_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        self.with_lock(|inner| {
            inner
                .bookings
                .as_ref()
                .and_then(|bookings| bookings.iter().find(|b| b.id == id).cloned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, Role, UserId};
    use chrono::{NaiveDate, NaiveTime};
    use secrecy::SecretString;

    fn john() -> Identity {
        Identity {
            id: UserId::new(1),
            username: "john_doe".to_owned(),
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            role: Role::User,
            token: SecretString::from("tok-john".to_owned()),
            favorites: vec![
                RestaurantId::new(1),
                RestaurantId::new(3),
                RestaurantId::new(5),
            ],
        }
    }

    fn booking(id: i64, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(id),
            user_id: UserId::new(1),
            restaurant_id: RestaurantId::new(7),
            date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size: 4,
            special_requests: None,
            status,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn starts_empty() {
        let store = SessionStore::new();
        assert!(store.get().unwrap().is_none());
        assert!(store.token().unwrap().is_none());
        assert!(store.favorite_ids().unwrap().is_none());
    }

    #[test]
    fn set_then_get() {
        let store = SessionStore::new();
        store.set(john()).unwrap();
        let identity = store.get().unwrap().unwrap();
        assert_eq!(identity.username, "john_doe");
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-john"));
    }

    #[test]
    fn clear_removes_everything() {
        let store = SessionStore::new();
        store.set(john()).unwrap();
        store.set_bookings(vec![booking(1, BookingStatus::Pending)]).unwrap();
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
        assert!(store.bookings().unwrap().is_none());
    }

    #[test]
    fn set_drops_previous_booking_cache() {
        let store = SessionStore::new();
        store.set(john()).unwrap();
        store.set_bookings(vec![booking(1, BookingStatus::Pending)]).unwrap();
        store.set(john()).unwrap();
        assert!(store.bookings().unwrap().is_none());
    }

    #[test]
    fn update_without_identity_fails() {
        let store = SessionStore::new();
        let err = store.update(SessionPatch::new()).unwrap_err();
        assert!(matches!(err, TableTopError::Precondition(_)));
    }

    #[test]
    fn update_replaces_favorites_and_keeps_token() {
        let store = SessionStore::new();
        store.set(john()).unwrap();
        let updated = store
            .update(SessionPatch::new().favorites(vec![
                RestaurantId::new(1),
                RestaurantId::new(3),
                RestaurantId::new(5),
                RestaurantId::new(7),
            ]))
            .unwrap();
        assert_eq!(updated.favorites.len(), 4);
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-john"));
        assert_eq!(
            store.favorite_ids().unwrap().unwrap().len(),
            4
        );
    }

    #[test]
    fn update_merges_name_parts() {
        let store = SessionStore::new();
        store.set(john()).unwrap();
        let updated = store
            .update(SessionPatch::new().first_name("Jonathan"))
            .unwrap();
        assert_eq!(updated.first_name, "Jonathan");
        // Untouched fields survive the merge.
        assert_eq!(updated.last_name, "Doe");
        assert_eq!(updated.favorites.len(), 3);
    }

    #[test]
    fn replace_booking_keys_on_id() {
        let store = SessionStore::new();
        store.set(john()).unwrap();
        store
            .set_bookings(vec![
                booking(1, BookingStatus::Pending),
                booking(2, BookingStatus::Confirmed),
            ])
            .unwrap();

        let mut cancelled = booking(2, BookingStatus::Cancelled);
        cancelled.party_size = 4;
        assert!(store.replace_booking(&cancelled).unwrap());

        let cached = store.bookings().unwrap().unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(
            store.booking_by_id(BookingId::new(2)).unwrap().unwrap().status,
            BookingStatus::Cancelled
        );
        assert_eq!(
            store.booking_by_id(BookingId::new(1)).unwrap().unwrap().status,
            BookingStatus::Pending
        );
    }

    #[test]
    fn replace_unknown_booking_is_noop() {
        let store = SessionStore::new();
        store.set(john()).unwrap();
        store.set_bookings(vec![booking(1, BookingStatus::Pending)]).unwrap();
        assert!(!store.replace_booking(&booking(9, BookingStatus::Cancelled)).unwrap());
        assert_eq!(store.bookings().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn replace_with_no_cache_is_noop() {
        let store = SessionStore::new();
        assert!(!store.replace_booking(&booking(1, BookingStatus::Cancelled)).unwrap());
    }
}
