//! High-level TableTop client with integrated session persistence.
//!
//! Combines the low-level HTTP client with a [`SessionStorage`] /
//! [`BlockingSessionStorage`] backend to provide the session lifecycle
//! (login, logout, restore), server-authoritative favorites
//! synchronization, and the booking lifecycle.
//!
//! State discipline: the in-memory [`SessionStore`] is the single
//! source of truth; durable storage holds exactly one document (the
//! identity) and is rewritten after every mutation that changes it.
//! When any call comes back with a 401 the store has already been
//! cleared by the HTTP layer, and this layer additionally drops the
//! durable copy before the error reaches the caller.

/// Generates a high-level TableTop client (async or blocking).
macro_rules! define_table_top {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        storage_trait: $storage_trait:ident,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: $storage_trait> {
            /// Base URL override (for testing).
            base_url: Option<String>,
            /// Durable session storage backend.
            storage: Option<S>,
            /// Booking submission policy override.
            policy: Option<BookingPolicy>,
        }

        impl<S: $storage_trait> $builder<S> {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets the durable session storage backend.
            #[inline]
            #[must_use]
            pub fn storage(mut self, storage: S) -> Self {
                self.storage = Some(storage);
                self
            }

            /// Overrides the default booking submission policy.
            #[inline]
            #[must_use]
            pub fn policy(mut self, policy: BookingPolicy) -> Self {
                self.policy = Some(policy);
                self
            }

            /// Builds the high-level client.
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Storage`] if no storage backend
            /// was provided, or [`TableTopError::Network`] if the HTTP
            /// client fails to build.
            #[inline]
            pub fn build(self) -> Result<$client<S>> {
                let storage = self.storage.ok_or_else(|| {
                    TableTopError::Storage("session storage backend is required".into())
                })?;

                let session = Arc::new(SessionStore::new());
                let mut http_builder =
                    <$http_client>::builder().session(Arc::clone(&session));
                if let Some(url) = self.base_url {
                    http_builder = http_builder.base_url(url);
                }
                let client = http_builder.build()?;

                Ok($client {
                    client,
                    storage,
                    policy: self.policy.unwrap_or_default(),
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client<S: $storage_trait> {
            /// Low-level HTTP client (owns the shared session store).
            client: $http_client,
            /// Durable session storage backend.
            storage: S,
            /// Booking submission policy.
            policy: BookingPolicy,
        }

        impl<S: $storage_trait> $client<S> {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<S> {
                $builder {
                    base_url: None,
                    storage: None,
                    policy: None,
                }
            }

            // ── Session lifecycle ────────────────────────────────────

            /// Rehydrates the session store from durable storage.
            ///
            /// Call once at startup; returns the restored identity, if
            /// a previous run persisted one.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend or the session
            /// store fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn restore_session(&self) -> Result<Option<Identity>> {
                let persisted = self.storage.load() $( .$await_ext )? ?;
                if let Some(identity) = persisted.as_ref() {
                    tracing::debug!(username = %identity.username, "session restored");
                    self.session().set(identity.clone())?;
                }
                Ok(persisted)
            }

            /// Authenticates, installs the identity in the session
            /// store, and persists it.
            ///
            /// # Errors
            ///
            /// Returns an error if the credentials are rejected or the
            /// request fails; the session is left untouched on failure.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login<U: Into<String>, P: Into<String>>(
                &self,
                username: U,
                password: P,
            ) -> Result<Identity> {
                let request = LoginRequest::new(username, password);
                match self.client.login(&request) $( .$await_ext )? {
                    Ok(identity) => {
                        self.session().set(identity.clone())?;
                        self.storage.save(&identity) $( .$await_ext )? ?;
                        tracing::debug!(username = %identity.username, "signed in");
                        Ok(identity)
                    }
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Registers a new account and signs it in.
            ///
            /// # Errors
            ///
            /// Returns an error if the server rejects the registration
            /// or the request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn register(&self, request: &RegisterRequest) -> Result<Identity> {
                match self.client.register(request) $( .$await_ext )? {
                    Ok(identity) => {
                        self.session().set(identity.clone())?;
                        self.storage.save(&identity) $( .$await_ext )? ?;
                        Ok(identity)
                    }
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Signs out: clears the session store and durable storage.
            ///
            /// # Errors
            ///
            /// Returns an error if either clear fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn logout(&self) -> Result<()> {
                self.session().clear()?;
                self.storage.clear() $( .$await_ext )? ?;
                tracing::debug!("signed out");
                Ok(())
            }

            /// Returns a copy of the active identity, if any.
            ///
            /// # Errors
            ///
            /// Returns an error if the session store fails.
            #[inline]
            pub fn identity(&self) -> Result<Option<Identity>> {
                self.session().get()
            }

            // ── Favorites synchronization ────────────────────────────

            /// Fetches the authoritative favorites list for the active
            /// identity.
            ///
            /// Does not mutate the session store — rendering a list is
            /// not a mutation of the projection.
            ///
            /// # Errors
            ///
            /// Fails fast with [`TableTopError::NotAuthenticated`] when
            /// nobody is signed in.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn favorites(&self) -> Result<Vec<Restaurant>> {
                let identity = self.current()?;
                match self.client.favorites(identity.id) $( .$await_ext )? {
                    Ok(list) => Ok(list),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Toggles a restaurant in the active identity's favorites.
            ///
            /// Membership is decided from the cached projection; the
            /// matching add or remove call is issued, and on success the
            /// cache is replaced wholesale with the ids of the
            /// server-returned list — never spliced locally, so
            /// concurrent toggles cannot drift from the authoritative
            /// relation. The refreshed restaurant list is returned for
            /// rendering.
            ///
            /// # Errors
            ///
            /// Fails fast with [`TableTopError::NotAuthenticated`]
            /// before any network call when nobody is signed in. Any
            /// failure leaves the previous projection untouched.
            #[tracing::instrument(skip_all, fields(restaurant = %restaurant))]
            pub $($async_kw)? fn toggle_favorite(
                &self,
                restaurant: RestaurantId,
            ) -> Result<Vec<Restaurant>> {
                let identity = self.current()?;
                let result = if identity.is_favorite(restaurant) {
                    self.client.remove_favorite(identity.id, restaurant) $( .$await_ext )?
                } else {
                    self.client.add_favorite(identity.id, restaurant) $( .$await_ext )?
                };
                match result {
                    Ok(refreshed) => {
                        let ids: Vec<RestaurantId> =
                            refreshed.iter().map(|entry| entry.id).collect();
                        let updated = self
                            .session()
                            .update(SessionPatch::new().favorites(ids))?;
                        self.storage.save(&updated) $( .$await_ext )? ?;
                        tracing::debug!(count = refreshed.len(), "favorites synchronized");
                        Ok(refreshed)
                    }
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            // ── Booking lifecycle ────────────────────────────────────

            /// Submits a booking for the active identity.
            ///
            /// The submission is checked against the configured
            /// [`BookingPolicy`] before any network call; on success the
            /// server returns the created booking in `PENDING` status.
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Policy`] for out-of-policy
            /// submissions and [`TableTopError::NotAuthenticated`] when
            /// nobody is signed in.
            #[tracing::instrument(skip_all, fields(restaurant = %restaurant))]
            pub $($async_kw)? fn create_booking(
                &self,
                restaurant: RestaurantId,
                date: NaiveDate,
                time: NaiveTime,
                party_size: u32,
                special_requests: Option<String>,
            ) -> Result<Booking> {
                let identity = self.current()?;
                self.policy
                    .validate(date, party_size, Utc::now().date_naive())?;
                let request = BookingRequest {
                    user_id: identity.id,
                    restaurant_id: restaurant,
                    date,
                    time,
                    party_size,
                    special_requests,
                };
                match self.client.create_booking(&request) $( .$await_ext )? {
                    Ok(booking) => {
                        tracing::debug!(booking = %booking.id, "booking created");
                        Ok(booking)
                    }
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Lists the active identity's bookings, in the order the
            /// server returned them (no client-side re-sort).
            ///
            /// Refreshes the session store's cached booking projection.
            ///
            /// # Errors
            ///
            /// Fails fast with [`TableTopError::NotAuthenticated`] when
            /// nobody is signed in.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn bookings(&self) -> Result<Vec<Booking>> {
                let identity = self.current()?;
                match self.client.bookings_for_user(identity.id) $( .$await_ext )? {
                    Ok(list) => {
                        self.session().set_bookings(list.clone())?;
                        Ok(list)
                    }
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Requests cancellation of one of the active identity's
            /// bookings.
            ///
            /// Valid only while the booking is `PENDING` or `CONFIRMED`
            /// — the server decides and its wording is surfaced
            /// verbatim. On success the returned booking is `CANCELLED`
            /// with an updated timestamp, and the single matching entry
            /// in the cached projection is replaced, keyed on the
            /// booking id.
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::InvalidTransition`] for
            /// already-terminal bookings, [`TableTopError::Forbidden`]
            /// for bookings owned by someone else.
            #[tracing::instrument(skip_all, fields(booking = %booking))]
            pub $($async_kw)? fn cancel_booking(&self, booking: BookingId) -> Result<Booking> {
                let identity = self.current()?;
                match self.client.cancel_booking(booking, identity.id) $( .$await_ext )? {
                    Ok(cancelled) => {
                        let _replaced = self.session().replace_booking(&cancelled)?;
                        tracing::debug!(booking = %cancelled.id, "booking cancelled");
                        Ok(cancelled)
                    }
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            // ── Catalog ──────────────────────────────────────────────

            /// Lists the catalog, optionally filtered.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn restaurants(
                &self,
                query: &RestaurantQuery,
            ) -> Result<Vec<Restaurant>> {
                match self.client.restaurants(query) $( .$await_ext )? {
                    Ok(list) => Ok(list),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Fetches one restaurant by id.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn restaurant(&self, id: RestaurantId) -> Result<Restaurant> {
                match self.client.restaurant(id) $( .$await_ext )? {
                    Ok(found) => Ok(found),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Fetches the top-rated feed.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn top_rated(&self) -> Result<Vec<Restaurant>> {
                match self.client.top_rated() $( .$await_ext )? {
                    Ok(list) => Ok(list),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            // ── Admin ────────────────────────────────────────────────

            /// Creates a catalog entry (admin).
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Policy`] for invalid drafts and
            /// [`TableTopError::Forbidden`] for non-admin callers.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_restaurant(
                &self,
                draft: &RestaurantDraft,
            ) -> Result<Restaurant> {
                draft.validate()?;
                match self.client.create_restaurant(draft) $( .$await_ext )? {
                    Ok(created) => Ok(created),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Updates a catalog entry (admin).
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Policy`] for invalid drafts and
            /// [`TableTopError::Forbidden`] for non-admin callers.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn update_restaurant(
                &self,
                id: RestaurantId,
                draft: &RestaurantDraft,
            ) -> Result<Restaurant> {
                draft.validate()?;
                match self.client.update_restaurant(id, draft) $( .$await_ext )? {
                    Ok(updated) => Ok(updated),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Deletes a catalog entry (admin).
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Forbidden`] for non-admin
            /// callers.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn delete_restaurant(&self, id: RestaurantId) -> Result<()> {
                match self.client.delete_restaurant(id) $( .$await_ext )? {
                    Ok(()) => Ok(()),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Lists every booking in the system (admin).
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Forbidden`] for non-admin
            /// callers.
            #[inline]
            pub $($async_kw)? fn all_bookings(&self) -> Result<Vec<Booking>> {
                match self.client.all_bookings() $( .$await_ext )? {
                    Ok(list) => Ok(list),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Assembles the admin analytics dashboard figures.
            ///
            /// Fetches the catalog, the full booking list, and the
            /// top-rated feed, then derives totals and rankings
            /// client-side.
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Forbidden`] for non-admin
            /// callers (the booking list is admin-scoped).
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn analytics(&self) -> Result<AnalyticsSummary> {
                let catalog = self.restaurants(&RestaurantQuery::new()) $( .$await_ext )? ?;
                let bookings = self.all_bookings() $( .$await_ext )? ?;
                let top = self.top_rated() $( .$await_ext )? ?;
                Ok(AnalyticsSummary::compute(&catalog, &bookings, &top))
            }

            // ── Reviews ──────────────────────────────────────────────

            /// Lists the reviews of one restaurant.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn restaurant_reviews(
                &self,
                restaurant: RestaurantId,
            ) -> Result<Vec<Review>> {
                match self.client.reviews_for_restaurant(restaurant) $( .$await_ext )? {
                    Ok(list) => Ok(list),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Fetches aggregate review statistics for one restaurant.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn review_stats(&self, restaurant: RestaurantId) -> Result<ReviewStats> {
                match self.client.review_stats(restaurant) $( .$await_ext )? {
                    Ok(stats) => Ok(stats),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            /// Submits a review as the active identity.
            ///
            /// # Errors
            ///
            /// Fails fast with [`TableTopError::NotAuthenticated`] when
            /// nobody is signed in, or [`TableTopError::Policy`] for an
            /// out-of-range rating.
            #[tracing::instrument(skip_all, fields(restaurant = %restaurant))]
            pub $($async_kw)? fn submit_review(
                &self,
                restaurant: RestaurantId,
                rating: f64,
                comment: Option<String>,
            ) -> Result<Review> {
                let identity = self.current()?;
                if !(0.0..=5.0).contains(&rating) {
                    return Err(TableTopError::Policy(format!(
                        "rating {rating} outside the allowed range 0..=5"
                    )));
                }
                let draft = ReviewDraft {
                    user_id: identity.id,
                    restaurant_id: restaurant,
                    rating,
                    comment,
                };
                match self.client.create_review(&draft) $( .$await_ext )? {
                    Ok(review) => Ok(review),
                    Err(err) => Err(self.absorb_auth_rejection(err) $( .$await_ext )?),
                }
            }

            // ── Guard ────────────────────────────────────────────────

            /// Evaluates the view guard for a required capability
            /// against the live session.
            ///
            /// # Errors
            ///
            /// Returns an error if the session store fails.
            #[inline]
            pub fn authorize(&self, required: Capability) -> Result<Access> {
                Ok(guard::evaluate(self.identity()?.as_ref(), required))
            }

            /// Evaluates the view guard for a concrete route.
            ///
            /// # Errors
            ///
            /// Returns an error if the session store fails.
            #[inline]
            pub fn route_access(&self, route: Route) -> Result<Access> {
                Ok(guard::route_access(self.identity()?.as_ref(), route))
            }

            // ── Accessors ────────────────────────────────────────────

            /// Returns the shared session store.
            #[inline]
            #[must_use]
            pub fn session(&self) -> &Arc<SessionStore> {
                self.client.session()
            }

            /// Returns a reference to the underlying HTTP client.
            #[inline]
            #[must_use]
            pub const fn inner_client(&self) -> &$http_client {
                &self.client
            }

            /// Returns a reference to the storage backend.
            #[inline]
            #[must_use]
            pub const fn storage(&self) -> &S {
                &self.storage
            }

            /// Returns the booking submission policy in effect.
            #[inline]
            #[must_use]
            pub const fn policy(&self) -> &BookingPolicy {
                &self.policy
            }

            // ── Internals ────────────────────────────────────────────

            /// Returns the active identity or fails fast.
            fn current(&self) -> Result<Identity> {
                self.session()
                    .get()?
                    .ok_or(TableTopError::NotAuthenticated)
            }

            /// Completes the global 401 side effect for a failed call.
            ///
            /// The HTTP layer has already cleared the in-memory session;
            /// this drops the durable copy so the next start does not
            /// resurrect a rejected credential. A storage failure takes
            /// precedence over the original error.
            $($async_kw)? fn absorb_auth_rejection(&self, err: TableTopError) -> TableTopError {
                if err.is_auth_rejection() {
                    tracing::debug!("dropping persisted session after auth rejection");
                    if let Err(storage_err) = self.storage.clear() $( .$await_ext )? {
                        return storage_err;
                    }
                }
                err
            }
        }

    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_table_top {
    //! Async high-level client.

    use std::sync::Arc;

    use chrono::Utc;

    use crate::analytics::AnalyticsSummary;
    use crate::client::TableTopClient;
    use crate::error::{Result, TableTopError};
    use crate::guard::{self, Access, Capability, Route};
    use crate::models::{
        Booking, BookingId, BookingPolicy, BookingRequest, Identity, LoginRequest, NaiveDate,
        NaiveTime, RegisterRequest, Restaurant, RestaurantDraft, RestaurantId, RestaurantQuery,
        Review, ReviewDraft, ReviewStats,
    };
    use crate::session::{SessionPatch, SessionStore};
    use crate::storage::SessionStorage;

    define_table_top! {
        client_name: TableTop,
        builder_name: TableTopBuilder,
        http_client: TableTopClient,
        storage_trait: SessionStorage,
        client_doc: "High-level async TableTop client with integrated session persistence.\n\nUse [`TableTop::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`TableTop`] client.",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_table_top {
    //! Blocking high-level client.

    use std::sync::Arc;

    use chrono::Utc;

    use crate::analytics::AnalyticsSummary;
    use crate::client::TableTopBlockingClient;
    use crate::error::{Result, TableTopError};
    use crate::guard::{self, Access, Capability, Route};
    use crate::models::{
        Booking, BookingId, BookingPolicy, BookingRequest, Identity, LoginRequest, NaiveDate,
        NaiveTime, RegisterRequest, Restaurant, RestaurantDraft, RestaurantId, RestaurantQuery,
        Review, ReviewDraft, ReviewStats,
    };
    use crate::session::{SessionPatch, SessionStore};
    use crate::storage::BlockingSessionStorage;

    define_table_top! {
        client_name: TableTopBlocking,
        builder_name: TableTopBlockingBuilder,
        http_client: TableTopBlockingClient,
        storage_trait: BlockingSessionStorage,
        client_doc: "High-level blocking TableTop client with integrated session persistence.\n\nUse [`TableTopBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`TableTopBlocking`] client.",
    }
}

#[cfg(feature = "async")]
pub use async_table_top::{TableTop, TableTopBuilder};
#[cfg(feature = "blocking")]
pub use blocking_table_top::{TableTopBlocking, TableTopBlockingBuilder};

#[cfg(all(test, feature = "async"))]
mod sync_tests {
    use chrono::{Days, NaiveTime, Utc};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::TableTop;
    use crate::error::TableTopError;
    use crate::guard::{Access, Route};
    use crate::models::{BookingId, BookingStatus, RestaurantId, Role};
    use crate::storage::{InMemorySessionStorage, SessionStorage};

    /// Login response payload for the demo user.
    fn john_json() -> serde_json::Value {
        json!({
            "id": 1,
            "username": "john_doe",
            "firstName": "John",
            "lastName": "Doe",
            "role": "USER",
            "token": "tok-john",
            "favorites": [1, 3, 5]
        })
    }

    fn restaurant_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Restaurant {id}"),
            "cuisine": "Sri Lankan",
            "city": "Colombo",
            "address": "1 Main Street"
        })
    }

    fn booking_json(id: i64, date: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "userId": 1,
            "restaurantId": 7,
            "date": date,
            "time": "19:00",
            "partySize": 4,
            "status": status,
            "createdAt": "2026-08-07T10:00:00Z"
        })
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(john_json()))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> TableTop<InMemorySessionStorage> {
        TableTop::builder()
            .base_url(server.uri())
            .storage(InMemorySessionStorage::new())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn login_installs_and_persists_identity() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        let client = client_for(&server);
        let identity = client.login("john_doe", "password123").await.unwrap();
        assert_eq!(identity.role, Role::User);
        assert_eq!(identity.favorites.len(), 3);

        // Session store and durable storage both hold the identity.
        assert!(client.identity().unwrap().is_some());
        let persisted = client.storage().load().await.unwrap().unwrap();
        assert_eq!(persisted.username, "john_doe");
    }

    #[tokio::test]
    async fn restore_session_rehydrates_store() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        let seeded = {
            let bootstrap = client_for(&server);
            bootstrap.login("john_doe", "password123").await.unwrap()
        };

        let client = TableTop::builder()
            .base_url(server.uri())
            .storage(InMemorySessionStorage::with_identity(seeded))
            .build()
            .unwrap();
        assert!(client.identity().unwrap().is_none());
        let restored = client.restore_session().await.unwrap().unwrap();
        assert_eq!(restored.username, "john_doe");
        assert!(client.identity().unwrap().is_some());
    }

    #[tokio::test]
    async fn logout_clears_session_and_storage() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        let client = client_for(&server);
        let _identity = client.login("john_doe", "password123").await.unwrap();
        client.logout().await.unwrap();
        assert!(client.identity().unwrap().is_none());
        assert!(client.storage().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn double_toggle_restores_membership() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        // Adding 7 returns the grown list; removing it returns the
        // original three. The add is a POST, the remove a DELETE, so
        // both mocks can coexist.
        Mock::given(method("POST"))
            .and(path("/users/1/favorites/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                restaurant_json(1),
                restaurant_json(3),
                restaurant_json(5),
                restaurant_json(7)
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/1/favorites/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                restaurant_json(1),
                restaurant_json(3),
                restaurant_json(5)
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let _identity = client.login("john_doe", "password123").await.unwrap();

        let grown = client.toggle_favorite(RestaurantId::new(7)).await.unwrap();
        assert_eq!(grown.len(), 4);
        let cached = client.session().favorite_ids().unwrap().unwrap();
        assert_eq!(
            cached,
            vec![
                RestaurantId::new(1),
                RestaurantId::new(3),
                RestaurantId::new(5),
                RestaurantId::new(7)
            ]
        );
        // The refreshed projection is persisted too.
        let persisted = client.storage().load().await.unwrap().unwrap();
        assert_eq!(persisted.favorites.len(), 4);

        let shrunk = client.toggle_favorite(RestaurantId::new(7)).await.unwrap();
        assert_eq!(shrunk.len(), 3);
        assert_eq!(
            client.session().favorite_ids().unwrap().unwrap(),
            vec![
                RestaurantId::new(1),
                RestaurantId::new(3),
                RestaurantId::new(5)
            ]
        );
    }

    #[tokio::test]
    async fn toggle_unauthenticated_fails_before_network() {
        // No mocks mounted: a network call would fail the test through
        // an unexpected-request error rather than NotAuthenticated.
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client.toggle_favorite(RestaurantId::new(7)).await.unwrap_err();
        assert!(matches!(err, TableTopError::NotAuthenticated));
    }

    #[tokio::test]
    async fn failed_toggle_leaves_projection_untouched() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/users/1/favorites/7"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let _identity = client.login("john_doe", "password123").await.unwrap();
        let err = client.toggle_favorite(RestaurantId::new(7)).await.unwrap_err();
        assert!(matches!(err, TableTopError::Api { status: 500, .. }));
        assert_eq!(
            client.session().favorite_ids().unwrap().unwrap(),
            vec![
                RestaurantId::new(1),
                RestaurantId::new(3),
                RestaurantId::new(5)
            ]
        );
    }

    #[tokio::test]
    async fn create_booking_rejects_bad_party_size_before_network() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let client = client_for(&server);
        let _identity = client.login("john_doe", "password123").await.unwrap();

        let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();
        let time = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let err = client
            .create_booking(RestaurantId::new(7), tomorrow, time, 0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TableTopError::Policy(_)));
        let err = client
            .create_booking(RestaurantId::new(7), tomorrow, time, 11, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TableTopError::Policy(_)));
    }

    #[tokio::test]
    async fn booking_lifecycle_create_list_cancel() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();
        let date = tomorrow.to_string();
        Mock::given(method("POST"))
            .and(path("/bookings"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(booking_json(12, &date, "PENDING")),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bookings/user/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([booking_json(12, &date, "PENDING")])),
            )
            .mount(&server)
            .await;
        let cancelled_body = {
            let mut body = booking_json(12, &date, "CANCELLED");
            body["updatedAt"] = json!("2026-08-07T11:00:00Z");
            body
        };
        Mock::given(method("PUT"))
            .and(path("/bookings/12/cancel/1"))
            .and(header("authorization", "Bearer tok-john"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cancelled_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let _identity = client.login("john_doe", "password123").await.unwrap();

        let time = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let created = client
            .create_booking(RestaurantId::new(7), tomorrow, time, 4, None)
            .await
            .unwrap();
        assert_eq!(created.status, BookingStatus::Pending);

        let listed = client.bookings().await.unwrap();
        assert_eq!(listed.len(), 1);

        let cancelled = client.cancel_booking(BookingId::new(12)).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(cancelled.updated_at.is_some());

        // The cached projection was updated in place, keyed on id.
        let cached = client.session().bookings().unwrap().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached.first().unwrap().status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancelling_terminal_booking_fails_with_invalid_transition() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("PUT"))
            .and(path("/bookings/12/cancel/1"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "message": "booking already cancelled"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let _identity = client.login("john_doe", "password123").await.unwrap();
        let err = client.cancel_booking(BookingId::new(12)).await.unwrap_err();
        assert!(matches!(err, TableTopError::InvalidTransition(_)));
        assert!(err.to_string().contains("already cancelled"));
    }

    #[tokio::test]
    async fn unauthorized_drops_durable_session_and_redirects() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/users/1/favorites"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let _identity = client.login("john_doe", "password123").await.unwrap();
        assert!(client.storage().load().await.unwrap().is_some());

        let err = client.favorites().await.unwrap_err();
        assert!(err.is_auth_rejection());

        // Both copies of the session are gone, and the guard now sends
        // capability routes back to login.
        assert!(client.identity().unwrap().is_none());
        assert!(client.storage().load().await.unwrap().is_none());
        assert_eq!(
            client.route_access(Route::MyBookings).unwrap(),
            Access::Redirect(Route::Login)
        );
    }

    #[tokio::test]
    async fn admin_is_redirected_from_user_routes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "username": "admin",
                "firstName": "Admin",
                "lastName": "User",
                "role": "ADMIN",
                "token": "tok-admin",
                "favorites": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let _identity = client.login("admin", "admin123").await.unwrap();
        assert_eq!(
            client.route_access(Route::Favorites).unwrap(),
            Access::Redirect(Route::Home)
        );
        assert_eq!(client.route_access(Route::Admin).unwrap(), Access::Allow);
    }

    #[tokio::test]
    async fn analytics_aggregates_feeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/restaurants"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([restaurant_json(1), restaurant_json(7)])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bookings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                booking_json(1, "2026-08-10", "PENDING"),
                booking_json(2, "2026-08-11", "CONFIRMED")
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/restaurants/top-rated"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([restaurant_json(7)])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let summary = client.analytics().await.unwrap();
        assert_eq!(summary.total_restaurants, 2);
        assert_eq!(summary.total_bookings, 2);
        // Both bookings point at restaurant 7.
        assert_eq!(summary.most_booked.len(), 1);
        assert_eq!(
            summary.most_booked.first().unwrap().restaurant.id,
            RestaurantId::new(7)
        );
    }
}
