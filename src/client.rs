//! HTTP client for the TableTop API.
//!
//! Provides both async and blocking client variants behind feature
//! flags. Every request goes through one `send` core: the bearer token
//! of the active session is attached when present, server error bodies
//! are normalized into the crate's error taxonomy, and a 401 response
//! clears the session store as a global side effect — whichever call
//! produced it.

/// Base URL for a locally running TableTop backend.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Login endpoint path.
const LOGIN_PATH: &str = "/users/login";

/// Registration endpoint path.
const REGISTER_PATH: &str = "/users/register";

/// Catalog endpoint path.
const RESTAURANTS_PATH: &str = "/restaurants";

/// Bookings endpoint path.
const BOOKINGS_PATH: &str = "/bookings";

/// Reviews endpoint path.
const REVIEWS_PATH: &str = "/reviews";

/// Server error envelope.
///
/// The backend wraps failure text as `{"message": "..."}`; anything
/// else is surfaced raw so the server's wording always reaches the
/// user.
#[derive(Debug, serde::Deserialize)]
struct ApiMessage {
    /// Human-readable failure description.
    message: String,
}

/// Pulls the human-readable message out of an error body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<ApiMessage>(body).map_or_else(
        |_| {
            if body.trim().is_empty() {
                "unknown error".to_owned()
            } else {
                body.to_owned()
            }
        },
        |envelope| envelope.message,
    )
}

/// Generates a TableTop client (async or blocking) with builder,
/// endpoint methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug, Default)]
        pub struct $builder {
            /// Base URL override (for testing or remote deployments).
            base_url: Option<String>,
            /// Session store shared with the rest of the application.
            session: Option<Arc<SessionStore>>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Shares an existing session store with the client.
            ///
            /// When omitted, the client creates its own empty store.
            #[inline]
            #[must_use]
            pub fn session(mut self, session: Arc<SessionStore>) -> Self {
                self.session = Some(session);
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::Network`] if the HTTP client
            /// fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
                let session = self.session.unwrap_or_default();
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    base_url,
                    session,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL.
            base_url: String,
            /// Session store supplying the bearer token and absorbing
            /// the 401 clear side effect.
            session: Arc<SessionStore>,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Returns the session store this client reads its
            /// credentials from.
            #[inline]
            #[must_use]
            pub fn session(&self) -> &Arc<SessionStore> {
                &self.session
            }

            // ── Authentication ───────────────────────────────────────

            /// Authenticates and returns the identity (with token).
            ///
            /// The session store is not touched here; installing the
            /// identity is the high-level client's job.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// rejects the credentials, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(&self, request: &LoginRequest) -> Result<Identity> {
                tracing::debug!(username = %request.username, "logging in");
                self.post(LOGIN_PATH, request) $( .$await_ext )?
            }

            /// Registers a new user and returns the created identity.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the registration.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn register(&self, request: &RegisterRequest) -> Result<Identity> {
                tracing::debug!(username = %request.username, "registering");
                self.post(REGISTER_PATH, request) $( .$await_ext )?
            }

            // ── Favorites ────────────────────────────────────────────

            /// Fetches the authoritative favorites list for a user.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn favorites(&self, user: UserId) -> Result<Vec<Restaurant>> {
                self.get(&format!("/users/{user}/favorites")) $( .$await_ext )?
            }

            /// Adds a restaurant to a user's favorites.
            ///
            /// Returns the refreshed favorites list as the server sees
            /// it after the mutation.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn add_favorite(
                &self,
                user: UserId,
                restaurant: RestaurantId,
            ) -> Result<Vec<Restaurant>> {
                tracing::debug!(%user, %restaurant, "adding favorite");
                self.post_empty(&format!("/users/{user}/favorites/{restaurant}")) $( .$await_ext )?
            }

            /// Removes a restaurant from a user's favorites.
            ///
            /// Returns the refreshed favorites list as the server sees
            /// it after the mutation.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn remove_favorite(
                &self,
                user: UserId,
                restaurant: RestaurantId,
            ) -> Result<Vec<Restaurant>> {
                tracing::debug!(%user, %restaurant, "removing favorite");
                self.delete(&format!("/users/{user}/favorites/{restaurant}")) $( .$await_ext )?
            }

            // ── Catalog ──────────────────────────────────────────────

            /// Lists the catalog, optionally filtered.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn restaurants(
                &self,
                query: &RestaurantQuery,
            ) -> Result<Vec<Restaurant>> {
                self.get_with_query(RESTAURANTS_PATH, &query.to_query_pairs()) $( .$await_ext )?
            }

            /// Fetches one restaurant by id.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn restaurant(&self, id: RestaurantId) -> Result<Restaurant> {
                self.get(&format!("{RESTAURANTS_PATH}/{id}")) $( .$await_ext )?
            }

            /// Fetches the top-rated analytics feed.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn top_rated(&self) -> Result<Vec<Restaurant>> {
                self.get(&format!("{RESTAURANTS_PATH}/top-rated")) $( .$await_ext )?
            }

            /// Creates a catalog entry (admin).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the request (non-admin callers get
            /// [`TableTopError::Forbidden`]).
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_restaurant(
                &self,
                draft: &RestaurantDraft,
            ) -> Result<Restaurant> {
                self.post(RESTAURANTS_PATH, draft) $( .$await_ext )?
            }

            /// Updates a catalog entry (admin).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the request.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn update_restaurant(
                &self,
                id: RestaurantId,
                draft: &RestaurantDraft,
            ) -> Result<Restaurant> {
                self.put(&format!("{RESTAURANTS_PATH}/{id}"), draft) $( .$await_ext )?
            }

            /// Deletes a catalog entry (admin).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the request.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn delete_restaurant(&self, id: RestaurantId) -> Result<()> {
                self.delete_unit(&format!("{RESTAURANTS_PATH}/{id}")) $( .$await_ext )?
            }

            // ── Bookings ─────────────────────────────────────────────

            /// Lists every booking in the system (admin).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the request.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn all_bookings(&self) -> Result<Vec<Booking>> {
                self.get(BOOKINGS_PATH) $( .$await_ext )?
            }

            /// Lists one user's bookings, in server-defined order.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn bookings_for_user(&self, user: UserId) -> Result<Vec<Booking>> {
                self.get(&format!("{BOOKINGS_PATH}/user/{user}")) $( .$await_ext )?
            }

            /// Submits a new booking.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the submission.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_booking(&self, request: &BookingRequest) -> Result<Booking> {
                tracing::debug!(restaurant = %request.restaurant_id, "creating booking");
                self.post(BOOKINGS_PATH, request) $( .$await_ext )?
            }

            /// Requests cancellation of a booking, scoped to its owner.
            ///
            /// # Errors
            ///
            /// Returns [`TableTopError::InvalidTransition`] when the
            /// booking is already terminal, [`TableTopError::Forbidden`]
            /// when it belongs to someone else, or another error if the
            /// request fails.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn cancel_booking(
                &self,
                booking: BookingId,
                user: UserId,
            ) -> Result<Booking> {
                tracing::debug!(%booking, %user, "cancelling booking");
                self.put_empty(&format!("{BOOKINGS_PATH}/{booking}/cancel/{user}")) $( .$await_ext )?
            }

            // ── Reviews ──────────────────────────────────────────────

            /// Lists the reviews of one restaurant.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn reviews_for_restaurant(
                &self,
                restaurant: RestaurantId,
            ) -> Result<Vec<Review>> {
                self.get(&format!("{REVIEWS_PATH}/restaurant/{restaurant}")) $( .$await_ext )?
            }

            /// Fetches aggregate review statistics for one restaurant.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn review_stats(&self, restaurant: RestaurantId) -> Result<ReviewStats> {
                self.get(&format!("{REVIEWS_PATH}/restaurant/{restaurant}/stats")) $( .$await_ext )?
            }

            /// Submits a review.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the submission.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_review(&self, draft: &ReviewDraft) -> Result<Review> {
                self.post(REVIEWS_PATH, draft) $( .$await_ext )?
            }

            /// Deletes a review.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// rejects the request.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn delete_review(&self, id: ReviewId) -> Result<()> {
                self.delete_unit(&format!("{REVIEWS_PATH}/{id}")) $( .$await_ext )?
            }

            // ── Verb-shaped core ─────────────────────────────────────

            /// Sends a GET request and deserializes the response.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the response
            /// cannot be deserialized.
            #[inline]
            pub $($async_kw)? fn get<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
            ) -> Result<Resp> {
                self.send::<(), Resp>(reqwest::Method::GET, path, &[], None) $( .$await_ext )?
            }

            /// Sends a GET request with query parameters.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the response
            /// cannot be deserialized.
            #[inline]
            pub $($async_kw)? fn get_with_query<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
                query: &[(&'static str, String)],
            ) -> Result<Resp> {
                self.send::<(), Resp>(reqwest::Method::GET, path, query, None) $( .$await_ext )?
            }

            /// Sends a JSON POST request and deserializes the response.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the response
            /// cannot be deserialized.
            #[inline]
            pub $($async_kw)? fn post<
                Req: serde::Serialize $(+ $send_bound)?,
                Resp: serde::de::DeserializeOwned,
            >(
                &self,
                path: &str,
                body: &Req,
            ) -> Result<Resp> {
                self.send(reqwest::Method::POST, path, &[], Some(body)) $( .$await_ext )?
            }

            /// Sends a bodyless POST request and deserializes the response.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the response
            /// cannot be deserialized.
            #[inline]
            pub $($async_kw)? fn post_empty<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
            ) -> Result<Resp> {
                self.send::<(), Resp>(reqwest::Method::POST, path, &[], None) $( .$await_ext )?
            }

            /// Sends a JSON PUT request and deserializes the response.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the response
            /// cannot be deserialized.
            #[inline]
            pub $($async_kw)? fn put<
                Req: serde::Serialize $(+ $send_bound)?,
                Resp: serde::de::DeserializeOwned,
            >(
                &self,
                path: &str,
                body: &Req,
            ) -> Result<Resp> {
                self.send(reqwest::Method::PUT, path, &[], Some(body)) $( .$await_ext )?
            }

            /// Sends a bodyless PUT request and deserializes the response.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the response
            /// cannot be deserialized.
            #[inline]
            pub $($async_kw)? fn put_empty<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
            ) -> Result<Resp> {
                self.send::<(), Resp>(reqwest::Method::PUT, path, &[], None) $( .$await_ext )?
            }

            /// Sends a DELETE request and deserializes the response.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the response
            /// cannot be deserialized.
            #[inline]
            pub $($async_kw)? fn delete<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
            ) -> Result<Resp> {
                self.send::<(), Resp>(reqwest::Method::DELETE, path, &[], None) $( .$await_ext )?
            }

            /// Sends a DELETE request, discarding any response body.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the server
            /// returns a non-success status.
            #[inline]
            pub $($async_kw)? fn delete_unit(&self, path: &str) -> Result<()> {
                self.send_unit(reqwest::Method::DELETE, path) $( .$await_ext )?
            }

            /// Sends an authenticated request and deserializes the
            /// response.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn send<
                Req: serde::Serialize $(+ $send_bound)?,
                Resp: serde::de::DeserializeOwned,
            >(
                &self,
                method: reqwest::Method,
                path: &str,
                query: &[(&'static str, String)],
                body: Option<&Req>,
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending request");
                let mut request = self.http.request(method, &url);
                if !query.is_empty() {
                    request = request.query(query);
                }
                if let Some(token) = self.session.token()? {
                    request = request.bearer_auth(token);
                }
                if let Some(payload) = body {
                    request = request.json(payload);
                }
                let response: $resp_type = request.send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    let text = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = text.len(), "parsing response body");
                    serde_json::from_str(&text).map_err(TableTopError::from)
                } else {
                    let text = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_default();
                    Err(self.normalize_failure(status.as_u16(), &text))
                }
            }

            /// Sends an authenticated request, discarding the body on
            /// success.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn send_unit(&self, method: reqwest::Method, path: &str) -> Result<()> {
                let url = format!("{}{path}", self.base_url);
                let mut request = self.http.request(method, &url);
                if let Some(token) = self.session.token()? {
                    request = request.bearer_auth(token);
                }
                let response: $resp_type = request.send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    Ok(())
                } else {
                    let text = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_default();
                    Err(self.normalize_failure(status.as_u16(), &text))
                }
            }

            /// Normalizes a non-success response into an error.
            ///
            /// A 401 clears the session store before the error is
            /// built — the global forced-logout side effect, fired at
            /// most once per failing call, independent of which call
            /// triggered it. 403 and 409 are mapped to the dedicated
            /// ownership/transition variants so the server's wording
            /// reaches the caller.
            fn normalize_failure(&self, status: u16, body: &str) -> TableTopError {
                let message = extract_message(body);
                tracing::debug!(status, message = %message, "API error");
                if status == 401 {
                    if let Err(err) = self.session.clear() {
                        return err;
                    }
                    tracing::warn!("authentication rejected, session cleared");
                }
                match status {
                    403 => TableTopError::Forbidden(message),
                    409 => TableTopError::InvalidTransition(message),
                    _ => TableTopError::Api { status, message },
                }
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the TableTop API.

    use std::sync::Arc;

    use super::{
        BOOKINGS_PATH, DEFAULT_BASE_URL, LOGIN_PATH, REGISTER_PATH, RESTAURANTS_PATH, REVIEWS_PATH,
        extract_message,
    };
    use crate::error::{Result, TableTopError};
    use crate::models::{
        Booking, BookingId, BookingRequest, Identity, LoginRequest, RegisterRequest, Restaurant,
        RestaurantDraft, RestaurantId, RestaurantQuery, Review, ReviewDraft, ReviewId, ReviewStats,
        UserId,
    };
    use crate::session::SessionStore;

    define_client! {
        client_name: TableTopClient,
        builder_name: TableTopClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the TableTop API.\n\nUse [`TableTopClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`TableTopClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Sync,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the TableTop API.

    use std::sync::Arc;

    use super::{
        BOOKINGS_PATH, DEFAULT_BASE_URL, LOGIN_PATH, REGISTER_PATH, RESTAURANTS_PATH, REVIEWS_PATH,
        extract_message,
    };
    use crate::error::{Result, TableTopError};
    use crate::models::{
        Booking, BookingId, BookingRequest, Identity, LoginRequest, RegisterRequest, Restaurant,
        RestaurantDraft, RestaurantId, RestaurantQuery, Review, ReviewDraft, ReviewId, ReviewStats,
        UserId,
    };
    use crate::session::SessionStore;

    define_client! {
        client_name: TableTopBlockingClient,
        builder_name: TableTopBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the TableTop API.\n\nUse [`TableTopBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`TableTopBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{TableTopClient, TableTopClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{TableTopBlockingClient, TableTopBlockingClientBuilder};
