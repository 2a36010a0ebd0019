//! Signed-in identity and authentication payloads.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::{RestaurantId, UserId};

/// Serializes a [`SecretString`] by exposing its contents.
///
/// `secrecy` deliberately does not implement `Serialize`; the credential
/// token and password are the only secrets this client ever writes out
/// (to the wire and to durable session storage), and both go through
/// this one helper.
fn expose_secret_str<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Role of a signed-in principal.
///
/// Roles are immutable for the lifetime of a session — there is no
/// role-change operation anywhere in the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular diner: may book tables and keep favorites.
    User,
    /// Administrator: manages the catalog, excluded from the
    /// booking/favorites experience.
    Admin,
}

impl Role {
    /// Returns `true` for the administrator role.
    #[inline]
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// The authenticated principal for the running session.
///
/// Returned by login/registration and persisted in durable session
/// storage across restarts. The `favorites` list is a cached projection
/// of the server-side favorites relation — the server is authoritative,
/// and the projection is replaced wholesale after every favorites
/// mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Session role.
    pub role: Role,
    /// Opaque bearer credential attached to authenticated calls.
    #[serde(serialize_with = "expose_secret_str")]
    pub token: SecretString,
    /// Cached favorite-restaurant projection, in server order.
    #[serde(default)]
    pub favorites: Vec<RestaurantId>,
}

impl Identity {
    /// Returns the full display name ("First Last").
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns `true` if the cached projection marks the restaurant as
    /// a favorite.
    #[inline]
    #[must_use]
    pub fn is_favorite(&self, restaurant: RestaurantId) -> bool {
        self.favorites.contains(&restaurant)
    }
}

impl PartialEq for Identity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.username == other.username
            && self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.role == other.role
            && self.token.expose_secret() == other.token.expose_secret()
            && self.favorites == other.favorites
    }
}

/// Request body for `POST /users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password, held as a secret until serialization.
    #[serde(serialize_with = "expose_secret_str")]
    pub password: SecretString,
}

impl LoginRequest {
    /// Creates a login request.
    #[inline]
    #[must_use]
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Request body for `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired login name.
    pub username: String,
    /// Plain-text password, held as a secret until serialization.
    #[serde(serialize_with = "expose_secret_str")]
    pub password: SecretString,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl RegisterRequest {
    /// Creates a registration request.
    #[inline]
    #[must_use]
    pub fn new<U, P, F, L>(username: U, password: P, first_name: F, last_name: L) -> Self
    where
        U: Into<String>,
        P: Into<String>,
        F: Into<String>,
        L: Into<String>,
    {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
