//! View guard: pure route/capability authorization.
//!
//! Every navigation decision in the front end reduces to one pure
//! function over the current session value and the capability a route
//! requires. Views consume only the [`Access`] decision; no role
//! branching lives anywhere else. The guard performs no I/O and must be
//! re-evaluated on every navigation and on every session change.

use crate::models::Identity;

/// Capability a route requires from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// No capability required; always allowed.
    Public,
    /// Requires a signed-in, non-admin identity. Admins are
    /// deliberately excluded from the booking/favorites experience.
    RequireUser,
    /// Requires a signed-in administrator.
    RequireAdmin,
}

/// Navigable routes of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page.
    Home,
    /// Restaurant catalog with search filters.
    Restaurants,
    /// Single restaurant detail.
    RestaurantDetail,
    /// Booking form for one restaurant.
    Book,
    /// The signed-in user's bookings.
    MyBookings,
    /// The signed-in user's favorite restaurants.
    Favorites,
    /// Login form.
    Login,
    /// Registration form.
    Register,
    /// Admin catalog management.
    Admin,
    /// Admin analytics dashboard.
    Analytics,
}

impl Route {
    /// Returns the route's path pattern.
    #[inline]
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Restaurants => "/restaurants",
            Self::RestaurantDetail => "/restaurants/:id",
            Self::Book => "/book/:restaurantId",
            Self::MyBookings => "/my-bookings",
            Self::Favorites => "/favorites",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Admin => "/admin",
            Self::Analytics => "/analytics",
        }
    }

    /// Returns the capability the route requires.
    #[inline]
    #[must_use]
    pub const fn required_capability(self) -> Capability {
        match self {
            Self::Home
            | Self::Restaurants
            | Self::RestaurantDetail
            | Self::Login
            | Self::Register => Capability::Public,
            Self::Book | Self::MyBookings | Self::Favorites => Capability::RequireUser,
            Self::Admin | Self::Analytics => Capability::RequireAdmin,
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Navigation may proceed.
    Allow,
    /// Navigation must be redirected to the given route.
    Redirect(Route),
}

impl Access {
    /// Returns `true` for [`Access::Allow`].
    #[inline]
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decides whether the session satisfies the required capability.
///
/// Policy: unauthenticated sessions are redirected to login for any
/// capability-requiring route; authenticated non-admins are redirected
/// home from admin routes; authenticated admins are redirected home
/// from user-only routes.
#[inline]
#[must_use]
pub fn evaluate(identity: Option<&Identity>, required: Capability) -> Access {
    match required {
        Capability::Public => Access::Allow,
        Capability::RequireUser => match identity {
            None => Access::Redirect(Route::Login),
            Some(active) if active.role.is_admin() => Access::Redirect(Route::Home),
            Some(_) => Access::Allow,
        },
        Capability::RequireAdmin => match identity {
            None => Access::Redirect(Route::Login),
            Some(active) if active.role.is_admin() => Access::Allow,
            Some(_) => Access::Redirect(Route::Home),
        },
    }
}

/// Evaluates a concrete route via its capability table.
#[inline]
#[must_use]
pub fn route_access(identity: Option<&Identity>, route: Route) -> Access {
    evaluate(identity, route.required_capability())
}

/// Returns the navigation entries visible to the session.
///
/// This mirrors the menu: anonymous sessions see the public pages plus
/// login/registration, users see their bookings and favorites, and
/// admins see only the management pages.
#[must_use]
pub fn navigation(identity: Option<&Identity>) -> Vec<Route> {
    match identity {
        None => vec![Route::Home, Route::Restaurants, Route::Login, Route::Register],
        Some(active) if active.role.is_admin() => vec![Route::Admin, Route::Analytics],
        Some(_) => vec![
            Route::Home,
            Route::Restaurants,
            Route::MyBookings,
            Route::Favorites,
        ],
    }
}
