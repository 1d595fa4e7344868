use std::fmt;
use std::str::FromStr;

use super::RouteError;

/// How a route is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone may render it.
    Public,
    /// Only visitors without a session; others go to their dashboard.
    AnonymousOnly,
    /// Only logged-in visitors; others go to the login page.
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    SubmitAssignment,
    Pricing,
    AdminDashboard,
    Dashboard,
    EditPricing,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::Login,
        Route::Signup,
        Route::SubmitAssignment,
        Route::Pricing,
        Route::AdminDashboard,
        Route::Dashboard,
        Route::EditPricing,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::SubmitAssignment => "/submit-assignment",
            Route::Pricing => "/pricing",
            Route::AdminDashboard => "/admin-dashboard",
            Route::Dashboard => "/dashboard",
            Route::EditPricing => "/edit-pricing",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Login | Route::Signup => Access::AnonymousOnly,
            Route::Pricing => Access::Public,
            Route::SubmitAssignment
            | Route::AdminDashboard
            | Route::Dashboard
            | Route::EditPricing => Access::Authenticated,
        }
    }

    /// Matches a path, ignoring any query string or fragment and a trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::from_path(s).ok_or_else(|| RouteError::NotFound(s.to_string()))
    }
}
