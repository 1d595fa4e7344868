use super::Route;
use crate::config::AuthenticatedPolicy;
use crate::session::Session;

/// The outcome of one guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Where an authenticated visitor lands by default.
pub fn home_for(session: &Session) -> Route {
    if session.is_admin() {
        Route::AdminDashboard
    } else {
        Route::Dashboard
    }
}

/// Gate for pages that only make sense without a session (home, login, sign-up).
pub fn anonymous_only(session: &Session) -> GuardDecision {
    if session.is_authenticated() {
        GuardDecision::Redirect(home_for(session))
    } else {
        GuardDecision::Allow
    }
}

/// Gate for pages that need a session.
pub fn authenticated(
    session: &Session,
    requested: Route,
    policy: AuthenticatedPolicy,
) -> GuardDecision {
    if !session.is_authenticated() {
        return GuardDecision::Redirect(Route::Login);
    }
    match policy {
        AuthenticatedPolicy::RenderAll => GuardDecision::Allow,
        AuthenticatedPolicy::RelocateAdmins
            if session.is_admin() && requested != Route::AdminDashboard =>
        {
            GuardDecision::Redirect(Route::AdminDashboard)
        }
        AuthenticatedPolicy::RelocateAdmins => GuardDecision::Allow,
    }
}

/// Applies whichever guard wraps `route`.
pub fn evaluate(route: Route, session: &Session, policy: AuthenticatedPolicy) -> GuardDecision {
    match route.access() {
        super::Access::Public => GuardDecision::Allow,
        super::Access::AnonymousOnly => anonymous_only(session),
        super::Access::Authenticated => authenticated(session, route, policy),
    }
}
