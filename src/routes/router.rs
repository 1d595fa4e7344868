use tracing::debug;

use super::guards::{evaluate, GuardDecision};
use super::Route;
use crate::config::AuthenticatedPolicy;
use crate::session::Session;

/// Upper bound on redirects followed by one navigation.
pub const MAX_REDIRECTS: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    NotFound(String),
    #[error("redirect loop: {}", format_chain(.0))]
    RedirectLoop(Vec<Route>),
}

fn format_chain(chain: &[Route]) -> String {
    chain
        .iter()
        .map(Route::path)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result of a navigation: what was asked for, what renders, and the redirects in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    pub rendered: Route,
    pub redirects: Vec<Route>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// Resolves paths against the route table and guards.
#[derive(Debug, Clone, Copy, Default)]
pub struct Router {
    policy: AuthenticatedPolicy,
}

impl Router {
    pub fn new(policy: AuthenticatedPolicy) -> Self {
        Router { policy }
    }

    pub fn policy(&self) -> AuthenticatedPolicy {
        self.policy
    }

    /// Single guard evaluation for one route.
    pub fn decide(&self, route: Route, session: &Session) -> GuardDecision {
        evaluate(route, session, self.policy)
    }

    pub fn navigate(&self, path: &str, session: &Session) -> Result<Navigation, RouteError> {
        let route = path.parse::<Route>()?;
        self.resolve(route, session)
    }

    /// Follows guard redirects until a route renders.
    pub fn resolve(&self, requested: Route, session: &Session) -> Result<Navigation, RouteError> {
        let mut current = requested;
        let mut redirects = Vec::new();
        loop {
            match self.decide(current, session) {
                GuardDecision::Allow => {
                    debug!(
                        "Navigation to {} renders {} after {} redirect(s)",
                        requested,
                        current,
                        redirects.len()
                    );
                    return Ok(Navigation {
                        requested,
                        rendered: current,
                        redirects,
                    });
                }
                GuardDecision::Redirect(next) => {
                    redirects.push(next);
                    if redirects.len() > MAX_REDIRECTS || next == requested {
                        let mut chain = vec![requested];
                        chain.extend(redirects);
                        return Err(RouteError::RedirectLoop(chain));
                    }
                    current = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Identity, Role};

    fn admin() -> Session {
        Session::from_identity(Identity::new("a", "Admin", "a@x.io", Role::Admin))
    }

    fn user() -> Session {
        Session::from_identity(Identity::new("u", "User", "u@x.io", Role::User))
    }

    #[test]
    fn test_anonymous_dashboard_lands_on_login() {
        let nav = Router::default()
            .navigate("/dashboard", &Session::empty())
            .unwrap();
        assert_eq!(nav.rendered, Route::Login);
        assert_eq!(nav.redirects, vec![Route::Login]);
    }

    #[test]
    fn test_logged_in_home_goes_to_dashboard() {
        let router = Router::default();
        assert_eq!(
            router.navigate("/", &user()).unwrap().rendered,
            Route::Dashboard
        );
        assert_eq!(
            router.navigate("/login", &admin()).unwrap().rendered,
            Route::AdminDashboard
        );
    }

    #[test]
    fn test_direct_render_has_no_redirects() {
        let nav = Router::default().navigate("/pricing", &admin()).unwrap();
        assert!(!nav.was_redirected());
        assert_eq!(nav.rendered, Route::Pricing);
    }

    #[test]
    fn test_relocate_admins_policy() {
        let router = Router::new(AuthenticatedPolicy::RelocateAdmins);
        let nav = router.navigate("/submit-assignment", &admin()).unwrap();
        assert_eq!(nav.rendered, Route::AdminDashboard);

        let nav = router.navigate("/submit-assignment", &user()).unwrap();
        assert_eq!(nav.rendered, Route::SubmitAssignment);
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(
            Router::default().navigate("/admin/login", &Session::empty()),
            Err(RouteError::NotFound("/admin/login".to_string()))
        );
    }

    #[test]
    fn test_every_route_resolves_for_every_session() {
        for policy in [
            AuthenticatedPolicy::RenderAll,
            AuthenticatedPolicy::RelocateAdmins,
        ] {
            let router = Router::new(policy);
            for session in [Session::empty(), user(), admin()] {
                for route in Route::ALL {
                    assert!(router.resolve(route, &session).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_loop_error_formats_chain() {
        let err = RouteError::RedirectLoop(vec![Route::Dashboard, Route::Login, Route::Dashboard]);
        assert_eq!(
            err.to_string(),
            "redirect loop: /dashboard -> /login -> /dashboard"
        );
    }
}
