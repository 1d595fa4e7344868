//! Page controllers.
//!
//! Each controller awaits its backend call, updates local state only on
//! success and reports the outcome through the application's `Notifier`.
//! Failures keep the previous state and surface as an error toast.

pub mod admin_dashboard;
pub mod login;
pub mod pricing;
pub mod signup;
pub mod submit_assignment;
pub mod user_dashboard;

pub use admin_dashboard::AdminDashboard;
pub use login::LoginForm;
pub use pricing::{EditPricing, PricingPage, PricingView, SaveOutcome};
pub use signup::{AdminSignupForm, SignupForm};
pub use submit_assignment::SubmitAssignmentForm;
pub use user_dashboard::UserDashboard;

use tracing::warn;

use crate::api::ApiError;
use crate::routes::{GuardDecision, Route};
use crate::session::{LoginError, Session};
use crate::state::AppState;
use crate::utils::notifier::Toast;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// The page does not render for this session; go to the given route instead.
    #[error("redirected to {0}")]
    Redirect(Route),
    /// The page renders nothing for this session.
    #[error("this page is only available to administrators")]
    Forbidden,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the route's guard against the current Session.
pub(crate) fn enter(state: &AppState, route: Route) -> Result<Session, PageError> {
    let session = state.session();
    match state.router.decide(route, &session) {
        GuardDecision::Allow => Ok(session),
        GuardDecision::Redirect(target) => Err(PageError::Redirect(target)),
    }
}

/// Toasts a validation message and turns it into an error.
pub(crate) fn reject(state: &AppState, message: &str) -> PageError {
    state.notifier.notify(Toast::error(message));
    PageError::Validation(message.to_string())
}

/// Toasts `message` for a failed backend call and hands the error back.
pub(crate) fn failed(state: &AppState, err: impl Into<PageError>, message: &str) -> PageError {
    let err = err.into();
    warn!(error = %err, "{}", message);
    state.notifier.notify(Toast::error(message));
    err
}
