//! Client-side routes and the guards that gate them.
//!
//! Route resolution is a pure function of the current Session snapshot and the
//! requested path: nothing is cached between navigations, so a Session
//! transition followed by a fresh `Router::navigate` always reflects it.

pub mod guards;
pub mod menu;
pub mod route;
pub mod router;

pub use guards::GuardDecision;
pub use menu::{menu, MenuAction, MenuItem};
pub use route::{Access, Route};
pub use router::{Navigation, RouteError, Router, MAX_REDIRECTS};
