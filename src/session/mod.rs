//! Who is logged in, and the only code allowed to change that.

pub mod session;
pub mod store;

pub use session::Session;
pub use store::{LoginError, SessionStore, TOKEN_KEY};
