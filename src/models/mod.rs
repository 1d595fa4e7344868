pub mod assignment;
pub mod auth;
pub mod identity;
pub mod pricing;

pub use assignment::{Assignment, AssignmentStatus, Attachment, NewAssignment, Submitter};
pub use auth::{LoginRequest, LoginResponse, SignupRequest, VerifyResponse};
pub use identity::{Identity, Role};
pub use pricing::{Pricing, PricingDocument, PricingTier, Tier};
