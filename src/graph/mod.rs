//! Microsoft Graph integration: paginated listing and the followed-sites action.

pub mod client;
pub mod models;

pub use client::{auth_headers, GraphClient};
pub use models::{FollowOutcome, User};
