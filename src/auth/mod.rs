//! Azure AD authentication module.
//!
//! Provides the OAuth2 client-credentials flow and the resulting access token.

pub mod oauth;
pub mod token;
