//! Error types for the sitefollow application.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.
//! A failed follow call for a single user is not an error here; see `FollowOutcome`.

use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Token endpoint errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed: HTTP {status} - {body}")]
    AuthenticationFailed { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    #[error("Token request could not be sent: {0}")]
    Request(String),
}

/// Microsoft Graph API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Listing request failed: HTTP {status} - {body}")]
    FetchFailed { status: u16, body: String },

    #[error("Failed to parse API response: {0}")]
    ParseFailed(String),

    #[error("Graph API request failed: {0}")]
    Request(String),

    #[error("Access token cannot be used as a header value")]
    InvalidHeader,
}

impl AppError {
    /// Returns a user-friendly message for the console.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Auth(AuthError::AuthenticationFailed { status: 400 | 401, .. }) => {
                "Sign-in rejected. Check the tenant, client ID and client secret."
            }
            Self::Auth(AuthError::AuthenticationFailed { .. }) => {
                "The identity provider refused to issue a token."
            }
            Self::Auth(AuthError::MalformedResponse(_)) => {
                "Unexpected response from the token endpoint."
            }
            Self::Api(ApiError::FetchFailed { status: 401, .. }) => {
                "Graph rejected the access token. It may have expired."
            }
            Self::Api(ApiError::FetchFailed { status: 403, .. }) => {
                "Insufficient permissions. The application needs User.Read.All."
            }
            Self::Api(ApiError::FetchFailed { .. }) => "Failed to list users.",
            Self::Api(ApiError::ParseFailed(_)) => "Unexpected response from Microsoft Graph.",
            Self::Auth(AuthError::Request(_)) | Self::Api(ApiError::Request(_)) => {
                "Network error. Check your connection."
            }
            Self::Config(_) => "Configuration error. Please check settings.",
            _ => "An error occurred.",
        }
    }
}
