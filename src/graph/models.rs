//! Microsoft Graph data models.

use serde::{Deserialize, Serialize};

/// One page of a Graph collection response.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Continuation URL; absent on the last page.
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// A directory user as returned by `/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user.
    pub id: String,

    /// User Principal Name (typically email-like format).
    pub user_principal_name: Option<String>,
}

impl User {
    /// Name shown in progress output: the UPN, or the id when there is none.
    pub fn label(&self) -> &str {
        self.user_principal_name.as_deref().unwrap_or(&self.id)
    }
}

/// Body of `POST /users/{id}/followedSites/add`.
#[derive(Debug, Serialize)]
pub struct FollowedSitesRequest<'a> {
    pub value: Vec<SiteRef<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SiteRef<'a> {
    pub id: &'a str,
}

impl<'a> FollowedSitesRequest<'a> {
    pub fn single(site_id: &'a str) -> Self {
        Self {
            value: vec![SiteRef { id: site_id }],
        }
    }
}

/// Result of a follow call for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    /// Graph answered 200 or 204.
    Followed,
    /// Any other status; the body is kept for diagnostics.
    Failed { status: u16, body: String },
}

impl FollowOutcome {
    pub fn from_response(status: u16, body: String) -> Self {
        match status {
            200 | 204 => Self::Followed,
            _ => Self::Failed { status, body },
        }
    }
}
