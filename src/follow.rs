//! Makes every user in the tenant follow the configured site.

use std::io::Write;

use anyhow::Result;
use chrono::Duration;
use tracing::{info, warn};

use crate::auth::oauth::OAuth2Client;
use crate::auth::token::{format_duration, lifetime_from_secs, AccessToken};
use crate::config::Config;
use crate::error::AppError;
use crate::graph::{auth_headers, FollowOutcome, GraphClient, User};

/// Run the whole batch, writing progress lines to `out`.
///
/// Token and listing failures abort the run. A failed follow call is
/// reported for that user and the loop moves on.
pub async fn run(config: &Config, out: &mut impl Write) -> Result<()> {
    let oauth_client = OAuth2Client::new(config)?;
    let graph_client = GraphClient::new(config)?;

    let token = oauth_client.acquire_token().await.map_err(AppError::from)?;
    match token.time_remaining() {
        Some(left) => info!("Access token acquired, valid for {}", format_duration(left)),
        None => info!("Access token acquired"),
    }

    let headers = auth_headers(&token).map_err(AppError::from)?;

    let users: Vec<User> = graph_client
        .fetch_all(&config.users_url(), &headers)
        .await
        .map_err(AppError::from)?;
    writeln!(out, "Found {} users", users.len()).map_err(AppError::from)?;

    let site_id = config.site.site_id.as_str();
    let mut expiry = ExpiryWatch::new(config.token.expiry_warning_seconds);

    for user in &users {
        writeln!(out, "\nProcessing user: {}", user.label()).map_err(AppError::from)?;
        expiry.check(&token);

        match graph_client
            .follow_site(&user.id, site_id, &headers)
            .await
            .map_err(AppError::from)?
        {
            FollowOutcome::Followed => {
                info!("{} now follows {}", user.label(), site_id);
                writeln!(out, "    ✅ User {} now follows site {}", user.id, site_id)
                    .map_err(AppError::from)?;
            }
            FollowOutcome::Failed { status, body } => {
                warn!("Follow failed for {}: HTTP {} - {}", user.label(), status, body);
                writeln!(out, "    ❌ Failed for {}: {}", user.id, body)
                    .map_err(AppError::from)?;
            }
        }
    }

    Ok(())
}

/// Warns (once each) when the token is about to expire and when it has.
/// The token is never refreshed, so calls after expiry will fail.
struct ExpiryWatch {
    window: Duration,
    warned_expiring: bool,
    warned_expired: bool,
}

impl ExpiryWatch {
    /// A window too large to represent is clamped, so the warning always fires.
    fn new(window_seconds: u64) -> Self {
        Self {
            window: lifetime_from_secs(window_seconds).unwrap_or(Duration::MAX),
            warned_expiring: false,
            warned_expired: false,
        }
    }

    fn check(&mut self, token: &AccessToken) {
        if token.is_expired() {
            if !self.warned_expired {
                if let Some(at) = token.expires_at() {
                    warn!("Access token expired at {}; remaining calls will be rejected", at);
                }
                self.warned_expired = true;
            }
        } else if !self.warned_expiring && token.expires_within(self.window) {
            if let Some(left) = token.time_remaining() {
                warn!(
                    "Access token expires in {} and will not be refreshed",
                    format_duration(left)
                );
            }
            self.warned_expiring = true;
        }
    }
}
