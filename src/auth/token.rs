//! Access token with expiry tracking.
//!
//! The token is acquired once per run and never refreshed. Expiry is only
//! tracked so the orchestrator can warn when later calls are likely to fail.

use chrono::{DateTime, Duration, Utc};

use crate::secure::SecureString;

/// Bearer token issued by the token endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken {
    secret: SecureString,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token that expires `expires_in` seconds from now, if known.
    ///
    /// A lifetime too large to represent is treated as unknown.
    pub fn new(secret: impl Into<String>, expires_in: Option<u64>) -> Self {
        let expires_at = expires_in
            .and_then(lifetime_from_secs)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        Self::with_expiry(secret, expires_at)
    }

    pub fn with_expiry(secret: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: SecureString::new(secret),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Time left until expiry. `None` when the endpoint gave no lifetime.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|at| {
            let now = Utc::now();
            if at > now {
                at - now
            } else {
                Duration::zero()
            }
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// True when the token expires within `window` (or already has).
    pub fn expires_within(&self, window: Duration) -> bool {
        self.time_remaining().is_some_and(|left| left <= window)
    }
}

/// Convert a lifetime in seconds, `None` when it does not fit a `Duration`.
pub fn lifetime_from_secs(secs: u64) -> Option<Duration> {
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}

/// Remaining token lifetime for log lines: seconds precision close to
/// expiry, coarser further out (e.g. "42s", "4m 05s", "38 min", "1h 15m").
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    match minutes {
        0 => format!("{}s", seconds),
        1..=9 => format!("{}m {:02}s", minutes, seconds),
        10..=59 => format!("{} min", minutes),
        _ if minutes % 60 == 0 => format!("{}h", minutes / 60),
        _ => format!("{}h {}m", minutes / 60, minutes % 60),
    }
}
