//! Microsoft Graph API client for listing users and following sites.

use crate::auth::token::AccessToken;
use crate::config::Config;
use crate::error::ApiError;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use super::models::{FollowOutcome, FollowedSitesRequest, Page};

/// Build the headers sent with every Graph request.
pub fn auth_headers(token: &AccessToken) -> Result<HeaderMap, ApiError> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.secret()))
        .map_err(|_| ApiError::InvalidHeader)?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Microsoft Graph API client.
pub struct GraphClient {
    http_client: reqwest::Client,
    config: Config,
}

impl GraphClient {
    /// Create a new Graph client.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http.timeout())
            .connect_timeout(config.http.connect_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Fetch every item of a paginated collection, following `@odata.nextLink`.
    ///
    /// The whole collection is materialized before returning. Any non-success
    /// status aborts the fetch and the items gathered so far are dropped.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        start_url: &str,
        headers: &HeaderMap,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut next = Some(start_url.to_string());
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            pages += 1;
            debug!("Fetching page {} from {}", pages, url);

            let response = self
                .http_client
                .get(&url)
                .headers(headers.clone())
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = body_or_empty(response.text().await, &url);
                error!("Listing page {} failed: HTTP {} - {}", pages, status, body);
                return Err(ApiError::FetchFailed {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: Page<T> = response
                .json()
                .await
                .map_err(|e| ApiError::ParseFailed(e.to_string()))?;

            debug!("Page {} returned {} items", pages, page.value.len());
            items.extend(page.value);

            next = page
                .next_link
                .map(|link| {
                    Url::parse(&link)
                        .map(String::from)
                        .map_err(|e| ApiError::ParseFailed(format!("bad nextLink {}: {}", link, e)))
                })
                .transpose()?;
        }

        Ok(items)
    }

    /// Add `site_id` to the followed sites of `user_id`.
    ///
    /// Non-success statuses are reported as `FollowOutcome::Failed`, not as errors.
    pub async fn follow_site(
        &self,
        user_id: &str,
        site_id: &str,
        headers: &HeaderMap,
    ) -> Result<FollowOutcome, ApiError> {
        let url = self.config.follow_url(user_id);

        let response = self
            .http_client
            .post(&url)
            .headers(headers.clone())
            .json(&FollowedSitesRequest::single(site_id))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = body_or_empty(response.text().await, &url);

        Ok(FollowOutcome::from_response(status, body))
    }
}

/// Response body used as diagnostic text. A body that cannot be read is
/// logged and reported as empty.
fn body_or_empty<E: std::fmt::Display>(body: Result<String, E>, url: &str) -> String {
    match body {
        Ok(text) => text,
        Err(e) => {
            debug!("Could not read response body from {}: {}", url, e);
            String::new()
        }
    }
}
