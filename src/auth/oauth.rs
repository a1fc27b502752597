//! OAuth2 client-credentials flow against Azure AD.

use crate::auth::token::AccessToken;
use crate::config::Config;
use crate::error::AuthError;
use crate::secure::SecureString;
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, error};

/// OAuth2 client authenticating as the application itself.
pub struct OAuth2Client {
    token_url: String,
    client_id: String,
    client_secret: SecureString,
    scope: String,
    http_client: reqwest::Client,
}

impl OAuth2Client {
    /// Create a new OAuth2 client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http.timeout())
            .connect_timeout(config.http.connect_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            token_url: config.token_url(),
            client_id: config.oauth.client_id.clone(),
            client_secret: config.oauth.client_secret.clone(),
            scope: config.oauth.scope.clone(),
            http_client,
        })
    }

    /// Acquire an access token with the client-credentials grant.
    ///
    /// Issues a single request; failures are not retried.
    pub async fn acquire_token(&self) -> Result<AccessToken, AuthError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        debug!("Requesting token from {}", self.token_url);

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !status.is_success() {
            error!("Token request failed: HTTP {} - {}", status, body);
            return Err(AuthError::AuthenticationFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_token_response(&body)
    }
}

/// Token response from Azure AD.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

fn parse_token_response(body: &str) -> Result<AccessToken, AuthError> {
    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    match response.access_token {
        Some(token) if !token.is_empty() => Ok(AccessToken::new(token, response.expires_in)),
        _ => Err(AuthError::MalformedResponse(
            "access_token missing from response".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OAuth2Client {
        let mut config = test_config();
        config.oauth.authority = server.uri();
        OAuth2Client::new(&config).unwrap()
    }

    #[test]
    fn test_parse_token_response() {
        let token = parse_token_response(r#"{"access_token":"T1","expires_in":3599}"#).unwrap();
        assert_eq!(token.secret(), "T1");
        assert!(token.expires_at().is_some());
    }

    #[test]
    fn test_parse_token_response_oversized_lifetime() {
        for body in [
            r#"{"access_token":"T1","expires_in":10000000000000000}"#,
            r#"{"access_token":"T1","expires_in":18446744073709551615}"#,
        ] {
            let token = parse_token_response(body).unwrap();
            assert_eq!(token.secret(), "T1");
            assert!(token.expires_at().is_none());
            assert!(!token.is_expired());
        }
    }

    #[test]
    fn test_parse_token_response_missing_field() {
        let result = parse_token_response(r#"{"token_type":"Bearer"}"#);
        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));

        let result = parse_token_response(r#"{"access_token":""}"#);
        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));

        let result = parse_token_response("<html>oops</html>");
        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_acquire_token_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=test-client"))
            .and(body_string_contains("client_secret=test-secret"))
            .and(body_string_contains(
                "scope=https%3A%2F%2Fgraph.microsoft.com%2F.default",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "T1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server).acquire_token().await.unwrap();
        assert_eq!(token.secret(), "T1");
        assert!(!token.is_expired());
    }

    #[tokio::test]
    async fn test_acquire_token_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let result = client_for(&server).acquire_token().await;
        match result {
            Err(AuthError::AuthenticationFailed { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid_client");
            }
            other => panic!("expected AuthenticationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_acquire_token_missing_access_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).acquire_token().await;
        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }
}
