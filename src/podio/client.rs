use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::error::PodioError;
use crate::config::{AppCredentials, PodioConfig};

/// Tokens are renewed once they are this close to expiring.
const REFRESH_MARGIN: TimeDelta = TimeDelta::seconds(30);
/// Lifetime assumed when the token response carries no `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Everything the app grant needs, kept for token renewal.
#[derive(Clone)]
struct AppGrant {
    token_url: String,
    client_id: String,
    client_secret: String,
    app_id: String,
    app_token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

/// An authenticated session scoped to one Podio application.
pub struct PodioClient {
    http: reqwest::Client,
    grant: AppGrant,
    token: Mutex<AccessToken>,
}

impl PodioClient {
    /// Authenticates against Podio with the app grant for `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, the token endpoint
    /// is unreachable, or Podio rejects the credentials.
    pub async fn connect(config: &PodioConfig, app: &AppCredentials) -> Result<Self, PodioError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()?;
        let grant = AppGrant {
            token_url: config.token_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            app_id: app.app_id.clone(),
            app_token: app.app_token.clone(),
        };

        let token = request_token(&http, &grant).await?;
        info!(
            app_id = grant.app_id.as_str(),
            expires_at = %token.expires_at,
            "Authenticated with Podio"
        );

        Ok(Self {
            http,
            grant,
            token: Mutex::new(token),
        })
    }

    pub fn app_id(&self) -> &str {
        &self.grant.app_id
    }

    /// Whether the cached token is still usable without renewal.
    pub async fn is_token_fresh(&self) -> bool {
        self.token.lock().await.is_fresh_at(Utc::now())
    }

    /// Returns a valid access token, renewing the cached one if it is about to expire.
    pub async fn access_token(&self) -> Result<String, PodioError> {
        let mut token = self.token.lock().await;
        if token.is_fresh_at(Utc::now()) {
            return Ok(token.value.clone());
        }

        debug!(
            app_id = self.grant.app_id.as_str(),
            "Podio access token expired, requesting a new one"
        );
        *token = request_token(&self.http, &self.grant).await?;
        Ok(token.value.clone())
    }
}

/// Performs the `grant_type=app` exchange against the token endpoint.
async fn request_token(http: &reqwest::Client, grant: &AppGrant) -> Result<AccessToken, PodioError> {
    debug!("Requesting Podio app token from: {}", grant.token_url);
    let form = [
        ("grant_type", "app"),
        ("client_id", grant.client_id.as_str()),
        ("client_secret", grant.client_secret.as_str()),
        ("app_id", grant.app_id.as_str()),
        ("app_token", grant.app_token.as_str()),
    ];
    let response = http.post(&grant.token_url).form(&form).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PodioError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .json::<TokenResponse>()
        .await
        .map_err(|e| PodioError::InvalidResponse(format!("error parsing token JSON: {}", e)))?;
    let value = body
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PodioError::InvalidResponse("missing access_token".to_string()))?;
    let expires_in = body.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
    let expires_at = TimeDelta::try_seconds(expires_in)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| {
            PodioError::InvalidResponse(format!("invalid expires_in: {}", expires_in))
        })?;

    Ok(AccessToken { value, expires_at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config_for(url: String) -> PodioConfig {
        PodioConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            contacts: AppCredentials {
                app_id: "100".to_string(),
                app_token: "contacts-token".to_string(),
            },
            leads: AppCredentials {
                app_id: "200".to_string(),
                app_token: "leads-token".to_string(),
            },
            api_url: url,
            timeout_in_ms: 2_000,
        }
    }

    fn grant_body() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "app".into()),
            Matcher::UrlEncoded("client_id".into(), "client".into()),
            Matcher::UrlEncoded("client_secret".into(), "secret".into()),
            Matcher::UrlEncoded("app_id".into(), "200".into()),
            Matcher::UrlEncoded("app_token".into(), "leads-token".into()),
        ])
    }

    #[test]
    fn token_is_stale_inside_refresh_margin() {
        let now = Utc::now();
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: now + TimeDelta::seconds(20),
        };
        assert!(!token.is_fresh_at(now));
        assert!(token.is_fresh_at(now - TimeDelta::seconds(20)));
    }

    #[tokio::test]
    async fn connect_performs_app_grant() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(grant_body())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "abc", "expires_in": 28800}"#)
            .expect(1)
            .create_async()
            .await;

        let config = config_for(server.url());
        let client = PodioClient::connect(&config, &config.leads).await.unwrap();

        assert_eq!(client.app_id(), "200");
        assert!(client.is_token_fresh().await);
        assert_eq!(client.access_token().await.unwrap(), "abc");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn missing_expires_in_defaults_to_an_hour() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_body(r#"{"access_token": "abc"}"#)
            .create_async()
            .await;

        let config = config_for(server.url());
        let client = PodioClient::connect(&config, &config.leads).await.unwrap();
        m.assert_async().await;

        let expires_at = client.token.lock().await.expires_at;
        let remaining = expires_at - Utc::now();
        assert!(remaining > TimeDelta::seconds(3500));
        assert!(remaining <= TimeDelta::seconds(DEFAULT_EXPIRES_IN_SECS));
    }

    #[tokio::test]
    async fn short_lived_token_is_renewed() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_body(r#"{"access_token": "short", "expires_in": 10}"#)
            .expect(2)
            .create_async()
            .await;

        let config = config_for(server.url());
        let client = PodioClient::connect(&config, &config.leads).await.unwrap();
        assert!(!client.is_token_fresh().await);

        assert_eq!(client.access_token().await.unwrap(), "short");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_credentials_fail_to_connect() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth/token")
            .with_status(401)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let config = config_for(server.url());
        let result = PodioClient::connect(&config, &config.leads).await;
        m.assert_async().await;

        match result {
            Err(PodioError::Rejected { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid_grant"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connect should fail"),
        }
    }

    #[tokio::test]
    async fn response_without_token_is_invalid() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_body(r#"{"expires_in": 3600}"#)
            .create_async()
            .await;

        let config = config_for(server.url());
        let result = PodioClient::connect(&config, &config.leads).await;
        m.assert_async().await;
        assert!(matches!(result, Err(PodioError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn out_of_range_expires_in_is_invalid() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_body(r#"{"access_token": "abc", "expires_in": 9223372036854775807}"#)
            .create_async()
            .await;

        let config = config_for(server.url());
        let result = PodioClient::connect(&config, &config.leads).await;
        m.assert_async().await;
        match result {
            Err(PodioError::InvalidResponse(reason)) => assert!(reason.contains("expires_in")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connect should fail"),
        }
    }
}
