//! Minimal client for the Pushover message API.

mod error;

pub use error::PushoverError;

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_API_URL: &str = "https://api.pushover.net/1/messages.json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub user: String,
}

pub struct Client {
    http: reqwest::Client,
    api_url: String,
    credentials: Credentials,
}

/// The API reports success as `"status": 1`; anything else comes with a
/// list of human-readable errors.
#[derive(Deserialize)]
struct ApiResponse {
    status: i64,
    #[serde(default)]
    errors: Vec<String>,
}

impl Client {
    pub fn new(credentials: Credentials) -> Result<Self, PushoverError> {
        Self::with_api_url(credentials, DEFAULT_API_URL)
    }

    pub fn with_api_url(
        credentials: Credentials,
        api_url: impl Into<String>,
    ) -> Result<Self, PushoverError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            credentials,
        })
    }

    pub async fn send(&self, title: &str, message: &str) -> Result<(), PushoverError> {
        let response = self
            .http
            .post(&self.api_url)
            .json(&json!({
                "token": self.credentials.token,
                "user": self.credentials.user,
                "title": title,
                "message": message,
            }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body: ApiResponse = serde_json::from_str(&text).unwrap_or(ApiResponse {
            status: 0,
            errors: Vec::new(),
        });

        if status.is_success() && body.status == 1 {
            return Ok(());
        }
        let errors = if body.errors.is_empty() {
            vec![format!("HTTP {status}")]
        } else {
            body.errors
        };
        Err(PushoverError::Api { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials {
            token: "app-token".to_string(),
            user: "user-key".to_string(),
        }
    }

    async fn client_for(server: &MockServer) -> Client {
        Client::with_api_url(credentials(), format!("{}/1/messages.json", server.uri()))
            .expect("client builds")
    }

    #[tokio::test]
    async fn sends_credentials_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/messages.json"))
            .and(body_partial_json(serde_json::json!({
                "token": "app-token",
                "user": "user-key",
                "title": "Claude Code - Task finished",
                "message": "done",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": 1, "request": "uuid"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .send("Claude Code - Task finished", "done")
            .await
            .expect("send succeeds");
    }

    #[tokio::test]
    async fn surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "status": 0, "errors": ["application token is invalid"]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.send("t", "m").await.expect_err("must fail");

        match err {
            PushoverError::Api { errors } => {
                assert_eq!(errors, vec!["application token is invalid".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway timeout"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.send("t", "m").await.expect_err("must fail");

        assert!(err.to_string().contains("HTTP 500"));
    }
}
