//! HTTP client for the ArgentBank REST API.
//!
//! Responses arrive in a `{ status, message, body }` envelope; only the body
//! is surfaced to callers. Requests carry `Authorization: Bearer <token>`
//! when a session token is present and no Authorization header at all when
//! it is not.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::models::{Account, Profile, ProfilePatch, Transaction, TransactionPatch};

use super::{ApiError, Gateway};

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response envelope wrapping every API payload.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    body: T,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    token: String,
}

/// API client for the ArgentBank service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.headers(self.auth_headers()?).send().await?;
        let response = Self::check_response(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.body)
    }

    /// Like `request`, for endpoints whose body carries nothing we need.
    async fn request_empty(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let response = builder.headers(self.auth_headers()?).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl Gateway for ApiClient {
    fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    fn clear_token(&mut self) {
        self.token = None;
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        debug!(email, "Sending login request");
        let login: LoginBody = self
            .request(self.client.post(self.url("/user/login")).json(&body))
            .await?;
        Ok(login.token)
    }

    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        self.request(self.client.post(self.url("/user/profile")))
            .await
    }

    async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile, ApiError> {
        self.request(self.client.put(self.url("/user/profile")).json(patch))
            .await
    }

    async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<Account>, ApiError> {
        let path = format!("/users/{}/accounts", user_id);
        self.request(self.client.get(self.url(&path))).await
    }

    async fn fetch_transactions(&self, account_id: &str) -> Result<Vec<Transaction>, ApiError> {
        let path = format!("/accounts/{}/transactions", account_id);
        self.request(self.client.get(self.url(&path))).await
    }

    async fn fetch_transaction(&self, transaction_id: &str) -> Result<Transaction, ApiError> {
        let path = format!("/transactions/{}", transaction_id);
        self.request(self.client.get(self.url(&path))).await
    }

    async fn update_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
        patch: &TransactionPatch,
    ) -> Result<Transaction, ApiError> {
        let path = format!("/accounts/{}/transactions/{}", account_id, transaction_id);
        self.request(self.client.put(self.url(&path)).json(patch))
            .await
    }

    async fn delete_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/accounts/{}/transactions/{}", account_id, transaction_id);
        self.request_empty(self.client.delete(self.url(&path)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_header_present_only_with_token() {
        let mut client = ApiClient::new("http://localhost:3001/api/v1").expect("client");

        let headers = client.auth_headers().expect("headers");
        assert!(headers.get(header::AUTHORIZATION).is_none());

        client.set_token("abc123");
        let headers = client.auth_headers().expect("headers");
        assert_eq!(
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer abc123")
        );

        client.clear_token();
        let headers = client.auth_headers().expect("headers");
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_envelope_parsing() {
        let json = r#"{
            "status": 200,
            "message": "User successfully logged in",
            "body": { "token": "jwt-token-here" }
        }"#;
        let envelope: Envelope<LoginBody> = serde_json::from_str(json).expect("parse");
        assert_eq!(envelope.body.token, "jwt-token-here");
    }
}
