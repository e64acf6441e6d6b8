//! HTTP transport for the AKSes REST service.
//!
//! `ApiClient` owns one pooled `reqwest::Client` and knows the three request
//! shapes the portal needs: the password challenge, the login, and
//! authenticated GETs returning opaque JSON.

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{endpoints, user_agent, ApiError};
use crate::config::ClientConfig;

// ============================================================================
// Constants
// ============================================================================

/// Client identifier the portal's web frontend sends at login.
const LOGIN_CLIENT_ID: &str = "1";

/// Application type the portal's web frontend sends at login.
const LOGIN_APP_TYPE: &str = "web";

/// Language of server messages on the login endpoint.
const LOGIN_LANG: &str = "id";

#[derive(Debug, Deserialize)]
struct GeneratedPasswordResponse {
    #[serde(default)]
    data: Vec<GeneratedPassword>,
}

#[derive(Debug, Deserialize)]
struct GeneratedPassword {
    pass: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    id: &'a str,
    #[serde(rename = "appType")]
    app_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    validation: String,
}

/// API client for the AKSes service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    referer: String,
}

impl ApiClient {
    /// Create a new API client. The underlying connection pool is built here
    /// once and shared by every clone.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            referer: config.referer.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(header::REFERER, &self.referer)
            .header(header::USER_AGENT, user_agent::random())
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    // ===== Login protocol =====

    /// Exchange an encoded challenge parameter for the server-issued login hash.
    pub async fn generate_hashed_password(&self, encoded_param: &str) -> Result<String, ApiError> {
        let response = self
            .request(Method::GET, endpoints::GENERATE_HASHED_PASSWORD)
            .query(&[("param", encoded_param)])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let parsed: GeneratedPasswordResponse =
            Self::read_json(response, "generated password response").await?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.pass)
            .ok_or_else(|| {
                ApiError::InvalidResponse("Generated password response has no data".to_string())
            })
    }

    /// Log in with an already hashed password and return the bearer token.
    pub async fn login(&self, username: &str, hashed_password: &str) -> Result<String, ApiError> {
        let body = LoginRequest {
            username,
            password: hashed_password,
            id: LOGIN_CLIENT_ID,
            app_type: LOGIN_APP_TYPE,
        };

        let response = self
            .request(Method::POST, endpoints::LOGIN)
            .query(&[("lang", LOGIN_LANG)])
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let parsed: LoginResponse = Self::read_json(response, "login response").await?;
        Ok(parsed.validation)
    }

    // ===== Data fetching =====

    /// GET a data endpoint with the bearer token and return the JSON body unchanged.
    pub async fn get_json(&self, path: &str, token: &str) -> Result<Value, ApiError> {
        debug!(path = path, "GET");
        let response = self
            .request(Method::GET, path)
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::read_json(response, path).await
    }
}
