//! Blocking HTTP client for the story service.

use reqwest::blocking::{Client, Request, RequestBuilder, Response};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ApiError, TokenSource};

/// Connection settings for the story service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Token and role issued by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub token: String,
    #[serde(default)]
    pub role: String,
}

/// Sign-in and sign-up against the story service.
///
/// Implemented by [`HttpApi`]; the TUI depends on this trait so its forms can
/// be driven without a network.
pub trait Authenticator {
    /// Exchange email and password for credentials.
    fn login(&self, email: &str, password: &str) -> Result<Credentials, ApiError>;

    /// Create an account. No session is issued.
    fn signup(&self, email: &str, password: &str) -> Result<String, ApiError>;
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

/// Story service client.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    /// Create a client for the configured service.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        log::debug!("Created story service client for {}", config.base_url);
        Ok(Self { client, config })
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Full URL for an endpoint path.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Build an authorized GET request, reading the token from `tokens` now.
    pub fn build_get(&self, tokens: &dyn TokenSource, endpoint: &str) -> Result<Request, ApiError> {
        let builder = self.client.get(self.url(endpoint));
        Ok(authorize(builder, tokens)?.build()?)
    }

    /// Authorized GET returning the JSON body.
    pub fn get(
        &self,
        tokens: &dyn TokenSource,
        endpoint: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let request = self.build_get(tokens, endpoint)?;
        log::debug!("GET {}", request.url());
        let response = self.client.execute(request)?;
        let response = check_status(response)?;
        response
            .json()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    fn post_credentials(&self, endpoint: &str, email: &str, password: &str) -> Result<Response, ApiError> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&CredentialsBody { email, password })
            .send()?;
        check_status(response)
    }
}

impl Authenticator for HttpApi {
    fn login(&self, email: &str, password: &str) -> Result<Credentials, ApiError> {
        let response = self.post_credentials("/login", email, password)?;
        let credentials: Credentials = response
            .json()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        if credentials.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "sign-in response carried no token".to_string(),
            ));
        }
        log::info!("Signed in as {}", email);
        Ok(credentials)
    }

    fn signup(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self.post_credentials("/signup", email, password)?;
        let body: MessageBody = response
            .json()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        log::info!("Created account for {}", email);
        Ok(body.message)
    }
}

/// Attach the bearer token, if the source has one.
fn authorize(builder: RequestBuilder, tokens: &dyn TokenSource) -> Result<RequestBuilder, ApiError> {
    let builder = builder.header(ACCEPT, "application/json");
    match tokens.bearer_token() {
        Some(token) => {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidToken)?;
            Ok(builder.header(AUTHORIZATION, value))
        }
        None => {
            log::debug!("No session token; sending request without authorization");
            Ok(builder)
        }
    }
}

/// Turn a non-success response into [`ApiError::Rejected`].
fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().unwrap_or_default();
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message: rejection_message(&text, status.canonical_reason()),
    })
}

/// The service's `error` field, or a fallback when the body has none.
fn rejection_message(body: &str, reason: Option<&str>) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| reason.unwrap_or("request failed").to_string())
}
