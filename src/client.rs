use std::env;
use std::fmt;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUESTS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Client for the Gemini `generateContent` API.
///
/// The client holds no conversation state; every call carries the full
/// history it should be answered against.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
    timeout: Option<Duration>,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the `GOOGLE_API_KEY`
    /// environment variable.  The client applies no request timeout of its
    /// own; see [`Gemini::with_options`].
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::authentication(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(Error::authentication("API key is empty"));
        }

        let client = ReqwestClient::builder().build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url::Url::parse(&base_url)?;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
        })
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::authentication("API key contains invalid header characters"))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // Google wraps errors as {"error": {"code", "message", "status"}}
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let status = detail.as_ref().and_then(|d| d.status.clone());
        let message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| error_body.trim().to_string());

        match status_code {
            400 => Error::bad_request(message),
            401 => Error::authentication(message),
            403 => Error::permission(message),
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            429 => Error::rate_limit(message, retry_after),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message, retry_after),
            _ => Error::api(status_code, status, message),
        }
    }

    /// Generate content for `model` against the given history.
    ///
    /// `timeout` overrides the client-wide timeout for this call only.
    pub async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
        timeout: Option<Duration>,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}{}:generateContent",
            self.base_url,
            model.resource_name()
        );
        let timeout = timeout.or(self.timeout);
        tracing::debug!(
            %model,
            contents = request.contents.len(),
            ?timeout,
            "sending generateContent request"
        );

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.send(&url, request, timeout).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            tracing::debug!(%model, error = %err, "generateContent request failed");
        }
        result
    }

    async fn send(
        &self,
        url: &str,
        request: &GenerateContentRequest,
        timeout: Option<Duration>,
    ) -> Result<GenerateContentResponse> {
        let mut builder = self
            .client
            .post(url)
            .headers(self.default_headers()?)
            .json(request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    timeout.map(|t| t.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Response timed out: {}", e),
                        timeout.map(|t| t.as_secs_f64()),
                    )
                } else {
                    Error::serialization(
                        format!("Failed to parse response: {}", e),
                        Some(Box::new(e)),
                    )
                }
            })
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
