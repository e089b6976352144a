//! HTTP utilities for OCI REST API calls

use super::auth::{authorization_header, signing_string, RequestSigner};
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Response header carrying the next page token
pub const NEXT_PAGE_HEADER: &str = "opc-next-page";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Non-2xx response from an OCI API
#[derive(Debug, thiserror::Error)]
#[error("API request failed: {status}{}", code_suffix(.code))]
pub struct ApiError {
    pub status: StatusCode,
    /// Service error code from the response body (e.g. `NotAuthorizedOrNotFound`)
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: Option<&str>) -> Self {
        Self {
            status,
            code: code.map(str::to_string),
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({})", c)).unwrap_or_default()
}

/// One page of a response
#[derive(Debug)]
pub struct Page {
    pub body: Value,
    pub next_page: Option<String>,
}

/// Signed HTTP client for OCI API calls
#[derive(Clone)]
pub struct OciHttpClient {
    client: Client,
    signer: Arc<dyn RequestSigner>,
}

impl OciHttpClient {
    /// Create a new HTTP client
    pub fn new(signer: Arc<dyn RequestSigner>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ocinv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, signer })
    }

    /// Make a signed GET request
    pub async fn get(&self, url: &Url) -> Result<Page> {
        tracing::debug!("GET {}", url);

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => anyhow::bail!("URL has no host: {}", url),
        };
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        let signature = self
            .signer
            .sign(&signing_string(&date, "GET", &path_and_query, &host))?;

        let response = self
            .client
            .get(url.clone())
            .header("date", &date)
            .header(
                "authorization",
                authorization_header(self.signer.key_id(), &signature),
            )
            .header("accept", "application/json")
            .header("opc-request-id", uuid::Uuid::new_v4().simple().to_string())
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::debug!("API error: {} - {}", status, sanitize_for_log(&body));
            let code = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("code").and_then(|c| c.as_str()).map(str::to_string));
            return Err(ApiError { status, code }.into());
        }

        if body.is_empty() {
            return Ok(Page {
                body: Value::Null,
                next_page,
            });
        }

        let body = serde_json::from_str(&body).context("Failed to parse response JSON")?;
        Ok(Page { body, next_page })
    }
}

/// Format an OCI API error for display
/// Security: Sanitizes error messages to avoid leaking sensitive API details
pub fn format_oci_error(error: &anyhow::Error) -> String {
    // Only typed errors are classified; free text may carry URLs and OCIDs
    if let Some(api) = error.chain().find_map(|e| e.downcast_ref::<ApiError>()) {
        return format_status(api).to_string();
    }
    if error
        .chain()
        .any(|e| e.downcast_ref::<reqwest::Error>().is_some())
    {
        return "Could not reach OCI. Check your network connection and region.".to_string();
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

fn format_status(error: &ApiError) -> &'static str {
    match error.status.as_u16() {
        401 => "Authentication failed. Check the user OCID, fingerprint and API key.",
        404 => "Resource not found or not authorized. Check your IAM policies.",
        403 => "Permission denied. Check your IAM policies.",
        429 => "Rate limit exceeded. Please try again later.",
        400 => "Invalid request. Check your parameters.",
        s if s >= 500 => "OCI service temporarily unavailable. Please try again.",
        _ if error.code.as_deref() == Some("NotAuthorizedOrNotFound") => {
            "Resource not found or not authorized. Check your IAM policies."
        }
        _ => "Request failed. Check your network connection and try again.",
    }
}
