use http::header::HeaderValue;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::api::ApiError;

/// Builds the `Authorization` header value for a bearer token.
pub fn bearer(token: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| ApiError::InvalidToken)
}

/// Pulls the human readable `message` out of an error body such as
/// `{"message": "Invalid credentials"}`. Blank messages count as absent.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Passes successful responses through and turns every other status into `ApiError::Status`.
pub async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!("Backend answered {} with body '{}'", status, body);
    Err(ApiError::Status {
        status: status.as_u16(),
        message: extract_message(&body),
    })
}

/// Checks the status and decodes the JSON body. Decoding failures are reported
/// separately from transport failures so callers can tell a malformed payload apart.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
