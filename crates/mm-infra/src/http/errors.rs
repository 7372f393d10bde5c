//! Maps HTTP failures onto [`ApiError`].

use mm_core::ports::ApiError;
use serde_json::Value;

const EMAIL_VERIFICATION_MARKER: &str = "email verification required";

pub(crate) fn from_transport(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    // Timeouts, DNS and connection failures all mean "no response".
    ApiError::Network(err.to_string())
}

pub(crate) fn from_status(status: u16, body: &str) -> ApiError {
    let detail = extract_detail(body);

    if detail
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(EMAIL_VERIFICATION_MARKER))
    {
        return ApiError::EmailVerificationRequired {
            detail: detail.unwrap_or_default(),
        };
    }

    match status {
        401 => ApiError::Unauthorized { detail },
        403 => ApiError::Forbidden { detail },
        502 => ApiError::BadGateway,
        500..=599 => ApiError::ServerUnavailable { status },
        _ => ApiError::Rejected { status, detail },
    }
}

/// Pulls the human-readable message out of an error body.
///
/// Accepts `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}` and `{"message": "..."}`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").or_else(|| value.get("message"))?;
    match detail {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}
