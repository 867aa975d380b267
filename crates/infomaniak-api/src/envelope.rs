//! Response envelope decoding.
//!
//! Every Infomaniak response body has the shape
//! `{"result": "success"|"error", "data": <T>, "error": {...}}`. Success and
//! failure are decided by `result` alone; the HTTP status is carried along for
//! diagnostics only, because the API answers 4xx/5xx with well-formed bodies.
//!
//! Decoding happens in two steps. The envelope is parsed with an untyped
//! `data` member first, so an error envelope is reported as an [`ApiError`]
//! even when its `data` would not fit the payload type. Only a non-error
//! envelope has its `data` converted to `T`.

use registrar::{ApiError, ClientError, ClientResult, ErrorBody};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::RawResponse;

/// Discriminator value marking an error envelope.
const RESULT_ERROR: &str = "error";
/// Discriminator value the API uses for success.
const RESULT_SUCCESS: &str = "success";

/// The uniform wrapper around every API response, generic over the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// `"success"` or `"error"`.
    #[serde(default)]
    pub result: String,
    /// Payload; expected only on success and may be absent even then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error detail; expected only when `result` is `"error"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    /// A success envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            result: RESULT_SUCCESS.to_owned(),
            data: Some(data),
            error: None,
        }
    }

    /// A success envelope without payload.
    pub fn empty() -> Self {
        Self {
            result: RESULT_SUCCESS.to_owned(),
            data: None,
            error: None,
        }
    }

    /// An error envelope, with or without an error body.
    pub fn failure(error: Option<ErrorBody>) -> Self {
        Self {
            result: RESULT_ERROR.to_owned(),
            data: None,
            error,
        }
    }
}

/// Decodes `response` as an envelope whose payload has shape `T`.
///
/// Returns `Ok(None)` for a success envelope with a missing or `null` payload;
/// deciding whether that is acceptable is up to the caller. Any `result` other
/// than `"error"` counts as success. Use [`serde::de::IgnoredAny`] as `T` when
/// the payload is irrelevant.
///
/// # Errors
///
/// - [`ClientError::Api`] when `result` is `"error"`. Without an error body
///   the error is [`ApiError::unknown`] with the HTTP status.
/// - [`ClientError::Decode`] when the body is not an envelope, or `data` does
///   not fit `T`.
pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> ClientResult<Option<T>> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_slice(&response.body)
        .map_err(|e| ClientError::decode(response.status, e))?;

    if envelope.result == RESULT_ERROR {
        let api_error = match envelope.error {
            Some(body) => ApiError::from_body(response.status, body),
            None => ApiError::unknown(response.status),
        };
        tracing::warn!(
            status = api_error.status,
            code = %api_error.code,
            description = %api_error.description,
            "api reported an error"
        );
        return Err(api_error.into());
    }

    if envelope.result != RESULT_SUCCESS {
        tracing::debug!(
            result = %envelope.result,
            status = response.status,
            "treating unrecognised result discriminator as success"
        );
    }

    match envelope.data {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(data) => serde_json::from_value(data)
            .map(Some)
            .map_err(|e| ClientError::decode(response.status, e)),
    }
}
