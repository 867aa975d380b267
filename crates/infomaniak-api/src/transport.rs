//! Authenticated request execution.
//!
//! This module owns transport details only: URL assembly, the bearer and
//! content-type headers, racing the round trip against the caller's
//! [`RequestContext`], and classifying reqwest failures. It never looks at the
//! response status; that is the envelope decoder's business.

use std::time::Instant;

use registrar::{
    ClientError, ClientResult, Interrupt, RequestContext, TransportError, TransportFailureKind,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;

use crate::InfomaniakClient;

/// Status and body of a response, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl InfomaniakClient {
    /// Sends one authenticated request to `base_url + path` and reads the
    /// whole response body.
    ///
    /// `Authorization: Bearer <token>` and `Content-Type: application/json`
    /// are set on every request, with or without a body. `path` must start
    /// with `/` and is not escaped.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RequestBuild`] if the URL or headers are invalid.
    /// - [`ClientError::Transport`] for network failures, the client timeout,
    ///   the caller's deadline ([`TransportFailureKind::Timeout`]) and
    ///   cancellation ([`TransportFailureKind::Cancelled`]).
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<RawResponse> {
        let request = self.build_request(&method, path, body)?;

        let started = Instant::now();
        let exchange = async {
            let response = self
                .http
                .execute(request)
                .await
                .map_err(|e| transport_error(&method, path, e, false))?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| transport_error(&method, path, e, true))?;
            Ok::<_, ClientError>(RawResponse {
                status,
                body: body.to_vec(),
            })
        };

        // Cancellation wins ties so an already-cancelled context sends nothing.
        let outcome = tokio::select! {
            biased;
            interrupt = ctx.done() => Err(interrupted(&method, path, interrupt)),
            outcome = exchange => outcome,
        };

        match &outcome {
            Ok(response) => tracing::debug!(
                method = %method,
                path,
                status = response.status,
                elapsed = ?started.elapsed(),
                "request completed"
            ),
            Err(error) => tracing::warn!(
                method = %method,
                path,
                elapsed = ?started.elapsed(),
                error = %error,
                "request failed"
            ),
        }
        outcome
    }

    fn build_request(
        &self,
        method: &Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<reqwest::Request> {
        let build_error = |message: String| ClientError::RequestBuild {
            method: method.to_string(),
            path: path.to_owned(),
            message,
        };

        if !path.starts_with('/') {
            return Err(build_error("path must start with '/'".to_owned()));
        }

        let url = format!("{}{}", self.base_url, path);
        let url = reqwest::Url::parse(&url)
            .map_err(|e| build_error(format!("invalid URL '{url}': {e}")))?;

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.body(body);
        }
        builder.build().map_err(|e| build_error(e.to_string()))
    }
}

fn transport_error(
    method: &Method,
    path: &str,
    error: reqwest::Error,
    reading_body: bool,
) -> ClientError {
    let kind = if error.is_timeout() {
        TransportFailureKind::Timeout
    } else if error.is_connect() {
        TransportFailureKind::Connect
    } else if reading_body || error.is_body() || error.is_decode() {
        TransportFailureKind::Body
    } else {
        TransportFailureKind::Other
    };
    TransportError::new(method.as_str(), path, kind, Some(Box::new(error))).into()
}

fn interrupted(method: &Method, path: &str, interrupt: Interrupt) -> ClientError {
    let kind = match interrupt {
        Interrupt::Cancelled => TransportFailureKind::Cancelled,
        Interrupt::DeadlineExceeded => TransportFailureKind::Timeout,
    };
    TransportError::new(method.as_str(), path, kind, None).into()
}
