//! Error taxonomy for registrar API calls.
//!
//! Four failure kinds exist, each produced by exactly one stage of a call:
//!
//! | Kind | Stage | Typical cause |
//! |------|-------|---------------|
//! | [`ClientError::RequestBuild`] | request construction | unparseable URL, unencodable body |
//! | [`ClientError::Transport`] | network round trip | DNS, TLS, refused connection, timeout, cancellation |
//! | [`ClientError::Decode`] | body decoding | body is not a JSON envelope of the expected shape |
//! | [`ClientError::Api`] | envelope inspection | upstream answered `result = "error"` |
//!
//! Operations wrap a [`ClientError`] in an [`OperationError`] that names the
//! operation and its target. The wrapper never replaces the inner kind, so
//! callers can always match on it via [`OperationError::kind`].
//!
//! Nothing here retries. [`ClientError::is_retryable`] only classifies.

use thiserror::Error;

use crate::types::{ErrorBody, ErrorDetail};

/// Boxed underlying cause (reqwest, serde_json, ...), kept opaque so this
/// crate stays free of I/O dependencies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a single client stage.
pub type ClientResult<T> = Result<T, ClientError>;

// ---------------------------------------------------------------------------
// Stage-level errors
// ---------------------------------------------------------------------------

/// A failure of one request/response exchange.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be constructed. Nothing was sent.
    #[error("create request {method} {path}: {message}")]
    RequestBuild {
        /// HTTP method of the request being built.
        method: String,
        /// Request path relative to the base URL.
        path: String,
        /// What was wrong with the request.
        message: String,
    },

    /// The network round trip failed or was interrupted.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not a valid envelope of the expected shape.
    #[error("decode response (status {status})")]
    Decode {
        /// HTTP status the body arrived with.
        status: u16,
        /// The parse failure.
        #[source]
        source: BoxError,
    },

    /// The upstream reported an application-level error.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// Creates a [`ClientError::Decode`] from any parse failure.
    pub fn decode(status: u16, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            status,
            source: source.into(),
        }
    }

    /// Returns the upstream error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            _ => None,
        }
    }

    /// Returns the transport failure, if this is one.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(transport) => Some(transport),
            _ => None,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    ///
    /// Only timeouts and connection failures qualify. Cancellation is the
    /// caller's own decision and is never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(TransportError {
                kind: TransportFailureKind::Timeout | TransportFailureKind::Connect,
                ..
            })
        )
    }
}

// ---------------------------------------------------------------------------

/// What went wrong during the network round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFailureKind {
    /// The client timeout or the caller's deadline elapsed.
    Timeout,
    /// The caller cancelled the request.
    Cancelled,
    /// No connection could be established (DNS, refused, TLS handshake).
    Connect,
    /// The connection broke while the response body was being read.
    Body,
    /// Any other transport failure.
    Other,
}

impl std::fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Cancelled => write!(f, "request cancelled"),
            Self::Connect => write!(f, "connection failed"),
            Self::Body => write!(f, "reading response body failed"),
            Self::Other => write!(f, "request failed"),
        }
    }
}

/// A network-level failure of one request.
#[derive(Debug, Error)]
#[error("execute request {method} {path}: {kind}")]
pub struct TransportError {
    /// HTTP method of the failed request.
    pub method: String,
    /// Request path relative to the base URL.
    pub path: String,
    /// Failure classification.
    pub kind: TransportFailureKind,
    /// Underlying cause, absent for cancellation and caller deadlines.
    #[source]
    pub source: Option<BoxError>,
}

impl TransportError {
    /// Creates a transport error for `method path`.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        kind: TransportFailureKind,
        source: Option<BoxError>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            kind,
            source,
        }
    }
}

// ---------------------------------------------------------------------------

/// Code given to an [`ApiError`] when the envelope carried no error body.
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// An error reported by the registrar itself (`result = "error"`).
///
/// This is the only error expected during normal negative-path operation:
/// unknown objects, validation failures, missing permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status the error envelope arrived with.
    pub status: u16,
    /// Machine-readable code, e.g. `object_not_found`.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Granular causes, if the upstream supplied any.
    pub errors: Vec<ErrorDetail>,
}

impl ApiError {
    /// Builds an error from the envelope's error body.
    pub fn from_body(status: u16, body: ErrorBody) -> Self {
        Self {
            status,
            code: body.code,
            description: body.description,
            errors: body.errors,
        }
    }

    /// Builds the error used when `result = "error"` arrives without a body.
    pub fn unknown(status: u16) -> Self {
        Self {
            status,
            code: UNKNOWN_ERROR_CODE.to_owned(),
            description: "unknown error".to_owned(),
            errors: Vec::new(),
        }
    }

    /// Whether the upstream withheld any error detail.
    pub fn is_unknown(&self) -> bool {
        self.code == UNKNOWN_ERROR_CODE && self.errors.is_empty()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unknown() {
            write!(f, "api error (status {}): {}", self.status, self.description)
        } else {
            write!(f, "api error {}: {}", self.code, self.description)
        }
    }
}

impl std::error::Error for ApiError {}

// ---------------------------------------------------------------------------
// Operation-level wrapper
// ---------------------------------------------------------------------------

/// The registrar operation an [`OperationError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Listing the domains of an account.
    ListDomains,
    /// Fetching one domain.
    ShowDomain,
    /// Replacing the nameserver set of a domain.
    UpdateNameservers,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListDomains => write!(f, "list domains for account"),
            Self::ShowDomain => write!(f, "show domain"),
            Self::UpdateNameservers => write!(f, "update nameservers for"),
        }
    }
}

/// A [`ClientError`] annotated with the operation and identifier it affected.
#[derive(Debug, Error)]
#[error("{operation} {target}")]
pub struct OperationError {
    /// Which operation failed.
    pub operation: Operation,
    /// The account id or domain name the operation targeted.
    pub target: String,
    /// The stage-level failure.
    #[source]
    pub source: ClientError,
}

impl OperationError {
    /// Wraps `source` with operation context.
    pub fn new(operation: Operation, target: impl Into<String>, source: ClientError) -> Self {
        Self {
            operation,
            target: target.into(),
            source,
        }
    }

    /// The stage-level failure kind.
    pub fn kind(&self) -> &ClientError {
        &self.source
    }

    /// The upstream error, when the registrar rejected the call.
    pub fn api_error(&self) -> Option<&ApiError> {
        self.source.as_api()
    }

    /// The transport failure, when the call never got a response.
    pub fn transport_error(&self) -> Option<&TransportError> {
        self.source.as_transport()
    }
}
