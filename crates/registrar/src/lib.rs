//! Domain model for the Infomaniak registrar client.
//!
//! This crate contains the identifiers, wire value types, error taxonomy, and
//! per-call context shared by the HTTP adapter and the CLI, plus the
//! [`DomainRegistrar`] port the CLI is written against.
//!
//! ## Architectural Layer
//!
//! **Model + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a registrar offers; `infomaniak-api` defines *how* it is
//! reached over HTTP.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Path-segment newtypes (`AccountId`, `DomainName`) |
//! | [`types`] | Wire value types (`Domain`, `Contact`, `ErrorBody`, ...) |
//! | [`errors`] | `ClientError`, `ApiError`, `TransportError`, `OperationError` |
//! | [`context`] | `RequestContext` deadlines and cancellation |
//! | [`ports`] | The `DomainRegistrar` trait |

pub mod context;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use context::{CancelHandle, Interrupt, RequestContext};
pub use errors::{
    ApiError, BoxError, ClientError, ClientResult, Operation, OperationError, TransportError,
    TransportFailureKind, UNKNOWN_ERROR_CODE,
};
pub use identifiers::{AccountId, DomainName, InvalidIdentifier};
pub use ports::DomainRegistrar;
pub use types::{
    Contact, ContactRole, Domain, DomainContacts, DomainOptions, ErrorBody, ErrorDetail,
    UnixTimestamp, UpdateNameserversInput,
};
