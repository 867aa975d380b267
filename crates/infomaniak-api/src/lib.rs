//! Infomaniak API client adapter.
//!
//! Implements the [`registrar::DomainRegistrar`] port over the Infomaniak REST
//! API (`https://api.infomaniak.com`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL assembly, bearer authentication, timeouts,
//! cancellation, envelope decoding, and reqwest error classification live
//! here. The `registrar` crate sees none of it.
//!
//! ## Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`client`] | `InfomaniakClient` construction and configuration |
//! | [`transport`] | `execute`: one authenticated request, body read in full |
//! | [`envelope`] | `Envelope<T>` and `decode`: `result`-driven success/error split |
//! | [`domains`] | list / show / update-nameservers, and the port implementation |
//!
//! No retries, rate limiting, pagination, or caching are performed. Callers
//! wanting any of these layer them on top.

pub mod client;
pub mod domains;
pub mod envelope;
pub mod transport;

pub use client::{
    ClientBuildError, ClientConfig, InfomaniakClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
pub use envelope::{decode, Envelope};
pub use transport::RawResponse;

// Re-exported so callers of `execute` need no direct reqwest dependency.
pub use reqwest::Method;
