//! Port implemented by registrar API adapters.
//!
//! The CLI depends on [`DomainRegistrar`] only; the HTTP adapter lives in the
//! `infomaniak-api` crate and tests substitute an in-memory implementation.

use async_trait::async_trait;

use crate::{AccountId, Domain, DomainName, OperationError, RequestContext, UpdateNameserversInput};

/// Domain operations offered by a registrar.
///
/// Implementations must be safe to call concurrently from several tasks.
/// Every call is a single request/response exchange; no ordering between calls
/// is implied, so callers needing "show after update" must sequence them.
#[async_trait]
pub trait DomainRegistrar: Send + Sync {
    /// Lists every domain of `account`, in the order the registrar returns
    /// them. An account without domains yields an empty list.
    async fn list_domains(
        &self,
        ctx: &RequestContext,
        account: &AccountId,
    ) -> Result<Vec<Domain>, OperationError>;

    /// Fetches a single domain.
    async fn show_domain(
        &self,
        ctx: &RequestContext,
        domain: &DomainName,
    ) -> Result<Domain, OperationError>;

    /// Replaces the nameserver set of `domain`.
    ///
    /// Nameserver syntax is validated by the registrar, not locally.
    async fn update_nameservers(
        &self,
        ctx: &RequestContext,
        domain: &DomainName,
        input: &UpdateNameserversInput,
    ) -> Result<(), OperationError>;
}
