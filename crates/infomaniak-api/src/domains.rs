//! Domain operations: list, show, update nameservers.
//!
//! Each operation owns its path template, HTTP method and payload shape, and
//! is a thin composition of [`InfomaniakClient::execute`] and
//! [`envelope::decode`](crate::envelope::decode). Failures are wrapped in an
//! [`OperationError`] naming the operation and its target.

use async_trait::async_trait;
use registrar::{
    AccountId, ClientError, ClientResult, Domain, DomainName, DomainRegistrar, Operation,
    OperationError, RequestContext, UpdateNameserversInput,
};
use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::instrument;

use crate::envelope::decode;
use crate::InfomaniakClient;

impl InfomaniakClient {
    /// `GET /2/domains/accounts/{account}/domains`
    ///
    /// Returns the domains in upstream order. A missing or empty payload yields
    /// an empty list. Only the first page is read; the API is not paginated
    /// from this client's point of view.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], wrapped with [`Operation::ListDomains`].
    #[instrument(skip_all, fields(account = %account))]
    pub async fn list_domains(
        &self,
        ctx: &RequestContext,
        account: &AccountId,
    ) -> Result<Vec<Domain>, OperationError> {
        let path = format!("/2/domains/accounts/{account}/domains");
        let domains = self
            .call::<Vec<Domain>>(ctx, Method::GET, &path, None)
            .await
            .map_err(|e| OperationError::new(Operation::ListDomains, account.as_str(), e))?
            .unwrap_or_default();
        tracing::debug!(count = domains.len(), "listed domains");
        Ok(domains)
    }

    /// `GET /2/domains/{domain}`
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], wrapped with [`Operation::ShowDomain`]. Unknown
    /// domains surface as an [`registrar::ApiError`] with the upstream code
    /// (`object_not_found`). A success envelope without a payload is a
    /// [`ClientError::Decode`].
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn show_domain(
        &self,
        ctx: &RequestContext,
        domain: &DomainName,
    ) -> Result<Domain, OperationError> {
        let path = format!("/2/domains/{domain}");
        let wrap = |e: ClientError| OperationError::new(Operation::ShowDomain, domain.as_str(), e);

        let raw = self
            .execute(ctx, Method::GET, &path, None)
            .await
            .map_err(wrap)?;
        match decode::<Domain>(&raw).map_err(wrap)? {
            Some(found) => Ok(found),
            None => Err(wrap(ClientError::decode(
                raw.status,
                "success envelope carried no domain",
            ))),
        }
    }

    /// `PUT /2/domains/{domain}/nameservers`
    ///
    /// Sends `input` as the JSON body. The payload of a success envelope is
    /// ignored. Nameserver syntax is checked by the registrar only; malformed
    /// hostnames come back as an [`registrar::ApiError`] (`validation_failed`).
    ///
    /// # Errors
    ///
    /// Any [`ClientError`], wrapped with [`Operation::UpdateNameservers`].
    #[instrument(
        skip_all,
        fields(
            domain = %domain,
            nameservers = input.nameservers.len(),
            verify = input.verify_ns_availability
        )
    )]
    pub async fn update_nameservers(
        &self,
        ctx: &RequestContext,
        domain: &DomainName,
        input: &UpdateNameserversInput,
    ) -> Result<(), OperationError> {
        let path = format!("/2/domains/{domain}/nameservers");
        let wrap =
            |e: ClientError| OperationError::new(Operation::UpdateNameservers, domain.as_str(), e);

        let body = serde_json::to_vec(input).map_err(|e| {
            wrap(ClientError::RequestBuild {
                method: Method::PUT.to_string(),
                path: path.clone(),
                message: format!("encode nameserver update: {e}"),
            })
        })?;

        self.call::<IgnoredAny>(ctx, Method::PUT, &path, Some(body))
            .await
            .map_err(wrap)?;
        tracing::info!("nameservers updated");
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<Option<T>> {
        let raw = self.execute(ctx, method, path, body).await?;
        decode(&raw)
    }
}

#[async_trait]
impl DomainRegistrar for InfomaniakClient {
    async fn list_domains(
        &self,
        ctx: &RequestContext,
        account: &AccountId,
    ) -> Result<Vec<Domain>, OperationError> {
        InfomaniakClient::list_domains(self, ctx, account).await
    }

    async fn show_domain(
        &self,
        ctx: &RequestContext,
        domain: &DomainName,
    ) -> Result<Domain, OperationError> {
        InfomaniakClient::show_domain(self, ctx, domain).await
    }

    async fn update_nameservers(
        &self,
        ctx: &RequestContext,
        domain: &DomainName,
        input: &UpdateNameserversInput,
    ) -> Result<(), OperationError> {
        InfomaniakClient::update_nameservers(self, ctx, domain, input).await
    }
}
