//! `domains` subcommand handlers.
//!
//! Handlers talk to the registrar only through [`DomainRegistrar`] and write
//! to a caller-supplied sink, so they run unchanged against a fake.

use std::io::Write;

use anyhow::Context as _;
use registrar::{DomainRegistrar, RequestContext, UpdateNameserversInput};

use crate::args::DomainsCommand;
use crate::output::{self, OutputFormat};
use crate::settings::Settings;

/// Runs one `domains` subcommand and renders its result to `out`.
pub async fn run_domains(
    command: &DomainsCommand,
    settings: &Settings,
    registrar: &dyn DomainRegistrar,
    ctx: &RequestContext,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        DomainsCommand::List => {
            let account = settings.account_id()?;
            let domains = registrar.list_domains(ctx, &account).await?;
            tracing::info!(account = %account, count = domains.len(), "domains listed");
            output::domain_list(out, format, &domains)
        }
        DomainsCommand::Show { domain } => {
            let found = registrar.show_domain(ctx, domain).await?;
            output::domain_detail(out, format, &found)
        }
        DomainsCommand::UpdateNs {
            domain,
            nameservers,
            verify,
        } => {
            let input = UpdateNameserversInput::new(nameservers.iter().map(String::as_str))
                .verify_availability(*verify);
            registrar.update_nameservers(ctx, domain, &input).await?;
            output::nameservers_updated(out, format, domain)
        }
    }
    .context("write output")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::args::GlobalArgs;
    use crate::settings::Sources;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use registrar::{
        AccountId, ApiError, ClientError, Domain, DomainName, Operation, OperationError,
        UnixTimestamp,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(String),
        Show(String),
        Update(String, UpdateNameserversInput),
    }

    /// In-memory registrar holding a fixed set of domains.
    #[derive(Default)]
    struct FakeRegistrar {
        domains: Vec<Domain>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeRegistrar {
        fn with(domains: Vec<Domain>) -> Self {
            Self {
                domains,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("call log").clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().expect("call log").push(call);
        }

        fn not_found(operation: Operation, name: &DomainName) -> OperationError {
            let api = ApiError {
                status: 404,
                code: "object_not_found".to_owned(),
                description: "Object not found".to_owned(),
                errors: Vec::new(),
            };
            OperationError::new(operation, name.as_str(), ClientError::Api(api))
        }
    }

    #[async_trait]
    impl DomainRegistrar for FakeRegistrar {
        async fn list_domains(
            &self,
            _ctx: &RequestContext,
            account: &AccountId,
        ) -> Result<Vec<Domain>, OperationError> {
            self.record(Call::List(account.to_string()));
            Ok(self.domains.clone())
        }

        async fn show_domain(
            &self,
            _ctx: &RequestContext,
            domain: &DomainName,
        ) -> Result<Domain, OperationError> {
            self.record(Call::Show(domain.to_string()));
            self.domains
                .iter()
                .find(|d| d.name == domain.as_str())
                .cloned()
                .ok_or_else(|| Self::not_found(Operation::ShowDomain, domain))
        }

        async fn update_nameservers(
            &self,
            _ctx: &RequestContext,
            domain: &DomainName,
            input: &UpdateNameserversInput,
        ) -> Result<(), OperationError> {
            self.record(Call::Update(domain.to_string(), input.clone()));
            if self.domains.iter().any(|d| d.name == domain.as_str()) {
                Ok(())
            } else {
                Err(Self::not_found(Operation::UpdateNameservers, domain))
            }
        }
    }

    fn example() -> Domain {
        Domain {
            name: "example.ch".to_owned(),
            tld: "ch".to_owned(),
            expires_at: UnixTimestamp::new(1_734_444_000),
            ..Domain::default()
        }
    }

    fn settings(account_id: Option<&str>) -> Settings {
        let flags = GlobalArgs {
            token: Some("tok".to_owned()),
            account_id: account_id.map(str::to_owned),
            ..GlobalArgs::default()
        };
        let sources = Sources {
            working_dir: std::env::temp_dir().join("informaniak-no-config"),
            ..Sources::default()
        };
        Settings::resolve(&flags, &sources).expect("resolve settings")
    }

    fn name(value: &str) -> DomainName {
        DomainName::new(value).expect("valid domain name")
    }

    async fn run(
        registrar: &FakeRegistrar,
        command: DomainsCommand,
        account_id: Option<&str>,
        format: OutputFormat,
    ) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run_domains(
            &command,
            &settings(account_id),
            registrar,
            &RequestContext::background(),
            format,
            &mut out,
        )
        .await?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[tokio::test]
    async fn list_uses_the_configured_account() {
        let registrar = FakeRegistrar::with(vec![example()]);

        let text = run(&registrar, DomainsCommand::List, Some("123"), OutputFormat::Table)
            .await
            .expect("list");

        assert_eq!(text, "NAME        TLD  EXPIRES\nexample.ch  ch   2024-12-17\n");
        assert_eq!(registrar.calls(), vec![Call::List("123".to_owned())]);
    }

    #[tokio::test]
    async fn list_without_account_fails_before_calling_the_registrar() {
        let registrar = FakeRegistrar::default();

        let err = run(&registrar, DomainsCommand::List, None, OutputFormat::Table)
            .await
            .expect_err("no account");

        assert_eq!(
            err.to_string(),
            "account-id is required: set via --account-id, config file, or $INFOMANIAK_ACCOUNT_ID"
        );
        assert!(registrar.calls().is_empty());
    }

    #[tokio::test]
    async fn show_renders_json_when_asked() {
        let registrar = FakeRegistrar::with(vec![example()]);
        let command = DomainsCommand::Show {
            domain: name("example.ch"),
        };

        let text = run(&registrar, command, None, OutputFormat::Json)
            .await
            .expect("show");

        let parsed: Domain = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(parsed, example());
    }

    #[tokio::test]
    async fn show_failure_keeps_the_error_chain() {
        let registrar = FakeRegistrar::default();
        let command = DomainsCommand::Show {
            domain: name("nope.ch"),
        };

        let err = run(&registrar, command, None, OutputFormat::Table)
            .await
            .expect_err("not found");

        assert_eq!(
            format!("{err:#}"),
            "show domain nope.ch: api error object_not_found: Object not found"
        );
        let op = err.downcast_ref::<OperationError>().expect("OperationError");
        assert_eq!(op.api_error().map(|a| a.status), Some(404));
    }

    #[tokio::test]
    async fn update_ns_passes_order_and_verify_flag() {
        let registrar = FakeRegistrar::with(vec![example()]);
        let command = DomainsCommand::UpdateNs {
            domain: name("example.ch"),
            nameservers: vec!["ns2.example.net".to_owned(), "ns1.example.net".to_owned()],
            verify: true,
        };

        let text = run(&registrar, command, None, OutputFormat::Table)
            .await
            .expect("update");

        assert_eq!(text, "Nameservers for example.ch updated successfully.\n");
        assert_eq!(
            registrar.calls(),
            vec![Call::Update(
                "example.ch".to_owned(),
                UpdateNameserversInput::new(["ns2.example.net", "ns1.example.net"])
                    .verify_availability(true)
            )]
        );
    }

    #[tokio::test]
    async fn failed_update_prints_nothing() {
        let registrar = FakeRegistrar::default();
        let command = DomainsCommand::UpdateNs {
            domain: name("nope.ch"),
            nameservers: vec!["ns1.example.net".to_owned()],
            verify: false,
        };
        let mut out = Vec::new();

        let result = run_domains(
            &command,
            &settings(None),
            &registrar,
            &RequestContext::background(),
            OutputFormat::Json,
            &mut out,
        )
        .await;

        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
