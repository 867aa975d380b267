//! Rendering of command results as aligned text tables or pretty JSON.

use std::io::{self, Write};

use registrar::{Domain, DomainName};
use serde::Serialize;

/// Space between table columns.
const COLUMN_GAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// `NAME  TLD  EXPIRES`, one row per domain, expiry as a UTC date.
pub fn domain_list(out: &mut dyn Write, format: OutputFormat, domains: &[Domain]) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(out, &domains);
    }

    let mut rows = vec![vec!["NAME".to_owned(), "TLD".to_owned(), "EXPIRES".to_owned()]];
    rows.extend(
        domains
            .iter()
            .map(|d| vec![d.name.clone(), d.tld.clone(), d.expires_at.format_date()]),
    );
    table(out, &rows)
}

/// Key/value view of one domain, followed by its registered contacts.
pub fn domain_detail(out: &mut dyn Write, format: OutputFormat, domain: &Domain) -> io::Result<()> {
    if format == OutputFormat::Json {
        return json(out, domain);
    }

    let mut rows = vec![
        field("Name", &domain.name),
        field("TLD", &domain.tld),
        field("Premium", domain.is_premium),
        field("Created", domain.created_at.format_date()),
        field("Expires", domain.expires_at.format_date()),
        field("DNS Anycast", domain.options.dns_anycast),
        field("DNSSEC", domain.options.dnssec),
        field("Domain Privacy", domain.options.domain_privacy),
    ];
    for (role, contact) in domain.contacts.iter() {
        let validation = match contact.validated_at {
            Some(at) if contact.is_validated => format!("validated {}", at.format_date()),
            None if contact.is_validated => "validated".to_owned(),
            _ => "not validated".to_owned(),
        };
        rows.push(field(
            &format!("{role} Contact"),
            format!("{} ({validation})", contact.email),
        ));
    }
    table(out, &rows)
}

/// Confirmation that a domain's nameservers were replaced.
pub fn nameservers_updated(
    out: &mut dyn Write,
    format: OutputFormat,
    domain: &DomainName,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => json(
            out,
            &serde_json::json!({ "domain": domain, "status": "updated" }),
        ),
        OutputFormat::Table => writeln!(out, "Nameservers for {domain} updated successfully."),
    }
}

fn field(key: &str, value: impl ToString) -> Vec<String> {
    vec![format!("{key}:"), value.to_string()]
}

fn json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Left-aligned columns; the last column is never padded.
fn table(out: &mut dyn Write, rows: &[Vec<String>]) -> io::Result<()> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in rows {
        let mut line = String::new();
        for (col, cell) in row.iter().enumerate() {
            if col + 1 == row.len() {
                line.push_str(cell);
            } else {
                let width = widths[col] + COLUMN_GAP;
                line.push_str(&format!("{cell:<width$}"));
            }
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}
