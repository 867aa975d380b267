//! Wire value types exchanged with the registrar API.
//!
//! These are plain value objects: decoded once from a response body and handed
//! to the caller unchanged. Every struct tolerates missing fields, because the
//! upstream routinely returns partial objects (a listing may carry little more
//! than `name` and `tld`). Fields that are genuinely optional upstream
//! (contacts, `validated_at`) are `Option`s rather than zero-value sentinels.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A point in time as sent by the API: whole seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTimestamp(i64);

impl UnixTimestamp {
    /// Creates a timestamp from raw epoch seconds.
    pub fn new(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the raw epoch seconds.
    pub fn as_secs(self) -> i64 {
        self.0
    }

    /// Converts to a UTC date-time, or `None` if the value is outside the
    /// range `chrono` can represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Renders the UTC calendar date as `YYYY-MM-DD`.
    ///
    /// Out-of-range values fall back to the raw number of seconds.
    pub fn format_date(self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => self.0.to_string(),
        }
    }
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// A domain registered with the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    /// Registrar-assigned numeric identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    /// The registrable domain name, e.g. `example.ch`.
    pub name: String,
    /// Top-level domain without the leading dot, e.g. `ch`.
    pub tld: String,
    /// Whether the domain is sold at premium pricing.
    #[serde(deserialize_with = "null_as_default")]
    pub is_premium: bool,
    /// Registration time.
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: UnixTimestamp,
    /// Expiry time.
    #[serde(deserialize_with = "null_as_default")]
    pub expires_at: UnixTimestamp,
    /// Service flags attached to the domain.
    #[serde(deserialize_with = "null_as_default")]
    pub options: DomainOptions,
    /// Contact records by role.
    #[serde(deserialize_with = "null_as_default")]
    pub contacts: DomainContacts,
}

/// Independent service flags of a domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainOptions {
    /// Anycast DNS hosting is enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub dns_anycast: bool,
    /// Renewal warranty is active.
    #[serde(deserialize_with = "null_as_default")]
    pub renewal_warranty: bool,
    /// WHOIS privacy is enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub domain_privacy: bool,
    /// DNSSEC signing is enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub dnssec: bool,
}

/// Contact records of a domain. Each role may be unset independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainContacts {
    /// Registrant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Contact>,
    /// Administrative contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<Contact>,
    /// Technical contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech: Option<Contact>,
    /// Billing contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<Contact>,
}

impl DomainContacts {
    /// Iterates over the contacts that are set, in owner/admin/tech/billing order.
    pub fn iter(&self) -> impl Iterator<Item = (ContactRole, &Contact)> {
        [
            (ContactRole::Owner, self.owner.as_ref()),
            (ContactRole::Admin, self.admin.as_ref()),
            (ContactRole::Tech, self.tech.as_ref()),
            (ContactRole::Billing, self.billing.as_ref()),
        ]
        .into_iter()
        .filter_map(|(role, contact)| contact.map(|c| (role, c)))
    }
}

/// The role a contact plays for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactRole {
    /// Registrant.
    Owner,
    /// Administrative contact.
    Admin,
    /// Technical contact.
    Tech,
    /// Billing contact.
    Billing,
}

impl std::fmt::Display for ContactRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "Owner"),
            Self::Admin => write!(f, "Admin"),
            Self::Tech => write!(f, "Tech"),
            Self::Billing => write!(f, "Billing"),
        }
    }
}

/// A contact record attached to a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// Registrar-assigned numeric identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    /// Contact type tag as reported upstream (e.g. `individual`, `company`).
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    /// Phone number; may be empty.
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    /// Fax number; may be empty.
    #[serde(deserialize_with = "null_as_default")]
    pub fax: String,
    /// E-mail address; may be empty.
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// Whether the registrar has validated this contact.
    #[serde(deserialize_with = "null_as_default")]
    pub is_validated: bool,
    /// When validation happened. `None` until validated.
    pub validated_at: Option<UnixTimestamp>,
    /// Creation time.
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: UnixTimestamp,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of a nameserver replacement request.
///
/// `nameservers` are sent in the given order; the order is significant to the
/// registrar. Hostnames are not validated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNameserversInput {
    /// The complete new nameserver set, in priority order.
    pub nameservers: Vec<String>,
    /// Ask the registrar to check that the nameservers answer for the domain
    /// before applying the change.
    pub verify_ns_availability: bool,
}

impl UpdateNameserversInput {
    /// Creates an input for the given nameservers without the availability check.
    pub fn new<I, S>(nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nameservers: nameservers.into_iter().map(Into::into).collect(),
            verify_ns_availability: false,
        }
    }

    /// Enables or disables the upstream availability check.
    #[must_use]
    pub fn verify_availability(mut self, verify: bool) -> Self {
        self.verify_ns_availability = verify;
        self
    }
}

// ---------------------------------------------------------------------------
// Error bodies
// ---------------------------------------------------------------------------

/// The `error` member of an error envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `object_not_found`.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Granular causes, typically one per invalid input field.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub errors: Vec<ErrorDetail>,
}

/// One granular cause inside an [`ErrorBody`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Free-form key/value context (e.g. the offending attribute).
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "null_as_default")]
    pub context: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_domain() -> Domain {
        Domain {
            id: 7,
            name: "example.ch".to_owned(),
            tld: "ch".to_owned(),
            is_premium: true,
            created_at: UnixTimestamp::new(1_600_000_000),
            expires_at: UnixTimestamp::new(1_734_444_000),
            options: DomainOptions {
                dns_anycast: true,
                renewal_warranty: false,
                domain_privacy: true,
                dnssec: false,
            },
            contacts: DomainContacts {
                owner: Some(Contact {
                    id: 1,
                    kind: "individual".to_owned(),
                    phone: "+41.000000000".to_owned(),
                    fax: String::new(),
                    email: "owner@example.ch".to_owned(),
                    is_validated: true,
                    validated_at: Some(UnixTimestamp::new(0)),
                    created_at: UnixTimestamp::new(1_500_000_000),
                }),
                admin: None,
                tech: None,
                billing: None,
            },
        }
    }

    #[test]
    fn domain_survives_an_encode_decode_cycle() {
        let domain = sample_domain();
        let json = serde_json::to_string(&domain).expect("encode");
        let decoded: Domain = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, domain);
    }

    #[test]
    fn partial_domain_decodes_with_defaults() {
        let domain: Domain =
            serde_json::from_str(r#"{"name":"test.com","tld":"com"}"#).expect("decode");
        assert_eq!(domain.name, "test.com");
        assert_eq!(domain.tld, "com");
        assert_eq!(domain.options, DomainOptions::default());
        assert!(domain.contacts.owner.is_none());
    }

    #[test]
    fn null_members_decode_as_missing() {
        let domain: Domain = serde_json::from_str(
            r#"{"name":"a.ch","options":null,"contacts":{"tech":{"id":3,"phone":null,"validated_at":null}}}"#,
        )
        .expect("decode");
        let tech = domain.contacts.tech.expect("tech contact present");
        assert_eq!(tech.phone, "");
        assert_eq!(tech.validated_at, None);
    }

    #[test]
    fn null_numbers_and_flags_decode_as_zero() {
        let domains: Vec<Domain> = serde_json::from_str(
            r#"[
                {"id":null,"name":"example.ch","tld":"ch","is_premium":null,"created_at":null,"expires_at":null,
                 "options":{"dns_anycast":null,"renewal_warranty":null,"domain_privacy":null,"dnssec":true}},
                {"name":"test.com","tld":"com","expires_at":1734444000}
            ]"#,
        )
        .expect("decode");

        assert_eq!(domains.len(), 2);
        assert_eq!(domains[0].id, 0);
        assert!(!domains[0].is_premium);
        assert_eq!(domains[0].created_at, UnixTimestamp::default());
        assert_eq!(domains[0].expires_at, UnixTimestamp::default());
        assert!(domains[0].options.dnssec && !domains[0].options.dns_anycast);
        assert_eq!(domains[1].expires_at.as_secs(), 1_734_444_000);
    }

    #[test]
    fn contact_with_null_numbers_and_flags_decodes() {
        let contact: Contact = serde_json::from_str(
            r#"{"id":null,"email":"tech@example.ch","is_validated":null,"created_at":null}"#,
        )
        .expect("decode");
        assert_eq!(contact.id, 0);
        assert!(!contact.is_validated);
        assert_eq!(contact.created_at, UnixTimestamp::default());
        assert_eq!(contact.email, "tech@example.ch");
    }

    #[test]
    fn epoch_validation_time_is_not_confused_with_unvalidated() {
        let validated: Contact =
            serde_json::from_str(r#"{"validated_at":0}"#).expect("decode");
        let pending: Contact = serde_json::from_str(r#"{"validated_at":null}"#).expect("decode");
        assert_eq!(validated.validated_at, Some(UnixTimestamp::new(0)));
        assert_eq!(pending.validated_at, None);
    }

    #[test]
    fn unset_contacts_are_omitted_on_encode() {
        let json = serde_json::to_value(DomainContacts::default()).expect("encode");
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn contact_type_uses_the_wire_name() {
        let contact: Contact = serde_json::from_str(r#"{"type":"company"}"#).expect("decode");
        assert_eq!(contact.kind, "company");
        let json = serde_json::to_value(&contact).expect("encode");
        assert_eq!(json["type"], "company");
    }

    #[test]
    fn contacts_iterate_in_role_order() {
        let mut contacts = DomainContacts::default();
        contacts.billing = Some(Contact { id: 4, ..Contact::default() });
        contacts.admin = Some(Contact { id: 2, ..Contact::default() });
        let roles: Vec<_> = contacts.iter().map(|(role, c)| (role, c.id)).collect();
        assert_eq!(roles, vec![(ContactRole::Admin, 2), (ContactRole::Billing, 4)]);
    }

    #[test]
    fn nameserver_input_keeps_order_on_the_wire() {
        let input = UpdateNameserversInput::new(["ns2.example.ch", "ns1.example.ch"])
            .verify_availability(true);
        let json = serde_json::to_value(&input).expect("encode");
        assert_eq!(
            json,
            serde_json::json!({
                "nameservers": ["ns2.example.ch", "ns1.example.ch"],
                "verify_ns_availability": true
            })
        );
    }

    #[test]
    fn formats_dates_in_utc() {
        assert_eq!(UnixTimestamp::new(1_734_444_000).format_date(), "2024-12-17");
        assert_eq!(UnixTimestamp::new(i64::MAX).format_date(), i64::MAX.to_string());
    }

    #[test]
    fn error_body_keeps_granular_details() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":"validation_failed","description":"Validation failed","errors":[{"code":"invalid_nameserver","description":"bad","context":{"attribute":"nameservers.0"}}]}"#,
        )
        .expect("decode");
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].context["attribute"], "nameservers.0");
    }
}
