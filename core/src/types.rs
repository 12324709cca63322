//! Input records and enumerated value domains.
//!
//! # Design
//! Client and product data arrive as keyed records where which keys are
//! mandatory depends on the operation: `add_client` needs the four identity
//! keys, `resolve_account` only the bank details. Every known field is an
//! `Option<String>` and `Some` means "key present", so required-key checks
//! look at presence and never at content. Unknown keys are kept in `extra`
//! and forwarded untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record whose keys can be checked for presence.
pub trait KeyedRecord {
    fn has_key(&self, key: &str) -> bool;

    /// No key present at all.
    fn is_empty(&self) -> bool;
}

/// Client details as sent to `/clients`, `/invoices`, `/transfers` and
/// `/resolve-account`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub client_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_bank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClientData {
    /// A record carrying the four identity keys.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    /// Only the bank details, as `resolve_account` expects.
    pub fn bank_account(settlement_bank: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self::default().with_bank_account(settlement_bank, account_number)
    }

    pub fn with_bank_account(
        mut self,
        settlement_bank: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        self.settlement_bank = Some(settlement_bank.into());
        self.account_number = Some(account_number.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    fn known(&self, key: &str) -> Option<&Option<String>> {
        Some(match key {
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "address" => &self.address,
            "company_name" => &self.company_name,
            "type" => &self.client_type,
            "settlement_bank" => &self.settlement_bank,
            "account_number" => &self.account_number,
            _ => return None,
        })
    }
}

impl KeyedRecord for ClientData {
    fn has_key(&self, key: &str) -> bool {
        match self.known(key) {
            Some(field) => field.is_some(),
            None => self.extra.contains_key(key),
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Product details as sent to `PUT /products/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductData {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        unit_cost: impl Into<String>,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            unit_cost: Some(unit_cost.into()),
            product_type: Some(product_type.into()),
            extra: Map::new(),
        }
    }
}

impl KeyedRecord for ProductData {
    fn has_key(&self, key: &str) -> bool {
        let field = match key {
            "name" => &self.name,
            "description" => &self.description,
            "unit_cost" => &self.unit_cost,
            "type" => &self.product_type,
            _ => return self.extra.contains_key(key),
        };
        field.is_some()
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Generates a closed string domain with case-insensitive parsing and a
/// canonical wire spelling.
macro_rules! string_domain {
    (
        $(#[$meta:meta])* $name:ident {
            $first:ident => $first_wire:literal $(, $variant:ident => $wire:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $first,
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$first, $($name::$variant),*];

            /// Allowed values, for error messages.
            pub const EXPECTED: &'static str = concat!($first_wire $(, ", ", $wire)*);

            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$first => $first_wire,
                    $($name::$variant => $wire),*
                }
            }

            /// Case-insensitive match against the canonical spellings.
            pub fn parse(raw: &str) -> Option<Self> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(raw))
            }

            /// Byte-for-byte match; no trimming, no case folding.
            pub fn parse_exact(raw: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_domain! {
    /// Who pays the transaction fee on an invoice. Matched exactly.
    FeeBearer {
        Account => "account",
        Client => "client",
    }
}

string_domain! {
    /// Date range for history queries. Matched exactly.
    Period {
        Today => "today",
        Week => "week",
        Month => "month",
        Last30Days => "30",
        Last90Days => "90",
        Year => "year",
        Custom => "custom",
    }
}

string_domain! {
    PaymentChannel {
        Cash => "Cash",
        BankTransfer => "BankTransfer",
        Pos => "POS",
        Cheque => "Cheque",
    }
}

string_domain! {
    ProductType {
        Product => "product",
        Service => "service",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn client_data_from_mapping_tracks_present_keys() {
        let data: ClientData = serde_json::from_value(json!({
            "first_name": "Emmanuel",
            "email": "",
            "lga": "Ikeja",
        }))
        .unwrap();
        assert!(data.has_key("first_name"));
        assert!(data.has_key("email"), "present-but-empty counts as present");
        assert!(data.has_key("lga"));
        assert!(!data.has_key("phone"));
        assert!(!data.is_empty());
        assert!(ClientData::default().is_empty());
    }

    #[test]
    fn client_data_serializes_only_present_keys() {
        let data = ClientData::bank_account("058", "0123456789");
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"settlement_bank": "058", "account_number": "0123456789"})
        );
    }

    #[test]
    fn client_type_uses_wire_name() {
        let data: ClientData = serde_json::from_value(json!({"type": "corporate"})).unwrap();
        assert_eq!(data.client_type.as_deref(), Some("corporate"));
        assert!(data.has_key("type"));
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({"type": "corporate"}));
    }

    #[test]
    fn product_data_presence() {
        let data: ProductData = serde_json::from_value(json!({"name": "Pen", "type": "product"})).unwrap();
        assert!(data.has_key("name"));
        assert!(data.has_key("type"));
        assert!(!data.has_key("unit_cost"));
    }

    #[test]
    fn domains_parse_case_insensitively() {
        assert_eq!(PaymentChannel::parse("cash"), Some(PaymentChannel::Cash));
        assert_eq!(PaymentChannel::parse("pos"), Some(PaymentChannel::Pos));
        assert_eq!(PaymentChannel::parse("BANKTRANSFER"), Some(PaymentChannel::BankTransfer));
        assert_eq!(PaymentChannel::parse("wire"), None);
        assert_eq!(ProductType::parse("Service"), Some(ProductType::Service));
        assert_eq!(Period::parse("30"), Some(Period::Last30Days));
        assert_eq!(Period::parse("decade"), None);
        assert_eq!(FeeBearer::parse("client"), Some(FeeBearer::Client));
    }

    #[test]
    fn exact_parse_rejects_other_spellings() {
        assert_eq!(Period::parse_exact("today"), Some(Period::Today));
        assert_eq!(Period::parse_exact("TODAY"), None);
        assert_eq!(Period::parse_exact(" week "), None);
        assert_eq!(FeeBearer::parse_exact("account"), Some(FeeBearer::Account));
        assert_eq!(FeeBearer::parse_exact("Account"), None);
    }

    #[test]
    fn expected_lists_every_value() {
        assert_eq!(Period::EXPECTED, "today, week, month, 30, 90, year, custom");
    }
}
