//! Reusable validation rules.
//!
//! Each rule returns the first violation as a `ValidationError`. A value is
//! empty when it is absent or only whitespace.

use crate::error::ValidationError;
use crate::types::KeyedRecord;

pub const CLIENT_KEYS: &[&str] = &["first_name", "last_name", "email", "phone"];
pub const BANK_ACCOUNT_KEYS: &[&str] = &["settlement_bank", "account_number"];
pub const TRANSFER_CLIENT_KEYS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "phone",
    "settlement_bank",
    "account_number",
];
pub const PRODUCT_KEYS: &[&str] = &["name", "description", "unit_cost", "type"];

/// The trimmed value, or `None` if it is empty.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Every key in `keys` must be present in `record`; values are not looked at.
pub fn require_keys<R: KeyedRecord>(record: &R, keys: &[&'static str]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = keys.iter().copied().filter(|k| !record.has_key(k)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::RequiredValuesMissing { missing })
    }
}

/// Identifiers, reference codes and other values that must be supplied.
pub fn require_id<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    non_empty(value).ok_or(ValidationError::IsNullOrInvalid { field })
}

pub fn require_non_null<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    non_empty(value).ok_or(ValidationError::IsNull { field })
}

pub fn require_value<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    non_empty(value).ok_or(ValidationError::RequiredValueMissing { field })
}

/// Map `raw` into its domain with `parse`, or fail with `IsInvalid`.
pub fn require_in_domain<T>(
    raw: &str,
    field: &'static str,
    expected: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    parse(raw).ok_or_else(|| ValidationError::IsInvalid {
        field,
        value: raw.to_string(),
        expected,
    })
}
