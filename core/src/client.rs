//! Validating request builder for the Payant API.
//!
//! # Design
//! `PayantClient` carries no state. Each operation is a `build_*` method that
//! checks its inputs, stops at the first violated rule, and returns an
//! `ApiCall` (method, path relative to the API root, optional JSON payload).
//! Ids and reference codes always land in a single percent-encoded path
//! segment.
//! Nothing here touches the network: `Dispatcher` adds the base URL and
//! credentials and performs the round-trip.

use serde::Serialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::error::{ApiError, ValidationError};
use crate::http::{ApiCall, HttpMethod};
use crate::types::{ClientData, FeeBearer, KeyedRecord, PaymentChannel, Period, ProductData, ProductType};
use crate::validate::{
    non_empty, require_id, require_in_domain, require_keys, require_non_null, require_value,
    BANK_ACCOUNT_KEYS, CLIENT_KEYS, PRODUCT_KEYS, TRANSFER_CLIENT_KEYS,
};

/// Stateless validator and request builder for every Payant operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayantClient;

impl PayantClient {
    pub fn new() -> Self {
        Self
    }

    // --- banks -------------------------------------------------------------

    pub fn build_get_banks(&self) -> ApiCall {
        ApiCall::new(HttpMethod::Get, "/banks")
    }

    /// Needs `settlement_bank` and `account_number`.
    pub fn build_resolve_account(&self, client: &ClientData) -> Result<ApiCall, ApiError> {
        require_keys(client, BANK_ACCOUNT_KEYS)?;
        Ok(ApiCall::new(HttpMethod::Post, "/resolve-account").with_payload(to_payload(client)?))
    }

    // --- clients -----------------------------------------------------------

    pub fn build_add_client(&self, client: &ClientData) -> Result<ApiCall, ApiError> {
        require_keys(client, CLIENT_KEYS)?;
        Ok(ApiCall::new(HttpMethod::Post, "/clients").with_payload(to_payload(client)?))
    }

    pub fn build_get_client(&self, client_id: Option<&str>) -> Result<ApiCall, ApiError> {
        let id = require_id(client_id, "client_id")?;
        Ok(ApiCall::new(HttpMethod::Get, resource_path("/clients", id)?))
    }

    pub fn build_edit_client(
        &self,
        client_id: Option<&str>,
        client: &ClientData,
    ) -> Result<ApiCall, ApiError> {
        let id = require_id(client_id, "client_id")?;
        require_keys(client, CLIENT_KEYS)?;
        Ok(ApiCall::new(HttpMethod::Put, resource_path("/clients", id)?).with_payload(to_payload(client)?))
    }

    pub fn build_delete_client(&self, client_id: Option<&str>) -> Result<ApiCall, ApiError> {
        let id = require_id(client_id, "client_id")?;
        Ok(ApiCall::new(HttpMethod::Delete, resource_path("/clients", id)?))
    }

    // --- invoices ----------------------------------------------------------

    /// Either `client_id` or a `client` carrying the four identity keys must
    /// be given. Each is sent only when supplied.
    pub fn build_add_invoice(
        &self,
        client_id: Option<&str>,
        client: Option<&ClientData>,
        due_date: Option<&str>,
        fee_bearer: Option<&str>,
        items: &Value,
    ) -> Result<ApiCall, ApiError> {
        let client_id = non_empty(client_id);
        let client_complete = client.is_some_and(|c| require_keys(c, CLIENT_KEYS).is_ok());
        if client_id.is_none() && !client_complete {
            let missing = match client {
                Some(c) => CLIENT_KEYS.iter().copied().filter(|k| !c.has_key(k)).collect(),
                None => vec!["client_id"],
            };
            return Err(ValidationError::RequiredValuesMissing { missing }.into());
        }

        let due_date = require_id(due_date, "due_date")?;
        require_non_null(fee_bearer, "fee_bearer")?;
        let raw_bearer = fee_bearer.unwrap_or_default();
        let fee_bearer = FeeBearer::parse_exact(raw_bearer)
            .ok_or_else(|| ValidationError::InvalidFeeBearer(raw_bearer.to_string()))?;

        if !items.is_array() {
            return Err(ValidationError::IsInvalid {
                field: "items",
                value: items.to_string(),
                expected: "a list",
            }
            .into());
        }

        let mut payload = Map::new();
        payload.insert("due_date".into(), json!(due_date));
        payload.insert("fee_bearer".into(), json!(fee_bearer.as_str()));
        payload.insert("items".into(), items.clone());
        if let Some(id) = client_id {
            payload.insert("client_id".into(), json!(id));
        }
        if let Some(c) = client.filter(|c| !c.is_empty()) {
            payload.insert("client".into(), to_payload(c)?);
        }

        Ok(ApiCall::new(HttpMethod::Post, "/invoices").with_payload(Value::Object(payload)))
    }

    pub fn build_get_invoice(&self, reference_code: Option<&str>) -> Result<ApiCall, ApiError> {
        let code = require_id(reference_code, "reference_code")?;
        Ok(ApiCall::new(HttpMethod::Get, resource_path("/invoices", code)?))
    }

    pub fn build_send_invoice(&self, reference_code: Option<&str>) -> Result<ApiCall, ApiError> {
        let code = require_id(reference_code, "reference_code")?;
        Ok(ApiCall::new(HttpMethod::Get, resource_path("/invoices/send", code)?))
    }

    pub fn build_invoice_history(
        &self,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ApiCall, ApiError> {
        history_call("/invoices/history", period, start, end)
    }

    pub fn build_delete_invoice(&self, reference_code: Option<&str>) -> Result<ApiCall, ApiError> {
        let code = require_id(reference_code, "reference_code")?;
        Ok(ApiCall::new(HttpMethod::Delete, resource_path("/invoices", code)?))
    }

    // --- transfers ---------------------------------------------------------

    pub fn build_add_transfer(&self, client: &ClientData, amount: Option<&str>) -> Result<ApiCall, ApiError> {
        require_keys(client, TRANSFER_CLIENT_KEYS)?;
        let amount = require_id(amount, "amount")?;
        let payload = json!({
            "client": to_payload(client)?,
            "amount": amount,
        });
        Ok(ApiCall::new(HttpMethod::Post, "/transfers").with_payload(payload))
    }

    pub fn build_get_transfer(&self, reference_code: Option<&str>) -> Result<ApiCall, ApiError> {
        let code = require_id(reference_code, "reference_code")?;
        Ok(ApiCall::new(HttpMethod::Get, resource_path("/transfers", code)?))
    }

    pub fn build_transfer_history(
        &self,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ApiCall, ApiError> {
        history_call("/transfers/history", period, start, end)
    }

    pub fn build_delete_transfer(&self, reference_code: Option<&str>) -> Result<ApiCall, ApiError> {
        let code = require_id(reference_code, "reference_code")?;
        Ok(ApiCall::new(HttpMethod::Delete, resource_path("/transfers", code)?))
    }

    // --- payments ----------------------------------------------------------

    /// `channel` is matched case-insensitively and sent in its canonical
    /// spelling (`Cash`, `BankTransfer`, `POS`, `Cheque`).
    pub fn build_add_payment(
        &self,
        reference_code: Option<&str>,
        date: Option<&str>,
        amount: Option<&str>,
        channel: Option<&str>,
    ) -> Result<ApiCall, ApiError> {
        let reference_code = require_id(reference_code, "reference_code")?;
        let date = require_id(date, "date")?;
        let amount = require_id(amount, "amount")?;
        let raw_channel = require_non_null(channel, "channel")?;
        let channel = require_in_domain(raw_channel, "channel", PaymentChannel::EXPECTED, PaymentChannel::parse)?;

        let payload = json!({
            "reference_code": reference_code,
            "date": date,
            "amount": amount,
            "channel": channel.as_str(),
        });
        Ok(ApiCall::new(HttpMethod::Post, "/payments").with_payload(payload))
    }

    pub fn build_get_payment(&self, reference_code: Option<&str>) -> Result<ApiCall, ApiError> {
        let code = require_id(reference_code, "reference_code")?;
        Ok(ApiCall::new(HttpMethod::Get, resource_path("/payments", code)?))
    }

    pub fn build_payment_history(
        &self,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ApiCall, ApiError> {
        history_call("/payments/history", period, start, end)
    }

    // --- products ----------------------------------------------------------

    pub fn build_add_product(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        unit_cost: Option<&str>,
        product_type: Option<&str>,
    ) -> Result<ApiCall, ApiError> {
        let name = require_non_null(name, "name")?;
        let description = require_non_null(description, "description")?;
        let unit_cost = require_non_null(unit_cost, "unit_cost")?;
        let raw_type = require_non_null(product_type, "type")?;
        let product_type = require_in_domain(raw_type, "type", ProductType::EXPECTED, ProductType::parse)?;

        let payload = json!({
            "name": name,
            "description": description,
            "unit_cost": unit_cost,
            "type": product_type.as_str(),
        });
        Ok(ApiCall::new(HttpMethod::Post, "/products").with_payload(payload))
    }

    pub fn build_get_product(&self, product_id: Option<&str>) -> Result<ApiCall, ApiError> {
        let id = require_id(product_id, "product_id")?;
        Ok(ApiCall::new(HttpMethod::Get, resource_path("/products", id)?))
    }

    /// The type check runs before the key check, so a record without `type`
    /// is rejected as an invalid type (it defaults to `none`).
    pub fn build_edit_product(
        &self,
        product_id: Option<&str>,
        product: &ProductData,
    ) -> Result<ApiCall, ApiError> {
        let id = require_id(product_id, "product_id")?;

        let raw_type = product.product_type.as_deref().unwrap_or("none");
        let raw_type = require_non_null(Some(raw_type), "type")?;
        let product_type = require_in_domain(raw_type, "type", ProductType::EXPECTED, ProductType::parse)?;

        require_keys(product, PRODUCT_KEYS)?;

        let mut product = product.clone();
        product.product_type = Some(product_type.as_str().to_string());
        Ok(ApiCall::new(HttpMethod::Put, resource_path("/products", id)?).with_payload(to_payload(&product)?))
    }

    pub fn build_get_products(&self) -> ApiCall {
        ApiCall::new(HttpMethod::Get, "/products")
    }

    pub fn build_delete_product(&self, product_id: Option<&str>) -> Result<ApiCall, ApiError> {
        let id = require_id(product_id, "product_id")?;
        Ok(ApiCall::new(HttpMethod::Delete, resource_path("/products", id)?))
    }
}

fn history_call(
    path: &'static str,
    period: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<ApiCall, ApiError> {
    require_value(period, "period")?;
    let raw_period = period.unwrap_or_default();
    let period = require_in_domain(raw_period, "period", Period::EXPECTED, Period::parse_exact)?;

    let mut payload = Map::new();
    payload.insert("period".into(), json!(period.as_str()));

    if period == Period::Custom {
        let start = require_non_null(start, "start")?;
        let end = require_non_null(end, "end")?;
        payload.insert("start".into(), json!(start));
        payload.insert("end".into(), json!(end));
    }

    Ok(ApiCall::new(HttpMethod::Post, path).with_payload(Value::Object(payload)))
}

/// `collection` followed by `id` as one percent-encoded path segment.
fn resource_path(collection: &str, id: &str) -> Result<String, ApiError> {
    // `url` drops pure dot segments instead of encoding them.
    if matches!(id, "." | "..") {
        return Ok(format!("{collection}/{}", "%2E".repeat(id.len())));
    }

    let mut url = Url::parse("http://payant.invalid/").map_err(|e| ApiError::Serialization(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::Serialization(format!("cannot build path under {collection}")))?
        .pop_if_empty()
        .extend(collection.split('/').filter(|s| !s.is_empty()))
        .push(id);
    Ok(url.path().to_string())
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}
