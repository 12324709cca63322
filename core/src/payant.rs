//! One-call-per-operation facade over `PayantClient` and `Dispatcher`.

use serde_json::Value;
use tracing::warn;

use crate::client::PayantClient;
use crate::config::Config;
use crate::dispatch::{Dispatcher, Transport, UreqTransport};
use crate::error::ApiError;
use crate::http::{ApiCall, HttpMethod};
use crate::types::{ClientData, ProductData};

/// Validates, sends and decodes. Every method returns the response body as
/// untyped JSON; a validation failure returns before the transport is used.
#[derive(Debug, Clone)]
pub struct Payant<T = UreqTransport> {
    client: PayantClient,
    dispatcher: Dispatcher<T>,
}

impl Payant<UreqTransport> {
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(&Config::from_env()?))
    }
}

impl<T: Transport> Payant<T> {
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            client: PayantClient::new(),
            dispatcher: Dispatcher::with_transport(config, transport),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    fn run(&self, operation: &'static str, call: Result<ApiCall, ApiError>) -> Result<Value, ApiError> {
        let call = call.inspect_err(|err| warn!(operation, error = %err, "rejected before dispatch"))?;
        self.dispatcher.dispatch(&call)
    }

    /// Raw escape hatch: `method` is matched case-insensitively.
    pub fn send_request(&self, method: &str, path: &str, payload: Option<&Value>) -> Result<Value, ApiError> {
        let method: HttpMethod = method.parse()?;
        self.dispatcher.send(method, path, payload)
    }

    pub fn get_banks(&self) -> Result<Value, ApiError> {
        self.run("get_banks", Ok(self.client.build_get_banks()))
    }

    pub fn resolve_account(&self, client: &ClientData) -> Result<Value, ApiError> {
        self.run("resolve_account", self.client.build_resolve_account(client))
    }

    pub fn add_client(&self, client: &ClientData) -> Result<Value, ApiError> {
        self.run("add_client", self.client.build_add_client(client))
    }

    pub fn get_client(&self, client_id: Option<&str>) -> Result<Value, ApiError> {
        self.run("get_client", self.client.build_get_client(client_id))
    }

    pub fn edit_client(&self, client_id: Option<&str>, client: &ClientData) -> Result<Value, ApiError> {
        self.run("edit_client", self.client.build_edit_client(client_id, client))
    }

    pub fn delete_client(&self, client_id: Option<&str>) -> Result<Value, ApiError> {
        self.run("delete_client", self.client.build_delete_client(client_id))
    }

    pub fn add_invoice(
        &self,
        client_id: Option<&str>,
        client: Option<&ClientData>,
        due_date: Option<&str>,
        fee_bearer: Option<&str>,
        items: &Value,
    ) -> Result<Value, ApiError> {
        let call = self
            .client
            .build_add_invoice(client_id, client, due_date, fee_bearer, items);
        self.run("add_invoice", call)
    }

    pub fn get_invoice(&self, reference_code: Option<&str>) -> Result<Value, ApiError> {
        self.run("get_invoice", self.client.build_get_invoice(reference_code))
    }

    pub fn send_invoice(&self, reference_code: Option<&str>) -> Result<Value, ApiError> {
        self.run("send_invoice", self.client.build_send_invoice(reference_code))
    }

    pub fn get_invoice_history(
        &self,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.run("get_invoice_history", self.client.build_invoice_history(period, start, end))
    }

    pub fn delete_invoice(&self, reference_code: Option<&str>) -> Result<Value, ApiError> {
        self.run("delete_invoice", self.client.build_delete_invoice(reference_code))
    }

    pub fn add_transfer(&self, client: &ClientData, amount: Option<&str>) -> Result<Value, ApiError> {
        self.run("add_transfer", self.client.build_add_transfer(client, amount))
    }

    pub fn get_transfer(&self, reference_code: Option<&str>) -> Result<Value, ApiError> {
        self.run("get_transfer", self.client.build_get_transfer(reference_code))
    }

    pub fn get_transfer_history(
        &self,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.run("get_transfer_history", self.client.build_transfer_history(period, start, end))
    }

    pub fn delete_transfer(&self, reference_code: Option<&str>) -> Result<Value, ApiError> {
        self.run("delete_transfer", self.client.build_delete_transfer(reference_code))
    }

    pub fn add_payment(
        &self,
        reference_code: Option<&str>,
        date: Option<&str>,
        amount: Option<&str>,
        channel: Option<&str>,
    ) -> Result<Value, ApiError> {
        let call = self.client.build_add_payment(reference_code, date, amount, channel);
        self.run("add_payment", call)
    }

    pub fn get_payment(&self, reference_code: Option<&str>) -> Result<Value, ApiError> {
        self.run("get_payment", self.client.build_get_payment(reference_code))
    }

    pub fn get_payment_history(
        &self,
        period: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.run("get_payment_history", self.client.build_payment_history(period, start, end))
    }

    pub fn add_product(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        unit_cost: Option<&str>,
        product_type: Option<&str>,
    ) -> Result<Value, ApiError> {
        let call = self
            .client
            .build_add_product(name, description, unit_cost, product_type);
        self.run("add_product", call)
    }

    pub fn get_product(&self, product_id: Option<&str>) -> Result<Value, ApiError> {
        self.run("get_product", self.client.build_get_product(product_id))
    }

    pub fn edit_product(&self, product_id: Option<&str>, product: &ProductData) -> Result<Value, ApiError> {
        self.run("edit_product", self.client.build_edit_product(product_id, product))
    }

    pub fn get_products(&self) -> Result<Value, ApiError> {
        self.run("get_products", Ok(self.client.build_get_products()))
    }

    pub fn delete_product(&self, product_id: Option<&str>) -> Result<Value, ApiError> {
        self.run("delete_product", self.client.build_delete_product(product_id))
    }
}
