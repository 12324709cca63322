//! In-memory stand-in for the Payant API, used by the client's integration
//! tests and runnable on its own for manual poking.
//!
//! Every response uses Payant's envelope: `{"status", "message", "data"}`.
//! Requests without a bearer token are refused with 401.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const BANKS: &[(u32, &str, &str)] = &[
    (1, "Access Bank", "044"),
    (2, "First Bank of Nigeria", "011"),
    (3, "Guaranty Trust Bank", "058"),
    (4, "United Bank for Africa", "033"),
    (5, "Zenith Bank", "057"),
];

#[derive(Default)]
pub struct Store {
    next_id: u64,
    clients: BTreeMap<u64, Value>,
    products: BTreeMap<u64, Value>,
    invoices: BTreeMap<String, Value>,
    transfers: BTreeMap<String, Value>,
    payments: BTreeMap<String, Value>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl NewClient {
    /// The client as embedded in another record; stored clients get an id.
    fn into_details(self) -> Map<String, Value> {
        let mut record = self.rest;
        record.insert("first_name".into(), json!(self.first_name));
        record.insert("last_name".into(), json!(self.last_name));
        record.insert("email".into(), json!(self.email));
        record.insert("phone".into(), json!(self.phone));
        record
    }

    fn into_record(self, id: u64) -> Value {
        let mut record = self.into_details();
        record.insert("id".into(), json!(id));
        Value::Object(record)
    }
}

#[derive(Deserialize)]
pub struct AccountQuery {
    pub settlement_bank: String,
    pub account_number: String,
}

#[derive(Deserialize)]
pub struct NewInvoice {
    pub client_id: Option<String>,
    pub client: Option<NewClient>,
    pub due_date: String,
    pub fee_bearer: String,
    pub items: Vec<Value>,
}

#[derive(Deserialize)]
pub struct NewTransfer {
    pub client: NewClient,
    pub amount: String,
}

#[derive(Deserialize)]
pub struct NewPayment {
    pub reference_code: String,
    pub date: String,
    pub amount: String,
    pub channel: String,
}

#[derive(Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub unit_cost: String,
    #[serde(rename = "type")]
    pub product_type: String,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub period: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Error envelope with a status code.
pub struct Failure(StatusCode, &'static str);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({"status": "error", "message": self.1}))).into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), Failure>;

fn success(message: &str, data: Value) -> Reply {
    Ok((
        StatusCode::OK,
        Json(json!({"status": "success", "message": message, "data": data})),
    ))
}

fn created(message: &str, data: Value) -> Reply {
    Ok((
        StatusCode::CREATED,
        Json(json!({"status": "success", "message": message, "data": data})),
    ))
}

fn reference_code() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/banks", get(list_banks))
        .route("/resolve-account", post(resolve_account))
        .route("/clients", post(add_client))
        .route("/clients/{id}", get(get_client).put(edit_client).delete(delete_client))
        .route("/invoices", post(add_invoice))
        .route("/invoices/history", post(invoice_history))
        .route("/invoices/send/{reference}", get(send_invoice))
        .route("/invoices/{reference}", get(get_invoice).delete(delete_invoice))
        .route("/transfers", post(add_transfer))
        .route("/transfers/history", post(transfer_history))
        .route("/transfers/{reference}", get(get_transfer).delete(delete_transfer))
        .route("/payments", post(add_payment))
        .route("/payments/history", post(payment_history))
        .route("/payments/{reference}", get(get_payment))
        .route("/products", get(list_products).post(add_product))
        .route("/products/{id}", get(get_product).put(edit_product).delete(delete_product))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejecting request without bearer token");
        return Failure(StatusCode::UNAUTHORIZED, "Invalid or missing API key").into_response();
    }
    next.run(request).await
}

// --- banks ---

async fn list_banks() -> Reply {
    let banks: Vec<Value> = BANKS
        .iter()
        .map(|(id, name, code)| json!({"id": id, "name": name, "code": code}))
        .collect();
    success("Banks retrieved", json!(banks))
}

async fn resolve_account(Json(input): Json<AccountQuery>) -> Reply {
    if !BANKS.iter().any(|(id, _, code)| *code == input.settlement_bank || id.to_string() == input.settlement_bank) {
        return Err(Failure(StatusCode::NOT_FOUND, "Bank not found"));
    }
    success(
        "Account resolved",
        json!({
            "account_name": "DEMO ACCOUNT HOLDER",
            "account_number": input.account_number,
            "settlement_bank": input.settlement_bank,
        }),
    )
}

// --- clients ---

async fn add_client(State(db): State<Db>, Json(input): Json<NewClient>) -> Reply {
    let mut store = db.write().await;
    let id = store.next_id();
    let record = input.into_record(id);
    store.clients.insert(id, record.clone());
    created("Client created", record)
}

async fn get_client(State(db): State<Db>, Path(id): Path<u64>) -> Reply {
    let store = db.read().await;
    let record = store
        .clients
        .get(&id)
        .cloned()
        .ok_or(Failure(StatusCode::NOT_FOUND, "Client not found"))?;
    success("Client retrieved", record)
}

async fn edit_client(State(db): State<Db>, Path(id): Path<u64>, Json(input): Json<NewClient>) -> Reply {
    let mut store = db.write().await;
    let record = store
        .clients
        .get_mut(&id)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Client not found"))?;
    *record = input.into_record(id);
    success("Client updated", record.clone())
}

async fn delete_client(State(db): State<Db>, Path(id): Path<u64>) -> Reply {
    let mut store = db.write().await;
    store
        .clients
        .remove(&id)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Client not found"))?;
    success("Client deleted", Value::Null)
}

// --- invoices ---

async fn add_invoice(State(db): State<Db>, Json(input): Json<NewInvoice>) -> Reply {
    if input.fee_bearer != "account" && input.fee_bearer != "client" {
        return Err(Failure(StatusCode::UNPROCESSABLE_ENTITY, "Invalid fee bearer"));
    }

    let mut store = db.write().await;
    let client_id = match (input.client_id, input.client) {
        (Some(id), _) => {
            let id: u64 = id
                .parse()
                .map_err(|_| Failure(StatusCode::UNPROCESSABLE_ENTITY, "Invalid client id"))?;
            if !store.clients.contains_key(&id) {
                return Err(Failure(StatusCode::NOT_FOUND, "Client not found"));
            }
            id
        }
        (None, Some(client)) => {
            let id = store.next_id();
            store.clients.insert(id, client.into_record(id));
            id
        }
        (None, None) => {
            return Err(Failure(StatusCode::UNPROCESSABLE_ENTITY, "Provide client_id or client"));
        }
    };

    let reference = reference_code();
    let record = json!({
        "reference_code": reference,
        "client_id": client_id,
        "due_date": input.due_date,
        "fee_bearer": input.fee_bearer,
        "items": input.items,
        "status": "pending",
        "sent": false,
    });
    store.invoices.insert(reference, record.clone());
    created("Invoice created", record)
}

async fn get_invoice(State(db): State<Db>, Path(reference): Path<String>) -> Reply {
    let store = db.read().await;
    let record = store
        .invoices
        .get(&reference)
        .cloned()
        .ok_or(Failure(StatusCode::NOT_FOUND, "Invoice not found"))?;
    success("Invoice retrieved", record)
}

async fn send_invoice(State(db): State<Db>, Path(reference): Path<String>) -> Reply {
    let mut store = db.write().await;
    let record = store
        .invoices
        .get_mut(&reference)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Invoice not found"))?;
    record["sent"] = json!(true);
    success("Invoice sent", record.clone())
}

async fn delete_invoice(State(db): State<Db>, Path(reference): Path<String>) -> Reply {
    let mut store = db.write().await;
    store
        .invoices
        .remove(&reference)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Invoice not found"))?;
    success("Invoice deleted", Value::Null)
}

async fn invoice_history(State(db): State<Db>, Json(query): Json<HistoryQuery>) -> Reply {
    check_period(&query)?;
    let store = db.read().await;
    success("Invoice history", json!(store.invoices.values().collect::<Vec<_>>()))
}

// --- transfers ---

async fn add_transfer(State(db): State<Db>, Json(input): Json<NewTransfer>) -> Reply {
    let has_bank = ["settlement_bank", "account_number"]
        .iter()
        .all(|k| input.client.rest.contains_key(*k));
    if !has_bank {
        return Err(Failure(StatusCode::UNPROCESSABLE_ENTITY, "Settlement details required"));
    }

    let mut store = db.write().await;
    let reference = reference_code();
    let record = json!({
        "reference_code": reference,
        "client": input.client.into_details(),
        "amount": input.amount,
        "status": "pending",
    });
    store.transfers.insert(reference, record.clone());
    created("Transfer created", record)
}

async fn get_transfer(State(db): State<Db>, Path(reference): Path<String>) -> Reply {
    let store = db.read().await;
    let record = store
        .transfers
        .get(&reference)
        .cloned()
        .ok_or(Failure(StatusCode::NOT_FOUND, "Transfer not found"))?;
    success("Transfer retrieved", record)
}

async fn delete_transfer(State(db): State<Db>, Path(reference): Path<String>) -> Reply {
    let mut store = db.write().await;
    store
        .transfers
        .remove(&reference)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Transfer not found"))?;
    success("Transfer deleted", Value::Null)
}

async fn transfer_history(State(db): State<Db>, Json(query): Json<HistoryQuery>) -> Reply {
    check_period(&query)?;
    let store = db.read().await;
    success("Transfer history", json!(store.transfers.values().collect::<Vec<_>>()))
}

// --- payments ---

/// Records a payment against an invoice; the invoice's reference code keys
/// the payment.
async fn add_payment(State(db): State<Db>, Json(input): Json<NewPayment>) -> Reply {
    let mut store = db.write().await;
    let invoice = store
        .invoices
        .get_mut(&input.reference_code)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Invoice not found"))?;
    invoice["status"] = json!("paid");

    let record = json!({
        "reference_code": input.reference_code,
        "date": input.date,
        "amount": input.amount,
        "channel": input.channel,
    });
    store.payments.insert(input.reference_code, record.clone());
    created("Payment recorded", record)
}

async fn get_payment(State(db): State<Db>, Path(reference): Path<String>) -> Reply {
    let store = db.read().await;
    let record = store
        .payments
        .get(&reference)
        .cloned()
        .ok_or(Failure(StatusCode::NOT_FOUND, "Payment not found"))?;
    success("Payment retrieved", record)
}

async fn payment_history(State(db): State<Db>, Json(query): Json<HistoryQuery>) -> Reply {
    check_period(&query)?;
    let store = db.read().await;
    success("Payment history", json!(store.payments.values().collect::<Vec<_>>()))
}

// --- products ---

fn product_record(id: u64, input: NewProduct) -> Value {
    json!({
        "id": id,
        "name": input.name,
        "description": input.description,
        "unit_cost": input.unit_cost,
        "type": input.product_type,
    })
}

async fn add_product(State(db): State<Db>, Json(input): Json<NewProduct>) -> Reply {
    let mut store = db.write().await;
    let id = store.next_id();
    let record = product_record(id, input);
    store.products.insert(id, record.clone());
    created("Product created", record)
}

async fn list_products(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    success("Products retrieved", json!(store.products.values().collect::<Vec<_>>()))
}

async fn get_product(State(db): State<Db>, Path(id): Path<u64>) -> Reply {
    let store = db.read().await;
    let record = store
        .products
        .get(&id)
        .cloned()
        .ok_or(Failure(StatusCode::NOT_FOUND, "Product not found"))?;
    success("Product retrieved", record)
}

async fn edit_product(State(db): State<Db>, Path(id): Path<u64>, Json(input): Json<NewProduct>) -> Reply {
    let mut store = db.write().await;
    let record = store
        .products
        .get_mut(&id)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Product not found"))?;
    *record = product_record(id, input);
    success("Product updated", record.clone())
}

async fn delete_product(State(db): State<Db>, Path(id): Path<u64>) -> Reply {
    let mut store = db.write().await;
    store
        .products
        .remove(&id)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Product not found"))?;
    success("Product deleted", Value::Null)
}

fn check_period(query: &HistoryQuery) -> Result<(), Failure> {
    const PERIODS: &[&str] = &["today", "week", "month", "30", "90", "year", "custom"];
    if !PERIODS.contains(&query.period.as_str()) {
        return Err(Failure(StatusCode::UNPROCESSABLE_ENTITY, "Invalid period"));
    }
    if query.period == "custom" && (query.start.is_none() || query.end.is_none()) {
        return Err(Failure(StatusCode::UNPROCESSABLE_ENTITY, "Custom period needs start and end"));
    }
    Ok(())
}
