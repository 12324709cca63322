//! Blocking client for the Payant payments and invoicing API.
//!
//! # Overview
//! Every operation (banks, clients, invoices, transfers, payments, products)
//! validates its inputs locally, builds a method/path/payload triple, and
//! sends exactly one authenticated request. The decoded JSON body is
//! returned as-is.
//!
//! # Design
//! - `PayantClient` is the validator and request builder. It never does I/O,
//!   so every business rule is testable without a server.
//! - `Dispatcher` holds the base URL and the bearer-token headers and runs
//!   one round-trip through a `Transport` (a blocking `ureq` agent unless
//!   the caller supplies another).
//! - `Payant` ties the two together with one method per operation.
//! - Configuration is an explicit `Config` value; nothing is read from the
//!   environment unless `Config::from_env` is called.
//!
//! ```rust,no_run
//! use payant_core::{ClientData, Config, Mode, Payant};
//!
//! # fn main() -> Result<(), payant_core::ApiError> {
//! let payant = Payant::new(&Config::new("sk_demo_key", Mode::Demo));
//! let banks = payant.get_banks()?;
//! let client = ClientData::new("Emmanuel", "Awotunde", "a@b.com", "08012345678");
//! let created = payant.add_client(&client)?;
//! # let _ = (banks, created);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod payant;
pub mod types;
pub mod validate;

pub use client::PayantClient;
pub use config::{Config, Mode};
pub use dispatch::{Dispatcher, Transport, UreqTransport};
pub use error::{ApiError, ValidationError};
pub use http::{ApiCall, HttpMethod, HttpRequest, HttpResponse};
pub use payant::Payant;
pub use types::{ClientData, FeeBearer, KeyedRecord, PaymentChannel, Period, ProductData, ProductType};
