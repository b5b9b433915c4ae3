//! HTTP client library for the Coffee Order API.
//!
//! This crate provides a typed HTTP client for the coffee-ordering kiosk
//! backend, as used by the tablet front end and the integration tests.
//!
//! # Example
//!
//! ```no_run
//! use order_client::{ClientConfig, OrderClient, PlaceOrderRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), order_client::Error> {
//!     let client = OrderClient::new(ClientConfig {
//!         base_url: "http://localhost:3000".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let placed = client
//!         .place_order(&PlaceOrderRequest::new("Ana", "Cappuccino").oat_milk())
//!         .await?;
//!     println!("{}: {}", placed.action, placed.message);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, OrderClient};
pub use error::Error;
pub use types::*;
