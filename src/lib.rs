//! # Coffee Order Backend - REST API Server
//!
//! A small REST backend for a coffee-ordering kiosk. Guests place drink
//! orders from a tablet; baristas are notified in a Telegram chat and mark
//! orders as done straight from the message. Built with
//! [Axum](https://crates.io/crates/axum) and documented via
//! [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Upsert semantics**: one open order per guest and drink, matched
//!   case-insensitively. Ordering again updates the existing order.
//!
//! - **Durable store**: orders survive restarts in a JSON file, written
//!   atomically after every change. An in-memory mode is available for tests.
//!
//! - **Best-effort notifications**: an unreachable bot never fails an order.
//!   Every response reports whether the notification went out.
//!
//! - **Bot interaction**: "✅ Done" buttons and `/orders`, `/clear` commands,
//!   received through long polling or a webhook.
//!
//! - **OpenAPI Documentation**: Swagger UI at `/swagger-ui/`.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (api) ──┐
//!              ├──▶ service ──▶ store ──▶ persistence (file / memory)
//! bot updates ─┘        │
//!                       └──▶ notifier ──▶ transport (Telegram)
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers and router configuration |
//! | [`bot`] | Bot update handling, polling and webhook setup |
//! | [`config`] | TOML configuration with environment overrides |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Orders, drink kinds and request/response DTOs |
//! | [`notifier`] | Notification state machine, message texts, transports |
//! | [`service`] | Order operations shared by HTTP and bot |
//! | [`state`] | Application state management |
//! | [`store`] | Order store and persistence backends |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Liveness and notifier state |
//! | GET | `/status` | Open orders with per-drink counts |
//! | POST | `/order` | Place or update an order |
//! | DELETE | `/order/{guest}/{coffee}` | Remove one order |
//! | DELETE | `/orders` | Remove all orders |
//! | POST | `/telegram/webhook` | Bot updates (webhook mode only) |
//!
//! ## Example Usage
//!
//! ### Starting the Server
//!
//! ```bash
//! TELEGRAM_BOT_TOKEN=123456:ABC... TELEGRAM_CHAT_ID=-100123 cargo run
//! ```
//!
//! ### API Requests
//!
//! ```bash
//! curl -X POST http://localhost:3000/order \
//!   -H "Content-Type: application/json" \
//!   -d '{"guest": "Ana", "coffee": "Cappuccino", "oatMilk": true}'
//!
//! curl http://localhost:3000/status
//!
//! curl -X DELETE http://localhost:3000/order/Ana/Cappuccino
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod service;
pub mod state;
pub mod store;
