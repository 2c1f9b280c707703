//! Read-only HTTP API over a directory of JSON order records.
//!
//! An external writer drops one `order_<id>.json` file per order into a
//! single directory. This crate locates that directory, serves the records,
//! and computes frequency statistics over them on demand:
//!
//! ```text
//! orders/
//!   order_20250101_093000_000_Sam.json   {"order": {"drinkType": "latte", ...}}
//!   order_20250101_094512_331_Ana.json   {"order": {"drinkType": "mocha", ...}}
//!   order_broken.json                    <skipped, still counted in totalOrders>
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Directory location, record access and statistics
//! - [`api`]: HTTP API
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result, StoreError};
pub use store::{OrderStats, OrderStore, StoreLocator};
