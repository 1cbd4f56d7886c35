//! Membership dues, committee budgets and funding requests API.
//!
//! A thin HTTP layer over three MongoDB collections:
//!
//! ```text
//! client -> router -> handler -> Store -> MongoDB
//! ```
//!
//! Handlers hold no state between requests. The [`store::Store`] is built
//! once at startup and shared by every request.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`models`]: Members, committees and funding requests
//! - [`store`]: Document store trait with MongoDB and in-memory backends
//! - [`sheets`]: Budget sheet parsers
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod sheets;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
