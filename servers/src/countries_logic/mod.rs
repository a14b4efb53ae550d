//! # Countries Server Logic
//!
//! ## Contained Modules:
//! - **`config`**: layered configuration (defaults, JSON file, environment, CLI).
//! - **`logger`**: console plus daily-rolling JSON file logging.
//! - **`state`**: the engines shared by every handler.
//! - **`error`**: `AppError` and its HTTP mapping.
//! - **`routes`**: the axum router and server loop.

pub mod config;
pub mod error;
pub mod logger;
pub mod routes;
pub mod state;
