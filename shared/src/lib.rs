//! Shared types and domain logic for the Vertical Farm Platform
//!
//! This crate contains the farm models, the crop health and yield calculator
//! and ownership accounting. It performs no I/O so it can be used by the
//! backend and, via WASM, by the dashboard.

pub mod error;
pub mod health;
pub mod models;
pub mod ownership;
pub mod types;
pub mod validation;

pub use error::*;
pub use health::*;
pub use models::*;
pub use ownership::*;
pub use types::*;
pub use validation::*;
