//! Geographic selects WASM API
//!
//! This module provides the JavaScript-facing API.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, validation and error handling
//! - `types`: Argument and report shapes exchanged with JavaScript
//! - `geo`: The exported functions (setup, change handlers, reconciliation)

pub mod helpers;
pub mod types;
pub mod geo;

pub use geo::*;
pub use types::{AddressFieldOptions, OperationReport};
