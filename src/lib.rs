//! Geographic Cascade WASM Module
//!
//! Keeps the country → state → municipality → neighborhood selects of every
//! address form on a page consistent: a change at one level resets and
//! reloads the levels below it within the same form, and stored addresses
//! can be loaded back into all four levels at once.

pub mod models;
pub mod config;
pub mod errors;
pub mod scope;
pub mod provider;
pub mod cascade;
pub mod dom;
pub mod api;

// Re-export commonly used types
pub use cascade::{CascadeOutcome, FieldObserver, GeoSync, LoadOutcome, ReconcileOutcome, ReconcileTargets};
pub use config::GeoConfig;
pub use errors::{LookupError, SyncError};
pub use models::*;
pub use provider::{GeoProvider, HttpProvider, StaticProvider};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            // a logger was already installed by the host page
            log::debug!("logger already initialized");
        }
    }

    log::info!("Geographic cascade WASM module initialized");
}
