//! Models module for the geographic selects
//!
//! This module contains the data models owned by the WASM side: levels,
//! options, fields, form instances, stored address records and the page
//! that ties them together.

pub mod level;
pub mod option;
pub mod field;
pub mod form;
pub mod record;
pub mod page;
pub mod serde_helpers;

// Re-export commonly used types
pub use level::GeoLevel;
pub use option::{FieldOption, OptionId, OptionItem, OptionKind};
pub use field::{PendingFetch, SelectField, TextField, TextKind};
pub use form::{FormInstance, FormState, ScopeId};
pub use record::AddressRecord;
pub use page::{FieldAddress, FieldHandle, Page, TextHandle};
