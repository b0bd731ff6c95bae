//! Remote lookups
//!
//! `GeoProvider` is the seam between the cascade logic and the endpoints
//! that serve geographic lists and stored addresses. The browser build
//! uses `HttpProvider`; `StaticProvider` serves fixed data.

pub mod http;
pub mod memory;

pub use http::HttpProvider;
pub use memory::{LookupRequest, StaticProvider};

use async_trait::async_trait;

use crate::errors::LookupError;
use crate::models::{AddressRecord, GeoLevel, OptionId, OptionItem};

#[async_trait(?Send)]
pub trait GeoProvider {
    /// Options for `level`, in display order. `parent` is the id of the
    /// selected parent entity and is `None` only for countries. A parent
    /// without children yields an empty list, not an error.
    async fn fetch_level(&self, level: GeoLevel, parent: Option<&OptionId>) -> Result<Vec<OptionItem>, LookupError>;

    /// The stored address identified by an external record key
    async fn fetch_record(&self, key: &str) -> Result<AddressRecord, LookupError>;
}

#[async_trait(?Send)]
impl<P: GeoProvider + ?Sized> GeoProvider for std::rc::Rc<P> {
    async fn fetch_level(&self, level: GeoLevel, parent: Option<&OptionId>) -> Result<Vec<OptionItem>, LookupError> {
        (**self).fetch_level(level, parent).await
    }

    async fn fetch_record(&self, key: &str) -> Result<AddressRecord, LookupError> {
        (**self).fetch_record(key).await
    }
}
