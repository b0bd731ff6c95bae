//! In-memory provider
//!
//! Serves geographic lists and address records from fixed tables. Every
//! request is recorded so callers can check what was asked for, and
//! individual lookups can be made to fail.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;

use super::GeoProvider;
use crate::errors::LookupError;
use crate::models::{AddressRecord, GeoLevel, OptionId, OptionItem};

/// One lookup as received by the provider
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LookupRequest {
    Level { level: GeoLevel, parent: Option<OptionId> },
    Record { key: String },
}

impl LookupRequest {
    pub fn level(level: GeoLevel, parent: Option<&str>) -> Self {
        LookupRequest::Level {
            level,
            parent: parent.map(OptionId::from),
        }
    }
}

#[derive(Default)]
pub struct StaticProvider {
    countries: Vec<OptionItem>,
    children: HashMap<(GeoLevel, OptionId), Vec<OptionItem>>,
    records: HashMap<String, AddressRecord>,
    failures: HashMap<LookupRequest, LookupError>,
    requests: RefCell<Vec<LookupRequest>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_countries(mut self, items: Vec<OptionItem>) -> Self {
        self.countries = items;
        self
    }

    /// Children of `parent` at `level` (states of a country, ...)
    pub fn with_children(mut self, level: GeoLevel, parent: &str, items: Vec<OptionItem>) -> Self {
        self.children.insert((level, OptionId::from(parent)), items);
        self
    }

    pub fn with_record(mut self, key: &str, record: AddressRecord) -> Self {
        self.records.insert(key.to_string(), record);
        self
    }

    /// Make a specific lookup fail with `error`
    pub fn failing(mut self, request: LookupRequest, error: LookupError) -> Self {
        self.failures.insert(request, error);
        self
    }

    /// Every lookup received so far, in order
    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn record_request(&self, request: LookupRequest) -> Result<(), LookupError> {
        let failure = self.failures.get(&request).cloned();
        self.requests.borrow_mut().push(request);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl GeoProvider for StaticProvider {
    async fn fetch_level(&self, level: GeoLevel, parent: Option<&OptionId>) -> Result<Vec<OptionItem>, LookupError> {
        self.record_request(LookupRequest::Level {
            level,
            parent: parent.cloned(),
        })?;

        if level == GeoLevel::Country {
            return Ok(self.countries.clone());
        }
        Ok(parent
            .and_then(|parent| self.children.get(&(level, parent.clone())))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_record(&self, key: &str) -> Result<AddressRecord, LookupError> {
        self.record_request(LookupRequest::Record { key: key.to_string() })?;

        self.records.get(key).cloned().ok_or_else(|| LookupError::BadStatus {
            status: 404,
            url: format!("record/{}", key),
        })
    }
}
