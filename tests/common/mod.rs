// Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::HashMap;

use geo_cascade_wasm::models::{
    AddressRecord, FieldAddress, FormInstance, GeoLevel, OptionId, OptionItem, Page, SelectField, TextField, TextKind,
};
use geo_cascade_wasm::provider::LookupRequest;
use geo_cascade_wasm::{FieldObserver, GeoConfig, GeoProvider, LookupError};

/// A form with all four selects, ids prefixed with `prefix`
pub fn full_form(scope: &str, prefix: &str) -> FormInstance {
    let config = GeoConfig::default();
    let names = ["paises", "estados", "municipios", "idcolonia"];
    let mut form = FormInstance::new(scope);
    for (level, name) in GeoLevel::ALL.into_iter().zip(names) {
        form.insert_select(
            SelectField::new(level, config.placeholder(level)).with_element_id(format!("{}_{}", prefix, name)),
        );
    }
    form.with_text(TextField::new(TextKind::Street, format!("{}_calle", prefix)))
        .with_text(TextField::new(TextKind::Number, format!("{}_numero", prefix)))
}

/// A page with the given form instances, each with all four selects
pub fn page_with(scopes: &[(&str, &str)]) -> Page {
    let mut page = Page::new();
    for (scope, prefix) in scopes {
        page.add_form(full_form(scope, prefix));
    }
    page
}

pub fn item(id: &str, label: &str) -> OptionItem {
    OptionItem::new(id, label)
}

pub fn id(value: &str) -> Option<OptionId> {
    Some(OptionId::from(value))
}

pub fn record(country: &str, state: &str, municipality: &str, neighborhood: &str, label: &str) -> AddressRecord {
    AddressRecord {
        country_id: id(country),
        state_id: id(state),
        municipality_id: id(municipality),
        neighborhood_id: id(neighborhood),
        neighborhood_label: Some(label.to_string()),
        street: Some("Av. Juárez".to_string()),
        number: Some("120".to_string()),
    }
}

/// Observer that remembers every address it was told about
#[derive(Default)]
pub struct RecordingObserver {
    pub seen: RefCell<Vec<FieldAddress>>,
}

impl FieldObserver for RecordingObserver {
    fn field_changed(&self, _page: &Page, address: &FieldAddress) {
        self.seen.borrow_mut().push(address.clone());
    }
}

type Reply = Result<Vec<OptionItem>, LookupError>;

/// Provider whose level lookups stay pending until the test answers them
#[derive(Default)]
pub struct GatedProvider {
    pending: RefCell<Vec<(LookupRequest, oneshot::Sender<Reply>)>>,
    records: HashMap<String, AddressRecord>,
}

impl GatedProvider {
    /// Records are served immediately; only level lookups are gated
    pub fn with_record(mut self, key: &str, record: AddressRecord) -> Self {
        self.records.insert(key.to_string(), record);
        self
    }

    pub fn pending_requests(&self) -> Vec<LookupRequest> {
        self.pending.borrow().iter().map(|(request, _)| request.clone()).collect()
    }

    /// Complete the oldest pending lookup matching `level`/`parent`
    pub fn respond(&self, level: GeoLevel, parent: Option<&str>, reply: Reply) {
        let wanted = LookupRequest::level(level, parent);
        let mut pending = self.pending.borrow_mut();
        let index = pending
            .iter()
            .position(|(request, _)| *request == wanted)
            .unwrap_or_else(|| panic!("no pending lookup for {:?}", wanted));
        let (_, sender) = pending.remove(index);
        let _ = sender.send(reply);
    }
}

#[async_trait(?Send)]
impl GeoProvider for GatedProvider {
    async fn fetch_level(&self, level: GeoLevel, parent: Option<&OptionId>) -> Reply {
        let (sender, receiver) = oneshot::channel();
        self.pending.borrow_mut().push((
            LookupRequest::Level {
                level,
                parent: parent.cloned(),
            },
            sender,
        ));
        receiver
            .await
            .unwrap_or_else(|_| Err(LookupError::NetworkFailure("request dropped".to_string())))
    }

    async fn fetch_record(&self, key: &str) -> Result<AddressRecord, LookupError> {
        self.records.get(key).cloned().ok_or_else(|| LookupError::BadStatus {
            status: 404,
            url: format!("record/{}", key),
        })
    }
}
