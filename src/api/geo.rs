//! WASM API for the geographic selects
//!
//! JavaScript calls `initGeo` once per page, then wires the change events
//! of the selects to `onCountryChange`, `onStateChange` and
//! `onMunicipalityChange`. Async operations return promises that resolve
//! to an operation report; lookup failures never reject them.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Document, Element, Event, HtmlSelectElement};

use crate::cascade::GeoSync;
use crate::config::GeoConfig;
use crate::dom::{ensure_select, mount_page, register_select, register_text, DomRenderer};
use crate::errors::SyncError;
use crate::models::{GeoLevel, OptionId, ScopeId, TextKind};
use crate::provider::HttpProvider;

use super::helpers::{deserialize, deserialize_or_default, level_from_u8, serialize, validate_non_empty, validation_error};
use super::types::{AddressFieldOptions, OperationReport};

type BrowserSync = GeoSync<HttpProvider>;

// WASM-owned page state (canonical source of truth for the selects)
thread_local! {
    static GEO: RefCell<Option<Rc<BrowserSync>>> = const { RefCell::new(None) };
}

fn geo() -> Result<Rc<BrowserSync>, JsValue> {
    GEO.with(|geo| geo.borrow().clone())
        .ok_or_else(|| validation_error("initGeo has not been called"))
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| validation_error("no document available"))
}

fn resolved(report: OperationReport) -> Result<Promise, JsValue> {
    Ok(Promise::resolve(&serialize(&report, "Failed to serialize report")?))
}

// ============================================================================
// Setup
// ============================================================================

/// Scan the page and install the module state.
///
/// # Parameters
/// - `config`: optional `GeoConfig` object; missing keys use the defaults
#[wasm_bindgen(js_name = initGeo)]
pub fn init_geo(config: JsValue) -> Result<(), JsValue> {
    let config: GeoConfig = deserialize_or_default(config, "Invalid geo config")?;
    let document = document()?;
    let page = mount_page(&document, &config)?;

    let sync = GeoSync::new(page, HttpProvider::new(config.clone()), config)
        .with_observer(Rc::new(DomRenderer::new(document)));
    GEO.with(|geo| *geo.borrow_mut() = Some(Rc::new(sync)));
    Ok(())
}

/// Reset and load the country select of one container, or of every
/// configured container when `tab_id` is omitted.
#[wasm_bindgen(js_name = initSelects)]
pub fn init_selects(tab_id: Option<String>) -> Result<Promise, JsValue> {
    let sync = geo()?;
    let scopes: Vec<ScopeId> = match tab_id {
        Some(id) => vec![ScopeId::from(id)],
        None => sync.config().containers.iter().map(|id| ScopeId::from(id.as_str())).collect(),
    };

    Ok(future_to_promise(async move {
        let results = sync.init_selects(scopes).await;
        let reports: Vec<OperationReport> = results
            .iter()
            .map(|(scope, outcome)| OperationReport::from(outcome).with_scope(scope.as_str()))
            .collect();
        serialize(&reports, "Failed to serialize init results")
    }))
}

// ============================================================================
// Selection handlers
// ============================================================================

#[wasm_bindgen(js_name = onCountryChange)]
pub fn on_country_change(event: Event) -> Result<Promise, JsValue> {
    handle_change(event, GeoLevel::Country)
}

#[wasm_bindgen(js_name = onStateChange)]
pub fn on_state_change(event: Event) -> Result<Promise, JsValue> {
    handle_change(event, GeoLevel::State)
}

#[wasm_bindgen(js_name = onMunicipalityChange)]
pub fn on_municipality_change(event: Event) -> Result<Promise, JsValue> {
    handle_change(event, GeoLevel::Municipality)
}

fn handle_change(event: Event, level: GeoLevel) -> Result<Promise, JsValue> {
    let sync = geo()?;
    let Some(select) = event
        .target()
        .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok())
    else {
        return Err(validation_error(format!("{} change event did not come from a select", level)));
    };
    let element: &Element = select.as_ref();

    // selects inserted after initGeo are picked up on first use
    let config = sync.config().clone();
    let Some(handle) = sync.update(|page| ensure_select(page, element, level, &config)) else {
        log::error!("{} change ignored: {}", level, SyncError::MissingScope);
        return resolved(OperationReport::new("aborted").with_message(SyncError::MissingScope.to_string()));
    };
    let scope = handle.scope;

    let value = OptionId::from_value(&select.value());
    Ok(future_to_promise(async move {
        let outcome = sync.on_selection_change(&scope, level, value).await;
        serialize(&OperationReport::from(&outcome).with_scope(scope.as_str()), "Failed to serialize report")
    }))
}

/// Reset the selects of a container from `level` down
/// (0: all, 1: from state, 2: from municipality, 3: neighborhood only)
#[wasm_bindgen(js_name = resetDependentSelects)]
pub fn reset_dependent_selects(container_id: &str, level: u8) -> Result<(), JsValue> {
    let level = level_from_u8(level).map_err(validation_error)?;
    geo()?
        .reset_from(&ScopeId::from(container_id), level)
        .map(|_| ())
        .map_err(|e| validation_error(e.to_string()))
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Fill the address selects and inputs from the record stored for `rfc`.
///
/// # Parameters
/// - `opts`: `{ rfc, paisId, estadoId, municipioId, coloniaId, calleId, numeroId }`
///   where every `*Id` is the element id of the field to fill
#[wasm_bindgen(js_name = loadAddressFields)]
pub fn load_address_fields(opts: JsValue) -> Result<Promise, JsValue> {
    let options: AddressFieldOptions = deserialize(opts, "Invalid address field options")?;
    validate_non_empty(&options.rfc, "rfc").map_err(validation_error)?;
    let sync = geo()?;
    let document = document()?;

    // fields addressed by id may live outside any mounted select set
    let config = sync.config().clone();
    sync.update(|page| {
        let selects = [
            (&options.pais_id, GeoLevel::Country),
            (&options.estado_id, GeoLevel::State),
            (&options.municipio_id, GeoLevel::Municipality),
            (&options.colonia_id, GeoLevel::Neighborhood),
        ];
        for (id, level) in selects {
            if page.resolve_select(id).is_none() {
                if let Some(element) = document.get_element_by_id(id) {
                    register_select(page, &element, level, &config);
                }
            }
        }
        let texts = [(&options.calle_id, TextKind::Street), (&options.numero_id, TextKind::Number)];
        for (id, kind) in texts {
            let Some(id) = id else { continue };
            if page.resolve_text(id).is_none() {
                if let Some(element) = document.get_element_by_id(id) {
                    register_text(page, &element, kind, &config);
                }
            }
        }
    });

    let targets = options.targets();
    Ok(future_to_promise(async move {
        let outcome = sync.reconcile(&options.rfc, &targets).await;
        serialize(&OperationReport::from(&outcome), "Failed to serialize report")
    }))
}

// ============================================================================
// Inspection
// ============================================================================

/// Current state of one form instance (options, selection, enabled flags)
#[wasm_bindgen(js_name = getFormState)]
pub fn get_form_state(scope: &str) -> Result<JsValue, JsValue> {
    let sync = geo()?;
    let page = sync.page();
    let form = page
        .form(&ScopeId::from(scope))
        .ok_or_else(|| validation_error(format!("no address form '{}'", scope)))?;
    serialize(form, "Failed to serialize form state")
}
