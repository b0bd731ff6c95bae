//! Page discovery
//!
//! Builds the page model from the document: every select matching a
//! level's selector is registered under the form instance that encloses
//! it. Boundaries without an id get a generated `data-geo-scope`, selects
//! without an id get a generated one, so both addressing modes work.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::config::GeoConfig;
use crate::models::{FieldHandle, GeoLevel, Page, ScopeId, SelectField, TextField, TextHandle, TextKind};
use crate::scope::{resolve_scope, resolve_scope_id, ResolvedScope, ScopeNode};

/// Attribute naming a form instance boundary
pub const SCOPE_ATTR: &str = "data-geo-scope";

/// Scan the document and build the page model
pub fn mount_page(document: &Document, config: &GeoConfig) -> Result<Page, JsValue> {
    let mut page = Page::new();

    for level in GeoLevel::ALL {
        let css = config.selectors.for_level(level).css();
        if css.is_empty() {
            continue;
        }
        for element in query_all(document, &css)? {
            register_select(&mut page, &element, level, config);
        }
    }

    for kind in [TextKind::Street, TextKind::Number] {
        let css = config
            .selectors
            .for_text(kind)
            .iter()
            .map(|name| format!("input[name=\"{}\"]", name))
            .collect::<Vec<_>>()
            .join(", ");
        if css.is_empty() {
            continue;
        }
        for element in query_all(document, &css)? {
            register_text(&mut page, &element, kind, config);
        }
    }

    log::info!(
        "mounted {} address forms: {:?}",
        page.forms().count(),
        page.scopes().map(ScopeId::as_str).collect::<Vec<_>>()
    );
    Ok(page)
}

/// Register one select under its enclosing form instance.
/// Returns `None` when the element is not attached to the document.
pub fn register_select(page: &mut Page, element: &Element, level: GeoLevel, config: &GeoConfig) -> Option<FieldHandle> {
    let scope = scope_of(element, config)?;
    let element_id = ensure_id(element, &scope, level.role());

    if let Some(existing) = page.select(&FieldHandle::new(scope.clone(), level)) {
        if existing.element_id() != Some(element_id.as_str()) {
            log::warn!("'{}' has more than one {} select, using #{}", scope, level, element_id);
        }
    }

    let field = SelectField::new(level, config.placeholder(level)).with_element_id(element_id);
    Some(page.add_select(&scope, field))
}

/// The handle of a select that fired a change event, registering it first
/// when it was inserted after mounting. Unnamed boundaries are named on the
/// way. Returns `None` only for an element that is not attached.
pub fn ensure_select(page: &mut Page, element: &Element, level: GeoLevel, config: &GeoConfig) -> Option<FieldHandle> {
    if let Some(scope) = resolve_scope_id(element, &config.boundary) {
        let handle = FieldHandle::new(scope, level);
        if page.select(&handle).is_some() {
            return Some(handle);
        }
    }
    register_select(page, element, level, config)
}

/// Register one street or number input under its enclosing form instance
pub fn register_text(page: &mut Page, element: &Element, kind: TextKind, config: &GeoConfig) -> Option<TextHandle> {
    let scope = scope_of(element, config)?;
    let role = match kind {
        TextKind::Street => "street",
        TextKind::Number => "number",
    };
    let element_id = ensure_id(element, &scope, role);
    Some(page.add_text(&scope, TextField::new(kind, element_id)))
}

/// Resolve (and if needed name) the form instance of an element
fn scope_of(element: &Element, config: &GeoConfig) -> Option<ScopeId> {
    match resolve_scope(element, &config.boundary) {
        Some(ResolvedScope::Boundary(boundary)) => Some(boundary.scope_id().unwrap_or_else(|| {
            let generated = ScopeId::new(format!("geo-scope-{}", next_serial()));
            if let Err(e) = boundary.set_attribute(SCOPE_ATTR, generated.as_str()) {
                log::error!("could not name form boundary: {:?}", e);
            }
            generated
        })),
        Some(ResolvedScope::Page) => Some(ScopeId::page()),
        None => {
            log::warn!("skipping a detached element");
            None
        }
    }
}

fn ensure_id(element: &Element, scope: &ScopeId, role: &str) -> String {
    let id = element.id();
    if !id.is_empty() {
        return id;
    }
    let generated = format!("geo-{}-{}", scope, role);
    element.set_id(&generated);
    generated
}

fn next_serial() -> u32 {
    thread_local! {
        static SERIAL: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
    }
    SERIAL.with(|serial| {
        let next = serial.get() + 1;
        serial.set(next);
        next
    })
}

fn query_all(document: &Document, css: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(css)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}
