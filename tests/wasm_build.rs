//! WASM build test
//!
//! Exercises the DOM binding in a browser: scope resolution over real
//! elements, page discovery and rendering of field state.

use geo_cascade_wasm::dom::{ensure_select, mount_page, DomRenderer, SCOPE_ATTR};
use geo_cascade_wasm::models::{FieldAddress, FieldHandle, GeoLevel, OptionItem, ScopeId};
use geo_cascade_wasm::scope::resolve_scope_id;
use geo_cascade_wasm::{FieldObserver, GeoConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlSelectElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn fixture(html: &str) -> Element {
    let document = document();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(html);
    document.body().unwrap().append_child(&root).unwrap();
    root
}

const TWO_FORMS: &str = r#"
    <div class="tab-pane" id="datos-personales">
        <select name="paises" id="pers_paises"></select>
        <select name="estados" id="pers_estados"></select>
        <select name="municipios"></select>
        <select name="idcolonia"></select>
        <input name="calle" id="pers_calle">
    </div>
    <form id="datos-compania">
        <select name="paises" id="comp_paises"></select>
        <select name="estados" id="comp_estados"></select>
    </form>
"#;

#[wasm_bindgen_test]
fn test_scope_of_nested_select() {
    let root = fixture(TWO_FORMS);
    let config = GeoConfig::default();
    let document = document();

    let personal = document.get_element_by_id("pers_estados").unwrap();
    let company = document.get_element_by_id("comp_estados").unwrap();
    assert_eq!(resolve_scope_id(&personal, &config.boundary), Some(ScopeId::from("datos-personales")));
    assert_eq!(resolve_scope_id(&company, &config.boundary), Some(ScopeId::from("datos-compania")));

    root.remove();
}

#[wasm_bindgen_test]
fn test_detached_and_unbounded_elements() {
    let config = GeoConfig::default();
    let document = document();

    let detached = document.create_element("select").unwrap();
    assert_eq!(resolve_scope_id(&detached, &config.boundary), None);

    let root = fixture(r#"<select id="loose"></select>"#);
    let loose = document.get_element_by_id("loose").unwrap();
    assert_eq!(resolve_scope_id(&loose, &config.boundary), Some(ScopeId::page()));
    root.remove();
}

#[wasm_bindgen_test]
fn test_mount_discovers_forms() {
    let root = fixture(TWO_FORMS);
    let page = mount_page(&document(), &GeoConfig::default()).unwrap();

    let personal = page.form(&ScopeId::from("datos-personales")).unwrap();
    assert_eq!(personal.selects().count(), 4);
    assert_eq!(personal.texts().count(), 1);
    assert!(page.resolve_select("pers_paises").is_some());

    let company = page.form(&ScopeId::from("datos-compania")).unwrap();
    assert_eq!(company.selects().count(), 2);

    // selects without an id get a stable generated one
    let municipality = personal.select(GeoLevel::Municipality).unwrap();
    let generated = municipality.element_id().unwrap();
    assert!(document().get_element_by_id(generated).is_some());

    root.remove();
}

#[wasm_bindgen_test]
fn test_select_in_unnamed_form_added_after_mount() {
    let root = fixture(TWO_FORMS);
    let config = GeoConfig::default();
    let mut page = mount_page(&document(), &config).unwrap();

    let form = document().create_element("form").unwrap();
    form.set_inner_html(r#"<select name="estados"></select>"#);
    root.append_child(&form).unwrap();
    let select = form.first_element_child().unwrap();

    let handle = ensure_select(&mut page, &select, GeoLevel::State, &config).unwrap();
    assert!(handle.scope.as_str().starts_with("geo-scope-"));
    assert_eq!(form.get_attribute(SCOPE_ATTR).as_deref(), Some(handle.scope.as_str()));
    assert!(page.select(&handle).is_some());

    // the second change finds the same field
    assert_eq!(ensure_select(&mut page, &select, GeoLevel::State, &config), Some(handle));

    let detached = document().create_element("select").unwrap();
    assert_eq!(ensure_select(&mut page, &detached, GeoLevel::State, &config), None);

    root.remove();
}

#[wasm_bindgen_test]
fn test_renderer_rebuilds_options() {
    let root = fixture(TWO_FORMS);
    let mut page = mount_page(&document(), &GeoConfig::default()).unwrap();
    let handle = FieldHandle::new("datos-compania", GeoLevel::State);

    page.select_mut(&handle)
        .unwrap()
        .replace_options(vec![OptionItem::new("JAL", "Jalisco"), OptionItem::new("NL", "Nuevo León")], Some(&"NL".into()));
    page.select_mut(&handle).unwrap().push_orphan("99".into(), "Vieja", "(not found in this municipality)");

    let renderer = DomRenderer::new(document());
    renderer.field_changed(&page, &FieldAddress::Select(handle.clone()));

    let select: HtmlSelectElement = document()
        .get_element_by_id("comp_estados")
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(select.length(), 4);
    assert_eq!(select.value(), "99");
    assert!(!select.disabled());

    let orphan = select.item(3).unwrap();
    assert_eq!(orphan.get_attribute("data-orphan").as_deref(), Some("true"));
    assert_eq!(orphan.text_content().as_deref(), Some("Vieja (not found in this municipality)"));

    // a pending lookup disables the select
    page.select_mut(&handle).unwrap().begin_fetch(Some("MX".into()));
    renderer.field_changed(&page, &FieldAddress::Select(handle));
    assert!(select.disabled());

    root.remove();
}
