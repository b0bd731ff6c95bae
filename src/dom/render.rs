//! Field rendering
//!
//! Writes committed field state into the page. A select's children are
//! rebuilt from its option list every time; nothing is patched in place.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};

use crate::cascade::FieldObserver;
use crate::models::{FieldAddress, OptionKind, Page, SelectField, TextField};

pub struct DomRenderer {
    document: Document,
}

impl DomRenderer {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn render_select(&self, field: &SelectField) -> Result<(), JsValue> {
        let Some(id) = field.element_id() else {
            return Ok(());
        };
        let Some(select) = self
            .document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlSelectElement>().ok())
        else {
            log::warn!("select #{} is no longer on the page", id);
            return Ok(());
        };

        let selected = &field.selected_option().id;
        select.set_inner_html("");
        for option in field.options() {
            let element = HtmlOptionElement::new_with_text_and_value(&option.label, option.id.as_str())?;
            element.set_selected(&option.id == selected);
            if option.kind == OptionKind::Orphan {
                element.set_attribute("data-orphan", "true")?;
            }
            select.append_child(&element)?;
        }
        select.set_value(selected.as_str());
        select.set_disabled(!field.is_enabled());
        if field.items().next().is_some() {
            select.set_hidden(false);
        }
        Ok(())
    }

    pub fn render_text(&self, field: &TextField) -> Result<(), JsValue> {
        match self
            .document
            .get_element_by_id(&field.element_id)
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        {
            Some(input) => input.set_value(&field.value),
            None => log::warn!("input #{} is no longer on the page", field.element_id),
        }
        Ok(())
    }
}

impl FieldObserver for DomRenderer {
    fn field_changed(&self, page: &Page, address: &FieldAddress) {
        let result = match address {
            FieldAddress::Select(handle) => page.select(handle).map(|field| self.render_select(field)),
            FieldAddress::Text(handle) => page.text(handle).map(|field| self.render_text(field)),
        };
        if let Some(Err(e)) = result {
            log::error!("failed to render {:?}: {:?}", address, e);
        }
    }
}
