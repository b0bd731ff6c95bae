//! Browser `fetch` provider
//!
//! Issues GET requests through `window.fetch` and decodes the JSON bodies
//! with serde-wasm-bindgen. Only usable inside a browser.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::GeoProvider;
use crate::config::GeoConfig;
use crate::errors::LookupError;
use crate::models::{AddressRecord, GeoLevel, OptionId, OptionItem};

pub struct HttpProvider {
    config: GeoConfig,
}

impl HttpProvider {
    pub fn new(config: GeoConfig) -> Self {
        Self { config }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        let window = web_sys::window()
            .ok_or_else(|| LookupError::NetworkFailure("no window available".to_string()))?;

        log::debug!("GET {}", url);
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| LookupError::NetworkFailure(describe(&e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|e| LookupError::NetworkFailure(describe(&e)))?;

        if !response.ok() {
            return Err(LookupError::BadStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let body = response.json().map_err(|e| LookupError::Decode(describe(&e)))?;
        let body = JsFuture::from(body)
            .await
            .map_err(|e| LookupError::Decode(describe(&e)))?;

        serde_wasm_bindgen::from_value(body).map_err(|e| LookupError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl GeoProvider for HttpProvider {
    async fn fetch_level(&self, level: GeoLevel, parent: Option<&OptionId>) -> Result<Vec<OptionItem>, LookupError> {
        let parent = parent.map(|id| encode(id.as_str()));
        // callers never send an empty parent; treat it as "no children"
        let Some(url) = self.config.level_url(level, parent.as_deref()) else {
            return Ok(Vec::new());
        };
        // a JSON null body means no children
        let items: Option<Vec<OptionItem>> = self.get_json(&url).await?;
        Ok(items.unwrap_or_default())
    }

    async fn fetch_record(&self, key: &str) -> Result<AddressRecord, LookupError> {
        let url = self.config.record_url(&encode(key));
        self.get_json(&url).await
    }
}

fn encode(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", value))
}
