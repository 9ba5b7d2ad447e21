use anyhow::{Result, anyhow};
use iggo_core::{error::StoreError, storage::Storage};
use wasm_bindgen::JsValue;

/// The window's `localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn new(window: &web_sys::Window) -> Result<Self> {
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| anyhow!("localStorage is not available"))?;
        Ok(Self { storage })
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(storage_error)
    }
}

/// Converts a thrown JavaScript value into an error we can propagate.
pub fn js_error(err: JsValue) -> anyhow::Error {
    anyhow!("{}", describe(&err))
}

fn storage_error(err: JsValue) -> StoreError {
    StoreError::Storage(describe(&err))
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
