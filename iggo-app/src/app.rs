mod logging;

use std::rc::Rc;

use anyhow::{Result, anyhow};
use iggo_core::{config::PanelConfig, store::Store};
use web_sys::Document;

use self::logging::FilterHandle;
use crate::{
    local_storage::LocalStorage,
    panel::{data::UserPanelData, view::UserPanel},
    tracing::*,
};

/// Id of the optional `<script type="application/toml">` element whose text
/// overrides the bundled settings.
pub const CONFIG_ELEMENT_ID: &str = "iggo-config";

pub fn launch() {
    let filter = logging::logging();
    if let Err(err) = try_launch(filter.as_ref()) {
        trace!(TraceLevel::ERROR, "failed to start the user panel: {err:?}");
    }
}

fn try_launch(filter: Option<&FilterHandle>) -> Result<UserPanel<LocalStorage>> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow!("window has no document"))?;

    let overlay = page_config(&document);
    let config = configure(overlay.as_deref(), filter)?;

    let storage = LocalStorage::new(&window)?;
    let data = UserPanelData::new(Store::new(storage, config.storage_key.clone()));
    info!(
        "starting user panel with {} users, {}",
        data.store().data().users.len(),
        data.visibility()
    );

    UserPanel::mount(&document, data, Rc::new(config))
}

/// Reads the configuration with logging already in place, then narrows the
/// console filter to the configured one.
fn configure(
    overlay: Option<&str>,
    filter: Option<&FilterHandle>,
) -> Result<PanelConfig> {
    let config = PanelConfig::load(overlay)?;
    logging::apply_filter(filter, &config.log);
    Ok(config)
}

fn page_config(document: &Document) -> Option<String> {
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
}
