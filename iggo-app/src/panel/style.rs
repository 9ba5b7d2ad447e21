use anyhow::Result;
use iggo_core::config::{ContainerConfig, ToggleConfig};
use web_sys::HtmlElement;

use crate::local_storage::js_error;

pub const REMOVE_USER_CLASS: &str = "remove-user";

const REMOVE_USER_STYLE: &[(&str, &str)] = &[
    ("font-weight", "700"),
    ("color", "darkred"),
    ("margin-right", "6px"),
    ("cursor", "pointer"),
];

const USER_LIST_STYLE: &[(&str, &str)] =
    &[("list-style", "none"), ("padding-left", "0")];

pub fn apply(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<()> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value).map_err(js_error)?;
    }
    Ok(())
}

pub fn container(element: &HtmlElement, config: &ContainerConfig) -> Result<()> {
    apply(
        element,
        &[
            ("position", "fixed"),
            ("width", config.width.as_str()),
            ("bottom", config.bottom.as_str()),
            ("right", config.right.as_str()),
            ("padding", config.padding.as_str()),
            ("background-color", config.background.as_str()),
        ],
    )
}

pub fn toggle(element: &HtmlElement, config: &ToggleConfig) -> Result<()> {
    apply(
        element,
        &[
            ("position", "fixed"),
            ("bottom", config.bottom.as_str()),
            ("right", config.right.as_str()),
        ],
    )
}

pub fn user_list(element: &HtmlElement) -> Result<()> {
    apply(element, USER_LIST_STYLE)
}

pub fn remove_user(element: &HtmlElement) -> Result<()> {
    apply(element, REMOVE_USER_STYLE)
}
