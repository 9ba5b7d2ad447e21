use std::{cell::RefCell, rc::Rc};

use anyhow::{Result, anyhow};
use iggo_core::{config::PanelConfig, storage::Storage, visibility::PanelVisibility};
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Document, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

use super::{data::UserPanelData, style};
use crate::{local_storage::js_error, tracing::*};

/// The mounted panel: an overlay container with the user list and input box,
/// plus the toggle button next to it.
pub struct UserPanel<S> {
    inner: Rc<RefCell<PanelView<S>>>,
}

impl<S> Clone for UserPanel<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct PanelView<S> {
    data: UserPanelData<S>,
    config: Rc<PanelConfig>,
    document: Document,
    container: HtmlElement,
    display: HtmlElement,
    input: HtmlInputElement,
    toggle: HtmlElement,
    /// Click handlers of the rendered remove markers, replaced on every
    /// render.
    remove_handlers: Vec<Closure<dyn FnMut(MouseEvent)>>,
}

impl<S: Storage + 'static> UserPanel<S> {
    /// Builds the panel, appends it to the document body and renders the
    /// list once.
    pub fn mount(
        document: &Document,
        data: UserPanelData<S>,
        config: Rc<PanelConfig>,
    ) -> Result<Self> {
        let container: HtmlElement = create(document, "div")?;
        style::container(&container, &config.container)?;

        let display: HtmlElement = create(document, "div")?;
        let input: HtmlInputElement = create(document, "input")?;
        input.set_placeholder(&config.labels.placeholder);

        let toggle: HtmlElement = create(document, "button")?;
        toggle.set_text_content(Some(config.labels.toggle.as_str()));
        style::toggle(&toggle, &config.toggle)?;

        container.append_child(&display).map_err(js_error)?;
        container.append_child(&input).map_err(js_error)?;

        let body = document
            .body()
            .ok_or_else(|| anyhow!("document has no body"))?;
        body.append_child(&container).map_err(js_error)?;
        body.append_child(&toggle).map_err(js_error)?;

        let panel = Self {
            inner: Rc::new(RefCell::new(PanelView {
                data,
                config,
                document: document.clone(),
                container,
                display,
                input,
                toggle,
                remove_handlers: Vec::new(),
            })),
        };
        panel.show(panel.visibility())?;
        panel.listen()?;
        panel.render()?;
        Ok(panel)
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.inner.borrow().data.visibility()
    }

    fn listen(&self) -> Result<()> {
        let view = self.inner.borrow();

        let panel = self.clone();
        let on_keypress =
            Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                panel.on_keypress(&event.key());
            });
        view.input
            .add_event_listener_with_callback(
                "keypress",
                on_keypress.as_ref().unchecked_ref(),
            )
            .map_err(js_error)?;

        let panel = self.clone();
        let on_toggle =
            Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
                panel.on_toggle();
            });
        view.toggle
            .add_event_listener_with_callback(
                "click",
                on_toggle.as_ref().unchecked_ref(),
            )
            .map_err(js_error)?;

        // Both listeners live as long as the page.
        on_keypress.forget();
        on_toggle.forget();
        Ok(())
    }

    fn on_keypress(&self, key: &str) {
        let committed = {
            let mut view = self.inner.borrow_mut();
            let text = view.input.value();
            match view.data.submit(key, &text) {
                Ok(added) => added,
                Err(err) => {
                    error!("failed to save panel state: {err}");
                    true
                }
            }
        };
        if !committed {
            return;
        }
        self.inner.borrow().input.set_value("");
        if let Err(err) = self.render() {
            error!("failed to render user list: {err:?}");
        }
    }

    fn on_remove(&self, name: &str) {
        let removed = match self.inner.borrow_mut().data.remove_user(name) {
            Ok(removed) => removed,
            Err(err) => {
                error!("failed to save panel state: {err}");
                true
            }
        };
        if !removed {
            return;
        }
        if let Err(err) = self.render() {
            error!("failed to render user list: {err:?}");
        }
    }

    fn on_toggle(&self) {
        let visibility = {
            let mut view = self.inner.borrow_mut();
            match view.data.toggle() {
                Ok(visibility) => visibility,
                Err(err) => {
                    error!("failed to save panel state: {err}");
                    view.data.visibility()
                }
            }
        };
        if let Err(err) = self.show(visibility) {
            error!("failed to update panel visibility: {err:?}");
        }
    }

    fn show(&self, visibility: PanelVisibility) -> Result<()> {
        self.inner
            .borrow()
            .container
            .style()
            .set_property("display", visibility.css_display())
            .map_err(js_error)
    }

    /// Rebuilds the display region from the current user list.
    pub fn render(&self) -> Result<()> {
        let mut view = self.inner.borrow_mut();
        let view = &mut *view;
        let document = &view.document;

        view.display.set_text_content(None);

        let header: HtmlElement = create(document, "p")?;
        let strong: HtmlElement = create(document, "strong")?;
        strong.set_text_content(Some(view.config.labels.header.as_str()));
        header.append_child(&strong).map_err(js_error)?;
        view.display.append_child(&header).map_err(js_error)?;

        let list: HtmlElement = create(document, "ul")?;
        style::user_list(&list)?;

        let items = view.data.list_items(&view.config.user_link_prefix);
        let mut handlers = Vec::with_capacity(items.len());
        for item in items {
            let entry: HtmlElement = create(document, "li")?;

            let remove: HtmlElement = create(document, "span")?;
            remove.set_class_name(style::REMOVE_USER_CLASS);
            style::remove_user(&remove)?;
            remove.set_text_content(Some(view.config.labels.remove.as_str()));

            let panel = Rc::downgrade(&self.inner);
            let name = item.name.clone();
            let on_click =
                Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
                    if let Some(inner) = panel.upgrade() {
                        UserPanel { inner }.on_remove(&name);
                    }
                });
            remove
                .add_event_listener_with_callback(
                    "click",
                    on_click.as_ref().unchecked_ref(),
                )
                .map_err(js_error)?;
            handlers.push(on_click);

            let link: HtmlElement = create(document, "a")?;
            link.set_attribute("href", &item.href).map_err(js_error)?;
            link.set_text_content(Some(item.name.as_str()));

            entry.append_child(&remove).map_err(js_error)?;
            entry.append_child(&link).map_err(js_error)?;
            list.append_child(&entry).map_err(js_error)?;
        }
        view.display.append_child(&list).map_err(js_error)?;

        trace!(TraceLevel::TRACE, "rendered {} users", handlers.len());
        view.remove_handlers = handlers;
        Ok(())
    }
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)
        .map_err(js_error)?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("<{tag}> did not create the expected element"))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use iggo_core::{
        error::StoreError,
        storage::MemoryStorage,
        store::{DEFAULT_STORAGE_KEY, Store},
    };
    use wasm_bindgen_test::*;
    use web_sys::{Element, KeyboardEventInit};

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Reads fine, refuses every write.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Storage("quota exceeded".to_string()))
        }
    }

    fn mount<S: Storage + 'static>(storage: S) -> UserPanel<S> {
        let document = web_sys::window().unwrap().document().unwrap();
        let data = UserPanelData::new(Store::new(storage, DEFAULT_STORAGE_KEY));
        let config = Rc::new(PanelConfig::default_config().unwrap());
        UserPanel::mount(&document, data, config).unwrap()
    }

    fn seeded(users: &[&str], display: bool) -> MemoryStorage {
        let storage = MemoryStorage::new();
        let mut store = Store::new(storage.clone(), DEFAULT_STORAGE_KEY);
        for user in users {
            store.data_mut().add_user(*user);
        }
        store.data_mut().display = display;
        store.save().unwrap();
        storage
    }

    fn stored(storage: &MemoryStorage) -> (Vec<String>, bool) {
        let mut store = Store::new(storage.clone(), DEFAULT_STORAGE_KEY);
        store.load().unwrap();
        (store.data().users.clone(), store.data().display)
    }

    fn select_all<S>(panel: &UserPanel<S>, selector: &str) -> Vec<Element> {
        let display = panel.inner.borrow().display.clone();
        let nodes = display.query_selector_all(selector).unwrap();
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .map(|node| node.dyn_into::<Element>().unwrap())
            .collect()
    }

    fn links<S>(panel: &UserPanel<S>) -> Vec<(String, String)> {
        select_all(panel, "li > a")
            .into_iter()
            .map(|a| {
                (
                    a.text_content().unwrap_or_default(),
                    a.get_attribute("href").unwrap_or_default(),
                )
            })
            .collect()
    }

    fn link(name: &str) -> (String, String) {
        (name.to_string(), format!("/user/{name}"))
    }

    fn press<S>(panel: &UserPanel<S>, key: &str, text: &str) {
        let input = panel.inner.borrow().input.clone();
        input.set_value(text);
        let init = KeyboardEventInit::new();
        init.set_key(key);
        let event =
            KeyboardEvent::new_with_keyboard_event_init_dict("keypress", &init)
                .unwrap();
        input.dispatch_event(&event).unwrap();
    }

    fn click_remove<S>(panel: &UserPanel<S>, index: usize) {
        let markers = select_all(panel, "span.remove-user");
        markers[index].dyn_ref::<HtmlElement>().unwrap().click();
    }

    fn click_toggle<S>(panel: &UserPanel<S>) {
        let toggle = panel.inner.borrow().toggle.clone();
        toggle.click();
    }

    fn container_display<S>(panel: &UserPanel<S>) -> String {
        panel
            .inner
            .borrow()
            .container
            .style()
            .get_property_value("display")
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_mount_renders_sorted_list() {
        let panel = mount(seeded(&["bob", "alice"], true));

        let header = select_all(&panel, "p > strong");
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].text_content().unwrap(), "users");

        assert_eq!(links(&panel), vec![link("alice"), link("bob")]);

        let markers = select_all(&panel, "li > span.remove-user");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].text_content().unwrap(), "x");

        let list = select_all(&panel, "ul");
        let list = list[0].dyn_ref::<HtmlElement>().unwrap().style();
        assert_eq!(list.get_property_value("list-style-type").unwrap(), "none");
        assert_eq!(list.get_property_value("padding-left").unwrap(), "0px");

        assert_eq!(container_display(&panel), "block");
        assert_eq!(
            panel.inner.borrow().input.placeholder(),
            "Enter username + enter"
        );
    }

    #[wasm_bindgen_test]
    fn test_empty_panel_has_header_only() {
        let panel = mount(MemoryStorage::new());
        assert_eq!(select_all(&panel, "p > strong").len(), 1);
        assert_eq!(select_all(&panel, "ul").len(), 1);
        assert!(links(&panel).is_empty());
    }

    #[wasm_bindgen_test]
    fn test_enter_adds_and_clears_input() {
        let storage = MemoryStorage::new();
        let panel = mount(storage.clone());

        press(&panel, "a", "zoe");
        assert!(links(&panel).is_empty());
        assert_eq!(panel.inner.borrow().input.value(), "zoe");

        press(&panel, "Enter", "zoe");
        assert_eq!(panel.inner.borrow().input.value(), "");
        press(&panel, "Enter", "amy");

        assert_eq!(links(&panel), vec![link("amy"), link("zoe")]);
        assert_eq!(stored(&storage).0, vec!["zoe", "amy"]);
    }

    #[wasm_bindgen_test]
    fn test_remove_marker_takes_first_match() {
        let storage = seeded(&["bob", "amy", "bob"], true);
        let panel = mount(storage.clone());
        assert_eq!(links(&panel), vec![link("amy"), link("bob"), link("bob")]);

        click_remove(&panel, 1);
        assert_eq!(stored(&storage).0, vec!["amy", "bob"]);
        assert_eq!(links(&panel), vec![link("amy"), link("bob")]);

        click_remove(&panel, 0);
        assert_eq!(stored(&storage).0, vec!["bob"]);
        assert_eq!(links(&panel), vec![link("bob")]);
    }

    #[wasm_bindgen_test]
    fn test_toggle_flips_container() {
        let storage = MemoryStorage::new();
        let panel = mount(storage.clone());
        assert_eq!(container_display(&panel), "block");

        click_toggle(&panel);
        assert_eq!(container_display(&panel), "none");
        assert!(!stored(&storage).1);

        click_toggle(&panel);
        assert_eq!(container_display(&panel), "block");
        assert!(stored(&storage).1);
    }

    #[wasm_bindgen_test]
    fn test_starts_hidden_when_stored_hidden() {
        let panel = mount(seeded(&["bob"], false));
        assert_eq!(container_display(&panel), "none");
        assert_eq!(links(&panel), vec![link("bob")]);
    }

    #[wasm_bindgen_test]
    fn test_failed_save_still_commits() {
        let panel = mount(ReadOnlyStorage);

        press(&panel, "Enter", "zoe");
        assert_eq!(panel.inner.borrow().input.value(), "");
        assert_eq!(links(&panel), vec![link("zoe")]);

        click_remove(&panel, 0);
        assert!(links(&panel).is_empty());

        click_toggle(&panel);
        assert_eq!(container_display(&panel), "none");
    }
}
