use iggo_core::{
    error::StoreError,
    storage::Storage,
    store::Store,
    visibility::PanelVisibility,
};

use crate::tracing::*;

/// The key that commits the input box.
pub const SUBMIT_KEY: &str = "Enter";

/// One entry of the rendered user list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserListItem {
    pub name: String,
    pub href: String,
}

/// Panel state shared by the view's event handlers. Every mutation is
/// saved before it returns; a failed save leaves the in-memory change in
/// place.
pub struct UserPanelData<S> {
    store: Store<S>,
    visibility: PanelVisibility,
}

impl<S: Storage> UserPanelData<S> {
    /// Hydrates from storage. Unreadable or malformed data is logged and the
    /// panel starts from the defaults; nothing is written back until the
    /// next mutation.
    pub fn new(mut store: Store<S>) -> Self {
        match store.load() {
            Ok(()) => {}
            Err(err @ StoreError::Malformed(_)) => {
                trace!(
                    TraceLevel::WARN,
                    "discarding stored panel state under {:?}: {err}",
                    store.key()
                );
            }
            Err(err) => {
                trace!(TraceLevel::ERROR, "failed to load panel state: {err}");
            }
        }
        let visibility = PanelVisibility::from(store.data().display);
        Self { store, visibility }
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.visibility
    }

    /// Handles a key press in the input box. Only [`SUBMIT_KEY`] commits
    /// `text`, which is taken as is, empty included. Returns whether a user
    /// was added; an error means it was added but could not be saved.
    pub fn submit(&mut self, key: &str, text: &str) -> Result<bool, StoreError> {
        if key != SUBMIT_KEY {
            return Ok(false);
        }
        self.store.data_mut().add_user(text);
        debug!("added user {text:?}");
        self.store.save()?;
        Ok(true)
    }

    /// Removes the first user named `name`. Returns whether one was found;
    /// when none is, nothing is saved. As with [`submit`](Self::submit), an
    /// error means the removal happened but was not saved.
    pub fn remove_user(&mut self, name: &str) -> Result<bool, StoreError> {
        if !self.store.data_mut().remove_user(name) {
            debug!("no user {name:?} to remove");
            return Ok(false);
        }
        debug!("removed user {name:?}");
        self.store.save()?;
        Ok(true)
    }

    pub fn toggle(&mut self) -> Result<PanelVisibility, StoreError> {
        self.visibility = self.visibility.toggle();
        self.store.data_mut().display = self.visibility.into();
        debug!("panel is now {}", self.visibility);
        self.store.save()?;
        Ok(self.visibility)
    }

    /// The list as it is displayed: sorted, each user linked under
    /// `link_prefix`.
    pub fn list_items(&self, link_prefix: &str) -> Vec<UserListItem> {
        self.store
            .data()
            .sorted_users()
            .into_iter()
            .map(|name| UserListItem {
                name: name.to_string(),
                href: format!("{link_prefix}{name}"),
            })
            .collect()
    }
}
