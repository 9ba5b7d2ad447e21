use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The persisted state of the user panel.
///
/// Lists missing from a stored value come back empty, so a record written
/// by an older widget still hydrates. A stored value without `display`
/// hides the panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Usernames in insertion order. Duplicates are allowed.
    pub users: Vec<String>,
    /// Carried along with the record but never touched by the panel.
    pub posts: Vec<String>,
    #[serde(default)]
    pub display: bool,
    /// Fields written by someone else, kept so saving does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            posts: Vec::new(),
            display: true,
            extra: Map::new(),
        }
    }
}

impl Record {
    pub fn add_user(&mut self, name: impl Into<String>) {
        self.users.push(name.into());
    }

    /// Removes the first user equal to `name`, returning whether one was
    /// found.
    pub fn remove_user(&mut self, name: &str) -> bool {
        match self.users.iter().position(|u| u == name) {
            Some(index) => {
                self.users.remove(index);
                true
            }
            None => false,
        }
    }

    /// Users in display order. The stored order is left alone.
    pub fn sorted_users(&self) -> Vec<&str> {
        self.users.iter().map(String::as_str).sorted().collect()
    }
}
