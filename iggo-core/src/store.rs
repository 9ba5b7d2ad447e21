use crate::{error::StoreError, record::Record, storage::Storage};

pub const DEFAULT_STORAGE_KEY: &str = "IG";

/// The in-memory [`Record`] and its durable mirror under a single key.
pub struct Store<S> {
    storage: S,
    key: String,
    data: Record,
}

impl<S: Storage> Store<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            data: Record::default(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn data(&self) -> &Record {
        &self.data
    }

    /// Mutable access to the record. Callers are expected to [`save`]
    /// afterwards.
    ///
    /// [`save`]: Store::save
    pub fn data_mut(&mut self) -> &mut Record {
        &mut self.data
    }

    /// Replaces the in-memory record with the stored one. A missing or empty
    /// value leaves the current record untouched, as does a malformed one,
    /// which is reported as [`StoreError::Malformed`].
    pub fn load(&mut self) -> Result<(), StoreError> {
        let raw = match self.storage.get_item(&self.key)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                tracing::debug!("nothing stored under {:?}", self.key);
                return Ok(());
            }
        };
        self.data = serde_json::from_str(&raw).map_err(StoreError::Malformed)?;
        tracing::debug!(
            "loaded {} users from {:?}",
            self.data.users.len(),
            self.key
        );
        Ok(())
    }

    /// Writes the in-memory record, overwriting whatever was stored.
    pub fn save(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.data).map_err(StoreError::Serialize)?;
        self.storage.set_item(&self.key, &raw)
    }
}
