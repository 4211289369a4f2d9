//! Draft autosave over a pluggable storage backend

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

use crate::settings::CalculatorConfig;
use crate::traits::DraftStorage;
use crate::types::{DocumentKind, PurchaseResult};

/// Storage key for an unsaved document form, e.g. `purchase_order:new`
pub fn draft_key(kind: DocumentKind, scope: &str) -> String {
    format!("{}:{}", kind, scope)
}

/// Saves, restores and clears in-progress documents, with a debounce rule
/// for autosave
pub struct DraftManager<S: DraftStorage> {
    storage: S,
    interval: chrono::Duration,
    last_saved: HashMap<String, NaiveDateTime>,
}

impl<S: DraftStorage> DraftManager<S> {
    pub fn new(storage: S, config: &CalculatorConfig) -> PurchaseResult<Self> {
        Ok(Self {
            storage,
            interval: config.autosave_interval()?,
            last_saved: HashMap::new(),
        })
    }

    /// Save a draft immediately. `now` restarts the autosave interval for `key`.
    pub async fn save<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        now: NaiveDateTime,
    ) -> PurchaseResult<()> {
        let payload = serde_json::to_string(value)?;
        self.storage.save_draft(key, &payload).await?;
        self.last_saved.insert(key.to_string(), now);

        tracing::debug!(key, bytes = payload.len(), "draft saved");
        Ok(())
    }

    /// True when `key` has never been saved or the interval has passed since
    /// its last save
    pub fn should_autosave(&self, key: &str, now: NaiveDateTime) -> bool {
        match self.last_saved.get(key) {
            Some(last) => now - *last >= self.interval,
            None => true,
        }
    }

    /// Save only if the debounce interval allows it. Returns whether a save happened.
    pub async fn autosave<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        now: NaiveDateTime,
    ) -> PurchaseResult<bool> {
        if !self.should_autosave(key, now) {
            return Ok(false);
        }

        let payload = serde_json::to_string(value)?;
        self.storage.save_draft(key, &payload).await?;
        self.last_saved.insert(key.to_string(), now);
        Ok(true)
    }

    /// Load a saved draft, if any
    pub async fn restore<T: DeserializeOwned>(&self, key: &str) -> PurchaseResult<Option<T>> {
        match self.storage.load_draft(key).await? {
            Some(payload) => {
                let value = serde_json::from_str(&payload)?;
                tracing::debug!(key, "draft restored");
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Remove a saved draft, typically after the document is submitted
    pub async fn clear(&mut self, key: &str) -> PurchaseResult<bool> {
        self.last_saved.remove(key);
        let removed = self.storage.remove_draft(key).await?;
        if removed {
            tracing::debug!(key, "draft cleared");
        }
        Ok(removed)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
