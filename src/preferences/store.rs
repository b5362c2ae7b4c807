//! Persistent Preference Store
//!
//! Reads and writes the `system-preferences` blob. Reads never fail: a missing
//! or undecodable blob yields defaults, reported through [`Loaded`]. Writes are
//! synchronous read-modify-write cycles against the medium; the last writer wins.

use crate::currency::Currency;
use crate::preferences::types::{PreferenceKey, PreferenceUpdate, PreferenceValue, Preferences};
use crate::storage::{FallbackReason, KeyValueStore, Loaded, StorageResult};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Storage key of the Preference Record
pub const PREFERENCES_KEY: &str = "system-preferences";

/// Preference store bound to a durable medium
#[derive(Clone)]
pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Load the full record, falling back to defaults when nothing usable is stored
    pub fn load(&self) -> Loaded<Preferences> {
        self.read_object().map(|obj| {
            let (prefs, rejected) = Preferences::from_object(&obj);
            if !rejected.is_empty() {
                tracing::warn!(
                    fields = ?rejected,
                    "Ignoring invalid stored preference fields, using defaults"
                );
            }
            prefs
        })
    }

    /// Current value of a single field
    pub fn get(&self, key: PreferenceKey) -> PreferenceValue {
        self.load().into_inner().get(key)
    }

    /// Configured display currency
    pub fn currency(&self) -> Currency {
        self.load().into_inner().currency
    }

    /// Merge `update` into the stored record and persist it
    ///
    /// The whole record is written back, along with any unknown keys the stored
    /// object already carried. Notification toggles are merged key by key.
    /// A missing or corrupt blob is replaced; a failed read aborts without writing.
    pub fn set(&self, update: PreferenceUpdate) -> StorageResult<()> {
        let stored = self.storage.get_item(PREFERENCES_KEY)?;
        let raw = decode_object(stored).into_inner();
        let (mut prefs, _) = Preferences::from_object(&raw);
        prefs.apply(&update);

        let mut merged = raw;
        let fresh = match serde_json::to_value(&prefs)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in fresh {
            let nested = matches!(merged.get(&key), Some(Value::Object(_)));
            match value {
                Value::Object(incoming) if nested => {
                    if let Some(Value::Object(existing)) = merged.get_mut(&key) {
                        existing.extend(incoming);
                    }
                }
                value => {
                    merged.insert(key, value);
                }
            }
        }

        self.storage
            .set_item(PREFERENCES_KEY, &serde_json::to_string(&merged)?)?;
        tracing::debug!(key = %update.key(), "Preference updated");
        Ok(())
    }

    /// Apply several updates in order, persisting after each
    pub fn set_all(&self, updates: impl IntoIterator<Item = PreferenceUpdate>) -> StorageResult<()> {
        for update in updates {
            self.set(update)?;
        }
        Ok(())
    }

    /// Overwrite the stored record with defaults
    pub fn reset(&self) -> StorageResult<()> {
        let defaults = serde_json::to_string(&Preferences::default())?;
        self.storage.set_item(PREFERENCES_KEY, &defaults)?;
        tracing::info!("Preferences reset to defaults");
        Ok(())
    }

    fn read_object(&self) -> Loaded<Map<String, Value>> {
        match self.storage.get_item(PREFERENCES_KEY) {
            Ok(stored) => decode_object(stored),
            Err(e) => {
                tracing::warn!("Failed to read preferences: {}", e);
                Loaded::Fallback {
                    value: Map::new(),
                    reason: FallbackReason::Unavailable(e.to_string()),
                }
            }
        }
    }
}

fn decode_object(stored: Option<String>) -> Loaded<Map<String, Value>> {
    let Some(raw) = stored else {
        return Loaded::Fallback {
            value: Map::new(),
            reason: FallbackReason::Missing,
        };
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(obj)) => Loaded::Stored(obj),
        Ok(other) => {
            tracing::warn!("Stored preferences are not an object, using defaults");
            Loaded::Fallback {
                value: Map::new(),
                reason: FallbackReason::Corrupt(format!(
                    "expected object, found {}",
                    kind_of(&other)
                )),
            }
        }
        Err(e) => {
            tracing::warn!("Failed to parse stored preferences: {}", e);
            Loaded::Fallback {
                value: Map::new(),
                reason: FallbackReason::Corrupt(e.to_string()),
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
