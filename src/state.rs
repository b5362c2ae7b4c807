//! Application State
//!
//! Bundles the stores every UI surface reads from, all bound to one injected
//! storage medium and one style host.

use crate::chat::ChatHistory;
use crate::currency::format_currency;
use crate::preferences::{PreferenceStore, PreferenceUpdate};
use crate::storage::{KeyValueStore, StorageResult};
use crate::style::{CompactView, StyleHost, StyleRegistry};
use std::sync::Arc;

/// Client state shared by the dashboard, settings and assistant surfaces
pub struct AppState<H: StyleHost> {
    pub preferences: PreferenceStore,
    pub chat: ChatHistory,
    pub compact_view: CompactView<H>,
}

impl<H: StyleHost> AppState<H> {
    /// Open all stores and bring the document in line with the stored density
    pub fn open(storage: Arc<dyn KeyValueStore>, styles: StyleRegistry<H>) -> Self {
        let preferences = PreferenceStore::new(storage.clone());
        let chat = ChatHistory::open(storage);
        let compact_view = CompactView::new(styles);
        compact_view.sync(preferences.load().into_inner().compact_view);

        Self {
            preferences,
            chat,
            compact_view,
        }
    }

    /// Persist a preference change and apply its side effects
    pub fn update_preference(&self, update: PreferenceUpdate) -> StorageResult<()> {
        self.preferences.set(update)?;
        if let PreferenceUpdate::CompactView(enabled) = update {
            self.compact_view.sync(enabled);
        }
        Ok(())
    }

    /// Format an amount in the configured currency
    pub fn format_money(&self, value: f64) -> String {
        format_currency(value, None, &self.preferences)
    }
}
