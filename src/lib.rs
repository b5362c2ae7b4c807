//! # Inventomatic
//!
//! Client state engine for the Inventomatic inventory and supply dashboard.
//!
//! ## Features
//!
//! - **Preferences**: durable settings record with field-by-field default fallback
//! - **Currency**: localized money formatting driven by the stored currency
//! - **Compact view**: idempotent density style injection
//! - **Assistant**: persisted chat history with rule-based replies
//!
//! ## Modules
//!
//! - [`storage`]: Durable key-value media and load outcomes
//! - [`preferences`]: Preference Record and its store
//! - [`currency`]: Currency formatting
//! - [`style`]: Style injection for compact view
//! - [`settings`]: Settings section controllers
//! - [`chat`]: Chat history and response generation
//! - [`inventory`]: Inventory, supplier and transaction data and export
//! - [`monitor`]: Periodic memory sampler
//!
//! ## Quick Start
//!
//! ```rust
//! use inventomatic::prelude::*;
//! use std::sync::Arc;
//!
//! let storage = Arc::new(MemoryStore::new());
//! let prefs = PreferenceStore::new(storage.clone());
//!
//! assert_eq!(format_currency(1234.0, None, &prefs), "$1,234");
//!
//! prefs.set(PreferenceUpdate::Currency(Currency::PHP)).unwrap();
//! assert_eq!(format_currency(1234.0, None, &prefs), "₱1,234");
//! ```

pub mod chat;
pub mod config;
pub mod currency;
pub mod inventory;
pub mod monitor;
pub mod preferences;
pub mod settings;
pub mod state;
pub mod storage;
pub mod style;

pub use chat::{respond, ChatHistory, ChatMessage, Topic, CHAT_HISTORY_KEY, WELCOME_MESSAGE};

pub use config::{Config, ConfigError, LoggingConfig, MonitorConfig, StorageConfig};

pub use currency::{
    format_amount, format_currency, usd_to_php, Currency, LEGACY_USD_TO_PHP_RATE,
};

pub use inventory::{
    export_file_name, low_stock, recent_transactions, total_quantity, DataSnapshot,
    ExportDocument, InventoryItem, Supplier, Transaction, TransactionType,
};

pub use monitor::{MemoryProbe, MemorySample, MemorySampler, SystemMemoryProbe};

pub use preferences::{
    DefaultView, ItemsPerPage, NotificationKind, NotificationSettings, PreferenceKey,
    PreferenceStore, PreferenceUpdate, PreferenceValue, Preferences, PREFERENCES_KEY,
};

pub use settings::{NotificationSection, SettingsError, SystemPreferencesSection};

pub use state::AppState;

pub use storage::{
    FallbackReason, FileStore, KeyValueStore, Loaded, MemoryStore, StorageError, StorageResult,
};

pub use style::{CompactView, MemoryDocument, StyleHost, StyleRegistry, COMPACT_VIEW_MARKER};

/// Common imports
pub mod prelude {
    pub use crate::currency::{format_currency, Currency};
    pub use crate::preferences::{PreferenceKey, PreferenceStore, PreferenceUpdate};
    pub use crate::storage::{KeyValueStore, MemoryStore};
}
