//! User and system preferences
//!
//! - **types**: the Preference Record and its per-field key/value/update types
//! - **store**: [`PreferenceStore`], load/merge/persist against a [`KeyValueStore`](crate::storage::KeyValueStore)

pub mod store;
pub mod types;

pub use store::{PreferenceStore, PREFERENCES_KEY};
pub use types::{
    DefaultView, ItemsPerPage, NotificationKind, NotificationSettings, PreferenceKey,
    PreferenceUpdate, PreferenceValue, Preferences,
};
