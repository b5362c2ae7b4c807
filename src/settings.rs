//! Settings Section Controllers
//!
//! Stateless controllers behind the settings panel. They turn the current
//! record into rows and options for display, and turn raw toggle or select
//! input into [`PreferenceUpdate`]s reported through a callback. Persisting the
//! change is the caller's job, typically [`PreferenceStore::set`](crate::preferences::PreferenceStore::set).

use crate::currency::Currency;
use crate::preferences::{
    DefaultView, ItemsPerPage, NotificationKind, NotificationSettings, PreferenceKey,
    PreferenceUpdate, Preferences,
};
use thiserror::Error;

/// Errors raised when raw input does not map to a preference
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: PreferenceKey, value: String },

    #[error("{0} is not a select field")]
    NotSelectable(PreferenceKey),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// A labelled toggle in the notification section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRow {
    pub kind: NotificationKind,
    pub label: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

/// A choice in a select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Notification toggles
pub struct NotificationSection;

impl NotificationSection {
    pub fn rows(current: &NotificationSettings) -> Vec<ToggleRow> {
        NotificationKind::all()
            .iter()
            .map(|&kind| {
                let (label, description) = describe(kind);
                ToggleRow {
                    kind,
                    label,
                    description,
                    enabled: current.get(kind),
                }
            })
            .collect()
    }

    /// Flip one toggle and report the new state
    pub fn toggle<F, R>(current: &NotificationSettings, kind: NotificationKind, on_change: F) -> R
    where
        F: FnOnce(PreferenceUpdate) -> R,
    {
        on_change(PreferenceUpdate::Notification(kind, !current.get(kind)))
    }
}

fn describe(kind: NotificationKind) -> (&'static str, &'static str) {
    match kind {
        NotificationKind::EmailAlerts => ("Email Alerts", "Receive notifications via email"),
        NotificationKind::LowStockAlerts => {
            ("Low Stock Alerts", "Get notified when items are running low")
        }
        NotificationKind::ExpiryAlerts => {
            ("Expiry Alerts", "Get notified about items nearing expiration")
        }
        NotificationKind::SystemUpdates => {
            ("System Updates", "Receive updates about new features and maintenance")
        }
    }
}

/// Currency, landing page, page size and refresh controls
pub struct SystemPreferencesSection;

impl SystemPreferencesSection {
    /// Options for a select field, with the current value marked
    pub fn options(key: PreferenceKey, current: &Preferences) -> SettingsResult<Vec<SelectOption>> {
        let options = match key {
            PreferenceKey::Currency => Currency::all()
                .iter()
                .map(|c| SelectOption {
                    value: c.code().to_string(),
                    label: format!("{} ({}) - {}", c.code(), c.symbol(), c.name()),
                    selected: *c == current.currency,
                })
                .collect(),
            PreferenceKey::DefaultView => DefaultView::all()
                .iter()
                .map(|v| SelectOption {
                    value: v.as_str().to_string(),
                    label: v.label().to_string(),
                    selected: *v == current.default_view,
                })
                .collect(),
            PreferenceKey::ItemsPerPage => ItemsPerPage::all()
                .iter()
                .map(|p| SelectOption {
                    value: p.to_string(),
                    label: format!("{} items", p),
                    selected: *p == current.items_per_page,
                })
                .collect(),
            other => return Err(SettingsError::NotSelectable(other)),
        };
        Ok(options)
    }

    /// Parse a raw select value and report it
    ///
    /// Nothing is reported when the value does not parse.
    pub fn select<F, R>(key: PreferenceKey, raw: &str, on_change: F) -> SettingsResult<R>
    where
        F: FnOnce(PreferenceUpdate) -> R,
    {
        let invalid = || SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
        };
        let update = match key {
            PreferenceKey::Currency => {
                PreferenceUpdate::Currency(raw.parse().map_err(|_| invalid())?)
            }
            PreferenceKey::DefaultView => {
                PreferenceUpdate::DefaultView(raw.parse().map_err(|_| invalid())?)
            }
            PreferenceKey::ItemsPerPage => {
                PreferenceUpdate::ItemsPerPage(raw.parse().map_err(|_| invalid())?)
            }
            other => return Err(SettingsError::NotSelectable(other)),
        };
        Ok(on_change(update))
    }

    pub fn set_auto_refresh<F, R>(enabled: bool, on_change: F) -> R
    where
        F: FnOnce(PreferenceUpdate) -> R,
    {
        on_change(PreferenceUpdate::AutoRefresh(enabled))
    }

    pub fn set_compact_view<F, R>(enabled: bool, on_change: F) -> R
    where
        F: FnOnce(PreferenceUpdate) -> R,
    {
        on_change(PreferenceUpdate::CompactView(enabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::PreferenceStore;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_notification_rows_reflect_settings() {
        let rows = NotificationSection::rows(&NotificationSettings::default());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].label, "Email Alerts");
        assert!(rows[1].enabled);
        assert!(!rows[3].enabled);
    }

    #[test]
    fn test_toggle_reports_inverse() {
        let current = NotificationSettings::default();
        let update = NotificationSection::toggle(&current, NotificationKind::LowStockAlerts, |u| u);
        assert_eq!(
            update,
            PreferenceUpdate::Notification(NotificationKind::LowStockAlerts, false)
        );
    }

    #[test]
    fn test_select_into_store() {
        let prefs = PreferenceStore::new(Arc::new(MemoryStore::new()));
        SystemPreferencesSection::select(PreferenceKey::Currency, "EUR", |u| prefs.set(u))
            .unwrap()
            .unwrap();
        SystemPreferencesSection::select(PreferenceKey::ItemsPerPage, "50", |u| prefs.set(u))
            .unwrap()
            .unwrap();

        let value = prefs.load().into_inner();
        assert_eq!(value.currency, Currency::EUR);
        assert_eq!(value.items_per_page, ItemsPerPage::Fifty);
    }

    #[test]
    fn test_invalid_select_reports_nothing() {
        let mut called = false;
        let result = SystemPreferencesSection::select(PreferenceKey::DefaultView, "reports", |_| {
            called = true;
        });
        assert_eq!(
            result,
            Err(SettingsError::InvalidValue {
                key: PreferenceKey::DefaultView,
                value: "reports".to_string()
            })
        );
        assert!(!called);

        assert_eq!(
            SystemPreferencesSection::select(PreferenceKey::AutoRefresh, "true", |u| u),
            Err(SettingsError::NotSelectable(PreferenceKey::AutoRefresh))
        );
    }

    #[test]
    fn test_options_mark_current_value() {
        let prefs = Preferences {
            default_view: DefaultView::Suppliers,
            ..Preferences::default()
        };
        let options = SystemPreferencesSection::options(PreferenceKey::DefaultView, &prefs).unwrap();
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, vec!["suppliers"]);

        let currencies = SystemPreferencesSection::options(PreferenceKey::Currency, &prefs).unwrap();
        assert_eq!(currencies[1].label, "PHP (₱) - Philippine Peso");
    }

    #[test]
    fn test_boolean_toggles() {
        assert_eq!(
            SystemPreferencesSection::set_compact_view(true, |u| u),
            PreferenceUpdate::CompactView(true)
        );
        assert_eq!(
            SystemPreferencesSection::set_auto_refresh(false, |u| u),
            PreferenceUpdate::AutoRefresh(false)
        );
    }
}
