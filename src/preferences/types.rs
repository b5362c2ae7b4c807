//! Preference Record types
//!
//! The record is a flat mapping of setting name to value with one nested
//! `notifications` mapping. Every field has a default, and decoding is done
//! field by field so one bad field never costs the others.

use crate::currency::Currency;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Page shown after launch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Dashboard,
    Inventory,
    Transactions,
    Suppliers,
}

impl DefaultView {
    pub fn all() -> &'static [DefaultView] {
        &[
            DefaultView::Dashboard,
            DefaultView::Inventory,
            DefaultView::Transactions,
            DefaultView::Suppliers,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultView::Dashboard => "dashboard",
            DefaultView::Inventory => "inventory",
            DefaultView::Transactions => "transactions",
            DefaultView::Suppliers => "suppliers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DefaultView::Dashboard => "Dashboard",
            DefaultView::Inventory => "Inventory",
            DefaultView::Transactions => "Transactions",
            DefaultView::Suppliers => "Suppliers",
        }
    }
}

impl fmt::Display for DefaultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DefaultView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DefaultView::all()
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown view: {}", s))
    }
}

/// Table page size
///
/// Stored as text (`"25"`) but read back from either text or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemsPerPage {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl ItemsPerPage {
    pub fn all() -> &'static [ItemsPerPage] {
        &[
            ItemsPerPage::Ten,
            ItemsPerPage::TwentyFive,
            ItemsPerPage::Fifty,
            ItemsPerPage::Hundred,
        ]
    }

    pub fn count(&self) -> u32 {
        match self {
            ItemsPerPage::Ten => 10,
            ItemsPerPage::TwentyFive => 25,
            ItemsPerPage::Fifty => 50,
            ItemsPerPage::Hundred => 100,
        }
    }

    pub fn from_count(count: u64) -> Option<Self> {
        ItemsPerPage::all()
            .iter()
            .copied()
            .find(|p| u64::from(p.count()) == count)
    }
}

impl fmt::Display for ItemsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

impl FromStr for ItemsPerPage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(ItemsPerPage::from_count)
            .ok_or_else(|| format!("Unsupported page size: {}", s))
    }
}

impl Serialize for ItemsPerPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemsPerPage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Number(n) => ItemsPerPage::from_count(n)
                .ok_or_else(|| serde::de::Error::custom(format!("Unsupported page size: {}", n))),
        }
    }
}

/// One of the notification toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    EmailAlerts,
    LowStockAlerts,
    ExpiryAlerts,
    SystemUpdates,
}

impl NotificationKind {
    pub fn all() -> &'static [NotificationKind] {
        &[
            NotificationKind::EmailAlerts,
            NotificationKind::LowStockAlerts,
            NotificationKind::ExpiryAlerts,
            NotificationKind::SystemUpdates,
        ]
    }

    /// Key used inside the stored `notifications` mapping
    pub fn key(&self) -> &'static str {
        match self {
            NotificationKind::EmailAlerts => "emailAlerts",
            NotificationKind::LowStockAlerts => "lowStockAlerts",
            NotificationKind::ExpiryAlerts => "expiryAlerts",
            NotificationKind::SystemUpdates => "systemUpdates",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::all()
            .iter()
            .copied()
            .find(|k| k.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown notification: {}", s))
    }
}

/// Notification toggles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_alerts: bool,
    pub low_stock_alerts: bool,
    pub expiry_alerts: bool,
    pub system_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_alerts: true,
            low_stock_alerts: true,
            expiry_alerts: true,
            system_updates: false,
        }
    }
}

impl NotificationSettings {
    pub fn get(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::EmailAlerts => self.email_alerts,
            NotificationKind::LowStockAlerts => self.low_stock_alerts,
            NotificationKind::ExpiryAlerts => self.expiry_alerts,
            NotificationKind::SystemUpdates => self.system_updates,
        }
    }

    pub fn set(&mut self, kind: NotificationKind, enabled: bool) {
        match kind {
            NotificationKind::EmailAlerts => self.email_alerts = enabled,
            NotificationKind::LowStockAlerts => self.low_stock_alerts = enabled,
            NotificationKind::ExpiryAlerts => self.expiry_alerts = enabled,
            NotificationKind::SystemUpdates => self.system_updates = enabled,
        }
    }

    fn from_object(obj: &Map<String, Value>, rejected: &mut Vec<String>) -> Self {
        let mut settings = Self::default();
        for kind in NotificationKind::all() {
            if let Some(raw) = obj.get(kind.key()) {
                match raw.as_bool() {
                    Some(enabled) => settings.set(*kind, enabled),
                    None => rejected.push(format!("notifications.{}", kind.key())),
                }
            }
        }
        settings
    }
}

/// The full Preference Record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub currency: Currency,
    pub default_view: DefaultView,
    pub items_per_page: ItemsPerPage,
    pub auto_refresh: bool,
    pub compact_view: bool,
    pub notifications: NotificationSettings,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            default_view: DefaultView::Dashboard,
            items_per_page: ItemsPerPage::Ten,
            auto_refresh: true,
            compact_view: false,
            notifications: NotificationSettings::default(),
        }
    }
}

impl Preferences {
    /// Decode a stored object field by field
    ///
    /// Missing fields take their default silently; fields present with an
    /// unusable value also take their default and are named in the returned list.
    pub fn from_object(obj: &Map<String, Value>) -> (Self, Vec<String>) {
        let mut prefs = Self::default();
        let mut rejected = Vec::new();

        decode_field(obj, PreferenceKey::Currency, &mut prefs.currency, &mut rejected);
        decode_field(obj, PreferenceKey::DefaultView, &mut prefs.default_view, &mut rejected);
        decode_field(obj, PreferenceKey::ItemsPerPage, &mut prefs.items_per_page, &mut rejected);
        decode_field(obj, PreferenceKey::AutoRefresh, &mut prefs.auto_refresh, &mut rejected);
        decode_field(obj, PreferenceKey::CompactView, &mut prefs.compact_view, &mut rejected);

        match obj.get(PreferenceKey::Notifications.as_str()) {
            Some(Value::Object(inner)) => {
                prefs.notifications = NotificationSettings::from_object(inner, &mut rejected);
            }
            Some(_) => rejected.push(PreferenceKey::Notifications.as_str().to_string()),
            None => {}
        }

        (prefs, rejected)
    }

    /// Read a single field
    pub fn get(&self, key: PreferenceKey) -> PreferenceValue {
        match key {
            PreferenceKey::Currency => PreferenceValue::Currency(self.currency),
            PreferenceKey::DefaultView => PreferenceValue::DefaultView(self.default_view),
            PreferenceKey::ItemsPerPage => PreferenceValue::ItemsPerPage(self.items_per_page),
            PreferenceKey::AutoRefresh => PreferenceValue::AutoRefresh(self.auto_refresh),
            PreferenceKey::CompactView => PreferenceValue::CompactView(self.compact_view),
            PreferenceKey::Notifications => PreferenceValue::Notifications(self.notifications),
        }
    }

    /// Apply an update in memory
    pub fn apply(&mut self, update: &PreferenceUpdate) {
        match *update {
            PreferenceUpdate::Currency(c) => self.currency = c,
            PreferenceUpdate::DefaultView(v) => self.default_view = v,
            PreferenceUpdate::ItemsPerPage(p) => self.items_per_page = p,
            PreferenceUpdate::AutoRefresh(b) => self.auto_refresh = b,
            PreferenceUpdate::CompactView(b) => self.compact_view = b,
            PreferenceUpdate::Notification(kind, enabled) => self.notifications.set(kind, enabled),
            PreferenceUpdate::Notifications(n) => self.notifications = n,
        }
    }
}

fn decode_field<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    key: PreferenceKey,
    slot: &mut T,
    rejected: &mut Vec<String>,
) {
    if let Some(raw) = obj.get(key.as_str()) {
        match T::deserialize(raw) {
            Ok(value) => *slot = value,
            Err(_) => rejected.push(key.as_str().to_string()),
        }
    }
}

/// Top-level field names of the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Currency,
    DefaultView,
    ItemsPerPage,
    AutoRefresh,
    CompactView,
    Notifications,
}

impl PreferenceKey {
    pub fn all() -> &'static [PreferenceKey] {
        &[
            PreferenceKey::Currency,
            PreferenceKey::DefaultView,
            PreferenceKey::ItemsPerPage,
            PreferenceKey::AutoRefresh,
            PreferenceKey::CompactView,
            PreferenceKey::Notifications,
        ]
    }

    /// Stored field name
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Currency => "currency",
            PreferenceKey::DefaultView => "defaultView",
            PreferenceKey::ItemsPerPage => "itemsPerPage",
            PreferenceKey::AutoRefresh => "autoRefresh",
            PreferenceKey::CompactView => "compactView",
            PreferenceKey::Notifications => "notifications",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceKey::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown preference: {}", s))
    }
}

/// Value of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceValue {
    Currency(Currency),
    DefaultView(DefaultView),
    ItemsPerPage(ItemsPerPage),
    AutoRefresh(bool),
    CompactView(bool),
    Notifications(NotificationSettings),
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceValue::Currency(c) => write!(f, "{}", c),
            PreferenceValue::DefaultView(v) => write!(f, "{}", v),
            PreferenceValue::ItemsPerPage(p) => write!(f, "{}", p),
            PreferenceValue::AutoRefresh(b) | PreferenceValue::CompactView(b) => write!(f, "{}", b),
            PreferenceValue::Notifications(n) => {
                let parts: Vec<String> = NotificationKind::all()
                    .iter()
                    .map(|k| format!("{}={}", k.key(), n.get(*k)))
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

/// A single-field mutation of the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceUpdate {
    Currency(Currency),
    DefaultView(DefaultView),
    ItemsPerPage(ItemsPerPage),
    AutoRefresh(bool),
    CompactView(bool),
    /// One notification toggle; merged key by key into the stored mapping
    Notification(NotificationKind, bool),
    /// All notification toggles; still merged key by key
    Notifications(NotificationSettings),
}

impl PreferenceUpdate {
    /// Parse a `key value` pair as typed on a command line
    ///
    /// Notification toggles are addressed as `notifications.<kind>`.
    pub fn parse(key: &str, value: &str) -> Result<Self, String> {
        if let Some(kind) = key.strip_prefix("notifications.") {
            let kind: NotificationKind = kind.parse()?;
            return Ok(PreferenceUpdate::Notification(kind, parse_bool(value)?));
        }

        match key.parse::<PreferenceKey>()? {
            PreferenceKey::Currency => Ok(PreferenceUpdate::Currency(value.parse()?)),
            PreferenceKey::DefaultView => Ok(PreferenceUpdate::DefaultView(value.parse()?)),
            PreferenceKey::ItemsPerPage => Ok(PreferenceUpdate::ItemsPerPage(value.parse()?)),
            PreferenceKey::AutoRefresh => Ok(PreferenceUpdate::AutoRefresh(parse_bool(value)?)),
            PreferenceKey::CompactView => Ok(PreferenceUpdate::CompactView(parse_bool(value)?)),
            PreferenceKey::Notifications => {
                Err("Set notifications one at a time with notifications.<kind>".to_string())
            }
        }
    }

    pub fn key(&self) -> PreferenceKey {
        match self {
            PreferenceUpdate::Currency(_) => PreferenceKey::Currency,
            PreferenceUpdate::DefaultView(_) => PreferenceKey::DefaultView,
            PreferenceUpdate::ItemsPerPage(_) => PreferenceKey::ItemsPerPage,
            PreferenceUpdate::AutoRefresh(_) => PreferenceKey::AutoRefresh,
            PreferenceUpdate::CompactView(_) => PreferenceKey::CompactView,
            PreferenceUpdate::Notification(..) | PreferenceUpdate::Notifications(_) => {
                PreferenceKey::Notifications
            }
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(format!("Expected true/false, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_defaults_serialize_with_stored_names() {
        let value = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "currency": "USD",
                "defaultView": "dashboard",
                "itemsPerPage": "10",
                "autoRefresh": true,
                "compactView": false,
                "notifications": {
                    "emailAlerts": true,
                    "lowStockAlerts": true,
                    "expiryAlerts": true,
                    "systemUpdates": false
                }
            })
        );
    }

    #[test]
    fn test_field_by_field_decode() {
        let (prefs, rejected) = Preferences::from_object(&object(json!({
            "currency": "EUR",
            "defaultView": "reports",
            "itemsPerPage": 50,
            "autoRefresh": "yes",
            "notifications": { "systemUpdates": true, "emailAlerts": 3 },
            "legacyTheme": "dark"
        })));

        assert_eq!(prefs.currency, Currency::EUR);
        assert_eq!(prefs.default_view, DefaultView::Dashboard);
        assert_eq!(prefs.items_per_page, ItemsPerPage::Fifty);
        assert!(prefs.auto_refresh);
        assert!(prefs.notifications.system_updates);
        assert!(prefs.notifications.email_alerts);
        assert_eq!(
            rejected,
            vec!["defaultView", "autoRefresh", "notifications.emailAlerts"]
        );
    }

    #[test]
    fn test_items_per_page_text_and_number() {
        let from_text: ItemsPerPage = serde_json::from_value(json!("25")).unwrap();
        let from_number: ItemsPerPage = serde_json::from_value(json!(100)).unwrap();
        assert_eq!(from_text, ItemsPerPage::TwentyFive);
        assert_eq!(from_number, ItemsPerPage::Hundred);
        assert!(serde_json::from_value::<ItemsPerPage>(json!("7")).is_err());
        assert_eq!(serde_json::to_value(ItemsPerPage::Fifty).unwrap(), json!("50"));
    }

    #[test]
    fn test_update_parsing() {
        assert_eq!(
            PreferenceUpdate::parse("currency", "php").unwrap(),
            PreferenceUpdate::Currency(Currency::PHP)
        );
        assert_eq!(
            PreferenceUpdate::parse("itemsPerPage", "25").unwrap(),
            PreferenceUpdate::ItemsPerPage(ItemsPerPage::TwentyFive)
        );
        assert_eq!(
            PreferenceUpdate::parse("notifications.expiryAlerts", "off").unwrap(),
            PreferenceUpdate::Notification(NotificationKind::ExpiryAlerts, false)
        );
        assert!(PreferenceUpdate::parse("theme", "dark").is_err());
        assert!(PreferenceUpdate::parse("autoRefresh", "maybe").is_err());
        assert!(PreferenceUpdate::parse("notifications", "true").is_err());
    }

    #[test]
    fn test_apply_and_get() {
        let mut prefs = Preferences::default();
        prefs.apply(&PreferenceUpdate::Notification(NotificationKind::SystemUpdates, true));
        prefs.apply(&PreferenceUpdate::DefaultView(DefaultView::Suppliers));

        assert_eq!(
            prefs.get(PreferenceKey::DefaultView),
            PreferenceValue::DefaultView(DefaultView::Suppliers)
        );
        assert!(prefs.notifications.get(NotificationKind::SystemUpdates));
        assert_eq!(PreferenceValue::ItemsPerPage(ItemsPerPage::Ten).to_string(), "10");
    }
}
