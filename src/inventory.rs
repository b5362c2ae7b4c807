//! Inventory Data
//!
//! Read-only views of the inventory, supplier and transaction lists supplied
//! by the data context, plus the one-shot JSON export offered for download.

use crate::storage::StorageResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Status marker for items below their reorder point
pub const LOW_STOCK: &str = "Low Stock";

/// An inventory line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: String,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: None,
            category: None,
            quantity: 0,
            unit_price: None,
            supplier: None,
            expiry_date: None,
            status: status.into(),
        }
    }

    /// Builder method: set quantity on hand
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn is_low_stock(&self) -> bool {
        self.status == LOW_STOCK
    }
}

/// A supplier record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Supplier {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
        }
    }
}

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Inbound,
    Outbound,
}

/// A stock movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub item_name: String,
    pub quantity: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionType,
        item_name: impl Into<String>,
        quantity: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            item_name: item_name.into(),
            quantity,
            date,
            reference: String::new(),
            notes: None,
        }
    }
}

/// The lists the data context hands to readers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataSnapshot {
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl DataSnapshot {
    /// Load a snapshot from a JSON file
    ///
    /// Accepts a previous export as well, since its extra `exportDate` field is ignored.
    pub fn load(path: &Path) -> StorageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Items flagged as low stock, in list order
pub fn low_stock(inventory: &[InventoryItem]) -> impl Iterator<Item = &InventoryItem> {
    inventory.iter().filter(|item| item.is_low_stock())
}

/// Total quantity moved in one direction
pub fn total_quantity(transactions: &[Transaction], kind: TransactionType) -> i64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.quantity)
        .sum()
}

/// Most recent transactions first, at most `limit`
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

/// Downloadable data export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub inventory: Vec<InventoryItem>,
    pub suppliers: Vec<Supplier>,
    pub transactions: Vec<Transaction>,
    pub export_date: DateTime<Utc>,
}

impl ExportDocument {
    pub fn new(snapshot: &DataSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            inventory: snapshot.inventory.clone(),
            suppliers: snapshot.suppliers.clone(),
            transactions: snapshot.transactions.clone(),
            export_date: now,
        }
    }

    /// File name offered for download
    pub fn file_name(&self) -> String {
        export_file_name(self.export_date.date_naive())
    }

    /// Write the export as pretty JSON into `dir`, returning the file path
    pub fn write_to_dir(&self, dir: &Path) -> StorageResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Exported data to {:?}", path);
        Ok(path)
    }
}

/// `inventomatic-data-<ISO date>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("inventomatic-data-{}.json", date.format("%Y-%m-%d"))
}
