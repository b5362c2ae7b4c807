//! Rule-based assistant replies
//!
//! Questions are matched against keyword categories in priority order; the
//! first category with a case-insensitive substring hit answers.

use crate::inventory::{
    low_stock, recent_transactions, total_quantity, InventoryItem, Supplier, Transaction,
    TransactionType,
};

/// Suppliers named individually before the rest are summarized
const SUPPLIER_PREVIEW: usize = 5;

/// Transactions listed in a "recent" reply
const RECENT_PREVIEW: usize = 3;

/// Keyword categories, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Stock,
    Supplier,
    Transaction,
    Analytics,
    Greeting,
    Unknown,
}

impl Topic {
    const RULES: &'static [(Topic, &'static [&'static str])] = &[
        (Topic::Stock, &["stock", "inventory"]),
        (Topic::Supplier, &["supplier"]),
        (Topic::Transaction, &["transaction", "recent"]),
        (Topic::Analytics, &["analytic", "report"]),
        (Topic::Greeting, &["hello", "hi", "hey"]),
    ];

    /// Classify a question
    pub fn classify(question: &str) -> Topic {
        let question = question.to_lowercase();
        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| question.contains(k)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::Unknown)
    }
}

/// Answer `question` from the current data lists
pub fn respond(
    question: &str,
    inventory: &[InventoryItem],
    suppliers: &[Supplier],
    transactions: &[Transaction],
) -> String {
    match Topic::classify(question) {
        Topic::Stock => stock_reply(inventory),
        Topic::Supplier => supplier_reply(suppliers),
        Topic::Transaction => transaction_reply(transactions),
        Topic::Analytics => analytics_reply(inventory, suppliers, transactions),
        Topic::Greeting => "Hello! How can I help you manage your inventory today?".to_string(),
        Topic::Unknown => "I can help with stock levels, suppliers, recent transactions, and \
                           inventory reports. Try asking \"What's my stock level?\""
            .to_string(),
    }
}

fn stock_reply(inventory: &[InventoryItem]) -> String {
    let low: Vec<&str> = low_stock(inventory).map(|item| item.name.as_str()).collect();

    if low.is_empty() {
        format!(
            "You have {} items in inventory, and none are running low on stock.",
            inventory.len()
        )
    } else {
        format!(
            "You have {} items in inventory. There are {} items with low stock: {}.",
            inventory.len(),
            low.len(),
            low.join(", ")
        )
    }
}

fn supplier_reply(suppliers: &[Supplier]) -> String {
    if suppliers.is_empty() {
        return "You don't have any suppliers on file yet.".to_string();
    }

    let mut names: Vec<&str> = suppliers
        .iter()
        .take(SUPPLIER_PREVIEW)
        .map(|s| s.name.as_str())
        .collect();
    let rest = suppliers.len().saturating_sub(SUPPLIER_PREVIEW);
    let more = format!("and {} more", rest);
    if rest > 0 {
        names.push(&more);
    }

    format!("You work with {} suppliers: {}.", suppliers.len(), names.join(", "))
}

fn transaction_reply(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions have been recorded yet.".to_string();
    }

    let lines: Vec<String> = recent_transactions(transactions, RECENT_PREVIEW)
        .iter()
        .map(|t| {
            let direction = match t.kind {
                TransactionType::Inbound => "Inbound",
                TransactionType::Outbound => "Outbound",
            };
            format!("{} {} x {} on {}", direction, t.quantity, t.item_name, t.date)
        })
        .collect();

    format!(
        "There are {} transactions on record. Most recent: {}.",
        transactions.len(),
        lines.join("; ")
    )
}

fn analytics_reply(
    inventory: &[InventoryItem],
    suppliers: &[Supplier],
    transactions: &[Transaction],
) -> String {
    let low = low_stock(inventory).count();
    let inbound = total_quantity(transactions, TransactionType::Inbound);
    let outbound = total_quantity(transactions, TransactionType::Outbound);

    format!(
        "Inventory report: {} items ({} low stock), {} suppliers, {} transactions. \
         Total inbound: {} units; total outbound: {} units; net movement: {} units.",
        inventory.len(),
        low,
        suppliers.len(),
        transactions.len(),
        inbound,
        outbound,
        inbound - outbound
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::LOW_STOCK;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_low_stock_answer() {
        let inventory = vec![InventoryItem::new("1", "Bolts", LOW_STOCK)];
        let reply = respond("what's my stock level?", &inventory, &[], &[]);
        assert!(reply.contains("1 items with low stock: Bolts"), "{}", reply);
    }

    #[test]
    fn test_stock_without_low_items() {
        let inventory = vec![InventoryItem::new("1", "Nuts", "In Stock")];
        let reply = respond("Show INVENTORY", &inventory, &[], &[]);
        assert!(reply.contains("none are running low"));
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(Topic::classify("supplier stock"), Topic::Stock);
        assert_eq!(Topic::classify("recent supplier"), Topic::Supplier);
        assert_eq!(Topic::classify("transaction report"), Topic::Transaction);
        assert_eq!(Topic::classify("Monthly Report please"), Topic::Analytics);
        assert_eq!(Topic::classify("hey there"), Topic::Greeting);
        assert_eq!(Topic::classify("what time is it"), Topic::Unknown);
    }

    #[test]
    fn test_supplier_answer_summarizes_long_lists() {
        let suppliers: Vec<Supplier> = (0..7)
            .map(|i| Supplier::new(i.to_string(), format!("Vendor {}", i)))
            .collect();
        let reply = respond("list suppliers", &[], &suppliers, &[]);
        assert!(reply.starts_with("You work with 7 suppliers: Vendor 0"));
        assert!(reply.contains("Vendor 4, and 2 more"));
        assert!(!reply.contains("Vendor 5"));
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let transactions = vec![
            Transaction::new("a", TransactionType::Inbound, "Nuts", 50, date(1)),
            Transaction::new("b", TransactionType::Outbound, "Bolts", 5, date(9)),
        ];
        let reply = respond("any recent activity?", &[], &[], &transactions);
        assert_eq!(
            reply,
            "There are 2 transactions on record. Most recent: Outbound 5 x Bolts on 2026-10-09; \
             Inbound 50 x Nuts on 2026-10-01."
        );
    }

    #[test]
    fn test_analytics_totals() {
        let inventory = vec![InventoryItem::new("1", "Bolts", LOW_STOCK)];
        let transactions = vec![
            Transaction::new("a", TransactionType::Inbound, "Bolts", 40, date(1)),
            Transaction::new("b", TransactionType::Outbound, "Bolts", 15, date(2)),
        ];
        let reply = respond("analytics", &inventory, &[], &transactions);
        assert!(reply.contains("Total inbound: 40 units; total outbound: 15 units; net movement: 25 units."));
    }

    #[test]
    fn test_fallback() {
        let reply = respond("what's the weather", &[], &[], &[]);
        assert!(reply.starts_with("I can help with"));
    }
}
