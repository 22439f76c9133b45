//! Stock summary over the ledger: how many batches, how much of each product.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::HistoryEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductStock {
    pub product: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub total_entries: usize,
    /// Sorted by product name.
    pub by_product: Vec<ProductStock>,
}

/// Quantity as a number; anything that isn't a finite decimal counts as 0.
fn parse_quantity(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite())
        .unwrap_or(0.0)
}

pub fn summarize(entries: &[HistoryEntry]) -> StockSummary {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.record.product_type.as_str()).or_default() +=
            parse_quantity(&entry.record.quantity);
    }

    StockSummary {
        total_entries: entries.len(),
        by_product: totals
            .into_iter()
            .map(|(product, quantity)| ProductStock {
                product: product.to_string(),
                quantity,
            })
            .collect(),
    }
}
