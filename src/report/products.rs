use indexmap::IndexMap;
use serde::Serialize;

use crate::data::model::OrderLine;

use super::rank_desc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductQuantity {
    pub name: String,
    pub quantity: f64,
}

/// Net quantity sold per item name, best sellers first.
///
/// Every line counts, so an item appearing twice in one order is summed.
pub fn top_products(rows: &[&OrderLine], limit: usize) -> Vec<ProductQuantity> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for line in rows {
        *totals.entry(line.item_name.as_str()).or_default() += line.quantity;
    }
    rank_desc(totals, Some(limit))
        .into_iter()
        .map(|(name, quantity)| ProductQuantity {
            name: name.to_string(),
            quantity,
        })
        .collect()
}
