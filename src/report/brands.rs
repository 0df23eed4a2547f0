use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::data::model::OrderLine;

use super::rank_desc;

/// Placeholder for items of the category whose brand could not be read.
pub const UNKNOWN_BRAND: &str = "?";

/// Outcome of classifying one item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandLabel<'a> {
    /// Not part of the tracked category.
    Outside,
    /// In the category, brand not recognised.
    Unknown,
    Named(&'a str),
}

/// Maps an item name to a brand. Swappable without touching the aggregation.
pub trait BrandClassifier {
    fn classify<'a>(&self, item_name: &'a str) -> BrandLabel<'a>;
}

/// Brand is the word right after a marker, e.g. `"E-liquide Acme Mint"` → `Acme`.
#[derive(Debug, Clone)]
pub struct MarkerBrandClassifier {
    marker: String,
    pattern: Regex,
}

impl MarkerBrandClassifier {
    pub fn new(marker: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"{}\s+([A-Za-z0-9\-']+)", regex::escape(marker)))?;
        Ok(Self {
            marker: marker.to_string(),
            pattern,
        })
    }
}

impl Default for MarkerBrandClassifier {
    fn default() -> Self {
        Self {
            marker: "E-liquide".to_string(),
            pattern: Regex::new(r"E-liquide\s+([A-Za-z0-9\-']+)").expect("literal brand pattern"),
        }
    }
}

impl BrandClassifier for MarkerBrandClassifier {
    fn classify<'a>(&self, item_name: &'a str) -> BrandLabel<'a> {
        if !item_name.contains(self.marker.as_str()) {
            return BrandLabel::Outside;
        }
        match self.pattern.captures(item_name).and_then(|c| c.get(1)) {
            Some(m) => BrandLabel::Named(m.as_str()),
            None => BrandLabel::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandQuantity {
    pub brand: String,
    pub quantity: f64,
}

/// Net quantity per brand over the classified lines, largest first, untruncated.
pub fn brand_quantities(rows: &[&OrderLine], classifier: &dyn BrandClassifier) -> Vec<BrandQuantity> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for line in rows {
        let brand = match classifier.classify(&line.item_name) {
            BrandLabel::Outside => continue,
            BrandLabel::Unknown => UNKNOWN_BRAND,
            BrandLabel::Named(b) => b,
        };
        *totals.entry(brand).or_default() += line.quantity;
    }
    rank_desc(totals, None)
        .into_iter()
        .map(|(brand, quantity)| BrandQuantity {
            brand: brand.to_string(),
            quantity,
        })
        .collect()
}
