/// Report layer: pure aggregations over the filtered order lines.
///
/// Every aggregator takes the filtered lines (file order) and returns a small
/// derived summary. Nothing is cached between calls; the session state simply
/// recomputes the whole [`Report`] when the data or the filter changes.

pub mod basket;
pub mod brands;
pub mod customers;
pub mod kpi;
pub mod products;
pub mod weekday;

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::data::model::OrderLine;

use basket::PairCount;
use brands::{BrandClassifier, BrandQuantity};
use customers::{CustomerSales, DormantCustomer};
use kpi::Kpi;
use products::ProductQuantity;
use weekday::WeekdayTotal;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `Some(n)` when `key` is the canonical decimal form of an index below
/// `u32::MAX` (no sign, no leading zero).
fn index_key(key: &str) -> Option<u32> {
    let n: u32 = key.parse().ok()?;
    (n != u32::MAX && n.to_string() == key).then_some(n)
}

/// Numeric order numbers first, ascending; every other key after them in
/// first-appearance order. Ties in the rankings fall back on this order.
fn sort_order_keys<V>(orders: &mut IndexMap<&str, V>) {
    orders.sort_by_cached_key(|key, _| match index_key(key) {
        Some(n) => (false, n),
        None => (true, 0),
    });
}

/// Group lines by order number. Orders come out in [`sort_order_keys`] order.
pub fn group_orders<'a>(rows: &[&'a OrderLine]) -> IndexMap<&'a str, Vec<&'a OrderLine>> {
    let mut orders: IndexMap<&'a str, Vec<&'a OrderLine>> = IndexMap::new();
    for &line in rows {
        orders.entry(line.order_number.as_str()).or_default().push(line);
    }
    sort_order_keys(&mut orders);
    orders
}

/// First line of every order; it carries the order-level fields.
pub fn order_heads<'a>(rows: &[&'a OrderLine]) -> Vec<&'a OrderLine> {
    let mut heads: IndexMap<&'a str, &'a OrderLine> = IndexMap::new();
    for &line in rows {
        heads.entry(line.order_number.as_str()).or_insert(line);
    }
    sort_order_keys(&mut heads);
    heads.into_values().collect()
}

/// Sort by value, largest first. Equal values keep their insertion order.
pub(crate) fn rank_desc<K>(totals: IndexMap<K, f64>, limit: Option<usize>) -> Vec<(K, f64)> {
    let mut ranked: Vec<(K, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(n) = limit {
        ranked.truncate(n);
    }
    ranked
}

// ---------------------------------------------------------------------------
// Report – everything the dashboard shows for one filter state
// ---------------------------------------------------------------------------

/// Knobs of the aggregations.
pub struct ReportSettings {
    /// Length of the ranked product, customer and pair lists.
    pub top_n: usize,
    /// Customers without an order in this many days are dormant.
    pub dormant_days: u64,
    /// chrono `strftime` layout of dormant customers' last order date.
    pub date_display_format: String,
    pub classifier: Box<dyn BrandClassifier>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 20,
            dormant_days: 120,
            date_display_format: "%-m/%-d/%Y".to_string(),
            classifier: Box::new(brands::MarkerBrandClassifier::default()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub kpi: Kpi,
    pub top_products: Vec<ProductQuantity>,
    pub top_customers: Vec<CustomerSales>,
    pub dormant_customers: Vec<DormantCustomer>,
    pub weekday_totals: Vec<WeekdayTotal>,
    pub product_pairs: Vec<PairCount>,
    pub brand_quantities: Vec<BrandQuantity>,
}

impl Report {
    /// Run every aggregator over the filtered lines.
    pub fn compute(rows: &[&OrderLine], today: NaiveDate, settings: &ReportSettings) -> Self {
        Report {
            kpi: kpi::compute_kpi(rows),
            top_products: products::top_products(rows, settings.top_n),
            top_customers: customers::top_customers(rows, settings.top_n),
            dormant_customers: customers::dormant_customers(
                rows,
                today,
                settings.dormant_days,
                &settings.date_display_format,
            ),
            weekday_totals: weekday::weekday_totals(rows),
            product_pairs: basket::top_pairs(rows, settings.top_n),
            brand_quantities: brands::brand_quantities(rows, settings.classifier.as_ref()),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).context("serializing report")?;
        writer.flush().context("flushing report")?;
        log::info!("Exported report to {}", path.display());
        Ok(())
    }
}
