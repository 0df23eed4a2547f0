use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Column names of the export
// ---------------------------------------------------------------------------

/// Header names of the six columns the dashboard reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub order_number: String,
    pub email: String,
    pub order_total: String,
    pub item_name: String,
    pub quantity: String,
    pub order_date: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            order_number: "Numéro de commande".to_string(),
            email: "E-mail (Facturation)".to_string(),
            order_total: "Montant total de la commande".to_string(),
            item_name: "Nom de l’élément".to_string(),
            quantity: "Quantité (- Remboursement)".to_string(),
            order_date: "Date de commande".to_string(),
        }
    }
}

impl ColumnMap {
    /// All expected header names, in a fixed order.
    pub fn names(&self) -> [&str; 6] {
        [
            &self.order_number,
            &self.email,
            &self.order_total,
            &self.item_name,
            &self.quantity,
            &self.order_date,
        ]
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Parse a localized decimal such as `"12,50"` or `"3"`.
///
/// The first comma is read as the decimal separator and the longest leading
/// numeric prefix is used, so `"12,50 €"` gives `12.5` and `"1e3 pcs"` gives
/// `1000`. An exponent marker without digits is not part of the prefix.
/// Anything without a numeric prefix gives `0.0`.
pub fn to_number(raw: &str) -> f64 {
    let normalized = raw.trim().replacen(',', ".", 1);
    let bytes = normalized.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end = frac_start;
        }
    }
    if !has_digits {
        return 0.0;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+') | Some(b'-')) {
            exp_start += 1;
        }
        let mut exp_end = exp_start;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    normalized[..end].parse::<f64>().unwrap_or(0.0)
}

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse an order date into a calendar date. `None` is the invalid date.
///
/// Accepts ISO dates (with or without a time part) and US `m/d/Y` dates,
/// which is also the default display format.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// OrderLine – one CSV record
// ---------------------------------------------------------------------------

/// One line item of the export, with the order-level fields repeated.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub order_number: String,
    pub email: String,
    /// Order-level total, identical on every line of the order.
    pub order_total: f64,
    pub item_name: String,
    /// Quantity net of refunds.
    pub quantity: f64,
    /// `None` when the date cell could not be parsed.
    pub order_date: Option<NaiveDate>,
    /// Lowercased JSON rendering of the raw row (header → cell, in column
    /// order), used by the free-text filter.
    search_text: String,
}

impl OrderLine {
    /// Resolve a raw record, keyed by header, into typed fields.
    pub fn from_fields(fields: &IndexMap<String, String>, columns: &ColumnMap) -> Self {
        let cell = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");

        let order_number = cell(&columns.order_number).to_string();
        let email = cell(&columns.email).to_string();
        let order_total = to_number(cell(&columns.order_total));
        let item_name = cell(&columns.item_name).to_string();
        let quantity = to_number(cell(&columns.quantity));
        let order_date = parse_order_date(cell(&columns.order_date));

        let search_text = serde_json::to_string(fields)
            .unwrap_or_default()
            .to_lowercase();

        OrderLine {
            order_number,
            email,
            order_total,
            item_name,
            quantity,
            order_date,
            search_text,
        }
    }

    /// Case-insensitive substring search over the serialized row.
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.search_text.contains(needle)
    }
}

// ---------------------------------------------------------------------------
// OrderDataset – the complete loaded export
// ---------------------------------------------------------------------------

/// The full parsed export.
#[derive(Debug, Clone, Default)]
pub struct OrderDataset {
    /// All line items in file order.
    pub lines: Vec<OrderLine>,
    /// Header names as they appear in the file.
    pub column_names: Vec<String>,
}

impl OrderDataset {
    pub fn new(lines: Vec<OrderLine>, column_names: Vec<String>) -> Self {
        OrderDataset {
            lines,
            column_names,
        }
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct order numbers.
    pub fn order_count(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.order_number.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Order numbers whose lines disagree on an order-level field
    /// (email, total or date). Aggregations read these from the first line.
    pub fn inconsistent_orders(&self) -> Vec<String> {
        let mut first: IndexMap<&str, &OrderLine> = IndexMap::new();
        let mut bad: BTreeSet<&str> = BTreeSet::new();

        for line in &self.lines {
            match first.get(line.order_number.as_str()) {
                None => {
                    first.insert(&line.order_number, line);
                }
                Some(head) => {
                    if head.email != line.email
                        || head.order_total != line.order_total
                        || head.order_date != line.order_date
                    {
                        bad.insert(&line.order_number);
                    }
                }
            }
        }
        bad.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a line with the default headers, the way the loader would.
    pub(crate) fn line(order: &str, email: &str, total: &str, date: &str, item: &str, qty: &str) -> OrderLine {
        let columns = ColumnMap::default();
        let mut fields = IndexMap::new();
        fields.insert(columns.order_number.clone(), order.to_string());
        fields.insert(columns.email.clone(), email.to_string());
        fields.insert(columns.order_total.clone(), total.to_string());
        fields.insert(columns.order_date.clone(), date.to_string());
        fields.insert(columns.item_name.clone(), item.to_string());
        fields.insert(columns.quantity.clone(), qty.to_string());
        OrderLine::from_fields(&fields, &columns)
    }

    #[test]
    fn to_number_reads_decimal_comma() {
        assert_eq!(to_number("12,50"), 12.5);
        assert_eq!(to_number(" 3 "), 3.0);
        assert_eq!(to_number("-1,5"), -1.5);
        assert_eq!(to_number("12,50 €"), 12.5);
        assert_eq!(to_number("7."), 7.0);
    }

    #[test]
    fn to_number_reads_exponents() {
        assert_eq!(to_number("1e3"), 1000.0);
        assert_eq!(to_number("2,5e2"), 250.0);
        assert_eq!(to_number("1.5E-1"), 0.15);
        assert_eq!(to_number("4e+1 €"), 40.0);
        assert_eq!(to_number("1e"), 1.0);
        assert_eq!(to_number("1e+"), 1.0);
        assert_eq!(to_number("e3"), 0.0);
    }

    #[test]
    fn to_number_falls_back_to_zero() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("abc"), 0.0);
        assert_eq!(to_number("NaN"), 0.0);
        assert_eq!(to_number("inf"), 0.0);
        assert_eq!(to_number("-"), 0.0);
    }

    #[test]
    fn parse_order_date_accepts_common_layouts() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        assert_eq!(parse_order_date("2024-03-25"), Some(d));
        assert_eq!(parse_order_date("2024-03-25 18:04:12"), Some(d));
        assert_eq!(parse_order_date("2024-03-25T18:04:12"), Some(d));
        assert_eq!(parse_order_date("2024-03-25 18:04"), Some(d));
        assert_eq!(parse_order_date("3/25/2024"), Some(d));
        assert_eq!(parse_order_date("03/25/2024"), Some(d));
    }

    #[test]
    fn parse_order_date_rejects_garbage() {
        assert_eq!(parse_order_date(""), None);
        assert_eq!(parse_order_date("yesterday"), None);
        // day-first dates do not exist in the US layout
        assert_eq!(parse_order_date("25/03/2024"), None);
    }

    #[test]
    fn from_fields_resolves_typed_values() {
        let l = line("1001", "a@x.fr", "50,00", "2024-01-01 10:00:00", "Pod X", "2");
        assert_eq!(l.order_number, "1001");
        assert_eq!(l.order_total, 50.0);
        assert_eq!(l.quantity, 2.0);
        assert_eq!(l.order_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let mut fields = IndexMap::new();
        fields.insert("Other".to_string(), "x".to_string());
        let l = OrderLine::from_fields(&fields, &ColumnMap::default());
        assert_eq!(l.order_number, "");
        assert_eq!(l.order_total, 0.0);
        assert_eq!(l.order_date, None);
    }

    #[test]
    fn search_text_covers_keys_and_values() {
        let l = line("1001", "Alice@Example.com", "1", "2024-01-01", "Pod X", "1");
        assert!(l.matches_lowercase("alice@example.com"));
        assert!(l.matches_lowercase("numéro de commande"));
        assert!(!l.matches_lowercase("bob"));
    }

    #[test]
    fn inconsistent_orders_flags_disagreeing_lines() {
        let ds = OrderDataset::new(
            vec![
                line("1", "a@x", "10", "2024-01-01", "A", "1"),
                line("1", "a@x", "10", "2024-01-01", "B", "1"),
                line("2", "b@x", "20", "2024-01-02", "A", "1"),
                line("2", "b@x", "25", "2024-01-02", "C", "1"),
            ],
            Vec::new(),
        );
        assert_eq!(ds.inconsistent_orders(), vec!["2".to_string()]);
        assert_eq!(ds.order_count(), 2);
    }
}
