use std::cmp::Ordering;
use std::fmt::Write as _;

use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::data::model::{parse_order_date, OrderLine};

use super::{order_heads, rank_desc};

// ---------------------------------------------------------------------------
// Top customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSales {
    pub email: String,
    pub total: f64,
}

/// Revenue per customer email, one total per order, biggest spenders first.
pub fn top_customers(rows: &[&OrderLine], limit: usize) -> Vec<CustomerSales> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for order in order_heads(rows) {
        *totals.entry(order.email.as_str()).or_default() += order.order_total;
    }
    rank_desc(totals, Some(limit))
        .into_iter()
        .map(|(email, total)| CustomerSales {
            email: email.to_string(),
            total,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dormant customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DormantCustomer {
    pub email: String,
    /// `last_order_date` rendered with the display format.
    pub last_order: String,
    pub last_order_date: NaiveDate,
}

fn display_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        // unusable layout
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Customers whose latest order is at least `dormant_days` before `today`.
///
/// Lines with an unparseable date are ignored, so a customer with no valid
/// date never shows up. The list is ordered by the *displayed* date read back
/// as a date; displays that do not read back sort last, in encounter order.
pub fn dormant_customers(
    rows: &[&OrderLine],
    today: NaiveDate,
    dormant_days: u64,
    display_format: &str,
) -> Vec<DormantCustomer> {
    let mut latest: IndexMap<&str, NaiveDate> = IndexMap::new();
    for line in rows {
        let Some(date) = line.order_date else {
            continue;
        };
        latest
            .entry(line.email.as_str())
            .and_modify(|last| {
                if date > *last {
                    *last = date;
                }
            })
            .or_insert(date);
    }

    let cutoff = today
        .checked_sub_days(Days::new(dormant_days))
        .unwrap_or(NaiveDate::MIN);

    let mut dormant: Vec<(Option<NaiveDate>, DormantCustomer)> = latest
        .into_iter()
        .filter(|(_, last)| *last <= cutoff)
        .map(|(email, last)| {
            let shown = display_date(last, display_format);
            let key = parse_order_date(&shown);
            (
                key,
                DormantCustomer {
                    email: email.to_string(),
                    last_order: shown,
                    last_order_date: last,
                },
            )
        })
        .collect();

    dormant.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    dormant.into_iter().map(|(_, c)| c).collect()
}
