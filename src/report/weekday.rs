use chrono::Datelike;
use serde::Serialize;

use crate::data::model::OrderLine;

use super::order_heads;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayTotal {
    pub day: &'static str,
    pub total: f64,
}

/// Order revenue bucketed by the weekday of the order date.
///
/// Always seven entries, best day first; equal totals stay in Monday..Sunday
/// order. Orders with an unparseable date are left out.
pub fn weekday_totals(rows: &[&OrderLine]) -> Vec<WeekdayTotal> {
    let mut totals = [0.0_f64; 7];
    for order in order_heads(rows) {
        if let Some(date) = order.order_date {
            totals[date.weekday().num_days_from_monday() as usize] += order.order_total;
        }
    }

    let mut out: Vec<WeekdayTotal> = WEEKDAYS
        .iter()
        .zip(totals)
        .map(|(&day, total)| WeekdayTotal { day, total })
        .collect();
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}
