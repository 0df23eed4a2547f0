use indexmap::IndexMap;
use serde::Serialize;

use crate::data::model::OrderLine;

use super::order_heads;

/// Headline figures over the filtered orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpi {
    pub total_sales: f64,
    pub total_orders: usize,
    pub average_order_value: f64,
    /// Customers with more than one order divided by the order count, in `[0, 1]`.
    pub repeat_rate: f64,
}

pub fn compute_kpi(rows: &[&OrderLine]) -> Kpi {
    let heads = order_heads(rows);
    let total_orders = heads.len();
    if total_orders == 0 {
        return Kpi::default();
    }

    let total_sales: f64 = heads.iter().map(|o| o.order_total).sum();

    let mut orders_per_email: IndexMap<&str, usize> = IndexMap::new();
    for o in &heads {
        *orders_per_email.entry(o.email.as_str()).or_default() += 1;
    }
    let repeat_customers = orders_per_email.values().filter(|&&n| n > 1).count();

    Kpi {
        total_sales,
        total_orders,
        average_order_value: total_sales / total_orders as f64,
        repeat_rate: repeat_customers as f64 / total_orders as f64,
    }
}
