use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::data::model::OrderLine;

use super::group_orders;

/// How many orders contained both items of `pair` (`"A | B"`, `A < B`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCount {
    pub pair: String,
    pub count: usize,
}

/// Most frequent co-purchased item pairs.
///
/// Each order contributes at most once per pair, whatever the quantities or
/// repeated lines.
pub fn top_pairs(rows: &[&OrderLine], limit: usize) -> Vec<PairCount> {
    let mut counter: IndexMap<String, usize> = IndexMap::new();

    for lines in group_orders(rows).values() {
        let items: Vec<&str> = lines
            .iter()
            .map(|l| l.item_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for (i, first) in items.iter().enumerate() {
            for second in &items[i + 1..] {
                *counter.entry(format!("{first} | {second}")).or_default() += 1;
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counter.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
        .into_iter()
        .map(|(pair, count)| PairCount { pair, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::line;

    #[test]
    fn counts_each_pair_once_per_order() {
        let lines = vec![
            line("1", "a@x", "1", "2024-01-01", "Pod", "1"),
            line("1", "a@x", "1", "2024-01-01", "Coil", "1"),
            line("1", "a@x", "1", "2024-01-01", "Pod", "3"),
            line("2", "b@x", "1", "2024-01-02", "Coil", "1"),
            line("2", "b@x", "1", "2024-01-02", "Pod", "1"),
            line("2", "b@x", "1", "2024-01-02", "Tank", "1"),
        ];
        let rows: Vec<&OrderLine> = lines.iter().collect();
        let pairs = top_pairs(&rows, 20);

        assert_eq!(pairs[0], PairCount { pair: "Coil | Pod".into(), count: 2 });
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.pair != "Pod | Coil"));
        assert!(pairs.iter().any(|p| p.pair == "Pod | Tank" && p.count == 1));
    }

    #[test]
    fn single_item_orders_produce_nothing() {
        let lines = vec![
            line("1", "a@x", "1", "2024-01-01", "Pod", "1"),
            line("2", "a@x", "1", "2024-01-01", "Pod", "2"),
        ];
        let rows: Vec<&OrderLine> = lines.iter().collect();
        assert!(top_pairs(&rows, 20).is_empty());
    }

    #[test]
    fn keeps_the_top_n_sorted() {
        let names: Vec<String> = (0..10).map(|i| format!("Item {i}")).collect();
        let lines: Vec<OrderLine> = names
            .iter()
            .map(|n| line("1", "a@x", "1", "2024-01-01", n, "1"))
            .collect();
        let rows: Vec<&OrderLine> = lines.iter().collect();
        // 10 items make 45 pairs in one order
        let pairs = top_pairs(&rows, 20);
        assert_eq!(pairs.len(), 20);
        assert!(pairs.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(pairs[0].pair, "Item 0 | Item 1");
    }

    #[test]
    fn ties_follow_ascending_order_numbers() {
        // newest order first, as in a store export
        let lines = vec![
            line("10002", "new@x", "10", "2024-01-02", "C", "1"),
            line("10002", "new@x", "10", "2024-01-02", "D", "1"),
            line("10001", "old@x", "10", "2024-01-01", "A", "1"),
            line("10001", "old@x", "10", "2024-01-01", "B", "1"),
        ];
        let rows: Vec<&OrderLine> = lines.iter().collect();
        let pairs = top_pairs(&rows, 1);
        assert_eq!(pairs, vec![PairCount { pair: "A | B".into(), count: 1 }]);
    }
}
