use chrono::NaiveDate;

use super::model::{OrderDataset, OrderLine};

// ---------------------------------------------------------------------------
// Filter criteria: free-text query + inclusive date range
// ---------------------------------------------------------------------------

/// What the user typed in the filter panel.
/// Empty query and absent bounds mean "no filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub search: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.date_from.is_none() && self.date_to.is_none()
    }
}

/// Whether a single line passes all criteria.
///
/// A line with an unparseable date fails any bound that is set.
/// `needle` is the lowercased query.
fn line_passes(line: &OrderLine, needle: &str, criteria: &FilterCriteria) -> bool {
    let search_ok = needle.is_empty() || line.matches_lowercase(needle);

    let from_ok = match criteria.date_from {
        None => true,
        Some(from) => line.order_date.is_some_and(|d| d >= from),
    };
    let to_ok = match criteria.date_to {
        None => true,
        Some(to) => line.order_date.is_some_and(|d| d <= to),
    };

    search_ok && from_ok && to_ok
}

/// Return indices of lines that pass the criteria, in file order.
pub fn filtered_indices(dataset: &OrderDataset, criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.search.to_lowercase();
    dataset
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line_passes(line, &needle, criteria))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::line;

    fn dataset() -> OrderDataset {
        OrderDataset::new(
            vec![
                line("1", "alice@x.fr", "10", "2024-01-01 09:00:00", "Pod X", "1"),
                line("2", "bob@x.fr", "20", "2024-01-15 23:59:00", "E-liquide Acme Mint", "1"),
                line("3", "carol@x.fr", "30", "not a date", "Pod X", "1"),
                line("4", "alice@x.fr", "40", "2024-02-01", "Coil Z", "2"),
            ],
            Vec::new(),
        )
    }

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    #[test]
    fn empty_criteria_keeps_everything() {
        let ds = dataset();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1, 2, 3]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            search: "ALICE".into(),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 3]);

        let criteria = FilterCriteria {
            search: "acme".into(),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![1]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            date_from: d(2024, 1, 1),
            date_to: d(2024, 1, 15),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1]);
    }

    #[test]
    fn invalid_dates_fail_any_bound() {
        let ds = dataset();
        let only_from = FilterCriteria {
            date_from: d(2000, 1, 1),
            ..Default::default()
        };
        assert!(!filtered_indices(&ds, &only_from).contains(&2));

        let only_to = FilterCriteria {
            date_to: d(2100, 1, 1),
            ..Default::default()
        };
        assert!(!filtered_indices(&ds, &only_to).contains(&2));

        // no bound at all: the line is kept
        assert!(filtered_indices(&ds, &FilterCriteria::default()).contains(&2));
    }

    #[test]
    fn result_is_an_ordered_subset() {
        let ds = dataset();
        let criteria = FilterCriteria {
            search: "x.fr".into(),
            date_from: d(2024, 1, 10),
            date_to: None,
        };
        let idx = filtered_indices(&ds, &criteria);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        assert!(idx.iter().all(|&i| i < ds.len()));
        assert_eq!(idx, vec![1, 3]);
    }
}
