use chrono::{Local, NaiveDate};

use crate::config::DashboardConfig;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::{parse_order_date, OrderDataset, OrderLine};
use crate::report::{Report, ReportSettings};

// ---------------------------------------------------------------------------
// Load status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Nothing read yet.
    Pending,
    Ready,
    /// Reading or parsing the export failed; the message is shown as-is.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The whole session, independent of rendering.
///
/// The dataset is only ever replaced, never edited. Every update entry point
/// recomputes `visible_indices` and `report` in full.
pub struct AppState {
    pub config: DashboardConfig,
    pub settings: ReportSettings,

    /// Loaded export (None until a file has been read).
    pub dataset: Option<OrderDataset>,
    pub load_status: LoadStatus,

    pub filters: FilterCriteria,
    /// Text of the date inputs; parsed into `filters` when valid.
    pub date_from_text: String,
    pub date_to_text: String,

    /// Indices of lines passing the current filters (cached).
    pub visible_indices: Vec<usize>,
    /// Aggregations over the visible lines.
    pub report: Report,

    /// Status / error message of the last user action.
    pub status_message: Option<String>,

    /// Reference day for the dormant cutoff; `None` means the local date.
    pub today_override: Option<NaiveDate>,
}

impl AppState {
    pub fn new(config: DashboardConfig, settings: ReportSettings) -> Self {
        Self {
            config,
            settings,
            dataset: None,
            load_status: LoadStatus::Pending,
            filters: FilterCriteria::default(),
            date_from_text: String::new(),
            date_to_text: String::new(),
            visible_indices: Vec::new(),
            report: Report::default(),
            status_message: None,
            today_override: None,
        }
    }

    fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Ingest a newly loaded dataset. Filters are kept.
    pub fn set_dataset(&mut self, dataset: OrderDataset) {
        self.dataset = Some(dataset);
        self.load_status = LoadStatus::Ready;
        self.status_message = None;
        self.refilter();
    }

    /// Record a failed load. A previously loaded dataset stays visible.
    pub fn set_load_error(&mut self, message: String) {
        if self.dataset.is_none() {
            self.load_status = LoadStatus::Failed(message.clone());
        }
        self.status_message = Some(message);
    }

    /// Recompute `visible_indices` and the report after any change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.filters);
        let rows: Vec<&OrderLine> = self.visible_indices.iter().map(|&i| &ds.lines[i]).collect();
        self.report = Report::compute(&rows, self.today(), &self.settings);
        log::debug!(
            "Filter {:?} keeps {} of {} lines ({} orders)",
            self.filters,
            self.visible_indices.len(),
            ds.len(),
            self.report.kpi.total_orders
        );
    }

    pub fn set_search(&mut self, search: &str) {
        if self.filters.search != search {
            self.filters.search = search.to_string();
            self.refilter();
        }
    }

    /// Update the lower bound from user text. Text that is not a date
    /// clears the bound, like an empty date input.
    pub fn set_date_from(&mut self, text: &str) {
        self.date_from_text = text.to_string();
        let parsed = parse_order_date(text);
        if self.filters.date_from != parsed {
            self.filters.date_from = parsed;
            self.refilter();
        }
    }

    /// Update the upper bound from user text; see [`Self::set_date_from`].
    pub fn set_date_to(&mut self, text: &str) {
        self.date_to_text = text.to_string();
        let parsed = parse_order_date(text);
        if self.filters.date_to != parsed {
            self.filters.date_to = parsed;
            self.refilter();
        }
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterCriteria::default();
        self.date_from_text.clear();
        self.date_to_text.clear();
        self.refilter();
    }
}
