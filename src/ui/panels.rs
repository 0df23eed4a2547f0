use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader;
use crate::state::{AppState, LoadStatus};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No orders loaded.");
        return;
    }

    ui.strong("Search");
    let mut search = state.filters.search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("email, product, brand…")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.set_search(&search);
    }

    ui.add_space(8.0);
    ui.strong("From");
    let mut from = state.date_from_text.clone();
    if date_input(ui, &mut from, state.filters.date_from.is_some()) {
        state.set_date_from(&from);
    }

    ui.strong("To");
    let mut to = state.date_to_text.clone();
    if date_input(ui, &mut to, state.filters.date_to.is_some()) {
        state.set_date_to(&to);
    }

    ui.add_space(8.0);
    let active = !state.filters.is_empty()
        || !state.date_from_text.is_empty()
        || !state.date_to_text.is_empty();
    if ui.add_enabled(active, egui::Button::new("Reset")).clicked() {
        state.reset_filters();
    }
}

/// Single-line date field; flags text that is not read as a date.
/// Returns whether the text changed.
fn date_input(ui: &mut Ui, text: &mut String, parsed: bool) -> bool {
    let changed = ui
        .add(
            egui::TextEdit::singleline(text)
                .hint_text("YYYY-MM-DD")
                .desired_width(f32::INFINITY),
        )
        .changed();
    if !text.is_empty() && !parsed {
        ui.label(RichText::new("not a date, ignored").small().color(Color32::RED));
    }
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let ready = state.load_status == LoadStatus::Ready;
            if ui
                .add_enabled(ready, egui::Button::new("Export report…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} lines loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Loading / exporting
// ---------------------------------------------------------------------------

/// Read an export into the state, recording failures instead of raising them.
pub fn load_path(state: &mut AppState, path: &Path) {
    let delimiter = match state.config.delimiter_byte() {
        Ok(d) => d,
        Err(e) => {
            log::error!("{e}");
            state.set_load_error(format!("Error: {e}"));
            return;
        }
    };
    match loader::load_file(path, &state.config.columns, delimiter) {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            state.set_load_error(format!("Error: {e}"));
        }
    }
}

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open order export")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_path(state, &path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export report")
        .add_filter("JSON", &["json"])
        .set_file_name("report.json")
        .save_file();

    if let Some(path) = file {
        match state.report.export_json(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
