use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::report::kpi::Kpi;
use crate::report::{Report, ReportSettings};
use crate::state::{AppState, LoadStatus};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel – KPI cards, ranked tables and charts
// ---------------------------------------------------------------------------

/// Render the dashboard, or the load status while there is nothing to show.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    match &state.load_status {
        LoadStatus::Pending => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Loading data…");
            });
        }
        LoadStatus::Failed(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("Could not load orders.\n{msg}\n\nFile → Open CSV…"))
                        .color(Color32::RED)
                        .heading(),
                );
            });
        }
        LoadStatus::Ready => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| report_view(ui, &state.report, &state.settings));
        }
    }
}

fn report_view(ui: &mut Ui, report: &Report, settings: &ReportSettings) {
    let top_n = settings.top_n;
    kpi_cards(ui, &report.kpi);
    ui.add_space(12.0);

    ui.columns(2, |cols: &mut [Ui]| {
        section(&mut cols[0], &ranked_title("products", top_n), |ui| {
            ranked_table(
                ui,
                "top_products",
                ["Product", "Quantity"],
                report
                    .top_products
                    .iter()
                    .map(|p| (p.name.clone(), format_quantity(p.quantity))),
            );
        });
        section(&mut cols[1], &ranked_title("customers", top_n), |ui| {
            ranked_table(
                ui,
                "top_customers",
                ["Customer (email)", "Revenue (€)"],
                report
                    .top_customers
                    .iter()
                    .map(|c| (c.email.clone(), format!("{:.2}", c.total))),
            );
        });

        section(&mut cols[0], &format!("Dormant customers (≥ {} days)", settings.dormant_days), |ui| {
            ranked_table(
                ui,
                "dormant_customers",
                ["Customer (email)", "Last order"],
                report
                    .dormant_customers
                    .iter()
                    .map(|d| (d.email.clone(), d.last_order.clone())),
            );
        });
        section(&mut cols[1], "Best weekdays", |ui| {
            plot::weekday_chart(ui, &report.weekday_totals);
        });

        section(&mut cols[0], &format!("Frequent product pairs (top {top_n})"), |ui| {
            ranked_table(
                ui,
                "product_pairs",
                ["Pair", "Orders"],
                report
                    .product_pairs
                    .iter()
                    .map(|p| (p.pair.clone(), p.count.to_string())),
            );
        });
        section(&mut cols[1], "E-liquid sales by brand", |ui| {
            plot::brand_chart(ui, &report.brand_quantities);
        });
    });
}

fn kpi_cards(ui: &mut Ui, kpi: &Kpi) {
    ui.columns(4, |cols: &mut [Ui]| {
        stat_card(&mut cols[0], "Revenue (filtered)", format!("{:.2} €", kpi.total_sales));
        stat_card(&mut cols[1], "Orders", kpi.total_orders.to_string());
        stat_card(&mut cols[2], "Average basket", format!("{:.2} €", kpi.average_order_value));
        stat_card(
            &mut cols[3],
            "Repeat rate",
            format!("{:.0}%", (kpi.repeat_rate * 100.0).round()),
        );
    });
}

fn stat_card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(label).weak());
            ui.heading(value);
        });
    });
}

fn section(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.strong(title);
        ui.separator();
        body(ui);
    });
    ui.add_space(8.0);
}

/// Two-column striped table in its own scroll area.
fn ranked_table(
    ui: &mut Ui,
    id: &str,
    headers: [&str; 2],
    rows: impl Iterator<Item = (String, String)>,
) {
    ScrollArea::vertical()
        .id_salt(id)
        .max_height(280.0)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new(id)
                .striped(true)
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    ui.strong(headers[0]);
                    ui.strong(headers[1]);
                    ui.end_row();
                    for (left, right) in rows {
                        ui.label(left);
                        ui.label(right);
                        ui.end_row();
                    }
                });
        });
}

/// Heading of a list cut at `n` entries, e.g. `"Top 20 products"`.
fn ranked_title(label: &str, n: usize) -> String {
    format!("Top {n} {label}")
}

/// Whole quantities without decimals, fractional ones with two.
pub fn format_quantity(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{q:.0}")
    } else {
        format!("{q:.2}")
    }
}
