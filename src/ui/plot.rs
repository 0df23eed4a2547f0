use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{generate_palette, rank_color};
use crate::report::brands::BrandQuantity;
use crate::report::weekday::WeekdayTotal;

/// Bars shown per chart.
const BEST_DAYS: usize = 3;
const TOP_BRANDS: usize = 10;

// ---------------------------------------------------------------------------
// Bar charts (central panel)
// ---------------------------------------------------------------------------

/// Best weekdays by revenue; one named chart per bar so the legend
/// carries the day names.
pub fn weekday_chart(ui: &mut Ui, totals: &[WeekdayTotal]) {
    Plot::new("weekday_chart")
        .height(240.0)
        .legend(Legend::default())
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_x(false)
        .y_axis_label("Revenue")
        .show(ui, |plot_ui| {
            for (i, day) in totals.iter().take(BEST_DAYS).enumerate() {
                let chart = BarChart::new(vec![Bar::new(i as f64, day.total).width(0.7)])
                    .name(day.day)
                    .color(rank_color(i));
                plot_ui.bar_chart(chart);
            }
        });
}

/// Quantity per brand for the leading brands.
pub fn brand_chart(ui: &mut Ui, brands: &[BrandQuantity]) {
    let shown = &brands[..brands.len().min(TOP_BRANDS)];
    let colors = generate_palette(shown.len());

    Plot::new("brand_chart")
        .height(240.0)
        .legend(Legend::default())
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_x(false)
        .y_axis_label("Quantity")
        .show(ui, |plot_ui| {
            for (i, (brand, color)) in shown.iter().zip(colors).enumerate() {
                let chart = BarChart::new(vec![Bar::new(i as f64, brand.quantity).width(0.7)])
                    .name(&brand.brand)
                    .color(color);
                plot_ui.bar_chart(chart);
            }
        });
}
