use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Bar colour for a chart ranking: the leader is highlighted, the rest
/// fade with rank.
pub fn rank_color(rank: usize) -> Color32 {
    match rank {
        0 => Color32::from_rgb(79, 70, 229),
        1 | 2 => Color32::from_rgb(129, 140, 248),
        _ => Color32::from_rgb(199, 210, 254),
    }
}
