use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::PaymentMethod;

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
            // offset so cash starts on blue rather than red
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.6, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Segment colours: payment method → Color32
// ---------------------------------------------------------------------------

/// One fill colour per payment-method segment, in [`PaymentMethod::ALL`] order.
#[derive(Debug, Clone)]
pub struct PaymentColors {
    colors: Vec<Color32>,
}

impl Default for PaymentColors {
    fn default() -> Self {
        Self {
            colors: generate_palette(PaymentMethod::ALL.len()),
        }
    }
}

impl PaymentColors {
    pub fn color_for(&self, method: PaymentMethod) -> Color32 {
        self.colors
            .get(method.index())
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}
