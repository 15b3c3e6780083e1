use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Outcome;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colours for the success/failure split.
pub fn outcome_color(outcome: Outcome) -> Color32 {
    match outcome {
        Outcome::Success => Color32::from_rgb(72, 168, 96),
        Outcome::Failure => Color32::from_rgb(214, 82, 72),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to distinct colours.
///
/// Built from the full table, not the filtered rows, so a category keeps its
/// colour while the filters change.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<S: AsRef<str>>(categories: &[S]) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories
            .iter()
            .zip(palette)
            .map(|(c, color)| (c.as_ref().to_string(), color))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a category; unknown values are grey.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    /// Pie slice colour: outcome labels get their fixed colours, sites use the map.
    pub fn slice_color(&self, label: &str) -> Color32 {
        match label {
            "Success" => outcome_color(Outcome::Success),
            "Failure" => outcome_color(Outcome::Failure),
            other => self.color_for(other),
        }
    }
}
