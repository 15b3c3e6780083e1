use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Pos2, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::chart::{ChartSpec, PieSpec, ScatterPoint, ScatterSpec};
use crate::color::ColorMap;
use crate::data::model::Outcome;
use crate::state::AppState;

const PIE_RADIUS: f32 = 140.0;
const SCATTER_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Render the success pie (`success-pie-chart`).
pub fn pie_chart(ui: &mut Ui, state: &AppState) {
    let Some(ChartSpec::Pie(spec)) = state.pie_chart() else {
        return;
    };

    ui.heading(&spec.title);
    if spec.slices.is_empty() {
        ui.label("No launches match the current selection.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        draw_pie(ui, spec, &state.site_colors);
        ui.add_space(16.0);
        ui.vertical(|ui: &mut Ui| {
            let total = spec.total();
            for slice in &spec.slices {
                ui.horizontal(|ui: &mut Ui| {
                    let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter()
                        .rect_filled(rect, 2.0, state.site_colors.slice_color(&slice.label));
                    ui.label(format!(
                        "{}  {}  ({:.1}%)",
                        slice.label,
                        slice.value,
                        100.0 * slice.value / total
                    ));
                });
            }
        });
    });
}

fn draw_pie(ui: &mut Ui, spec: &PieSpec, colors: &ColorMap) {
    let size = Vec2::splat(PIE_RADIUS * 2.0 + 8.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let center = response.rect.center();
    let total = spec.total();
    let separator = Stroke::new(1.5, ui.visuals().panel_fill);

    // Angles run clockwise starting at 12 o'clock.
    let mut start = -FRAC_PI_2;
    for slice in &spec.slices {
        let sweep = (slice.value / total) as f32 * TAU;
        fill_sector(&painter, center, start, start + sweep, colors.slice_color(&slice.label));
        start += sweep;
    }
    if spec.slices.len() > 1 {
        let mut angle = -FRAC_PI_2;
        for slice in &spec.slices {
            painter.line_segment([center, center + PIE_RADIUS * Vec2::angled(angle)], separator);
            angle += (slice.value / total) as f32 * TAU;
        }
    }

    if let Some(pos) = response.hover_pos() {
        let offset = pos - center;
        if offset.length() <= PIE_RADIUS {
            let fractions: Vec<f64> = spec.slices.iter().map(|s| s.value / total).collect();
            if let Some(idx) = slice_at(offset, &fractions) {
                let slice = &spec.slices[idx];
                response.on_hover_text_at_pointer(format!("{}: {}", slice.label, slice.value));
            }
        }
    }
}

/// Fill a circular sector as a fan of convex wedges of at most a quarter turn.
fn fill_sector(painter: &egui::Painter, center: Pos2, from: f32, to: f32, color: Color32) {
    let mut a0 = from;
    while a0 < to {
        let a1 = (a0 + FRAC_PI_2).min(to);
        let steps = (((a1 - a0) / TAU) * 96.0).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for i in 0..=steps {
            let a = a0 + (a1 - a0) * i as f32 / steps as f32;
            points.push(center + PIE_RADIUS * Vec2::angled(a));
        }
        painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        a0 = a1;
    }
}

/// Index of the slice under `offset` (relative to the pie centre).
fn slice_at(offset: Vec2, fractions: &[f64]) -> Option<usize> {
    // Clockwise angle from 12 o'clock, in turns.
    let turns = ((offset.angle() + FRAC_PI_2).rem_euclid(TAU) / TAU) as f64;
    let mut acc = 0.0;
    for (i, f) in fractions.iter().enumerate() {
        acc += f;
        if turns < acc {
            return Some(i);
        }
    }
    fractions.len().checked_sub(1)
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

/// Render payload vs outcome (`success-payload-scatter-chart`).
pub fn scatter_chart(ui: &mut Ui, state: &AppState) {
    let Some(ChartSpec::Scatter(spec)) = state.scatter_chart() else {
        return;
    };

    ui.heading(&spec.title);
    if spec.points.is_empty() {
        ui.label("No launches match the current selection.");
    }

    Plot::new("success-payload-scatter-chart")
        .height(SCATTER_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .y_axis_formatter(|mark, _range| outcome_tick(mark.value))
        .include_y(-0.5)
        .include_y(1.5)
        .include_x(0.0)
        .label_formatter({
            let points = spec.points.clone();
            move |name, value| hover_text(&points, name, value.x, value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for category in spec.categories() {
                let points: PlotPoints = category_points(spec, category).into();
                plot_ui.points(
                    Points::new(points)
                        .name(category)
                        .color(state.booster_colors.color_for(category))
                        .radius(4.0),
                );
            }
        });
}

fn category_points(spec: &ScatterSpec, category: &str) -> Vec<[f64; 2]> {
    spec.points
        .iter()
        .filter(|p| p.category == category)
        .map(|p| [p.payload_mass_kg, p.outcome.axis_value()])
        .collect()
}

/// The point nearest to the cursor within `category` on the hovered outcome row.
fn hovered_point<'a>(
    points: &'a [ScatterPoint],
    category: &str,
    x: f64,
    y: f64,
) -> Option<&'a ScatterPoint> {
    let row = y.round();
    points
        .iter()
        .filter(|p| p.category == category && p.outcome.axis_value() == row)
        .min_by(|a, b| {
            (a.payload_mass_kg - x)
                .abs()
                .total_cmp(&(b.payload_mass_kg - x).abs())
        })
}

fn hover_text(points: &[ScatterPoint], name: &str, x: f64, y: f64) -> String {
    if name.is_empty() {
        return format!("{x:.0} kg");
    }
    let Some(point) = hovered_point(points, name, x, y) else {
        return format!("{name}\n{x:.0} kg\n{}", outcome_tick(y.round()));
    };

    let mut text = String::new();
    if let Some(flight) = point.flight_number {
        text.push_str(&format!("Flight {flight}\n"));
    }
    match &point.booster_version {
        Some(version) => text.push_str(&format!("{version} ({name})\n")),
        None => text.push_str(&format!("{name}\n")),
    }
    text.push_str(&format!("{:.0} kg\n{}", point.payload_mass_kg, point.outcome));
    text
}

/// The y axis is categorical: only the two outcome positions get a label.
fn outcome_tick(y: f64) -> String {
    if y == Outcome::Success.axis_value() {
        Outcome::Success.to_string()
    } else if y == Outcome::Failure.axis_value() {
        Outcome::Failure.to_string()
    } else {
        String::new()
    }
}
