use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::chart::ChartSpec;
use crate::data::filter::Choice;
use crate::data::loader::{self, DataSource};
use crate::data::model::PayloadRange;
use crate::state::{AppState, PAYLOAD_STEP};

/// Tick labels drawn under the payload slider.
const PAYLOAD_MARKS: [u32; 6] = [0, 2000, 4000, 6000, 8000, 10000];

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Hold our own handle so widgets can mutate `state` while iterating.
    let table = Arc::clone(&state.table);

    // ---- Launch site ----
    ui.strong("Launch Site");
    if let Some(site) = choice_combo(
        ui,
        "site-dropdown",
        "All Sites",
        table.sites(),
        &state.selection.site,
    ) {
        state.set_site(site);
    }
    ui.add_space(8.0);

    // ---- Payload range ----
    ui.strong("Payload range (Kg):");
    let bounds = state.payload_bounds();
    let mut low = state.selection.payload.low;
    let mut high = state.selection.payload.high;
    let low_changed = ui
        .add(
            egui::Slider::new(&mut low, bounds.low..=bounds.high)
                .step_by(PAYLOAD_STEP)
                .text("min"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut high, bounds.low..=bounds.high)
                .step_by(PAYLOAD_STEP)
                .text("max"),
        )
        .changed();
    if low_changed || high_changed {
        state.drag_payload_handle(low, high, low_changed);
    }
    payload_marks(ui, bounds);
    ui.add_space(8.0);

    // ---- Booster version ----
    ui.strong("Select Booster Version:");
    if let Some(booster) = choice_combo(
        ui,
        "booster-dropdown",
        "All Boosters",
        table.booster_categories(),
        &state.selection.booster,
    ) {
        state.set_booster(booster);
    }
}

/// Tick labels placed under the slider rail at their proportional offsets.
fn payload_marks(ui: &mut Ui, bounds: PayloadRange) {
    let width = ui.spacing().slider_width;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 14.0), egui::Sense::hover());
    let painter = ui.painter_at(rect.expand2(egui::vec2(16.0, 0.0)));
    let color = ui.visuals().weak_text_color();
    for (mark, fraction) in mark_positions(bounds) {
        painter.text(
            egui::pos2(rect.left() + fraction * width, rect.top()),
            egui::Align2::CENTER_TOP,
            mark.to_string(),
            egui::FontId::proportional(10.0),
            color,
        );
    }
}

/// Marks inside `bounds` with their position along the rail in `0.0..=1.0`.
fn mark_positions(bounds: PayloadRange) -> Vec<(u32, f32)> {
    let span = bounds.high - bounds.low;
    if span <= 0.0 {
        return Vec::new();
    }
    PAYLOAD_MARKS
        .iter()
        .filter(|&&m| bounds.contains(f64::from(m)))
        .map(|&m| (m, ((f64::from(m) - bounds.low) / span) as f32))
        .collect()
}

/// A dropdown with an "All …" entry followed by every value.
/// Returns the new choice when the user picked a different one.
fn choice_combo(
    ui: &mut Ui,
    id: &str,
    all_label: &str,
    values: &[String],
    current: &Choice,
) -> Option<Choice> {
    let selected_text = match current {
        Choice::All => all_label.to_string(),
        Choice::Only(v) => v.clone(),
    };

    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*current == Choice::All, all_label)
                .clicked()
            {
                picked = Some(Choice::All);
            }
            for value in values {
                let is_current = matches!(current, Choice::Only(v) if v == value);
                if ui.selectable_label(is_current, value.as_str()).clicked() {
                    picked = Some(Choice::only(value.clone()));
                }
            }
        });

    picked.filter(|choice| choice != current)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let shown = match state.scatter_chart() {
            Some(ChartSpec::Scatter(s)) => s.points.len(),
            _ => 0,
        };
        ui.label(format!(
            "{} launches loaded, {} shown",
            state.table.len(),
            shown
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match loader::load(&DataSource::Path(path)) {
            Ok(table) => state.set_table(Arc::new(table)),
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart specifications")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file();

    if let Some(path) = file {
        match write_charts(state, &path) {
            Ok(()) => {
                log::info!("Exported charts to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export charts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn write_charts(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let json = state.charts_json().context("serializing charts")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
