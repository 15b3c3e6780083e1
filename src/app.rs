use std::sync::Arc;

use eframe::egui;

use crate::data::model::LaunchTable;
use crate::state::AppState;
use crate::ui::{panels, plot};

pub const DASHBOARD_TITLE: &str = "SpaceX Launch Records Dashboard";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(table: Arc<LaunchTable>) -> Self {
        Self {
            state: AppState::new(table),
        }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(
                            egui::RichText::new(DASHBOARD_TITLE)
                                .size(32.0)
                                .color(egui::Color32::from_rgb(0x50, 0x3D, 0x36)),
                        );
                    });
                    ui.separator();
                    plot::pie_chart(ui, &self.state);
                    ui.separator();
                    plot::scatter_chart(ui, &self.state);
                });
        });
    }
}
