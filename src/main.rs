use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use eframe::egui;

use launch_dash::app::{LaunchDashApp, DASHBOARD_TITLE};
use launch_dash::config::Cli;
use launch_dash::data::loader;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let source = cli.data_source();

    // The dashboard is useless without data: no window unless the load succeeds.
    let table = match loader::load(&source) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            let e = anyhow::Error::new(e);
            log::error!("Failed to load launch records from {source}: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        DASHBOARD_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(table)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI error: {e}");
            ExitCode::FAILURE
        }
    }
}
