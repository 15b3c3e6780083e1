//! egui rendering: filter panel, top bar and the two charts.

pub mod panels;
pub mod plot;
