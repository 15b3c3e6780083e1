use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::bindings::{Dispatcher, OutputId, WidgetId, BINDINGS};
use crate::chart::ChartSpec;
use crate::color::ColorMap;
use crate::data::filter::{Choice, FilterSelection};
use crate::data::model::{LaunchTable, PayloadRange};

/// Slider step in kilograms.
pub const PAYLOAD_STEP: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded launch table, shared read-only.
    pub table: Arc<LaunchTable>,

    /// Current widget values.
    pub selection: FilterSelection,

    /// Runs the chart bindings and holds the latest specs.
    pub dispatcher: Dispatcher,

    /// Site colours for the pie chart.
    pub site_colors: ColorMap,

    /// Booster category colours for the scatter chart.
    pub booster_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Arc<LaunchTable>) -> Self {
        let selection = FilterSelection::everything(&table);
        let mut state = Self {
            site_colors: ColorMap::new(table.sites()),
            booster_colors: ColorMap::new(table.booster_categories()),
            table,
            selection,
            dispatcher: Dispatcher::default(),
            status_message: None,
        };
        state.dispatcher.render_all(&state.table, &state.selection);
        state
    }

    /// Swap in a newly loaded table, reset the widgets and redraw everything.
    pub fn set_table(&mut self, table: Arc<LaunchTable>) {
        self.dispatcher.clear();
        self.selection = FilterSelection::everything(&table);
        self.site_colors = ColorMap::new(table.sites());
        self.booster_colors = ColorMap::new(table.booster_categories());
        self.table = table;
        self.status_message = None;
        self.dispatcher.render_all(&self.table, &self.selection);
    }

    pub fn pie_chart(&self) -> Option<&ChartSpec> {
        self.dispatcher.output(OutputId::SuccessPieChart)
    }

    pub fn scatter_chart(&self) -> Option<&ChartSpec> {
        self.dispatcher.output(OutputId::SuccessPayloadScatterChart)
    }

    /// Slider bounds: the table's payload range, `[0, 0]` when empty.
    pub fn payload_bounds(&self) -> PayloadRange {
        self.table
            .payload_bounds()
            .unwrap_or(PayloadRange::new(0.0, 0.0))
    }

    pub fn set_site(&mut self, site: Choice) {
        self.selection.site = site;
        self.changed(WidgetId::SiteDropdown);
    }

    pub fn set_booster(&mut self, booster: Choice) {
        self.selection.booster = booster;
        self.changed(WidgetId::BoosterDropdown);
    }

    pub fn set_payload_range(&mut self, payload: PayloadRange) {
        self.selection.payload = payload;
        self.changed(WidgetId::PayloadSlider);
    }

    /// Move one end of the payload slider; the other end is pushed so that
    /// `low <= high` always holds.
    pub fn drag_payload_handle(&mut self, low: f64, high: f64, moved_low: bool) {
        let range = if moved_low {
            PayloadRange::new(low, high.max(low))
        } else {
            PayloadRange::new(low.min(high), high)
        };
        if range != self.selection.payload {
            self.set_payload_range(range);
        }
    }

    /// The current widget values and every rendered chart as pretty JSON.
    pub fn charts_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Export<'a> {
            selection: &'a FilterSelection,
            charts: BTreeMap<&'static str, &'a ChartSpec>,
        }

        let charts = BINDINGS
            .iter()
            .filter_map(|b| Some((b.output.name(), self.dispatcher.output(b.output)?)))
            .collect();
        serde_json::to_string_pretty(&Export {
            selection: &self.selection,
            charts,
        })
    }

    fn changed(&mut self, widget: WidgetId) {
        self.dispatcher
            .dispatch(&self.table, widget, &self.selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn state() -> AppState {
        AppState::new(Arc::new(LaunchTable::from_records(vec![
            record("A", 500.0, "v1", 1),
            record("A", 1500.0, "v1", 0),
            record("B", 3000.0, "v2", 1),
            record("B", 7000.0, "v2", 0),
        ])))
    }

    #[test]
    fn starts_with_everything_selected() {
        let state = state();
        assert_eq!(state.selection.site, Choice::All);
        assert_eq!(state.selection.booster, Choice::All);
        assert_eq!(state.selection.payload, PayloadRange::new(500.0, 7000.0));
        assert!(state.pie_chart().is_some());
        assert!(state.scatter_chart().is_some());
    }

    #[test]
    fn setters_redraw_the_bound_charts() {
        let mut state = state();
        state.set_site(Choice::only("A"));
        assert_eq!(
            state.pie_chart().map(|c| c.title().to_string()),
            Some("Success vs Failure for A".to_string())
        );

        state.set_payload_range(PayloadRange::new(1000.0, 2000.0));
        match state.scatter_chart() {
            Some(ChartSpec::Scatter(s)) => assert_eq!(s.points.len(), 1),
            other => panic!("unexpected scatter {other:?}"),
        }
    }

    #[test]
    fn slider_handles_never_cross() {
        let mut state = state();
        state.drag_payload_handle(8000.0, 7000.0, true);
        assert_eq!(state.selection.payload, PayloadRange::new(8000.0, 8000.0));

        state.drag_payload_handle(8000.0, 2000.0, false);
        assert_eq!(state.selection.payload, PayloadRange::new(2000.0, 2000.0));
    }

    #[test]
    fn export_contains_both_charts() {
        let mut state = state();
        state.set_booster(Choice::only("v2"));
        let json: serde_json::Value = serde_json::from_str(&state.charts_json().unwrap()).unwrap();

        assert_eq!(json["selection"]["booster"]["Only"], "v2");
        assert_eq!(json["charts"]["success-pie-chart"]["kind"], "pie");
        let points = json["charts"]["success-payload-scatter-chart"]["points"]
            .as_array()
            .unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn reloading_a_table_replaces_cached_charts() {
        let mut state = state();
        state.status_message = Some("Error: stale".to_string());

        // Same payload bounds, so every widget value stays identical.
        state.set_table(Arc::new(LaunchTable::from_records(vec![
            record("C", 500.0, "v3", 1),
            record("C", 7000.0, "v3", 1),
        ])));

        match state.pie_chart() {
            Some(ChartSpec::Pie(p)) => {
                assert_eq!(p.value_of("C"), Some(2.0));
                assert_eq!(p.value_of("A"), None);
            }
            other => panic!("unexpected pie {other:?}"),
        }
        match state.scatter_chart() {
            Some(ChartSpec::Scatter(s)) => assert_eq!(s.categories(), vec!["v3"]),
            other => panic!("unexpected scatter {other:?}"),
        }
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn empty_table_renders_empty_charts() {
        let state = AppState::new(Arc::new(LaunchTable::default()));
        assert_eq!(state.payload_bounds(), PayloadRange::new(0.0, 0.0));
        assert!(state.pie_chart().is_some_and(|c| c.is_empty()));
        assert!(state.scatter_chart().is_some_and(|c| c.is_empty()));
    }
}
