//! Widget-change → chart wiring.
//!
//! Every chart on the dashboard is produced by a [`Binding`]: a pure handler
//! plus the list of widgets it reads. [`Dispatcher`] looks up the bindings an
//! event touches, runs them, and keeps the last rendered spec per output so an
//! unchanged input set does not trigger a redraw.

use std::collections::BTreeMap;

use crate::chart::{build_pie_chart, build_scatter_chart, ChartSpec, PieMode};
use crate::data::filter::{filter_for_scatter, pie_source, Choice, FilterSelection};
use crate::data::model::{LaunchTable, PayloadRange};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetId {
    SiteDropdown,
    PayloadSlider,
    BoosterDropdown,
}

impl WidgetId {
    pub fn name(self) -> &'static str {
        match self {
            WidgetId::SiteDropdown => "site-dropdown",
            WidgetId::PayloadSlider => "payload-slider",
            WidgetId::BoosterDropdown => "booster-dropdown",
        }
    }

    fn value(self, state: &FilterSelection) -> InputValue {
        match self {
            WidgetId::SiteDropdown => InputValue::Choice(state.site.clone()),
            WidgetId::PayloadSlider => InputValue::Range(state.payload),
            WidgetId::BoosterDropdown => InputValue::Choice(state.booster.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputId {
    SuccessPieChart,
    SuccessPayloadScatterChart,
}

impl OutputId {
    pub fn name(self) -> &'static str {
        match self {
            OutputId::SuccessPieChart => "success-pie-chart",
            OutputId::SuccessPayloadScatterChart => "success-payload-scatter-chart",
        }
    }
}

/// A snapshot of one widget's value, used as a cache key.
#[derive(Debug, Clone, PartialEq)]
enum InputValue {
    Choice(Choice),
    Range(PayloadRange),
}

// ---------------------------------------------------------------------------
// Binding table
// ---------------------------------------------------------------------------

pub type Handler = fn(&LaunchTable, &FilterSelection) -> ChartSpec;

pub struct Binding {
    pub output: OutputId,
    pub inputs: &'static [WidgetId],
    pub handler: Handler,
}

pub const BINDINGS: &[Binding] = &[
    Binding {
        output: OutputId::SuccessPieChart,
        inputs: &[WidgetId::SiteDropdown],
        handler: update_pie_chart,
    },
    Binding {
        output: OutputId::SuccessPayloadScatterChart,
        inputs: &[
            WidgetId::SiteDropdown,
            WidgetId::PayloadSlider,
            WidgetId::BoosterDropdown,
        ],
        handler: update_scatter_chart,
    },
];

pub fn update_pie_chart(table: &LaunchTable, state: &FilterSelection) -> ChartSpec {
    let rows = pie_source(table, &state.site);
    let mode = match &state.site {
        Choice::All => PieMode::Aggregate,
        Choice::Only(site) => PieMode::Site(site.clone()),
    };
    build_pie_chart(&rows, &mode)
}

pub fn update_scatter_chart(table: &LaunchTable, state: &FilterSelection) -> ChartSpec {
    build_scatter_chart(&filter_for_scatter(table, state))
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

struct CachedRender {
    inputs: Vec<InputValue>,
    spec: ChartSpec,
}

/// Runs bindings in response to widget events and holds the latest spec per output.
#[derive(Default)]
pub struct Dispatcher {
    rendered: BTreeMap<OutputId, CachedRender>,
}

impl Dispatcher {
    /// Re-run every binding that reads `changed`. Returns the outputs whose spec was replaced.
    pub fn dispatch(
        &mut self,
        table: &LaunchTable,
        changed: WidgetId,
        state: &FilterSelection,
    ) -> Vec<OutputId> {
        log::debug!("{} changed", changed.name());
        BINDINGS
            .iter()
            .filter(|b| b.inputs.contains(&changed))
            .filter(|b| self.render(b, table, state))
            .map(|b| b.output)
            .collect()
    }

    /// Run every binding; used for the first frame and after a table reload.
    pub fn render_all(&mut self, table: &LaunchTable, state: &FilterSelection) -> Vec<OutputId> {
        BINDINGS
            .iter()
            .filter(|b| self.render(b, table, state))
            .map(|b| b.output)
            .collect()
    }

    pub fn output(&self, id: OutputId) -> Option<&ChartSpec> {
        self.rendered.get(&id).map(|r| &r.spec)
    }

    /// Forget all cached renders; the next render of every output runs its handler.
    pub fn clear(&mut self) {
        self.rendered.clear();
    }

    fn render(&mut self, binding: &Binding, table: &LaunchTable, state: &FilterSelection) -> bool {
        let inputs: Vec<InputValue> = binding.inputs.iter().map(|w| w.value(state)).collect();
        if let Some(prev) = self.rendered.get(&binding.output) {
            if prev.inputs == inputs {
                log::debug!("{}: inputs unchanged, keeping last render", binding.output.name());
                return false;
            }
        }

        let spec = (binding.handler)(table, state);
        log::debug!("{}: rendered '{}'", binding.output.name(), spec.title());
        self.rendered
            .insert(binding.output, CachedRender { inputs, spec });
        true
    }
}
