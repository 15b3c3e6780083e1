use serde::Serialize;

use crate::data::model::{LaunchRecord, Outcome};

pub const AGGREGATE_PIE_TITLE: &str = "Total Successful Launches by Site";
pub const SCATTER_TITLE: &str = "Payload vs Launch Outcome";
pub const SCATTER_X_LABEL: &str = "Payload Mass (kg)";
pub const SCATTER_Y_LABEL: &str = "Launch Outcome";
pub const SCATTER_COLOR_LABEL: &str = "Booster Version Category";

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

/// Declarative chart description handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartSpec {
    Pie(PieSpec),
    Scatter(ScatterSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Pie(pie) => &pie.title,
            ChartSpec::Scatter(scatter) => &scatter.title,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartSpec::Pie(pie) => pie.slices.is_empty(),
            ChartSpec::Scatter(scatter) => scatter.points.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSpec {
    pub title: String,
    /// Slices in order of first appearance; zero-valued groups are dropped.
    pub slices: Vec<PieSlice>,
}

impl PieSpec {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn value_of(&self, label: &str) -> Option<f64> {
        self.slices.iter().find(|s| s.label == label).map(|s| s.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    /// Colour channel: the booster version category.
    pub category: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color_label: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSpec {
    /// Colour categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.points {
            if !seen.contains(&p.category.as_str()) {
                seen.push(&p.category);
            }
        }
        seen
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// How the pie groups its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PieMode {
    /// Sum of `class` per launch site.
    Aggregate,
    /// Row count per outcome label for the named site.
    Site(String),
}

pub fn build_pie_chart(rows: &[&LaunchRecord], mode: &PieMode) -> ChartSpec {
    let (title, groups) = match mode {
        PieMode::Aggregate => (
            AGGREGATE_PIE_TITLE.to_string(),
            group_sum(rows, |r| r.launch_site.clone(), |r| f64::from(r.class)),
        ),
        PieMode::Site(site) => (
            format!("Success vs Failure for {site}"),
            group_sum(rows, |r| r.outcome().to_string(), |_| 1.0),
        ),
    };

    let slices = groups
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(label, value)| PieSlice { label, value })
        .collect();

    ChartSpec::Pie(PieSpec { title, slices })
}

pub fn build_scatter_chart(rows: &[&LaunchRecord]) -> ChartSpec {
    let points = rows
        .iter()
        .map(|r| ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            outcome: r.outcome(),
            category: r.booster_version_category.clone(),
            flight_number: r.flight_number,
            booster_version: r.booster_version.clone(),
        })
        .collect();

    ChartSpec::Scatter(ScatterSpec {
        title: SCATTER_TITLE.to_string(),
        x_label: SCATTER_X_LABEL.to_string(),
        y_label: SCATTER_Y_LABEL.to_string(),
        color_label: SCATTER_COLOR_LABEL.to_string(),
        points,
    })
}

/// Group rows by key, preserving first-appearance order of the keys.
fn group_sum(
    rows: &[&LaunchRecord],
    key: impl Fn(&LaunchRecord) -> String,
    value: impl Fn(&LaunchRecord) -> f64,
) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for &row in rows {
        let k = key(row);
        match groups.iter_mut().find(|(label, _)| *label == k) {
            Some((_, total)) => *total += value(row),
            None => groups.push((k, value(row))),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_for_scatter, pie_source, Choice, FilterSelection};
    use crate::data::model::{record, LaunchTable};

    fn scenario() -> LaunchTable {
        LaunchTable::from_records(vec![
            record("A", 500.0, "v1", 1),
            record("A", 1500.0, "v1", 0),
            record("B", 3000.0, "v2", 1),
            record("B", 7000.0, "v2", 0),
        ])
    }

    fn pie(spec: ChartSpec) -> PieSpec {
        match spec {
            ChartSpec::Pie(p) => p,
            other => panic!("expected pie, got {other:?}"),
        }
    }

    fn scatter(spec: ChartSpec) -> ScatterSpec {
        match spec {
            ChartSpec::Scatter(s) => s,
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn aggregate_pie_counts_successes_per_site() {
        let table = scenario();
        let rows = pie_source(&table, &Choice::All);
        let spec = pie(build_pie_chart(&rows, &PieMode::Aggregate));

        assert_eq!(spec.title, AGGREGATE_PIE_TITLE);
        assert_eq!(
            spec.slices,
            vec![
                PieSlice { label: "A".into(), value: 1.0 },
                PieSlice { label: "B".into(), value: 1.0 },
            ]
        );
    }

    #[test]
    fn site_pie_splits_by_outcome() {
        let table = LaunchTable::from_records(vec![
            record("A", 500.0, "v1", 1),
            record("A", 1500.0, "v1", 0),
            record("A", 2500.0, "v1", 1),
        ]);
        let rows = pie_source(&table, &Choice::only("A"));
        let spec = pie(build_pie_chart(&rows, &PieMode::Site("A".into())));

        assert_eq!(spec.title, "Success vs Failure for A");
        assert_eq!(spec.value_of("Success"), Some(2.0));
        assert_eq!(spec.value_of("Failure"), Some(1.0));
        assert_eq!(spec.total(), 3.0);
    }

    #[test]
    fn aggregate_pie_drops_sites_without_successes() {
        let table = LaunchTable::from_records(vec![
            record("A", 500.0, "v1", 0),
            record("B", 3000.0, "v2", 1),
        ]);
        // Even if failures leak in, they add nothing to the sum.
        let rows: Vec<_> = table.records().iter().collect();
        let spec = pie(build_pie_chart(&rows, &PieMode::Aggregate));
        assert_eq!(spec.slices.len(), 1);
        assert_eq!(spec.value_of("B"), Some(1.0));
    }

    #[test]
    fn empty_rows_give_empty_charts() {
        let spec = build_pie_chart(&[], &PieMode::Aggregate);
        assert!(spec.is_empty());
        assert_eq!(spec.title(), AGGREGATE_PIE_TITLE);

        let spec = build_scatter_chart(&[]);
        assert!(spec.is_empty());
        assert_eq!(spec.title(), SCATTER_TITLE);
    }

    #[test]
    fn scatter_has_one_point_per_row() {
        let table = scenario();
        let rows = filter_for_scatter(&table, &FilterSelection::everything(&table));
        let spec = scatter(build_scatter_chart(&rows));

        assert_eq!(spec.title, SCATTER_TITLE);
        assert_eq!(spec.y_label, SCATTER_Y_LABEL);
        assert_eq!(spec.points.len(), 4);
        assert_eq!(spec.categories(), vec!["v1", "v2"]);
        assert_eq!(spec.points[3].payload_mass_kg, 7000.0);
        assert_eq!(spec.points[3].category, "v2");
    }

    #[test]
    fn outcome_label_agrees_across_builders() {
        let table = scenario();
        let rows: Vec<_> = table.records().iter().collect();

        let spec = scatter(build_scatter_chart(&rows));
        for (point, rec) in spec.points.iter().zip(table.records()) {
            assert_eq!(point.outcome.label() == "Success", rec.class == 1);
        }

        for site in table.sites() {
            let rows = pie_source(&table, &Choice::only(site.clone()));
            let successes = rows.iter().filter(|r| r.class == 1).count() as f64;
            let spec = pie(build_pie_chart(&rows, &PieMode::Site(site.clone())));
            assert_eq!(spec.value_of("Success").unwrap_or(0.0), successes);
        }
    }

    #[test]
    fn spec_serializes_with_kind_tag() {
        let spec = build_pie_chart(&[], &PieMode::Site("KSC LC-39A".into()));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["title"], "Success vs Failure for KSC LC-39A");
    }
}
