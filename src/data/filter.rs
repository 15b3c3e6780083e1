use std::fmt;

use serde::Serialize;

use super::model::{LaunchRecord, LaunchTable, PayloadRange};

// ---------------------------------------------------------------------------
// Choice: a dropdown value with the "ALL" sentinel
// ---------------------------------------------------------------------------

/// Either every category ("ALL") or one specific value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn only(value: impl Into<String>) -> Self {
        Choice::Only(value.into())
    }

    /// `All` matches every value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(selected) => selected == value,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("ALL"),
            Choice::Only(value) => f.write_str(value),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSelection: the widget values that drive the scatter chart
// ---------------------------------------------------------------------------

/// Rebuilt from the widgets on every change; never stored by the filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub site: Choice,
    pub payload: PayloadRange,
    pub booster: Choice,
}

impl FilterSelection {
    /// Everything selected over the table's full payload range.
    pub fn everything(table: &LaunchTable) -> Self {
        FilterSelection {
            site: Choice::All,
            payload: table
                .payload_bounds()
                .unwrap_or(PayloadRange::new(0.0, 0.0)),
            booster: Choice::All,
        }
    }

    pub fn matches(&self, rec: &LaunchRecord) -> bool {
        self.payload.contains(rec.payload_mass_kg)
            && self.site.matches(&rec.launch_site)
            && self.booster.matches(&rec.booster_version_category)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Rows launched from `site`; every row for [`Choice::All`].
pub fn filter_by_site<'a>(table: &'a LaunchTable, site: &Choice) -> Vec<&'a LaunchRecord> {
    table
        .records()
        .iter()
        .filter(|rec| site.matches(&rec.launch_site))
        .collect()
}

/// Rows feeding the pie chart.
///
/// For [`Choice::All`] only successful launches are kept, so the pie answers
/// "which site has the most successes". For a single site both outcomes are
/// kept so the pie shows that site's success/failure split.
pub fn pie_source<'a>(table: &'a LaunchTable, site: &Choice) -> Vec<&'a LaunchRecord> {
    match site {
        Choice::All => table
            .records()
            .iter()
            .filter(|rec| rec.is_success())
            .collect(),
        Choice::Only(_) => filter_by_site(table, site),
    }
}

/// Rows passing the payload, site and booster predicates (all ANDed).
pub fn filter_for_scatter<'a>(
    table: &'a LaunchTable,
    selection: &FilterSelection,
) -> Vec<&'a LaunchRecord> {
    table
        .records()
        .iter()
        .filter(|rec| selection.matches(rec))
        .collect()
}
