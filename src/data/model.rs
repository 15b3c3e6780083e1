use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Outcome – the human-readable form of the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome derived from the `class` indicator (1 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// `1` maps to [`Outcome::Success`], everything else to [`Outcome::Failure`].
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Success => "Success",
            Outcome::Failure => "Failure",
        }
    }

    /// Numeric position on the categorical y axis of the scatter plot.
    pub fn axis_value(self) -> f64 {
        match self {
            Outcome::Failure => 0.0,
            Outcome::Success => 1.0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub flight_number: Option<u32>,
    pub launch_site: String,
    /// Binary outcome indicator, always 0 or 1 after loading.
    pub class: u8,
    pub payload_mass_kg: f64,
    /// Specific booster serial, e.g. `F9 v1.1  B1003`.
    pub booster_version: Option<String>,
    /// Booster family, e.g. `FT` or `B5`.
    pub booster_version_category: String,
}

impl LaunchRecord {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_class(self.class)
    }

    pub fn is_success(&self) -> bool {
        self.outcome() == Outcome::Success
    }
}

// ---------------------------------------------------------------------------
// PayloadRange
// ---------------------------------------------------------------------------

/// Inclusive payload interval in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// An inverted range (`low > high`) contains nothing.
    pub fn contains(&self, mass: f64) -> bool {
        mass >= self.low && mass <= self.high
    }
}

// ---------------------------------------------------------------------------
// LaunchTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column facts.
///
/// Built once and shared read-only; there are no mutating methods.
#[derive(Debug, Clone, Default)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
    sites: Vec<String>,
    booster_categories: Vec<String>,
    payload_bounds: Option<PayloadRange>,
}

impl LaunchTable {
    /// Build the distinct-value and bounds indices from the loaded rows.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories: Vec<String> = Vec::new();
        let mut payload_bounds: Option<PayloadRange> = None;

        for rec in &records {
            if !sites.contains(&rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            if !booster_categories.contains(&rec.booster_version_category) {
                booster_categories.push(rec.booster_version_category.clone());
            }
            let mass = rec.payload_mass_kg;
            payload_bounds = Some(match payload_bounds {
                None => PayloadRange::new(mass, mass),
                Some(b) => PayloadRange::new(b.low.min(mass), b.high.max(mass)),
            });
        }

        LaunchTable {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Distinct launch sites in order of first appearance.
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// Distinct booster version categories in order of first appearance.
    pub fn booster_categories(&self) -> &[String] {
        &self.booster_categories
    }

    /// Global min/max payload mass; `None` for an empty table.
    pub fn payload_bounds(&self) -> Option<PayloadRange> {
        self.payload_bounds
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(site: &str, payload: f64, booster: &str, class: u8) -> LaunchRecord {
    LaunchRecord {
        flight_number: None,
        launch_site: site.to_string(),
        class,
        payload_mass_kg: payload,
        booster_version: None,
        booster_version_category: booster.to_string(),
    }
}
