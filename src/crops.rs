//! Crop Suitability Module
//!
//! Maps a Daily Light Integral onto agronomic adequacy for a chosen crop.
//! The built-in requirement table groups crops by canopy height; an external
//! table with the same shape can be loaded from JSON.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::Advisory;
use crate::light::DailyLightBudget;

// ===================== CONSTANTS =====================

/// Unit of all DLI requirement thresholds.
pub const DLI_UNIT: &str = "mol/m²/d";

/// Thresholds applied to a crop the table does not know.
const DEFAULT_DLI_MIN: f64 = 80.0;
const DEFAULT_DLI_OPT: f64 = 100.0;

// ===================== REQUIREMENT TABLE =====================

/// Minimum and optimal DLI for one crop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CropRequirement {
    pub dli_min: f64,
    pub dli_opt: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    DLI_UNIT.to_string()
}

impl CropRequirement {
    fn new(dli_min: f64, dli_opt: f64) -> Self {
        Self { dli_min, dli_opt, unit: default_unit() }
    }
}

/// Crop requirements, grouped by canopy class. Lookup walks every group so
/// callers never need to know which class a crop belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CropTable {
    groups: BTreeMap<String, BTreeMap<String, CropRequirement>>,
}

impl CropTable {
    /// Built-in requirement table.
    pub fn builtin() -> Self {
        let mut low = BTreeMap::new();
        low.insert("Microgreens".to_string(), CropRequirement::new(8.0, 12.0));
        low.insert("Ortaggi a foglia".to_string(), CropRequirement::new(12.0, 18.0));
        low.insert("Tuberi".to_string(), CropRequirement::new(15.0, 20.0));
        low.insert("Ortaggi da frutto bassi".to_string(), CropRequirement::new(18.0, 22.0));

        let mut tall = BTreeMap::new();
        tall.insert("Cereali".to_string(), CropRequirement::new(20.0, 25.0));
        tall.insert("Legumi".to_string(), CropRequirement::new(15.0, 20.0));
        tall.insert("Ortaggi da frutto alti".to_string(), CropRequirement::new(22.0, 30.0));
        tall.insert("Frutta (alberi e arbusti)".to_string(), CropRequirement::new(22.0, 28.0));
        tall.insert("Viti".to_string(), CropRequirement::new(20.0, 25.0));
        tall.insert("Piante ornamentali alte".to_string(), CropRequirement::new(10.0, 15.0));

        let mut groups = BTreeMap::new();
        groups.insert("Piante basse".to_string(), low);
        groups.insert("Piante alte".to_string(), tall);
        Self { groups }
    }

    /// Parse a table from JSON with the same two-level group/crop shape as
    /// the built-in one.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Find a crop's requirement across all groups.
    pub fn lookup(&self, crop: &str) -> Option<&CropRequirement> {
        self.groups.values().find_map(|group| group.get(crop))
    }

    /// Fallback requirement for unknown crops.
    pub fn default_requirement() -> CropRequirement {
        CropRequirement::new(DEFAULT_DLI_MIN, DEFAULT_DLI_OPT)
    }

    /// Crop names across all groups, in table order.
    pub fn crop_names(&self) -> Vec<&str> {
        self.groups.values().flat_map(|group| group.keys().map(String::as_str)).collect()
    }
}

// ===================== CLASSIFICATION =====================

/// Four-state adequacy scale over the DLI-to-optimum percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropStatus {
    Optimal,
    Adequate,
    Marginal,
    Insufficient,
}

impl CropStatus {
    /// Classify an adequacy percentage (DLI as percent of the optimum).
    pub fn classify(percentage: f64) -> Self {
        if percentage >= 100.0 {
            CropStatus::Optimal
        } else if percentage >= 80.0 {
            CropStatus::Adequate
        } else if percentage >= 60.0 {
            CropStatus::Marginal
        } else {
            CropStatus::Insufficient
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CropStatus::Optimal => "Optimal",
            CropStatus::Adequate => "Adequate",
            CropStatus::Marginal => "Marginal",
            CropStatus::Insufficient => "Insufficient",
        }
    }

    /// Display color for the report layer.
    pub fn color(&self) -> &'static str {
        match self {
            CropStatus::Optimal => "green",
            CropStatus::Adequate => "orange",
            CropStatus::Marginal => "darkorange",
            CropStatus::Insufficient => "red",
        }
    }
}

impl std::fmt::Display for CropStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One DLI judged against a requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropAssessment {
    pub dli: f64,
    pub percentage: f64,
    pub status: CropStatus,
}

/// Suitability verdicts for all three field zones.
#[derive(Debug, Clone, PartialEq)]
pub struct CropSuitability {
    pub crop: String,
    pub requirement: CropRequirement,
    pub under_panels: CropAssessment,
    pub between_rows: CropAssessment,
    pub field_weighted: CropAssessment,
}

/// Judge one DLI against a requirement's optimum.
pub fn assess(dli: f64, requirement: &CropRequirement) -> CropAssessment {
    let percentage = if requirement.dli_opt > 0.0 { dli / requirement.dli_opt * 100.0 } else { 0.0 };
    CropAssessment { dli, percentage, status: CropStatus::classify(percentage) }
}

/// Evaluate the full daily budget for one crop. An unknown crop falls back
/// to the default requirement and raises a non-fatal advisory rather than
/// aborting the run.
pub fn evaluate(
    table: &CropTable,
    crop: &str,
    budget: &DailyLightBudget,
) -> (CropSuitability, Vec<Advisory>) {
    let mut advisories = Vec::new();
    let requirement = match table.lookup(crop) {
        Some(requirement) => requirement.clone(),
        None => {
            advisories.push(Advisory::UnknownCrop { crop: crop.to_string() });
            CropTable::default_requirement()
        }
    };

    let suitability = CropSuitability {
        crop: crop.to_string(),
        under_panels: assess(budget.dli_under_panels, &requirement),
        between_rows: assess(budget.dli_between_rows, &requirement),
        field_weighted: assess(budget.dli_field_weighted, &requirement),
        requirement,
    };
    (suitability, advisories)
}

// ===================== TESTS =====================
