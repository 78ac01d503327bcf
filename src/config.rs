//! Simulation Configuration Module
//!
//! Value objects describing the panel, the field layout, the ground-light
//! transmission model and the physical constants of the light budget.
//! All boundary validation lives here and fails fast, before any sample of
//! the simulated day is processed.

use thiserror::Error;

// ===================== CONSTANTS =====================

/// One hectare in square meters
pub const HECTARE_M2: f64 = 10_000.0;

// ===================== ERRORS =====================

/// Configuration-level violation. Raised once at pipeline entry;
/// per-sample degenerate cases are never reported through this type.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid panel geometry: {name} = {value} ({reason})")]
    InvalidGeometry { name: &'static str, value: f64, reason: &'static str },

    #[error("invalid field layout: {name} = {value} ({reason})")]
    InvalidLayout { name: &'static str, value: f64, reason: &'static str },

    #[error("invalid transmittance for {zone}: {value} (must be within 0..=1)")]
    InvalidTransmittance { zone: &'static str, value: f64 },

    #[error("invalid light constant: {name} = {value} ({reason})")]
    InvalidConstant { name: &'static str, value: f64, reason: &'static str },

    #[error(
        "misaligned input series: {positions} sun-position samples vs {irradiance} irradiance samples"
    )]
    SeriesMismatch { positions: usize, irradiance: usize },

    #[error("sun-position and irradiance timestamps differ at sample {index}")]
    TimestampMismatch { index: usize },

    #[error("input samples out of chronological order at sample {index}")]
    OutOfOrder { index: usize },

    #[error("the simulated day has no samples")]
    EmptySeries,
}

// ===================== PANEL GEOMETRY =====================

/// Immutable description of a single tilted panel.
#[derive(Debug, Clone, Copy)]
pub struct PanelGeometry {
    /// Long side of the panel (meters, > 0)
    pub long_side_m: f64,
    /// Short side of the panel, the one raised by the tilt (meters, > 0)
    pub short_side_m: f64,
    /// Tilt from horizontal in degrees (0 = flat, 90 = vertical)
    pub tilt_deg: f64,
    /// Facing direction in degrees (180 = south in the northern hemisphere)
    pub azimuth_deg: f64,
    /// Height of the panel's lower edge above the soil (meters, >= 0)
    pub ground_clearance_m: f64,
}

impl PanelGeometry {
    pub fn new(long_side_m: f64, short_side_m: f64) -> Self {
        Self { long_side_m, short_side_m, tilt_deg: 30.0, azimuth_deg: 180.0, ground_clearance_m: 1.0 }
    }

    pub fn with_tilt(mut self, tilt_deg: f64) -> Self {
        self.tilt_deg = tilt_deg;
        self
    }

    pub fn with_azimuth(mut self, azimuth_deg: f64) -> Self {
        self.azimuth_deg = azimuth_deg;
        self
    }

    pub fn with_ground_clearance(mut self, clearance_m: f64) -> Self {
        self.ground_clearance_m = clearance_m;
        self
    }

    /// Nominal panel area (long side x short side), m².
    pub fn nominal_area_m2(&self) -> f64 {
        self.long_side_m * self.short_side_m
    }

    /// Height of the panel's highest physical point above the soil, m.
    pub fn highest_point_m(&self) -> f64 {
        self.ground_clearance_m + self.short_side_m * self.tilt_deg.to_radians().sin()
    }

    /// Length of the tilt-foreshortened short side projected on the ground, m.
    pub fn ground_projection_m(&self) -> f64 {
        self.short_side_m * self.tilt_deg.to_radians().cos()
    }

    /// Footprint of one panel projected on the ground, m².
    pub fn ground_projection_m2(&self) -> f64 {
        self.long_side_m * self.ground_projection_m()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.long_side_m > 0.0) {
            return Err(ConfigError::InvalidGeometry {
                name: "long_side_m",
                value: self.long_side_m,
                reason: "side length must be positive",
            });
        }
        if !(self.short_side_m > 0.0) {
            return Err(ConfigError::InvalidGeometry {
                name: "short_side_m",
                value: self.short_side_m,
                reason: "side length must be positive",
            });
        }
        if !(0.0..=90.0).contains(&self.tilt_deg) {
            return Err(ConfigError::InvalidGeometry {
                name: "tilt_deg",
                value: self.tilt_deg,
                reason: "tilt must be within 0..=90 degrees",
            });
        }
        if !(0.0..360.0).contains(&self.azimuth_deg) {
            return Err(ConfigError::InvalidGeometry {
                name: "azimuth_deg",
                value: self.azimuth_deg,
                reason: "azimuth must be within 0..360 degrees",
            });
        }
        if !(self.ground_clearance_m >= 0.0) {
            return Err(ConfigError::InvalidGeometry {
                name: "ground_clearance_m",
                value: self.ground_clearance_m,
                reason: "clearance cannot be negative",
            });
        }
        Ok(())
    }
}

// ===================== FIELD LAYOUT =====================

/// Immutable description of the field the array sits on.
#[derive(Debug, Clone, Copy)]
pub struct FieldLayout {
    /// Number of installed panels (> 0)
    pub panel_count: u32,
    /// Total field surface in m² (> 0)
    pub field_area_m2: f64,
    /// Spacing between consecutive row shadow-projection points (meters, > 0).
    /// Used by the overlap correction of the shaded-fraction aggregator.
    pub row_pitch_m: f64,
}

impl FieldLayout {
    pub fn new(panel_count: u32, field_area_m2: f64, row_pitch_m: f64) -> Self {
        Self { panel_count, field_area_m2, row_pitch_m }
    }

    pub fn from_hectares(panel_count: u32, hectares: f64, row_pitch_m: f64) -> Self {
        Self::new(panel_count, hectares * HECTARE_M2, row_pitch_m)
    }

    /// Total nominal panel surface, m².
    pub fn total_nominal_area_m2(&self, panel: &PanelGeometry) -> f64 {
        panel.nominal_area_m2() * self.panel_count as f64
    }

    /// Total ground footprint of the tilted panels, m².
    pub fn total_projection_m2(&self, panel: &PanelGeometry) -> f64 {
        panel.ground_projection_m2() * self.panel_count as f64
    }

    /// Ground Coverage Ratio: projected panel footprint over field surface.
    pub fn ground_coverage_ratio(&self, panel: &PanelGeometry) -> f64 {
        self.total_projection_m2(panel) / self.field_area_m2
    }

    /// Field surface left free of panel projection, m² (never negative).
    pub fn free_surface_m2(&self, panel: &PanelGeometry) -> f64 {
        (self.field_area_m2 - self.total_projection_m2(panel)).max(0.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel_count == 0 {
            return Err(ConfigError::InvalidLayout {
                name: "panel_count",
                value: 0.0,
                reason: "at least one panel is required",
            });
        }
        if !(self.field_area_m2 > 0.0) {
            return Err(ConfigError::InvalidLayout {
                name: "field_area_m2",
                value: self.field_area_m2,
                reason: "field surface must be positive",
            });
        }
        if !(self.row_pitch_m > 0.0) {
            return Err(ConfigError::InvalidLayout {
                name: "row_pitch_m",
                value: self.row_pitch_m,
                reason: "row pitch must be positive",
            });
        }
        Ok(())
    }
}

// ===================== TRANSMISSION MODEL =====================

/// Fraction of incident light reaching the soil in each field zone.
#[derive(Debug, Clone, Copy)]
pub struct TransmissionModel {
    /// Transmittance directly under the panels
    pub under_panel: f64,
    /// Transmittance in the open strips between rows (1.0 = unobstructed)
    pub between_rows: f64,
    /// Transmittance at the shadow edges. Reserved: the default weighting
    /// does not use it, but alternate models may.
    pub edge_effect: f64,
}

impl Default for TransmissionModel {
    fn default() -> Self {
        Self { under_panel: 0.15, between_rows: 1.0, edge_effect: 0.3 }
    }
}

impl TransmissionModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (zone, value) in [
            ("under_panel", self.under_panel),
            ("between_rows", self.between_rows),
            ("edge_effect", self.edge_effect),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidTransmittance { zone, value });
            }
        }
        Ok(())
    }
}

// ===================== LIGHT CONSTANTS =====================

/// Physical constants of the light-budget conversion. Injectable so that
/// alternate values can be substituted in tests without touching the
/// algorithms.
#[derive(Debug, Clone, Copy)]
pub struct LightConstants {
    /// Photosynthetically active fraction of global irradiance
    pub par_fraction: f64,
    /// PAR energy to photon flux conversion, µmol per joule
    pub umol_per_joule: f64,
}

impl Default for LightConstants {
    fn default() -> Self {
        Self { par_fraction: 0.45, umol_per_joule: 4.6 }
    }
}

impl LightConstants {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.par_fraction) {
            return Err(ConfigError::InvalidConstant {
                name: "par_fraction",
                value: self.par_fraction,
                reason: "fraction must be within 0..=1",
            });
        }
        if !(self.umol_per_joule > 0.0) {
            return Err(ConfigError::InvalidConstant {
                name: "umol_per_joule",
                value: self.umol_per_joule,
                reason: "conversion factor must be positive",
            });
        }
        Ok(())
    }
}

// ===================== AGGREGATION POLICY =====================

/// How per-panel shadow areas combine into a field-level shaded fraction.
///
/// Both policies clip the result to [0, 1]. `OverlapCorrected` is the
/// reference behavior; `Naive` is kept as an explicitly-named alternative,
/// never as silent drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationPolicy {
    /// Multiply the single-panel shadow area by the panel count as-is.
    Naive,
    /// Discount the double-counted area when a shadow grows longer than the
    /// row pitch and spills under the next row.
    #[default]
    OverlapCorrected,
}

// ===================== SIMULATION CONFIG =====================

/// Complete per-run configuration. Created fresh for each simulated day.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub panel: PanelGeometry,
    pub field: FieldLayout,
    pub transmission: TransmissionModel,
    pub light: LightConstants,
    pub aggregation: AggregationPolicy,
    /// Crop evaluated against the computed daily light integral
    pub crop: String,
}

impl SimulationConfig {
    pub fn new(panel: PanelGeometry, field: FieldLayout, crop: impl Into<String>) -> Self {
        Self {
            panel,
            field,
            transmission: TransmissionModel::default(),
            light: LightConstants::default(),
            aggregation: AggregationPolicy::default(),
            crop: crop.into(),
        }
    }

    pub fn with_transmission(mut self, transmission: TransmissionModel) -> Self {
        self.transmission = transmission;
        self
    }

    pub fn with_light_constants(mut self, light: LightConstants) -> Self {
        self.light = light;
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationPolicy) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Fail-fast boundary validation (never silently clamps).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.panel.validate()?;
        self.field.validate()?;
        self.transmission.validate()?;
        self.light.validate()?;
        Ok(())
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_area_and_highest_point() {
        let panel = PanelGeometry::new(2.0, 1.0).with_tilt(30.0).with_ground_clearance(1.0);
        assert!((panel.nominal_area_m2() - 2.0).abs() < 1e-12);
        // H = 1.0 + 1.0 * sin(30°) = 1.5
        assert!((panel.highest_point_m() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_ground_projection_flat_and_vertical() {
        let flat = PanelGeometry::new(2.0, 1.0).with_tilt(0.0);
        assert!((flat.ground_projection_m() - 1.0).abs() < 1e-12);

        let vertical = PanelGeometry::new(2.0, 1.0).with_tilt(90.0);
        assert!(vertical.ground_projection_m().abs() < 1e-12);
    }

    #[test]
    fn test_coverage_metrics() {
        let panel = PanelGeometry::new(2.0, 1.0).with_tilt(0.0);
        let field = FieldLayout::from_hectares(100, 1.0, 2.0);

        assert!((field.field_area_m2 - 10_000.0).abs() < 1e-9);
        assert!((field.total_nominal_area_m2(&panel) - 200.0).abs() < 1e-9);
        // Flat panel: projection equals nominal area
        assert!((field.ground_coverage_ratio(&panel) - 0.02).abs() < 1e-12);
        assert!((field.free_surface_m2(&panel) - 9_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_panel_validation_rejects_non_positive_sides() {
        assert!(PanelGeometry::new(0.0, 1.0).validate().is_err());
        assert!(PanelGeometry::new(1.0, -0.5).validate().is_err());
        assert!(PanelGeometry::new(1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_panel_validation_rejects_out_of_range_angles() {
        assert!(PanelGeometry::new(1.0, 1.0).with_tilt(91.0).validate().is_err());
        assert!(PanelGeometry::new(1.0, 1.0).with_tilt(-1.0).validate().is_err());
        assert!(PanelGeometry::new(1.0, 1.0).with_azimuth(360.0).validate().is_err());
        assert!(PanelGeometry::new(1.0, 1.0).with_azimuth(359.9).validate().is_ok());
    }

    #[test]
    fn test_layout_validation() {
        assert!(FieldLayout::new(0, 10_000.0, 2.0).validate().is_err());
        assert!(FieldLayout::new(10, 0.0, 2.0).validate().is_err());
        assert!(FieldLayout::new(10, 10_000.0, -1.0).validate().is_err());
        assert!(FieldLayout::new(10, 10_000.0, 2.0).validate().is_ok());
    }

    #[test]
    fn test_transmission_validation() {
        let mut tm = TransmissionModel::default();
        assert!(tm.validate().is_ok());
        tm.under_panel = 1.5;
        assert!(tm.validate().is_err());
        tm.under_panel = -0.1;
        assert!(tm.validate().is_err());
    }

    #[test]
    fn test_config_validate_fails_fast() {
        let panel = PanelGeometry::new(2.0, -1.0);
        let field = FieldLayout::from_hectares(10, 1.0, 2.0);
        let config = SimulationConfig::new(panel, field, "Cereali");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGeometry { name: "short_side_m", .. })
        ));
    }

    #[test]
    fn test_default_aggregation_is_overlap_corrected() {
        assert_eq!(AggregationPolicy::default(), AggregationPolicy::OverlapCorrected);
    }
}
