//! Simulation Engine
//!
//! Runs the agrivoltaic day pipeline in dependency order over one immutable
//! input day: shadow projection, shaded-fraction aggregation, light budget,
//! crop evaluation and the uniformity diagnostic. The engine is pure; all
//! reporting lives in the binary.

use crate::config::{ConfigError, SimulationConfig};
use crate::crops::{self, CropSuitability, CropTable};
use crate::light::{self, DailyLightBudget, ParSeries};
use crate::series::SolarDay;
use crate::shadow::{self, ShadeStats, ShadowSample};

// ===================== TYPES =====================

/// Non-fatal finding raised during a run. Advisories travel alongside the
/// result instead of being printed from the core, so callers decide how to
/// surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    UnknownCrop { crop: String },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::UnknownCrop { crop } => {
                write!(f, "crop '{}' not in the requirement table, using default DLI thresholds", crop)
            }
        }
    }
}

/// A result together with any advisories raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<T> {
    pub value: T,
    pub advisories: Vec<Advisory>,
}

/// Everything one simulated day produces.
#[derive(Debug, Clone, PartialEq)]
pub struct AgrivoltaicDayResult {
    /// Per-sample single-panel shadow geometry
    pub shadows: Vec<ShadowSample>,
    /// Per-sample field-level shaded fraction, in [0, 1]
    pub shaded_fraction: Vec<f64>,
    pub shade: ShadeStats,
    pub par: ParSeries,
    pub budget: DailyLightBudget,
    pub suitability: CropSuitability,
    pub uniformity: f64,
}

// ===================== PIPELINE =====================

/// Run one day against the built-in crop table.
pub fn run(
    config: &SimulationConfig,
    day: &SolarDay,
) -> Result<Evaluation<AgrivoltaicDayResult>, ConfigError> {
    run_with_table(config, day, &CropTable::builtin())
}

/// Run one day against a caller-supplied crop table.
///
/// Configuration problems abort before any computation; a crop missing from
/// the table does not.
pub fn run_with_table(
    config: &SimulationConfig,
    day: &SolarDay,
    table: &CropTable,
) -> Result<Evaluation<AgrivoltaicDayResult>, ConfigError> {
    config.validate()?;

    let shadows = shadow::project_day(&config.panel, day);
    let shaded_fraction = shadow::shaded_fractions(&shadows, &config.field, config.aggregation);
    let shade = shadow::shade_stats(&shadows, &shaded_fraction);

    let par = light::par_distribution(day, &shaded_fraction, &config.transmission, &config.light);
    let budget = light::daily_light_budget(&par, day.step_seconds());
    let uniformity = light::light_uniformity(&par);

    let (suitability, advisories) = crops::evaluate(table, &config.crop, &budget);

    Ok(Evaluation {
        value: AgrivoltaicDayResult {
            shadows,
            shaded_fraction,
            shade,
            par,
            budget,
            suitability,
            uniformity,
        },
        advisories,
    })
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldLayout, PanelGeometry};
    use crate::series::SunSample;
    use chrono::{DateTime, Duration, TimeZone};
    use chrono_tz::Europe::Rome;
    use chrono_tz::Tz;

    fn summer_day() -> SolarDay {
        let start: DateTime<Tz> = Rome.with_ymd_and_hms(2025, 6, 21, 0, 0, 0).unwrap();
        let samples = (0..24)
            .map(|h| {
                // crude solar arc: up between 06 and 20, peaking at 13
                let elevation = 65.0 * (std::f64::consts::PI * (h as f64 - 6.0) / 14.0).sin();
                SunSample {
                    time: start + Duration::hours(h),
                    elevation_deg: elevation,
                    azimuth_deg: 90.0 + (h as f64 - 6.0) / 14.0 * 180.0,
                    ghi_wm2: if elevation > 0.0 { 900.0 * elevation.to_radians().sin() } else { 0.0 },
                }
            })
            .collect();
        SolarDay::new(samples).unwrap()
    }

    fn config() -> SimulationConfig {
        SimulationConfig::new(
            PanelGeometry::new(2.0, 1.0),
            FieldLayout::from_hectares(40, 1.0, 2.5),
            "Cereali",
        )
    }

    #[test]
    fn test_run_produces_consistent_series() {
        let day = summer_day();
        let evaluation = run(&config(), &day).unwrap();
        let result = &evaluation.value;

        assert_eq!(result.shadows.len(), day.len());
        assert_eq!(result.shaded_fraction.len(), day.len());
        assert_eq!(result.par.weighted_umol.len(), day.len());
        assert!(result.shaded_fraction.iter().all(|f| (0.0..=1.0).contains(f)));
        assert!(result.budget.dli_under_panels <= result.budget.dli_between_rows);
        assert!((0.0..=1.0).contains(&result.uniformity));
    }

    #[test]
    fn test_run_is_deterministic() {
        let day = summer_day();
        let first = run(&config(), &day).unwrap();
        let second = run(&config(), &day).unwrap();
        assert_eq!(first, second, "same inputs must give bit-identical results");
    }

    #[test]
    fn test_invalid_config_aborts_before_computation() {
        let mut bad = config();
        bad.panel.tilt_deg = 120.0;
        assert!(matches!(run(&bad, &summer_day()), Err(ConfigError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_unknown_crop_carries_advisory_through_the_run() {
        let day = summer_day();
        let mut cfg = config();
        cfg.crop = "Pomodoro marziano".to_string();
        let evaluation = run(&cfg, &day).unwrap();

        assert_eq!(evaluation.advisories.len(), 1);
        assert!(matches!(
            &evaluation.advisories[0],
            Advisory::UnknownCrop { crop } if crop == "Pomodoro marziano"
        ));
        assert_eq!(evaluation.value.suitability.requirement.dli_opt, 100.0);
    }
}
