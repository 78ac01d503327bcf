//! Dynamic Shadow Module
//!
//! Projects the shadow a tilted panel casts on the ground for each sun
//! position of the simulated day, and aggregates per-panel shadows into a
//! field-level shaded fraction with optional row-overlap correction.
//!
//! The width term attenuates by |cos(Δazimuth)| only; this deliberately
//! matches the reference model rather than a full solid-angle derivation.

use crate::config::{AggregationPolicy, FieldLayout, PanelGeometry};
use crate::series::SolarDay;

// ===================== CONSTANTS =====================

/// Divisor floor for the width projection as shadow length grows without
/// bound near the horizon.
const WIDTH_EPSILON: f64 = 1e-6;

// ===================== TYPES =====================

/// Ground shadow of a single panel at one timestep. All components are zero
/// whenever the sun is at or below the horizon; that is a defined state, not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowSample {
    pub length_m: f64,
    pub width_m: f64,
    pub area_m2: f64,
}

/// Daily aggregates of the shadow and shaded-fraction series, exposed to the
/// report layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeStats {
    pub mean_fraction: f64,
    pub peak_fraction: f64,
    pub peak_area_m2: f64,
    pub peak_length_m: f64,
}

// ===================== SHADOW PROJECTION =====================

/// Fold the sun-panel azimuth difference into [0°, 180°], handling
/// wrap-around (350° vs 10° is a 20° offset, not 340°).
pub fn fold_azimuth_delta_deg(sun_azimuth_deg: f64, panel_azimuth_deg: f64) -> f64 {
    let delta = (sun_azimuth_deg - panel_azimuth_deg).abs();
    if delta > 180.0 { 360.0 - delta } else { delta }
}

/// Project one panel's shadow for a single sun position.
///
/// The shadow length is the projection of the panel's highest point along
/// the sun ray; it legitimately grows very large at low sun angles and is
/// not clamped. The width divides the tilt-foreshortened area by the length
/// (epsilon-guarded) and attenuates by the azimuth misalignment.
pub fn project_shadow(
    panel: &PanelGeometry,
    sun_elevation_deg: f64,
    sun_azimuth_deg: f64,
) -> ShadowSample {
    if sun_elevation_deg <= 0.0 {
        return ShadowSample::default();
    }

    let highest_point = panel.highest_point_m();
    let length_m = highest_point / sun_elevation_deg.to_radians().tan();

    let delta_azimuth = fold_azimuth_delta_deg(sun_azimuth_deg, panel.azimuth_deg);
    let foreshortened_area = panel.nominal_area_m2() * panel.tilt_deg.to_radians().cos();
    let width_m =
        foreshortened_area / length_m.max(WIDTH_EPSILON) * delta_azimuth.to_radians().cos().abs();

    ShadowSample { length_m, width_m, area_m2: length_m * width_m }
}

/// Project the shadow series for every sample of the day.
pub fn project_day(panel: &PanelGeometry, day: &SolarDay) -> Vec<ShadowSample> {
    day.samples()
        .iter()
        .map(|sample| project_shadow(panel, sample.elevation_deg, sample.azimuth_deg))
        .collect()
}

// ===================== SHADED-FRACTION AGGREGATION =====================

/// Field-level shaded fraction for one shadow sample, clipped to [0, 1].
///
/// With `OverlapCorrected`, a shadow longer than the row pitch spills under
/// the next row; the double-counted portion is discounted linearly by
/// `pitch / length`. A shadow exactly as long as the pitch takes no
/// discount.
pub fn shaded_fraction(
    shadow: &ShadowSample,
    field: &FieldLayout,
    policy: AggregationPolicy,
) -> f64 {
    let total_area = shadow.area_m2 * field.panel_count as f64;

    let effective_area = match policy {
        AggregationPolicy::Naive => total_area,
        AggregationPolicy::OverlapCorrected => {
            if shadow.length_m > field.row_pitch_m {
                total_area * (field.row_pitch_m / shadow.length_m)
            } else {
                total_area
            }
        }
    };

    (effective_area / field.field_area_m2).clamp(0.0, 1.0)
}

/// Shaded-fraction series for the whole day.
pub fn shaded_fractions(
    shadows: &[ShadowSample],
    field: &FieldLayout,
    policy: AggregationPolicy,
) -> Vec<f64> {
    shadows.iter().map(|shadow| shaded_fraction(shadow, field, policy)).collect()
}

/// Daily shade aggregates for the report layer.
pub fn shade_stats(shadows: &[ShadowSample], fractions: &[f64]) -> ShadeStats {
    let count = fractions.len().max(1) as f64;
    ShadeStats {
        mean_fraction: fractions.iter().sum::<f64>() / count,
        peak_fraction: fractions.iter().copied().fold(0.0, f64::max),
        peak_area_m2: shadows.iter().map(|s| s.area_m2).fold(0.0, f64::max),
        peak_length_m: shadows.iter().map(|s| s.length_m).fold(0.0, f64::max),
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> PanelGeometry {
        PanelGeometry::new(2.0, 1.0).with_tilt(30.0).with_azimuth(180.0).with_ground_clearance(1.0)
    }

    #[test]
    fn test_azimuth_delta_folding() {
        assert!((fold_azimuth_delta_deg(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((fold_azimuth_delta_deg(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((fold_azimuth_delta_deg(180.0, 0.0) - 180.0).abs() < 1e-12);
        assert!((fold_azimuth_delta_deg(90.0, 90.0)).abs() < 1e-12);
        assert!((fold_azimuth_delta_deg(0.0, 359.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sun_at_or_below_horizon_casts_nothing() {
        for elevation in [0.0, -0.0001, -10.0, -90.0] {
            let shadow = project_shadow(&panel(), elevation, 180.0);
            assert_eq!(shadow.length_m, 0.0, "length at elevation {}", elevation);
            assert_eq!(shadow.width_m, 0.0, "width at elevation {}", elevation);
            assert_eq!(shadow.area_m2, 0.0, "area at elevation {}", elevation);
        }
    }

    #[test]
    fn test_shadow_length_from_highest_point() {
        // H = 1 + sin(30°) = 1.5; at 45° elevation, L = H / tan(45°) = 1.5
        let shadow = project_shadow(&panel(), 45.0, 180.0);
        assert!((shadow.length_m - 1.5).abs() < 1e-9, "length was {}", shadow.length_m);
    }

    #[test]
    fn test_width_attenuates_with_azimuth_offset() {
        let aligned = project_shadow(&panel(), 45.0, 180.0);
        let offset_60 = project_shadow(&panel(), 45.0, 240.0);

        // Same length, width scaled by cos(60°) = 0.5
        assert!((aligned.length_m - offset_60.length_m).abs() < 1e-12);
        assert!(
            (offset_60.width_m - aligned.width_m * 0.5).abs() < 1e-9,
            "width {} vs aligned {}",
            offset_60.width_m,
            aligned.width_m
        );
    }

    #[test]
    fn test_flat_panel_overhead_sun() {
        // Flat panel, sun at the zenith: the highest point still sits at the
        // ground clearance, but tan(90°) explodes and the length collapses.
        let flat = PanelGeometry::new(2.0, 1.0).with_tilt(0.0).with_ground_clearance(1.0);
        let shadow = project_shadow(&flat, 90.0, 180.0);
        assert!(shadow.length_m < 1e-9, "length was {}", shadow.length_m);
        assert!(shadow.area_m2.is_finite());
    }

    #[test]
    fn test_flat_panel_width_depends_only_on_azimuth_term() {
        // With tilt = 0 the foreshortening factor is 1; at a fixed elevation
        // the width ratio between two sun azimuths is exactly the |cos| ratio.
        let flat = PanelGeometry::new(2.0, 1.0).with_tilt(0.0).with_ground_clearance(1.0);
        let aligned = project_shadow(&flat, 30.0, 180.0);
        let offset = project_shadow(&flat, 30.0, 120.0);
        assert!(
            (offset.width_m / aligned.width_m - 0.5).abs() < 1e-9,
            "ratio was {}",
            offset.width_m / aligned.width_m
        );
    }

    #[test]
    fn test_low_sun_long_shadow_finite_area() {
        let shadow = project_shadow(&panel(), 0.05, 180.0);
        assert!(shadow.length_m > 100.0, "near-horizon shadow should be long");
        assert!(shadow.width_m.is_finite() && shadow.width_m >= 0.0);
        assert!(shadow.area_m2.is_finite());
    }

    #[test]
    fn test_overlap_discount_at_exact_pitch_boundary() {
        let field = FieldLayout::new(10, 10_000.0, 2.0);

        // length == pitch: no discount, both policies agree
        let at_boundary = ShadowSample { length_m: 2.0, width_m: 1.0, area_m2: 2.0 };
        let naive = shaded_fraction(&at_boundary, &field, AggregationPolicy::Naive);
        let corrected = shaded_fraction(&at_boundary, &field, AggregationPolicy::OverlapCorrected);
        assert!((naive - corrected).abs() < 1e-12);
        assert!((corrected - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_discount_beyond_pitch() {
        let field = FieldLayout::new(10, 10_000.0, 2.0);

        // length = 2 * pitch: effective area halves
        let long = ShadowSample { length_m: 4.0, width_m: 1.0, area_m2: 4.0 };
        let naive = shaded_fraction(&long, &field, AggregationPolicy::Naive);
        let corrected = shaded_fraction(&long, &field, AggregationPolicy::OverlapCorrected);
        assert!((corrected - naive / 2.0).abs() < 1e-12, "naive {} corrected {}", naive, corrected);
    }

    #[test]
    fn test_zero_shadow_yields_zero_fraction() {
        let field = FieldLayout::new(10, 10_000.0, 2.0);
        let none = ShadowSample::default();
        assert_eq!(shaded_fraction(&none, &field, AggregationPolicy::OverlapCorrected), 0.0);
        assert_eq!(shaded_fraction(&none, &field, AggregationPolicy::Naive), 0.0);
    }

    #[test]
    fn test_fraction_clipped_to_one_under_extreme_geometry() {
        // Tiny field, huge shadow: the invariant holds for both policies.
        let field = FieldLayout::new(1000, 10.0, 2.0);
        let huge = ShadowSample { length_m: 50.0, width_m: 10.0, area_m2: 500.0 };
        for policy in [AggregationPolicy::Naive, AggregationPolicy::OverlapCorrected] {
            let fraction = shaded_fraction(&huge, &field, policy);
            assert!(
                (0.0..=1.0).contains(&fraction),
                "fraction {} out of bounds for {:?}",
                fraction,
                policy
            );
        }
        assert_eq!(shaded_fraction(&huge, &field, AggregationPolicy::Naive), 1.0);
    }

    #[test]
    fn test_shade_stats() {
        let shadows = [
            ShadowSample::default(),
            ShadowSample { length_m: 3.0, width_m: 1.0, area_m2: 3.0 },
            ShadowSample { length_m: 1.5, width_m: 2.0, area_m2: 3.0 },
        ];
        let fractions = [0.0, 0.4, 0.2];
        let stats = shade_stats(&shadows, &fractions);

        assert!((stats.mean_fraction - 0.2).abs() < 1e-12);
        assert!((stats.peak_fraction - 0.4).abs() < 1e-12);
        assert!((stats.peak_area_m2 - 3.0).abs() < 1e-12);
        assert!((stats.peak_length_m - 3.0).abs() < 1e-12);
    }
}
