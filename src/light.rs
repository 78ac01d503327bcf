//! Photosynthetic Light-Budget Module
//!
//! Converts global horizontal irradiance into photosynthetically active
//! radiation (PAR), weights it by the shaded-fraction series through the
//! zone transmission model, and integrates the photon flux into Daily Light
//! Integrals. Also provides the light uniformity diagnostic.

use crate::config::{LightConstants, TransmissionModel};
use crate::series::SolarDay;

// ===================== TYPES =====================

/// Per-timestep PAR series for the three field zones.
///
/// The weighted series blends under-panel and between-row PAR sample by
/// sample with the shaded fraction as the mixing weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ParSeries {
    /// Under-panel photon flux density, µmol·m⁻²·s⁻¹
    pub under_umol: Vec<f64>,
    /// Between-row photon flux density, µmol·m⁻²·s⁻¹
    pub between_umol: Vec<f64>,
    /// Fraction-weighted photon flux density, µmol·m⁻²·s⁻¹
    pub weighted_umol: Vec<f64>,
    /// Fraction-weighted PAR in irradiance units, W/m²
    pub weighted_wm2: Vec<f64>,
}

/// Terminal daily aggregate of the light budget, mol·m⁻²·day⁻¹.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyLightBudget {
    pub dli_under_panels: f64,
    pub dli_between_rows: f64,
    pub dli_field_weighted: f64,
}

// ===================== PAR DISTRIBUTION =====================

/// Compute the three PAR series from the day's GHI and the shaded-fraction
/// series.
///
/// Night samples carry zero flux but stay in the series: the daily integral
/// always covers the full day.
pub fn par_distribution(
    day: &SolarDay,
    shaded_fraction: &[f64],
    transmission: &TransmissionModel,
    constants: &LightConstants,
) -> ParSeries {
    let count = day.len();
    let mut series = ParSeries {
        under_umol: Vec::with_capacity(count),
        between_umol: Vec::with_capacity(count),
        weighted_umol: Vec::with_capacity(count),
        weighted_wm2: Vec::with_capacity(count),
    };

    for (sample, &fraction) in day.samples().iter().zip(shaded_fraction.iter()) {
        let par_total = sample.ghi_wm2 * constants.par_fraction;
        let par_under = par_total * transmission.under_panel;
        let par_between = par_total * transmission.between_rows;
        let par_weighted = par_under * fraction + par_between * (1.0 - fraction);

        series.under_umol.push(par_under * constants.umol_per_joule);
        series.between_umol.push(par_between * constants.umol_per_joule);
        series.weighted_umol.push(par_weighted * constants.umol_per_joule);
        series.weighted_wm2.push(par_weighted);
    }

    series
}

// ===================== DAILY LIGHT INTEGRAL =====================

/// Integrate a photon flux series (µmol·m⁻²·s⁻¹) into a daily total
/// (mol·m⁻²·day⁻¹). Summation follows chronological sample order.
pub fn daily_light_integral(flux_umol: &[f64], step_seconds: f64) -> f64 {
    flux_umol.iter().sum::<f64>() * step_seconds / 1e6
}

/// Integrate all three PAR series into the daily light budget.
pub fn daily_light_budget(par: &ParSeries, step_seconds: f64) -> DailyLightBudget {
    DailyLightBudget {
        dli_under_panels: daily_light_integral(&par.under_umol, step_seconds),
        dli_between_rows: daily_light_integral(&par.between_umol, step_seconds),
        dli_field_weighted: daily_light_integral(&par.weighted_umol, step_seconds),
    }
}

// ===================== LIGHT UNIFORMITY =====================

/// Dispersion diagnostic over the pooled under-panel and between-row photon
/// flux series: `max(0, 1 - stddev/mean)`, in [0, 1] with 1 meaning
/// perfectly uniform light. A day with no light at all has no meaningful
/// uniformity and maps to 0 by definition.
///
/// Sample standard deviation (n-1 divisor), for compatibility with the
/// reference implementation.
pub fn light_uniformity(par: &ParSeries) -> f64 {
    let pooled: Vec<f64> =
        par.under_umol.iter().chain(par.between_umol.iter()).copied().collect();
    if pooled.len() < 2 {
        return 0.0;
    }

    let mean = pooled.iter().sum::<f64>() / pooled.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }

    let variance = pooled.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (pooled.len() - 1) as f64;
    (1.0 - variance.sqrt() / mean).max(0.0)
}

// ===================== TESTS =====================
