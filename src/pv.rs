//! Photovoltaic Yield Module
//!
//! Plane-of-array irradiance on the tilted panels and the temperature-
//! corrected electrical production of the array over one day. Sky diffuse
//! uses the isotropic model; ambient temperature comes from a seasonal
//! sinusoid when no measured series is available.

use chrono::{Datelike, Timelike};

use crate::config::{FieldLayout, PanelGeometry};
use crate::solar::SkyDay;

// ===================== TYPES =====================

/// Electrical characteristics of the installed modules.
#[derive(Debug, Clone, Copy)]
pub struct PvArray {
    /// Module efficiency at STC (0.0 - 1.0, typical silicon ~0.18-0.22)
    pub efficiency: f64,
    /// Nominal Operating Cell Temperature, °C (IEC 61215)
    pub noct_c: f64,
    /// Power temperature coefficient per °C (typically negative)
    pub temp_coeff_per_c: f64,
    /// Balance-of-system losses (0.0 - 1.0)
    pub system_losses: f64,
    /// Ground reflectance for the reflected POA component (0.0 - 1.0)
    pub albedo: f64,
}

impl Default for PvArray {
    fn default() -> Self {
        Self {
            efficiency: 0.20,
            noct_c: 45.0,
            temp_coeff_per_c: -0.004,
            system_losses: 0.10,
            albedo: 0.2,
        }
    }
}

/// Daily production aggregates for the whole array.
#[derive(Debug, Clone, PartialEq)]
pub struct PvYield {
    /// Per-sample plane-of-array irradiance, W/m²
    pub poa_wm2: Vec<f64>,
    /// Per-sample array power, W
    pub power_total_w: Vec<f64>,
    /// Daily energy of a single panel, Wh
    pub energy_single_wh: f64,
    /// Daily energy of the whole array, Wh
    pub energy_total_wh: f64,
    /// Daily array energy per m² of module surface, Wh/m²
    pub energy_per_m2_whm2: f64,
    /// Mean cell temperature over the day, °C
    pub cell_temp_mean_c: f64,
}

// ===================== GEOMETRY =====================

/// Angle of incidence between the sun ray and the panel normal, degrees
/// (0 = sun perpendicular to the panel).
pub fn angle_of_incidence(
    sun_elevation_deg: f64,
    sun_azimuth_deg: f64,
    panel_tilt_deg: f64,
    panel_azimuth_deg: f64,
) -> f64 {
    let sun_zenith = (90.0 - sun_elevation_deg).to_radians();
    let sun_az = sun_azimuth_deg.to_radians();
    let tilt = panel_tilt_deg.to_radians();
    let panel_az = panel_azimuth_deg.to_radians();

    let cos_aoi =
        sun_zenith.cos() * tilt.cos() + sun_zenith.sin() * tilt.sin() * (sun_az - panel_az).cos();

    cos_aoi.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Plane-of-array irradiance in W/m²: beam on the tilted surface, isotropic
/// sky diffuse, and ground-reflected diffuse.
#[allow(clippy::too_many_arguments)]
pub fn plane_of_array(
    dni: f64,
    dhi: f64,
    ghi: f64,
    sun_elevation_deg: f64,
    sun_azimuth_deg: f64,
    panel_tilt_deg: f64,
    panel_azimuth_deg: f64,
    albedo: f64,
) -> f64 {
    let aoi_deg =
        angle_of_incidence(sun_elevation_deg, sun_azimuth_deg, panel_tilt_deg, panel_azimuth_deg);
    let cos_aoi = aoi_deg.to_radians().cos();
    let tilt_rad = panel_tilt_deg.to_radians();

    let beam = if cos_aoi > 0.0 && sun_elevation_deg > 0.0 { dni * cos_aoi } else { 0.0 };
    let sky_diffuse = dhi * (1.0 + tilt_rad.cos()) / 2.0;
    let ground_diffuse = ghi * albedo * (1.0 - tilt_rad.cos()) / 2.0;

    beam + sky_diffuse + ground_diffuse
}

// ===================== AMBIENT TEMPERATURE =====================

/// Seasonal sinusoidal ambient temperature estimate, °C.
///
/// Daily minimum at 06:00, maximum at 14:00; seasonal mean and swing vary
/// with the month and drift with latitude away from 40°N.
pub fn ambient_temperature(month: u32, latitude_deg: f64, hour: u32) -> f64 {
    let (mean, swing) = match month {
        12 | 1 | 2 => (8.0 - (latitude_deg - 40.0) * 0.5, 6.0),
        3..=5 => (15.0 - (latitude_deg - 40.0) * 0.3, 8.0),
        6..=8 => (26.0 - (latitude_deg - 40.0) * 0.4, 10.0),
        _ => (16.0 - (latitude_deg - 40.0) * 0.3, 7.0),
    };
    mean + swing * (std::f64::consts::PI * (hour as f64 - 6.0) / 12.0).sin()
}

// ===================== YIELD SIMULATION =====================

/// Simulate the array's electrical production over one day of sky samples.
///
/// Cell temperature follows the NOCT model
/// `T_cell = T_amb + POA/800 * (NOCT - 20)` and derates the module
/// efficiency by the temperature coefficient relative to 25 °C.
pub fn simulate_yield(
    panel: &PanelGeometry,
    field: &FieldLayout,
    array: &PvArray,
    latitude_deg: f64,
    sky: &SkyDay,
) -> PvYield {
    let area = panel.nominal_area_m2();
    let count = field.panel_count as f64;

    let mut poa_wm2 = Vec::with_capacity(sky.samples.len());
    let mut power_total_w = Vec::with_capacity(sky.samples.len());
    let mut energy_single_wh = 0.0;
    let mut cell_temp_sum = 0.0;

    for sample in &sky.samples {
        let poa = plane_of_array(
            sample.dni_wm2,
            sample.dhi_wm2,
            sample.ghi_wm2,
            sample.elevation_deg,
            sample.azimuth_deg,
            panel.tilt_deg,
            panel.azimuth_deg,
            array.albedo,
        );

        let t_amb = ambient_temperature(sample.time.month(), latitude_deg, sample.time.hour());
        let t_cell = t_amb + poa / 800.0 * (array.noct_c - 20.0);
        let eff_corr = array.efficiency * (1.0 + array.temp_coeff_per_c * (t_cell - 25.0));

        let power_single = poa * area * eff_corr * (1.0 - array.system_losses);

        poa_wm2.push(poa);
        power_total_w.push(power_single * count);
        // Hourly samples: each watt of mean power is one watt-hour
        energy_single_wh += power_single;
        cell_temp_sum += t_cell;
    }

    let energy_total_wh = energy_single_wh * count;
    let module_surface = area * count;
    PvYield {
        poa_wm2,
        power_total_w,
        energy_single_wh,
        energy_total_wh,
        energy_per_m2_whm2: if module_surface > 0.0 { energy_total_wh / module_surface } else { 0.0 },
        cell_temp_mean_c: if sky.samples.is_empty() {
            0.0
        } else {
            cell_temp_sum / sky.samples.len() as f64
        },
    }
}

// ===================== TESTS =====================
