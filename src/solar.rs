//! Solar Position and Clear-Sky Irradiance Provider
//!
//! Produces the hourly sun-position and irradiance series the simulation
//! consumes. Positions come from the NREL SPA (Solar Position Algorithm);
//! irradiance from the Ineichen-Perez clear-sky model.
//!
//! References:
//! - Ineichen, P. and Perez, R. (2002). "A new airmass independent
//!   formulation for the Linke turbidity coefficient"

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Duration};
use chrono_tz::Tz;
use solar_positioning::{spa, types::RefractionCorrection};

use crate::config::ConfigError;
use crate::series::{SolarDay, SunSample};

// ===================== CONSTANTS =====================

/// Solar constant (Total Solar Irradiance) in W/m²
const SOLAR_CONSTANT: f64 = 1361.0;

/// Default Linke turbidity factor for clear atmosphere
/// Typical values: 2-3 for very clear, 4-6 for industrial areas
pub const DEFAULT_LINKE_TURBIDITY: f64 = 3.0;

// ===================== TYPES =====================

/// One timestep of the full sky state, with the irradiance split the
/// photovoltaic model needs. The crop pipeline only consumes GHI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkySample {
    pub time: DateTime<Tz>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    /// Direct Normal Irradiance, W/m²
    pub dni_wm2: f64,
    /// Diffuse Horizontal Irradiance, W/m²
    pub dhi_wm2: f64,
    /// Global Horizontal Irradiance, W/m²
    pub ghi_wm2: f64,
}

/// A full day of sky samples as produced by [`SolarContext::sample_day`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkyDay {
    pub samples: Vec<SkySample>,
}

impl SkyDay {
    /// Reduce to the position-plus-GHI series the agronomic pipeline takes.
    pub fn solar_day(&self) -> Result<SolarDay, ConfigError> {
        SolarDay::new(
            self.samples
                .iter()
                .map(|s| SunSample {
                    time: s.time,
                    elevation_deg: s.elevation_deg,
                    azimuth_deg: s.azimuth_deg,
                    ghi_wm2: s.ghi_wm2,
                })
                .collect(),
        )
    }
}

// ===================== SOLAR CONTEXT =====================

/// Observer context for position and clear-sky calculations.
#[derive(Clone, Copy)]
pub struct SolarContext {
    /// Observer latitude in degrees
    pub lat: f64,
    /// Observer longitude in degrees
    pub lon: f64,
    /// Observer altitude in meters
    pub altitude_m: f64,
    /// Delta-T correction for TT-UT1 difference
    pub delta_t: f64,
    /// Atmospheric refraction correction
    pub refraction: Option<RefractionCorrection>,
    /// Linke turbidity factor (atmospheric clarity, 2-7 typical)
    pub linke_turbidity: f64,
}

impl SolarContext {
    /// Build a context for a calendar date, estimating Delta-T from it.
    pub fn for_date(
        lat: f64,
        lon: f64,
        altitude_m: f64,
        year: i32,
        month: u32,
        linke_turbidity: f64,
    ) -> Result<Self, solar_positioning::Error> {
        let delta_t = solar_positioning::time::DeltaT::estimate_from_date(year, month)?;
        Ok(Self {
            lat,
            lon,
            altitude_m,
            delta_t,
            refraction: Some(RefractionCorrection::standard()),
            linke_turbidity,
        })
    }

    /// Get the solar position at a given time.
    pub fn position(&self, t: DateTime<Tz>) -> solar_positioning::SolarPosition {
        spa::solar_position(t, self.lat, self.lon, self.altitude_m, self.delta_t, self.refraction)
            .unwrap()
    }

    /// Sample sun position and clear-sky irradiance hourly for one day,
    /// starting at local midnight.
    pub fn sample_day(&self, start_of_day: DateTime<Tz>) -> SkyDay {
        let samples = (0..24)
            .map(|hour| {
                let time = start_of_day + Duration::hours(hour);
                let position = self.position(time);
                let elevation_deg = position.elevation_angle();
                let azimuth_deg = position.azimuth();
                let (dni_wm2, dhi_wm2, ghi_wm2) = clear_sky_irradiance(
                    elevation_deg,
                    self.altitude_m,
                    time.ordinal(),
                    self.linke_turbidity,
                );
                SkySample { time, elevation_deg, azimuth_deg, dni_wm2, dhi_wm2, ghi_wm2 }
            })
            .collect();
        SkyDay { samples }
    }
}

// ===================== ATMOSPHERIC CALCULATIONS =====================

/// Calculate absolute air mass (pressure-corrected)
///
/// Kasten-Young (1989) relative air mass with an International Standard
/// Atmosphere pressure correction.
pub fn air_mass(sun_elevation_deg: f64, altitude_m: f64) -> f64 {
    if sun_elevation_deg <= 0.0 {
        return f64::INFINITY;
    }

    let zenith_deg = 90.0 - sun_elevation_deg;
    let zenith_rad = zenith_deg.to_radians();
    let am_relative = 1.0 / (zenith_rad.cos() + 0.50572 * (96.07995 - zenith_deg).powf(-1.6364));

    // ISA barometric pressure ratio, valid for the troposphere
    let pressure_ratio = if altitude_m.abs() < 1e-5 {
        1.0
    } else {
        (1.0 - 2.25577e-5 * altitude_m).powf(5.25588)
    };

    am_relative * pressure_ratio
}

/// Extraterrestrial irradiance corrected for Earth-Sun distance using the
/// Spencer (1971) eccentricity formula.
///
/// # Arguments
/// * `day_of_year` - Day of year (1-366)
pub fn extraterrestrial_irradiance(day_of_year: u32) -> f64 {
    let b = 2.0 * PI * (day_of_year as f64 - 1.0) / 365.0;

    let eccentricity_correction = 1.000110
        + 0.034221 * b.cos()
        + 0.001280 * b.sin()
        + 0.000719 * (2.0 * b).cos()
        + 0.000077 * (2.0 * b).sin();

    SOLAR_CONSTANT * eccentricity_correction
}

// ===================== INEICHEN-PEREZ CLEAR SKY MODEL =====================

/// Clear-sky (DNI, DHI, GHI) in W/m² from the Ineichen-Perez model.
///
/// # Arguments
/// * `sun_elevation_deg` - Sun elevation in degrees
/// * `altitude_m` - Observer altitude in meters
/// * `day_of_year` - Day of year (1-366)
/// * `linke_turbidity` - Linke turbidity factor (typical 2-7)
pub fn clear_sky_irradiance(
    sun_elevation_deg: f64,
    altitude_m: f64,
    day_of_year: u32,
    linke_turbidity: f64,
) -> (f64, f64, f64) {
    if sun_elevation_deg <= 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let am = air_mass(sun_elevation_deg, altitude_m);
    if !am.is_finite() || am <= 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let i0 = extraterrestrial_irradiance(day_of_year);
    let sin_elev = sun_elevation_deg.to_radians().sin();

    // Clamp altitude for the atmospheric coefficients to prevent model drift
    let clamped_alt = altitude_m.clamp(-500.0, 11000.0);

    // Altitude correction coefficients (Ineichen 2002)
    let fh1 = (-clamped_alt / 8000.0).exp();
    let fh2 = (-clamped_alt / 1250.0).exp();

    let altitude_km = clamped_alt / 1000.0;
    let tl = (linke_turbidity - 0.15 * altitude_km).max(1.0);

    let cg1 = 5.09e-5 * clamped_alt + 0.868;
    let cg2 = 3.92e-5 * clamped_alt + 0.0387;

    let b = 0.664 + 0.163 / fh1;
    let attenuation = (-cg2 * am * (fh1 + fh2 * (tl - 1.0))).exp();
    let dni = (b * i0 * attenuation).max(0.0).min(i0);

    let ghi_attenuation = (-cg2 * am * (fh1 + fh2 * (tl - 1.0)) * 1.1).exp();
    let ghi_raw = (cg1 * i0 * sin_elev * ghi_attenuation).max(0.0);

    // GHI cannot fall below the direct beam reaching the ground
    let direct_horizontal = dni * sin_elev;
    let ghi = ghi_raw.max(direct_horizontal);
    let dhi = (ghi - direct_horizontal).max(0.0);

    (dni, dhi, ghi)
}

// ===================== TESTS =====================
