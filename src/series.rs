//! Input Time Series Module
//!
//! The simulated day as consumed by the engine: an ordered, timezone-aware
//! sequence of hourly sun-position and irradiance samples, produced upstream
//! and never mutated by the core.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::ConfigError;

// ===================== TYPES =====================

/// One timestep of upstream input: sun position plus clear-sky global
/// horizontal irradiance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunSample {
    pub time: DateTime<Tz>,
    /// Sun elevation above the horizon, degrees (negative at night)
    pub elevation_deg: f64,
    /// Sun azimuth, degrees (0 = N, 90 = E, 180 = S)
    pub azimuth_deg: f64,
    /// Clear-sky global horizontal irradiance, W/m²
    pub ghi_wm2: f64,
}

/// A full simulated day, walked strictly in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarDay {
    samples: Vec<SunSample>,
}

impl SolarDay {
    /// Build a day from already-assembled samples, checking ordering once.
    pub fn new(samples: Vec<SunSample>) -> Result<Self, ConfigError> {
        if samples.is_empty() {
            return Err(ConfigError::EmptySeries);
        }
        for (index, pair) in samples.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                return Err(ConfigError::OutOfOrder { index: index + 1 });
            }
        }
        Ok(Self { samples })
    }

    /// Build a day from separate sun-position and irradiance series, as
    /// delivered by an external solar provider. Length and timestamp
    /// alignment is checked once here, at pipeline entry.
    pub fn from_series(
        positions: &[(DateTime<Tz>, f64, f64)],
        irradiance: &[(DateTime<Tz>, f64)],
    ) -> Result<Self, ConfigError> {
        if positions.len() != irradiance.len() {
            return Err(ConfigError::SeriesMismatch {
                positions: positions.len(),
                irradiance: irradiance.len(),
            });
        }
        let mut samples = Vec::with_capacity(positions.len());
        for (index, (&(time, elevation_deg, azimuth_deg), &(ghi_time, ghi_wm2))) in
            positions.iter().zip(irradiance.iter()).enumerate()
        {
            if time != ghi_time {
                return Err(ConfigError::TimestampMismatch { index });
            }
            samples.push(SunSample { time, elevation_deg, azimuth_deg, ghi_wm2 });
        }
        Self::new(samples)
    }

    pub fn samples(&self) -> &[SunSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of one sample in seconds, derived from the first pair of
    /// timestamps. A single-sample day defaults to hourly sampling.
    pub fn step_seconds(&self) -> f64 {
        match self.samples.windows(2).next() {
            Some(pair) => (pair[1].time - pair[0].time).num_seconds() as f64,
            None => 3600.0,
        }
    }

    /// Number of samples with the sun above the horizon.
    pub fn daylight_samples(&self) -> usize {
        self.samples.iter().filter(|s| s.elevation_deg > 0.0).count()
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Europe::Rome;

    fn hourly_times(count: usize) -> Vec<DateTime<Tz>> {
        let start = Rome.with_ymd_and_hms(2025, 6, 21, 0, 0, 0).unwrap();
        (0..count).map(|h| start + Duration::hours(h as i64)).collect()
    }

    #[test]
    fn test_from_series_alignment() {
        let times = hourly_times(3);
        let positions: Vec<_> = times.iter().map(|&t| (t, 10.0, 180.0)).collect();
        let irradiance: Vec<_> = times.iter().map(|&t| (t, 500.0)).collect();

        let day = SolarDay::from_series(&positions, &irradiance).unwrap();
        assert_eq!(day.len(), 3);
        assert!((day.step_seconds() - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_series_length_mismatch() {
        let times = hourly_times(3);
        let positions: Vec<_> = times.iter().map(|&t| (t, 10.0, 180.0)).collect();
        let irradiance: Vec<_> = times.iter().take(2).map(|&t| (t, 500.0)).collect();

        assert!(matches!(
            SolarDay::from_series(&positions, &irradiance),
            Err(ConfigError::SeriesMismatch { positions: 3, irradiance: 2 })
        ));
    }

    #[test]
    fn test_from_series_timestamp_mismatch() {
        let times = hourly_times(3);
        let positions: Vec<_> = times.iter().map(|&t| (t, 10.0, 180.0)).collect();
        let mut irradiance: Vec<_> = times.iter().map(|&t| (t, 500.0)).collect();
        irradiance[1].0 = irradiance[1].0 + Duration::minutes(30);

        assert!(matches!(
            SolarDay::from_series(&positions, &irradiance),
            Err(ConfigError::TimestampMismatch { index: 1 })
        ));
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(SolarDay::new(Vec::new()), Err(ConfigError::EmptySeries)));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let times = hourly_times(3);
        let samples = vec![
            SunSample { time: times[1], elevation_deg: 0.0, azimuth_deg: 0.0, ghi_wm2: 0.0 },
            SunSample { time: times[0], elevation_deg: 0.0, azimuth_deg: 0.0, ghi_wm2: 0.0 },
        ];
        assert!(matches!(SolarDay::new(samples), Err(ConfigError::OutOfOrder { index: 1 })));
    }

    #[test]
    fn test_daylight_samples() {
        let times = hourly_times(4);
        let elevations = [-5.0, 0.0, 12.0, 30.0];
        let samples: Vec<_> = times
            .iter()
            .zip(elevations)
            .map(|(&time, elevation_deg)| SunSample {
                time,
                elevation_deg,
                azimuth_deg: 180.0,
                ghi_wm2: 0.0,
            })
            .collect();
        let day = SolarDay::new(samples).unwrap();
        assert_eq!(day.daylight_samples(), 2);
    }
}
