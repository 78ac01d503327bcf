//! Command-Line Interface Module
//!
//! Handles argument parsing and validation for the agrivolt application.

use std::path::PathBuf;

use clap::Parser;

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Site latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude, env = "AGRIVOLT_LATITUDE")]
    pub latitude: f64,
    /// Site longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude, env = "AGRIVOLT_LONGITUDE")]
    pub longitude: f64,
    /// Site altitude above mean sea level (meters, may be negative)
    /// Valid range: -500m (Dead Sea) to 11000m (Troposphere limit for ISA formula)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true, value_parser = parse_altitude, env = "AGRIVOLT_ALTITUDE")]
    pub altitude: f64,
    /// Time zone to use ("system", "location", or IANA time zone name)
    #[arg(long, default_value = "system", env = "AGRIVOLT_TIMEZONE")]
    pub timezone: String,
    /// Date to simulate (e.g., "2026-06-21" or "today"); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Use UTC time zone
    #[arg(long)]
    pub utc: bool,

    // ===================== PANEL OPTIONS =====================
    /// Panel long side in meters
    #[arg(long, default_value_t = 2.0, value_parser = parse_positive_f64, env = "AGRIVOLT_PANEL_LONG_SIDE")]
    pub panel_long_side: f64,

    /// Panel short side in meters (the side raised by the tilt)
    #[arg(long, default_value_t = 1.0, value_parser = parse_positive_f64, env = "AGRIVOLT_PANEL_SHORT_SIDE")]
    pub panel_short_side: f64,

    /// Panel tilt angle in degrees (0 = flat/horizontal, 90 = vertical)
    #[arg(long, default_value_t = 30.0, value_parser = parse_tilt, env = "AGRIVOLT_TILT")]
    pub tilt: f64,

    /// Panel azimuth in degrees (180 = facing south in northern hemisphere)
    #[arg(long, default_value_t = 180.0, value_parser = parse_azimuth, env = "AGRIVOLT_PANEL_AZIMUTH")]
    pub panel_azimuth: f64,

    /// Height of the panel's lower edge above the soil in meters
    #[arg(long, default_value_t = 1.0, value_parser = parse_non_negative_f64, env = "AGRIVOLT_GROUND_CLEARANCE")]
    pub ground_clearance: f64,

    // ===================== FIELD OPTIONS =====================
    /// Number of installed panels
    #[arg(long, default_value_t = 1, value_parser = parse_panel_count, env = "AGRIVOLT_PANELS")]
    pub panels: u32,

    /// Field surface in hectares
    #[arg(long, default_value_t = 1.0, value_parser = parse_positive_f64, env = "AGRIVOLT_HECTARES")]
    pub hectares: f64,

    /// Row pitch in meters (spacing used by the shadow overlap correction)
    #[arg(long, default_value_t = 2.0, value_parser = parse_positive_f64, env = "AGRIVOLT_ROW_PITCH")]
    pub row_pitch: f64,

    /// How per-panel shadows aggregate into the field shaded fraction
    #[arg(long, default_value = "overlap", value_parser = ["overlap", "naive"], env = "AGRIVOLT_AGGREGATION")]
    pub aggregation: String,

    // ===================== AGRONOMY OPTIONS =====================
    /// Crop evaluated against the daily light integral
    #[arg(long, default_value = "Cereali", env = "AGRIVOLT_CROP")]
    pub crop: String,

    /// JSON file with a custom crop requirement table
    #[arg(long, env = "AGRIVOLT_CROPS_FILE")]
    pub crops_file: Option<PathBuf>,

    // ===================== ATMOSPHERE OPTIONS =====================
    /// Linke turbidity factor for clear-sky model (2-7 typical, 3 = clear)
    #[arg(long, default_value_t = 3.0, value_parser = parse_turbidity, env = "AGRIVOLT_LINKE_TURBIDITY")]
    pub linke_turbidity: f64,
}

// ===================== CLI VALUE PARSERS =====================

fn parse_latitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-90.0..=90.0).contains(&v) {
        return Err(format!("Latitude must be between -90 and 90, got {}", v));
    }
    Ok(v)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-180.0..=180.0).contains(&v) {
        return Err(format!("Longitude must be between -180 and 180, got {}", v));
    }
    Ok(v)
}

fn parse_altitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-500.0..=11000.0).contains(&v) {
        return Err(format!("Altitude must be between -500 and 11000 meters, got {}", v));
    }
    Ok(v)
}

fn parse_positive_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if v <= 0.0 {
        return Err(format!("Value must be positive, got {}", v));
    }
    Ok(v)
}

fn parse_non_negative_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if v < 0.0 {
        return Err(format!("Value cannot be negative, got {}", v));
    }
    Ok(v)
}

fn parse_tilt(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(0.0..=90.0).contains(&v) {
        return Err(format!("Tilt must be between 0 and 90 degrees, got {}", v));
    }
    Ok(v)
}

fn parse_azimuth(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(0.0..360.0).contains(&v) {
        return Err(format!("Azimuth must be at least 0 and below 360 degrees, got {}", v));
    }
    Ok(v)
}

fn parse_panel_count(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|_| format!("Invalid integer: {}", s))?;
    if v == 0 {
        return Err("At least one panel is required".to_string());
    }
    Ok(v)
}

fn parse_turbidity(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(1.0..=10.0).contains(&v) {
        return Err(format!("Linke turbidity must be between 1.0 and 10.0, got {}", v));
    }
    Ok(v)
}

// ===================== TESTS =====================
