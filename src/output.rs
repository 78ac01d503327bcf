//! Output Formatting Module
//!
//! Terminal report for one simulated day: site, clear-sky irradiance,
//! array yield, ground coverage and the agronomic light budget.

use chrono_tz::Tz;

use crate::config::{FieldLayout, PanelGeometry};
use crate::crops::CropAssessment;
use crate::engine::{Advisory, AgrivoltaicDayResult};
use crate::pv::PvYield;
use crate::solar::SkyDay;
use crate::time::format_hms;

// ===================== FORMATTING HELPERS =====================

/// Format power for display
pub fn format_power(watts: f64) -> String {
    if watts >= 1000.0 { format!("{:.2} kW", watts / 1000.0) } else { format!("{:.1} W", watts) }
}

/// Format energy for display
pub fn format_energy(watt_hours: f64) -> String {
    if watt_hours >= 1000.0 {
        format!("{:.2} kWh", watt_hours / 1000.0)
    } else {
        format!("{:.1} Wh", watt_hours)
    }
}

/// Format irradiance for display
pub fn format_irradiance(w_per_m2: f64) -> String {
    format!("{:.0} W/m²", w_per_m2)
}

// ===================== TERMINAL OUTPUT =====================

/// Print the site header.
pub fn print_site(latitude: f64, longitude: f64, tz: Tz, date: chrono::NaiveDate) {
    println!("Location : lat={:.6}, lon={:.6}", latitude, longitude);
    println!("Timezone : {}", tz);
    println!("Date     : {}", date);
}

/// Print the clear-sky irradiance summary for the day.
pub fn print_solar_summary(sky: &SkyDay) {
    let count = sky.samples.len().max(1) as f64;
    let ghi_mean = sky.samples.iter().map(|s| s.ghi_wm2).sum::<f64>() / count;
    let dni_mean = sky.samples.iter().map(|s| s.dni_wm2).sum::<f64>() / count;
    let dhi_mean = sky.samples.iter().map(|s| s.dhi_wm2).sum::<f64>() / count;
    // Hourly samples: summed W/m² readings are Wh/m² directly
    let ghi_daily_whm2: f64 = sky.samples.iter().map(|s| s.ghi_wm2).sum();
    let daylight_hours = sky.samples.iter().filter(|s| s.elevation_deg > 0.0).count();

    println!();
    println!("=== Clear-Sky Irradiance (Ineichen-Perez) ===");
    println!("  GHI mean      : {}", format_irradiance(ghi_mean));
    println!("  DNI mean      : {}", format_irradiance(dni_mean));
    println!("  DHI mean      : {}", format_irradiance(dhi_mean));
    println!("  GHI daily     : {:.0} Wh/m²", ghi_daily_whm2);
    println!("  Daylight      : {}", format_hms(daylight_hours as i64 * 3600));
}

/// Print the ground coverage metrics of the installed array.
pub fn print_coverage(panel: &PanelGeometry, field: &FieldLayout) {
    println!();
    println!("=== Field Coverage ===");
    println!("  Panels        : {}", field.panel_count);
    println!("  Module surface: {:.1} m²", field.total_nominal_area_m2(panel));
    println!("  Ground shadow : {:.1} m² (tilt-projected)", field.total_projection_m2(panel));
    println!("  Field surface : {:.0} m²", field.field_area_m2);
    println!("  Coverage (GCR): {:.2}%", field.ground_coverage_ratio(panel) * 100.0);
    println!("  Free surface  : {:.0} m²", field.free_surface_m2(panel));
}

/// Print the array's daily electrical production.
pub fn print_pv_yield(pv: &PvYield) {
    let peak_power = pv.power_total_w.iter().copied().fold(0.0, f64::max);

    println!();
    println!("=== Photovoltaic Yield ===");
    println!("  Peak power    : {}", format_power(peak_power));
    println!("  Energy/panel  : {}", format_energy(pv.energy_single_wh));
    println!("  Energy total  : {}", format_energy(pv.energy_total_wh));
    println!("  Energy per m² : {:.0} Wh/m²", pv.energy_per_m2_whm2);
    println!("  Cell temp mean: {:.1} °C", pv.cell_temp_mean_c);
}

fn print_assessment(label: &str, assessment: &CropAssessment) {
    println!(
        "  {:<14}: {:6.2} mol/m²/d ({:5.1}% of optimum, {} [{}])",
        label,
        assessment.dli,
        assessment.percentage,
        assessment.status,
        assessment.status.color()
    );
}

/// Print the agronomic section: shading, light budget, crop suitability and
/// the uniformity diagnostic.
pub fn print_agronomics(result: &AgrivoltaicDayResult) {
    let suitability = &result.suitability;

    println!();
    println!("=== Shading ===");
    println!("  Mean fraction : {:.1}%", result.shade.mean_fraction * 100.0);
    println!("  Peak fraction : {:.1}%", result.shade.peak_fraction * 100.0);
    println!("  Peak shadow   : {:.1} m² per panel", result.shade.peak_area_m2);
    println!("  Peak length   : {:.1} m", result.shade.peak_length_m);

    println!();
    println!("=== Daily Light Integral ===");
    println!(
        "Crop: {} (requires {:.0}-{:.0} {})",
        suitability.crop,
        suitability.requirement.dli_min,
        suitability.requirement.dli_opt,
        suitability.requirement.unit
    );
    print_assessment("Under panels", &suitability.under_panels);
    print_assessment("Between rows", &suitability.between_rows);
    print_assessment("Field weighted", &suitability.field_weighted);
    println!("  Uniformity    : {:.2}", result.uniformity);
}

/// Print advisories to stderr so the report on stdout stays clean.
pub fn print_advisories(advisories: &[Advisory]) {
    for advisory in advisories {
        eprintln!("Warning: {}", advisory);
    }
}
