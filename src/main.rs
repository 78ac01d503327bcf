use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_english::{Dialect, parse_date_string};
use chrono_tz::Tz;
use clap::Parser;

use agrivolt::cli::Args;
use agrivolt::config::{AggregationPolicy, FieldLayout, PanelGeometry, SimulationConfig};
use agrivolt::crops::CropTable;
use agrivolt::pv::{self, PvArray};
use agrivolt::solar::SolarContext;
use agrivolt::time::{resolve_timezone, system_timezone};
use agrivolt::{engine, output};

// ===================== MAIN =====================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let tz = if args.utc {
        Tz::UTC
    } else {
        match args.timezone.as_str() {
            "system" => system_timezone(),
            "location" => resolve_timezone(args.longitude, args.latitude),
            other => other.parse().unwrap_or(Tz::UTC),
        }
    };

    // Anchor 'today' to the target timezone
    let anchor_time = Utc::now().with_timezone(&tz);
    let date = match &args.date {
        Some(s) => parse_date_string(s, anchor_time, Dialect::Us)?.with_timezone(&tz),
        None => anchor_time,
    };

    // Logical midnight for the simulated day: the first valid local time on
    // that calendar date (00:00, or 01:00 across a DST gap).
    let naive_date = date.date_naive();
    let start_of_day: DateTime<Tz> = {
        let midnight = naive_date.and_hms_opt(0, 0, 0).ok_or("invalid date")?;
        match tz.from_local_datetime(&midnight) {
            chrono::LocalResult::Single(t) => t,
            chrono::LocalResult::Ambiguous(t, _) => t,
            chrono::LocalResult::None => {
                let one = naive_date.and_hms_opt(1, 0, 0).ok_or("invalid date")?;
                tz.from_local_datetime(&one).earliest().ok_or("cannot resolve start of day")?
            }
        }
    };

    let context = SolarContext::for_date(
        args.latitude,
        args.longitude,
        args.altitude,
        date.year(),
        date.month(),
        args.linke_turbidity,
    )?;
    let sky = context.sample_day(start_of_day);
    let day = sky.solar_day()?;

    let panel = PanelGeometry::new(args.panel_long_side, args.panel_short_side)
        .with_tilt(args.tilt)
        .with_azimuth(args.panel_azimuth)
        .with_ground_clearance(args.ground_clearance);
    let field = FieldLayout::from_hectares(args.panels, args.hectares, args.row_pitch);

    let aggregation = match args.aggregation.as_str() {
        "naive" => AggregationPolicy::Naive,
        _ => AggregationPolicy::OverlapCorrected,
    };
    let config =
        SimulationConfig::new(panel, field, args.crop.clone()).with_aggregation(aggregation);

    let table = match &args.crops_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            CropTable::from_json(&json)?
        }
        None => CropTable::builtin(),
    };

    let evaluation = engine::run_with_table(&config, &day, &table)?;
    let pv_yield = pv::simulate_yield(&panel, &field, &PvArray::default(), args.latitude, &sky);

    output::print_site(args.latitude, args.longitude, tz, naive_date);
    output::print_solar_summary(&sky);
    output::print_coverage(&panel, &field);
    output::print_pv_yield(&pv_yield);
    output::print_agronomics(&evaluation.value);
    output::print_advisories(&evaluation.advisories);

    Ok(())
}
