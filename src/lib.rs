//! Agrivoltaic Day Simulator
//!
//! Estimates, for a single simulated day, the energy yield of a
//! ground-mounted photovoltaic array and the light budget reaching the soil
//! beneath it: dynamic panel shadows, field-level shaded fraction,
//! photosynthetically active radiation (PAR), Daily Light Integral (DLI) and
//! agronomic crop suitability.
//!
//! The pipeline runs strictly in dependency order over immutable hourly
//! series: shadow projection → shaded-fraction aggregation → light budget →
//! crop evaluation (plus an optional uniformity diagnostic). Each run is
//! independent and side-effect free.

pub mod cli;
pub mod config;
pub mod crops;
pub mod engine;
pub mod light;
pub mod output;
pub mod pv;
pub mod series;
pub mod shadow;
pub mod solar;
pub mod time;

pub use config::{
    AggregationPolicy, ConfigError, FieldLayout, LightConstants, PanelGeometry, SimulationConfig,
    TransmissionModel,
};
pub use crops::{CropAssessment, CropRequirement, CropStatus, CropSuitability, CropTable};
pub use engine::{Advisory, AgrivoltaicDayResult, Evaluation};
pub use light::{DailyLightBudget, ParSeries};
pub use series::{SolarDay, SunSample};
pub use shadow::{ShadeStats, ShadowSample};
