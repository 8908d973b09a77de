use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::types::{ForecastAction, PriceLevel, WeatherImpact};

/// One hour of the 48-hour production/price/action forecast.
///
/// Produced fresh on every `generate_forecast` call; the sequence is
/// contiguous and strictly hourly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastHour {
    /// Offset from "now" (0-47)
    pub hour: u32,
    /// Start of the forecast hour
    pub timestamp: DateTime<FixedOffset>,
    /// Raw solar PV factor (0.0-1.0) before weather reduction
    pub pv_factor: f64,
    /// Estimated PV production in kW after weather reduction
    pub pv_estimate_kw: f64,
    /// Whether the sun is above the horizon in this hour
    pub is_daylight: bool,
    /// Electricity price in ct/kWh
    pub price_ct: f64,
    /// Price classification relative to the 48-hour average
    pub price_level: PriceLevel,
    /// Weather impact level on PV production
    pub weather_impact: WeatherImpact,
    /// PV reduction from weather in percent (0-100)
    pub pv_reduction_pct: f64,
    /// Favorability score (0.0-10.0, higher = better hour to use energy)
    pub score: f64,
    /// Recommended action for this hour
    pub action: ForecastAction,
}

/// Aggregate statistics over one forecast sequence. Derived, never mutated
/// independently of the hours it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Average price over the horizon in ct/kWh
    pub avg_price_ct: f64,
    /// Lowest hourly price in ct/kWh
    pub min_price_ct: f64,
    /// Highest hourly price in ct/kWh
    pub max_price_ct: f64,
    /// Hour offset of the cheapest hour
    pub cheapest_hour: u32,
    /// Hour offset of the most expensive hour
    pub most_expensive_hour: u32,
    /// Average raw PV factor over the horizon
    pub avg_pv_factor: f64,
    /// Number of daylight hours in the horizon
    pub daylight_hours: u32,
    /// Best hour to charge storage (max score among charge/consume hours)
    pub best_charge_window: u32,
    /// Best hour to consume (global max-score hour)
    pub best_consume_window: u32,
    /// Total estimated PV production over the horizon in kWh
    pub total_pv_estimate_kwh: f64,
    /// Number of hours with a weather impact above `none`
    pub weather_impacted_hours: u32,
}
