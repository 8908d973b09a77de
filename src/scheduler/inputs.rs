//! Hour-indexed input resolution for the scheduler.
//!
//! Every signal (outdoor temperature, price, PV surplus) resolves through
//! the same three-tier chain: exact plan hour, then hour of day, then the
//! built-in winter-day profile. The chain makes every lookup total; the
//! scheduler never sees a missing value.

use serde::Deserialize;
use std::collections::HashMap;

/// Default winter-day outdoor temperature profile, degC by hour of day.
/// Early-morning minimum, mild early afternoon.
pub const DEFAULT_WINTER_OUTDOOR_C: [f64; 24] = [
    -3.0, -3.0, -4.0, -4.0, -4.0, -3.0, // 00-05
    -2.0, -1.0, 0.0, 1.0, 2.0, 3.0, // 06-11
    4.0, 4.0, 3.0, 2.0, 1.0, 0.0, // 12-17
    -1.0, -1.0, -2.0, -2.0, -3.0, -3.0, // 18-23
];

/// Default winter-day electricity price profile, ct/kWh by hour of day.
/// Owned by the scheduler; independent of the forecast engine's curve.
pub const DEFAULT_WINTER_PRICES_CT: [f64; 24] = [
    18.0, 17.0, 16.0, 16.0, 17.0, 20.0, // 00-05
    25.0, 30.0, 32.0, 29.0, 26.0, 24.0, // 06-11
    22.0, 22.0, 23.0, 25.0, 28.0, 32.0, // 12-17
    35.0, 36.0, 33.0, 28.0, 24.0, 20.0, // 18-23
];

/// Default winter-day PV surplus profile, kW by hour of day. Peaks below
/// the 1.0 kW solar-boost threshold, so all-default plans never boost.
pub const DEFAULT_WINTER_PV_SURPLUS_KW: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 00-05
    0.0, 0.0, 0.1, 0.3, 0.6, 0.8, // 06-11
    0.9, 0.8, 0.5, 0.2, 0.0, 0.0, // 12-17
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 18-23
];

/// One sparse hourly signal with its three-tier fallback chain.
#[derive(Debug, Clone)]
pub struct HourlySeries {
    /// Overrides keyed by absolute plan hour
    exact: HashMap<u32, f64>,
    /// Overrides keyed by hour of day (0-23), typically from imports
    by_hour_of_day: HashMap<u32, f64>,
    /// Built-in 24-entry default profile
    defaults: [f64; 24],
}

impl HourlySeries {
    pub fn new(defaults: [f64; 24]) -> Self {
        Self {
            exact: HashMap::new(),
            by_hour_of_day: HashMap::new(),
            defaults,
        }
    }

    /// Set a value for an absolute plan hour.
    pub fn set_exact(&mut self, hour: u32, value: f64) {
        self.exact.insert(hour, value);
    }

    /// Set a value for an hour of day (wrapped into 0-23).
    pub fn set_hour_of_day(&mut self, hour_of_day: u32, value: f64) {
        self.by_hour_of_day.insert(hour_of_day % 24, value);
    }

    /// Resolve a plan hour: exact hour, then hour of day, then default.
    pub fn resolve(&self, hour: u32) -> f64 {
        let hod = hour % 24;
        if let Some(v) = self.exact.get(&hour) {
            *v
        } else if let Some(v) = self.by_hour_of_day.get(&hod) {
            *v
        } else {
            self.defaults[hod as usize]
        }
    }

    /// Drop all overrides, reverting to the built-in profile.
    pub fn clear(&mut self) {
        self.exact.clear();
        self.by_hour_of_day.clear();
    }
}

/// One imported weather record, keyed by hour of day. Accepts both the
/// `temperature_c` and the shorter `temp_c` field name.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherRecord {
    pub hour: u32,
    #[serde(alias = "temp_c")]
    pub temperature_c: f64,
}

/// One imported tariff record, keyed by hour of day. Accepts both the
/// `price_ct` and the plain `price` field name.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffRecord {
    pub hour: u32,
    #[serde(alias = "price")]
    pub price_ct: f64,
}
