//! # 48-Hour Forecast & Scoring Engine
//!
//! Combines the solar position calculator with externally supplied (or
//! built-in default) price and weather-impact maps into per-hour forecast
//! records, a summary, and presentation cards.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, Timelike};
use std::collections::HashMap;
use tracing::info;

use super::profiles::DEFAULT_TOU_PRICES_CT;
use crate::domain::{ForecastAction, ForecastHour, ForecastSummary, Location, PriceLevel, WeatherImpact};
use crate::solar::{central_european_offset_hours, solar_position};

/// Forecast horizon in hours.
pub const FORECAST_HORIZON_HOURS: u32 = 48;

/// The forecast engine's mutable state: sparse override maps plus site
/// parameters. Missing price entries fall back to the built-in
/// time-of-use curve, missing weather entries to "no impact".
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    location: Location,
    /// Installed PV peak capacity in kW
    pv_peak_kw: f64,
    /// Price overrides in ct/kWh, keyed by hour offset from "now"
    price_overrides: HashMap<u32, f64>,
    /// Weather impact overrides (level, PV reduction %), keyed by hour offset
    weather_overrides: HashMap<u32, (WeatherImpact, f64)>,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(Location::default(), 8.0)
    }
}

impl ForecastEngine {
    pub fn new(location: Location, pv_peak_kw: f64) -> Self {
        Self {
            location,
            pv_peak_kw,
            price_overrides: HashMap::new(),
            weather_overrides: HashMap::new(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Replace the site wholesale (relocation).
    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn set_pv_peak_kw(&mut self, peak_kw: f64) {
        self.pv_peak_kw = peak_kw.max(0.0);
    }

    /// Override the price for one hour offset.
    pub fn set_price(&mut self, hour: u32, price_ct: f64) {
        self.price_overrides.insert(hour, price_ct);
    }

    /// Bulk price override, e.g. from a day-ahead tariff feed.
    pub fn set_prices(&mut self, prices: impl IntoIterator<Item = (u32, f64)>) {
        self.price_overrides.extend(prices);
    }

    /// Override the weather impact for one hour offset.
    pub fn set_weather_impact(&mut self, hour: u32, impact: WeatherImpact, pv_reduction_pct: f64) {
        self.weather_overrides
            .insert(hour, (impact, pv_reduction_pct.clamp(0.0, 100.0)));
    }

    /// Drop all overrides, reverting to the built-in profiles.
    pub fn clear_overrides(&mut self) {
        self.price_overrides.clear();
        self.weather_overrides.clear();
    }

    fn resolve_price(&self, hour: u32, instant: DateTime<FixedOffset>) -> f64 {
        match self.price_overrides.get(&hour) {
            Some(p) => *p,
            None => DEFAULT_TOU_PRICES_CT[instant.hour() as usize],
        }
    }

    fn resolve_weather(&self, hour: u32) -> (WeatherImpact, f64) {
        self.weather_overrides
            .get(&hour)
            .copied()
            .unwrap_or((WeatherImpact::None, 0.0))
    }

    /// Generate the 48-hour forecast starting from the current wall clock.
    pub fn generate_forecast(&self) -> Vec<ForecastHour> {
        self.generate_forecast_at(Local::now().fixed_offset())
    }

    /// Generate the 48-hour forecast starting from `now`.
    ///
    /// The horizon average price is recomputed fresh on every call; price
    /// levels are relative to the forecast they appear in, not to any
    /// cached history.
    pub fn generate_forecast_at(&self, now: DateTime<FixedOffset>) -> Vec<ForecastHour> {
        let instants: Vec<DateTime<FixedOffset>> = (0..FORECAST_HORIZON_HOURS)
            .map(|h| now + Duration::hours(h as i64))
            .collect();

        let prices: Vec<f64> = instants
            .iter()
            .enumerate()
            .map(|(h, t)| self.resolve_price(h as u32, *t))
            .collect();
        let avg_price = prices.iter().sum::<f64>() / prices.len() as f64;

        let mut hours = Vec::with_capacity(FORECAST_HORIZON_HOURS as usize);
        for (h, instant) in instants.into_iter().enumerate() {
            let tz_offset = central_european_offset_hours(instant.month());
            let sun = solar_position(
                self.location.latitude,
                self.location.longitude,
                instant,
                tz_offset,
            );

            let price_ct = prices[h];
            let ratio = if avg_price > 0.0 { price_ct / avg_price } else { 1.0 };
            let price_level = PriceLevel::from_ratio(ratio);

            let (weather_impact, pv_reduction_pct) = self.resolve_weather(h as u32);
            let effective_pv = sun.pv_factor * (1.0 - pv_reduction_pct / 100.0);
            let pv_estimate_kw = effective_pv * self.pv_peak_kw;

            let score = score_hour(effective_pv, price_ct, weather_impact);
            let action = ForecastAction::from_score(score);

            hours.push(ForecastHour {
                hour: h as u32,
                timestamp: instant,
                pv_factor: sun.pv_factor,
                pv_estimate_kw,
                is_daylight: sun.is_daylight,
                price_ct,
                price_level,
                weather_impact,
                pv_reduction_pct,
                score,
                action,
            });
        }

        info!(
            horizon = FORECAST_HORIZON_HOURS,
            avg_price_ct = avg_price,
            "forecast generated"
        );
        hours
    }

    /// Aggregate a forecast sequence into summary statistics.
    pub fn generate_summary(&self, hours: &[ForecastHour]) -> ForecastSummary {
        if hours.is_empty() {
            return ForecastSummary {
                avg_price_ct: 0.0,
                min_price_ct: 0.0,
                max_price_ct: 0.0,
                cheapest_hour: 0,
                most_expensive_hour: 0,
                avg_pv_factor: 0.0,
                daylight_hours: 0,
                best_charge_window: 0,
                best_consume_window: 0,
                total_pv_estimate_kwh: 0.0,
                weather_impacted_hours: 0,
            };
        }

        let n = hours.len() as f64;
        let avg_price_ct = hours.iter().map(|h| h.price_ct).sum::<f64>() / n;
        let avg_pv_factor = hours.iter().map(|h| h.pv_factor).sum::<f64>() / n;

        let (mut cheapest, mut most_expensive) = (0usize, 0usize);
        for (i, h) in hours.iter().enumerate() {
            if h.price_ct < hours[cheapest].price_ct {
                cheapest = i;
            }
            if h.price_ct > hours[most_expensive].price_ct {
                most_expensive = i;
            }
        }

        // Charge window: hours whose action is not charge/consume compete
        // with score 0, so they only win when nothing qualifies
        let charge_score = |h: &ForecastHour| match h.action {
            ForecastAction::Charge | ForecastAction::Consume => h.score,
            _ => 0.0,
        };
        let (mut best_charge, mut best_consume) = (0usize, 0usize);
        for (i, h) in hours.iter().enumerate() {
            if charge_score(h) > charge_score(&hours[best_charge]) {
                best_charge = i;
            }
            if h.score > hours[best_consume].score {
                best_consume = i;
            }
        }

        // 1-hour buckets, so kW sums directly to kWh
        let total_pv_estimate_kwh = hours.iter().map(|h| h.pv_estimate_kw).sum();

        ForecastSummary {
            avg_price_ct,
            min_price_ct: hours[cheapest].price_ct,
            max_price_ct: hours[most_expensive].price_ct,
            cheapest_hour: hours[cheapest].hour,
            most_expensive_hour: hours[most_expensive].hour,
            avg_pv_factor,
            daylight_hours: hours.iter().filter(|h| h.is_daylight).count() as u32,
            best_charge_window: hours[best_charge].hour,
            best_consume_window: hours[best_consume].hour,
            total_pv_estimate_kwh,
            weather_impacted_hours: hours
                .iter()
                .filter(|h| h.weather_impact != WeatherImpact::None)
                .count() as u32,
        }
    }
}

/// Favorability score for one hour: baseline 5.0, up to +3.0 for effective
/// PV, an ordered price adjustment, weather deductions, clamped to [0, 10].
fn score_hour(effective_pv: f64, price_ct: f64, weather_impact: WeatherImpact) -> f64 {
    let mut score = 5.0;
    score += 3.0 * effective_pv;
    score += price_adjustment(price_ct);
    score += match weather_impact {
        WeatherImpact::High => -1.0,
        WeatherImpact::Moderate => -0.5,
        _ => 0.0,
    };
    score.clamp(0.0, 10.0)
}

/// Ordered, mutually exclusive price adjustment tiers.
///
/// The ordering is observable behavior: the `>= 35.0` arm shadows the
/// `>= 40.0` arm, so the steep penalty never fires and every price of 35
/// or more receives -1.5. Locked in by regression tests; do not reorder.
fn price_adjustment(price_ct: f64) -> f64 {
    if price_ct <= 20.0 {
        2.0
    } else if price_ct <= 25.0 {
        1.0
    } else if price_ct >= 35.0 {
        -1.5
    } else if price_ct >= 40.0 {
        -3.0
    } else {
        0.0
    }
}
