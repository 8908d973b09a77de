//! # Heat Pump COP Scheduler
//!
//! Produces a horizon-length operating plan balancing efficiency, cost,
//! comfort, hot water safety, defrost physics, and free solar surplus,
//! then exposes a read-only live status derived from the last plan.
//!
//! The forward simulation is strictly sequential: each hour's decision
//! depends on the room and tank temperatures left behind by the previous
//! hour, so the loop cannot be reordered or parallelized.

use chrono::{DateTime, FixedOffset, Local};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{info, warn};

use super::cop::{calculate_cop, needs_defrost};
use super::inputs::{
    HourlySeries, TariffRecord, WeatherRecord, DEFAULT_WINTER_OUTDOOR_C, DEFAULT_WINTER_PRICES_CT,
    DEFAULT_WINTER_PV_SURPLUS_KW,
};
use super::thermal::{dhw_energy_need_kwh, dhw_temp_gain_k, heat_loss_kw, step_room_temp};
use crate::domain::{
    HeatPumpAction, HeatPumpConfig, HeatPumpHour, HeatPumpSchedule, HeatPumpStatus,
    OptimizationStrategy, PumpType,
};

/// Default planning horizon in hours.
pub const DEFAULT_HORIZON_HOURS: i32 = 48;

/// PV surplus above which an hour is worth a solar boost, kW.
const SOLAR_BOOST_THRESHOLD_KW: f64 = 1.0;

/// Fraction of nominal power a defrost cycle draws.
const DEFROST_POWER_FRACTION: f64 = 0.3;

/// Hot water standby loss per non-DHW hour, K.
const DHW_STANDBY_DECAY_K: f64 = 0.3;

/// Hot water temperature floor under standby decay, degC.
const DHW_DECAY_FLOOR_C: f64 = 20.0;

/// Hard cap on schedulable compressor hours per day.
const MAX_BUDGET_HOURS_PER_DAY: f64 = 18.0;

/// Per-hour planning features resolved before the simulation runs.
#[derive(Debug, Clone)]
struct HourFeatures {
    outdoor_temp_c: f64,
    price_ct: f64,
    pv_surplus_kw: f64,
    cop: f64,
    /// Price divided by COP: true cost per unit of delivered heat
    effective_cost: f64,
}

/// One scheduling context: owns the config, the input maps, and the cached
/// last plan. Pure computation; callers needing concurrency use separate
/// instances.
#[derive(Debug, Clone)]
pub struct HeatPumpController {
    config: HeatPumpConfig,
    strategy: OptimizationStrategy,
    outdoor_temps: HourlySeries,
    prices: HourlySeries,
    pv_surplus: HourlySeries,
    last_schedule: Option<HeatPumpSchedule>,
}

impl Default for HeatPumpController {
    fn default() -> Self {
        Self::new(HeatPumpConfig::default())
    }
}

impl HeatPumpController {
    pub fn new(config: HeatPumpConfig) -> Self {
        Self {
            config,
            strategy: OptimizationStrategy::CopOptimized,
            outdoor_temps: HourlySeries::new(DEFAULT_WINTER_OUTDOOR_C),
            prices: HourlySeries::new(DEFAULT_WINTER_PRICES_CT),
            pv_surplus: HourlySeries::new(DEFAULT_WINTER_PV_SURPLUS_KW),
            last_schedule: None,
        }
    }

    pub fn config(&self) -> &HeatPumpConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: HeatPumpConfig) {
        self.config = config;
    }

    /// Feed a measured room temperature into the next planning cycle.
    pub fn set_room_temp(&mut self, temp_c: f64) {
        self.config.set_room_temp(temp_c);
    }

    /// Feed a measured hot water temperature into the next planning cycle.
    pub fn set_hot_water_temp(&mut self, temp_c: f64) {
        self.config.set_hot_water_temp(temp_c);
    }

    pub fn strategy(&self) -> OptimizationStrategy {
        self.strategy
    }

    /// Set the optimization strategy by wire name. Unrecognized values are
    /// ignored, leaving the previous strategy in effect.
    pub fn set_strategy(&mut self, name: &str) {
        match name.parse::<OptimizationStrategy>() {
            Ok(strategy) => self.strategy = strategy,
            Err(_) => warn!(requested = name, "unknown strategy ignored"),
        }
    }

    /// Override the outdoor temperature for an absolute plan hour.
    pub fn set_outdoor_temp(&mut self, hour: u32, temp_c: f64) {
        self.outdoor_temps.set_exact(hour, temp_c);
    }

    /// Override the price for an absolute plan hour.
    pub fn set_price(&mut self, hour: u32, price_ct: f64) {
        self.prices.set_exact(hour, price_ct);
    }

    /// Override the PV surplus for an absolute plan hour.
    pub fn set_pv_surplus(&mut self, hour: u32, surplus_kw: f64) {
        self.pv_surplus.set_exact(hour, surplus_kw);
    }

    /// Import an hour-of-day weather profile, e.g. from a forecast feed.
    pub fn import_weather(&mut self, records: &[WeatherRecord]) {
        for r in records {
            self.outdoor_temps.set_hour_of_day(r.hour, r.temperature_c);
        }
    }

    /// Import an hour-of-day tariff profile.
    pub fn import_tariff(&mut self, records: &[TariffRecord]) {
        for r in records {
            self.prices.set_hour_of_day(r.hour, r.price_ct);
        }
    }

    /// Drop all input overrides, reverting to the built-in winter profiles.
    pub fn clear_inputs(&mut self) {
        self.outdoor_temps.clear();
        self.prices.clear();
        self.pv_surplus.clear();
    }

    /// Phase A: resolve inputs and precompute COP and effective cost for
    /// every hour of the horizon.
    fn compute_features(&self, horizon: usize) -> Vec<HourFeatures> {
        (0..horizon as u32)
            .map(|h| {
                let outdoor_temp_c = self.outdoor_temps.resolve(h);
                let price_ct = self.prices.resolve(h);
                let pv_surplus_kw = self.pv_surplus.resolve(h);
                let cop = calculate_cop(
                    self.config.pump_type,
                    outdoor_temp_c,
                    self.config.max_flow_temp_c,
                );
                HourFeatures {
                    outdoor_temp_c,
                    price_ct,
                    pv_surplus_kw,
                    cop,
                    effective_cost: price_ct / cop,
                }
            })
            .collect()
    }

    /// Phases B+C: rank hours by the active strategy and keep the top
    /// `budget` as the preferred set. `comfort_first` skips ranking and
    /// heats reactively instead.
    fn preferred_hours(&self, features: &[HourFeatures], horizon: usize) -> HashSet<u32> {
        if self.strategy == OptimizationStrategy::ComfortFirst {
            return HashSet::new();
        }

        let ranked = (0..features.len()).sorted_by(|a, b| match self.strategy {
            OptimizationStrategy::CopOptimized => {
                total_cmp(features[*a].effective_cost, features[*b].effective_cost)
            }
            // Raw price only; may pick inefficient cheap hours
            OptimizationStrategy::PriceOptimized => {
                total_cmp(features[*a].price_ct, features[*b].price_ct)
            }
            OptimizationStrategy::SolarBoost => {
                total_cmp(features[*b].pv_surplus_kw, features[*a].pv_surplus_kw).then(total_cmp(
                    features[*a].effective_cost,
                    features[*b].effective_cost,
                ))
            }
            OptimizationStrategy::ComfortFirst => unreachable!(),
        });

        let daily_budget = self.config.max_runtime_hours_per_day.min(MAX_BUDGET_HOURS_PER_DAY);
        let budget = (daily_budget * horizon as f64 / 24.0).floor() as usize;
        ranked.take(budget).map(|i| i as u32).collect()
    }

    /// Produce an operating plan for the given horizon, starting now.
    pub fn optimize(&mut self, horizon_hours: i32) -> HeatPumpSchedule {
        self.optimize_at(Local::now().fixed_offset(), horizon_hours)
    }

    /// Produce an operating plan for the given horizon, starting at `now`.
    ///
    /// Reads `current_room_temp_c` / `current_hot_water_temp_c` as initial
    /// conditions only; simulated end-of-horizon values are never written
    /// back into the config.
    pub fn optimize_at(
        &mut self,
        now: DateTime<FixedOffset>,
        horizon_hours: i32,
    ) -> HeatPumpSchedule {
        if horizon_hours <= 0 {
            let schedule = HeatPumpSchedule::empty(now, self.strategy);
            self.last_schedule = Some(schedule.clone());
            return schedule;
        }
        let horizon = horizon_hours as usize;

        let features = self.compute_features(horizon);
        let preferred = self.preferred_hours(&features, horizon);

        // Phase D: forward simulation. State carries across hours.
        let mut room = self.config.current_room_temp_c;
        let mut hot_water = self.config.current_hot_water_temp_c;

        let mut hours: Vec<HeatPumpHour> = Vec::with_capacity(horizon);
        let mut total_heat_kwh = 0.0;
        let mut total_electricity_kwh = 0.0;
        let mut total_cost_ct = 0.0;
        let mut dhw_cycles = 0u32;
        let mut defrost_hours = 0u32;
        let mut runtime_hours = 0u32;
        let (mut best_cop_hour, mut worst_cop_hour) = (0u32, 0u32);

        for (h, f) in features.iter().enumerate() {
            let h = h as u32;
            let mut action = HeatPumpAction::Off;
            let mut power_kw = 0.0;
            let mut heat_kwh = 0.0;
            let mut cost_ct = 0.0;
            let mut pv_used_kw = 0.0;
            let reason: String;

            // Priority cascade; first match wins and the order is
            // load-bearing (DHW safety > defrost > free solar > comfort >
            // scheduled heating).
            if hot_water < self.config.hot_water_min_c {
                action = HeatPumpAction::Dhw;
                let tank_before_c = hot_water;
                let need_kwh = dhw_energy_need_kwh(
                    self.config.tank_volume_l,
                    self.config.hot_water_target_c,
                    hot_water,
                );
                heat_kwh = (self.config.nominal_power_kw * f.cop).min(need_kwh);
                power_kw = heat_kwh / f.cop;
                cost_ct = power_kw * f.price_ct;
                hot_water = (hot_water + dhw_temp_gain_k(self.config.tank_volume_l, heat_kwh))
                    .min(self.config.hot_water_target_c);
                dhw_cycles += 1;
                // Compressor output goes to the tank; the room coasts
                room = step_room_temp(
                    self.config.thermal_mass_kwh_per_k,
                    room,
                    f.outdoor_temp_c,
                    0.0,
                );
                reason = format!(
                    "hot water {:.1}C below minimum {:.1}C",
                    tank_before_c, self.config.hot_water_min_c
                );
            } else if self.config.pump_type != PumpType::GroundWater
                && needs_defrost(f.outdoor_temp_c, self.config.defrost_threshold_c)
                && h % 4 == 0
            {
                // Duty-cycle approximation: defrost is only evaluated on
                // every fourth hour, not on every qualifying cold hour
                action = HeatPumpAction::Defrost;
                power_kw = DEFROST_POWER_FRACTION * self.config.nominal_power_kw;
                heat_kwh = 0.0; // defrost yields no useful heat
                cost_ct = power_kw * f.price_ct;
                defrost_hours += 1;
                room = step_room_temp(
                    self.config.thermal_mass_kwh_per_k,
                    room,
                    f.outdoor_temp_c,
                    0.0,
                );
                reason = format!("defrost cycle at {:.1}C outdoor", f.outdoor_temp_c);
            } else if f.pv_surplus_kw > SOLAR_BOOST_THRESHOLD_KW {
                action = HeatPumpAction::SolarBoost;
                power_kw = f.pv_surplus_kw.min(self.config.nominal_power_kw);
                heat_kwh = power_kw * f.cop;
                cost_ct = 0.0; // self-consumed surplus
                pv_used_kw = power_kw;
                room = step_room_temp(
                    self.config.thermal_mass_kwh_per_k,
                    room,
                    f.outdoor_temp_c,
                    heat_kwh,
                );
                reason = format!("solar boost with {:.1} kW surplus", pv_used_kw);
            } else if self.strategy == OptimizationStrategy::ComfortFirst {
                if room < self.config.target_room_temp_c - 0.5 {
                    action = HeatPumpAction::Heat;
                    power_kw = self.config.nominal_power_kw;
                    heat_kwh = power_kw * f.cop;
                    cost_ct = power_kw * f.price_ct;
                    let room_before_c = room;
                    room = step_room_temp(
                        self.config.thermal_mass_kwh_per_k,
                        room,
                        f.outdoor_temp_c,
                        heat_kwh,
                    );
                    reason = format!(
                        "comfort heating, room {:.1}C below setpoint {:.1}C",
                        room_before_c, self.config.target_room_temp_c
                    );
                } else {
                    room = step_room_temp(
                        self.config.thermal_mass_kwh_per_k,
                        room,
                        f.outdoor_temp_c,
                        0.0,
                    );
                    reason = "comfort setpoint satisfied".to_string();
                }
            } else if preferred.contains(&h) {
                let deficit = self.config.target_room_temp_c - room;
                let loss_kw =
                    heat_loss_kw(self.config.thermal_mass_kwh_per_k, room, f.outdoor_temp_c);
                // Heat unless the room is already more than 2 C above target
                // or there is no loss to cover
                if deficit > -2.0 && loss_kw > 0.0 {
                    action = HeatPumpAction::Heat;
                    power_kw = self.config.nominal_power_kw;
                    heat_kwh = power_kw * f.cop;
                    cost_ct = power_kw * f.price_ct;
                    room = step_room_temp(
                        self.config.thermal_mass_kwh_per_k,
                        room,
                        f.outdoor_temp_c,
                        heat_kwh,
                    );
                    reason = format!(
                        "scheduled heating ({}), effective cost {:.2} ct/kWh",
                        self.strategy, f.effective_cost
                    );
                } else {
                    room = step_room_temp(
                        self.config.thermal_mass_kwh_per_k,
                        room,
                        f.outdoor_temp_c,
                        0.0,
                    );
                    reason = "scheduled but room already warm enough".to_string();
                }
            } else {
                room = step_room_temp(
                    self.config.thermal_mass_kwh_per_k,
                    room,
                    f.outdoor_temp_c,
                    0.0,
                );
                reason = "outside preferred hours".to_string();
            }

            // Tank standby loss on every hour the pump is not reheating it
            if action != HeatPumpAction::Dhw {
                hot_water = (hot_water - DHW_STANDBY_DECAY_K).max(DHW_DECAY_FLOOR_C);
            }

            if action != HeatPumpAction::Off {
                runtime_hours += 1;
                total_heat_kwh += heat_kwh;
                total_electricity_kwh += power_kw;
                total_cost_ct += cost_ct;
            }

            // COP extrema are tracked across every hour, whatever it does
            if f.cop > features[best_cop_hour as usize].cop {
                best_cop_hour = h;
            }
            if f.cop < features[worst_cop_hour as usize].cop {
                worst_cop_hour = h;
            }

            hours.push(HeatPumpHour {
                hour: h,
                action,
                power_kw,
                cop: f.cop,
                outdoor_temp_c: f.outdoor_temp_c,
                price_ct: f.price_ct,
                cost_ct,
                heat_kwh,
                room_temp_c: room,
                hot_water_temp_c: hot_water,
                pv_used_kw,
                reason,
            });
        }

        // Phase E: aggregates
        let avg_cop = if total_electricity_kwh > 0.0 {
            total_heat_kwh / total_electricity_kwh
        } else {
            0.0
        };

        let schedule = HeatPumpSchedule {
            generated_at: now,
            strategy: self.strategy,
            hours,
            total_heat_kwh,
            total_electricity_kwh,
            total_cost_eur: total_cost_ct / 100.0,
            avg_cop,
            best_cop_hour,
            worst_cop_hour,
            dhw_cycles,
            defrost_hours,
            runtime_hours,
        };

        info!(
            horizon = horizon,
            strategy = %self.strategy,
            runtime_hours,
            dhw_cycles,
            defrost_hours,
            total_cost_eur = schedule.total_cost_eur,
            avg_cop = schedule.avg_cop,
            "heat pump schedule optimized"
        );

        self.last_schedule = Some(schedule.clone());
        schedule
    }

    /// Live status derived purely from the cached last plan; never
    /// recomputes. With no cached plan, reports an off baseline.
    pub fn get_status(&self) -> HeatPumpStatus {
        let (current_action, current_power_kw, current_cop, next_action, next_action_hour) =
            match &self.last_schedule {
                Some(schedule) => {
                    let current = schedule.first_active_hour();
                    let next = schedule.next_active_hour();
                    (
                        current.map(|h| h.action).unwrap_or(HeatPumpAction::Off),
                        current.map(|h| h.power_kw).unwrap_or(0.0),
                        current.map(|h| h.cop).unwrap_or(0.0),
                        next.map(|h| h.action),
                        next.map(|h| h.hour),
                    )
                }
                None => (HeatPumpAction::Off, 0.0, 0.0, None, None),
            };

        HeatPumpStatus {
            current_action,
            current_power_kw,
            current_cop,
            next_action,
            next_action_hour,
            room_temp_c: self.config.current_room_temp_c,
            hot_water_temp_c: self.config.current_hot_water_temp_c,
            strategy: self.strategy,
        }
    }
}

/// Total order for floats; NaN sorts as equal, which the resolved inputs
/// never produce.
fn total_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
