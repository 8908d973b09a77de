use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::types::{HeatPumpAction, OptimizationStrategy};

/// One simulated hour of the heat pump operating plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatPumpHour {
    /// Offset from the start of the plan (0-based)
    pub hour: u32,
    /// What the pump does in this hour
    pub action: HeatPumpAction,
    /// Electrical power draw in kW
    pub power_kw: f64,
    /// Coefficient of performance for this hour's conditions
    pub cop: f64,
    /// Outdoor temperature in degC
    pub outdoor_temp_c: f64,
    /// Electricity price in ct/kWh
    pub price_ct: f64,
    /// Electricity cost for this hour in cents
    pub cost_ct: f64,
    /// Heat delivered in kWh
    pub heat_kwh: f64,
    /// Simulated room temperature *after* this hour, degC
    pub room_temp_c: f64,
    /// Simulated hot water temperature *after* this hour, degC
    pub hot_water_temp_c: f64,
    /// PV surplus consumed in this hour, kW
    pub pv_used_kw: f64,
    /// Human-readable explanation of the decision
    pub reason: String,
}

/// The full simulated operating plan plus aggregates.
///
/// Recomputed wholesale on each `optimize` call; the previous plan is only
/// kept around for `get_status` to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatPumpSchedule {
    /// When this plan was generated
    pub generated_at: DateTime<FixedOffset>,
    /// Strategy the plan was optimized under
    pub strategy: OptimizationStrategy,
    /// The simulated hours, contiguous from hour 0
    pub hours: Vec<HeatPumpHour>,
    /// Total heat delivered over the horizon, kWh
    pub total_heat_kwh: f64,
    /// Total electricity consumed over the horizon, kWh
    pub total_electricity_kwh: f64,
    /// Total cost over the horizon in currency units (EUR)
    pub total_cost_eur: f64,
    /// Seasonal average COP: total heat / total electricity
    pub avg_cop: f64,
    /// Hour offset with the best COP (across all hours, any action)
    pub best_cop_hour: u32,
    /// Hour offset with the worst COP (across all hours, any action)
    pub worst_cop_hour: u32,
    /// Number of hot-water heating cycles
    pub dhw_cycles: u32,
    /// Number of defrost hours
    pub defrost_hours: u32,
    /// Number of non-off hours
    pub runtime_hours: u32,
}

impl HeatPumpSchedule {
    /// Empty plan with zeroed aggregates, used for degenerate horizons.
    pub fn empty(generated_at: DateTime<FixedOffset>, strategy: OptimizationStrategy) -> Self {
        Self {
            generated_at,
            strategy,
            hours: Vec::new(),
            total_heat_kwh: 0.0,
            total_electricity_kwh: 0.0,
            total_cost_eur: 0.0,
            avg_cop: 0.0,
            best_cop_hour: 0,
            worst_cop_hour: 0,
            dhw_cycles: 0,
            defrost_hours: 0,
            runtime_hours: 0,
        }
    }

    /// First hour in which the pump actually runs, if any.
    pub fn first_active_hour(&self) -> Option<&HeatPumpHour> {
        self.hours.iter().find(|h| h.action != HeatPumpAction::Off)
    }

    /// First active hour strictly after hour 0, if any.
    pub fn next_active_hour(&self) -> Option<&HeatPumpHour> {
        self.hours
            .iter()
            .find(|h| h.hour > 0 && h.action != HeatPumpAction::Off)
    }
}

/// Live status view derived purely from the cached last plan and the
/// current config. Never feeds back into `optimize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatPumpStatus {
    /// Action of the first active hour of the cached plan (`off` baseline
    /// when no plan exists or nothing is scheduled)
    pub current_action: HeatPumpAction,
    /// Power draw of that hour, kW
    pub current_power_kw: f64,
    /// COP of that hour
    pub current_cop: f64,
    /// Action of the next active hour after hour 0, if any
    pub next_action: Option<HeatPumpAction>,
    /// Hour offset of that next active hour
    pub next_action_hour: Option<u32>,
    /// Configured (measured) room temperature, degC
    pub room_temp_c: f64,
    /// Configured (measured) hot water temperature, degC
    pub hot_water_temp_c: f64,
    /// Strategy currently in effect
    pub strategy: OptimizationStrategy,
}
