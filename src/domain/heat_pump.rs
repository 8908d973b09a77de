use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::PumpType;

/// Heat pump and building parameters the scheduler plans against.
///
/// `current_room_temp_c` and `current_hot_water_temp_c` are the *initial
/// conditions* for the forward simulation. `optimize` never writes its
/// simulated end-of-horizon values back; feeding real sensor readings into
/// the next planning cycle is the caller's job via the setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatPumpConfig {
    /// Pump technology
    pub pump_type: PumpType,
    /// Nominal electrical power draw in kW
    pub nominal_power_kw: f64,
    /// Maximum flow (supply line) temperature in degC, the hot reservoir of
    /// the Carnot COP model
    pub max_flow_temp_c: f64,
    /// Building thermal mass in kWh per Kelvin
    pub thermal_mass_kwh_per_k: f64,
    /// Hot water tank volume in liters
    pub tank_volume_l: f64,
    /// Hot water target temperature in degC
    pub hot_water_target_c: f64,
    /// Hot water minimum temperature in degC; below this, DHW preempts
    /// everything else
    pub hot_water_min_c: f64,
    /// Room temperature setpoint in degC
    pub target_room_temp_c: f64,
    /// Current (measured) room temperature in degC
    pub current_room_temp_c: f64,
    /// Current (measured) hot water temperature in degC
    pub current_hot_water_temp_c: f64,
    /// Outdoor temperature below which defrost cycles are considered, degC
    pub defrost_threshold_c: f64,
    /// Maximum compressor runtime per day in hours
    pub max_runtime_hours_per_day: f64,
}

impl Default for HeatPumpConfig {
    fn default() -> Self {
        Self {
            pump_type: PumpType::AirWater,
            nominal_power_kw: 3.0,
            max_flow_temp_c: 45.0,
            thermal_mass_kwh_per_k: 12.0,
            tank_volume_l: 200.0,
            hot_water_target_c: 50.0,
            hot_water_min_c: 40.0,
            target_room_temp_c: 21.0,
            current_room_temp_c: 20.5,
            current_hot_water_temp_c: 48.0,
            defrost_threshold_c: 3.0,
            max_runtime_hours_per_day: 16.0,
        }
    }
}

impl HeatPumpConfig {
    /// Update the measured room temperature, clamped to a sane sensor range.
    pub fn set_room_temp(&mut self, temp_c: f64) {
        let clamped = temp_c.clamp(5.0, 35.0);
        if clamped != temp_c {
            debug!(requested = temp_c, applied = clamped, "room temp clamped");
        }
        self.current_room_temp_c = clamped;
    }

    /// Update the measured hot water temperature, clamped to the tank's
    /// plausible range.
    pub fn set_hot_water_temp(&mut self, temp_c: f64) {
        let clamped = temp_c.clamp(10.0, 70.0);
        if clamped != temp_c {
            debug!(requested = temp_c, applied = clamped, "hot water temp clamped");
        }
        self.current_hot_water_temp_c = clamped;
    }
}
