//! Carnot-based COP model and defrost physics.

use crate::domain::PumpType;

/// Fixed ground loop temperature for brine/water units, degC. The ground
/// is a stable reservoir; outdoor air temperature does not reach it.
const GROUND_RESERVOIR_TEMP_C: f64 = 10.0;

/// COP returned when the Carnot denominator degenerates (flow temperature
/// at or below the cold reservoir).
const DEGENERATE_COP: f64 = 6.0;

const COP_MIN: f64 = 1.0;
const COP_MAX: f64 = 7.0;

/// Coefficient of performance from the Carnot model scaled by the unit's
/// efficiency factor.
///
/// `COP = eta * T_hot / (T_hot - T_cold)` in Kelvin. The result is clamped
/// to [1.0, 7.0]; a non-positive temperature lift returns the fixed
/// degenerate cap instead.
pub fn calculate_cop(pump_type: PumpType, outdoor_temp_c: f64, flow_temp_c: f64) -> f64 {
    let eta = pump_type.efficiency_factor();
    let t_cold_c = match pump_type {
        PumpType::GroundWater => GROUND_RESERVOIR_TEMP_C,
        _ => outdoor_temp_c,
    };

    let t_hot_k = flow_temp_c + 273.15;
    let t_cold_k = t_cold_c + 273.15;
    let lift_k = t_hot_k - t_cold_k;
    if lift_k <= 0.0 {
        return DEGENERATE_COP;
    }

    (eta * t_hot_k / lift_k).clamp(COP_MIN, COP_MAX)
}

/// Whether an air-source unit needs a defrost cycle: frost builds on the
/// evaporator in the humid band just around freezing, `[-2.0, threshold]`.
pub fn needs_defrost(outdoor_temp_c: f64, threshold_c: f64) -> bool {
    (-2.0..=threshold_c).contains(&outdoor_temp_c)
}
