use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Geographic site the engine plans for.
///
/// Immutable per update: `set_location` replaces the whole value, individual
/// fields are never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (positive = north)
    pub latitude: f64,
    /// Longitude in degrees (positive = east)
    pub longitude: f64,
    /// Elevation above sea level in meters
    pub elevation_m: f64,
    /// Timezone name, informational only (offsets come from the fixed
    /// calendar rule in `solar::central_european_offset_hours`)
    pub timezone: String,
    /// ISO country code
    pub country: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: 51.1634, // central Germany
            longitude: 10.4477,
            elevation_m: 250.0,
            timezone: "Europe/Berlin".to_string(),
            country: "DE".to_string(),
        }
    }
}

/// Price classification relative to the rolling 48-hour average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PriceLevel {
    VeryLow,
    Low,
    Normal,
    High,
    VeryHigh,
}

impl PriceLevel {
    /// Classify a price by its ratio to the horizon average.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio <= 0.60 {
            Self::VeryLow
        } else if ratio <= 0.85 {
            Self::Low
        } else if ratio <= 1.15 {
            Self::Normal
        } else if ratio <= 1.40 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }
}

/// Weather impact level on PV production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WeatherImpact {
    None,
    Low,
    Moderate,
    High,
}

/// Recommended grid/battery action for one forecast hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ForecastAction {
    Consume,
    Charge,
    Hold,
    Shift,
    Discharge,
}

impl ForecastAction {
    /// Map a favorability score (0-10) to an action.
    pub fn from_score(score: f64) -> Self {
        if score >= 7.5 {
            Self::Consume
        } else if score >= 6.0 {
            Self::Charge
        } else if score >= 4.0 {
            Self::Hold
        } else if score >= 2.5 {
            Self::Shift
        } else {
            Self::Discharge
        }
    }
}

/// Heat pump technology type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PumpType {
    AirWater,
    GroundWater,
    AirAir,
}

impl PumpType {
    /// Parse a wire string, falling back to `AirWater` for unknown values.
    /// An unrecognized pump type is a degraded configuration, not an error.
    pub fn parse_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Self::AirWater)
    }

    /// Carnot efficiency factor: fraction of the theoretical maximum COP a
    /// real unit of this type achieves.
    pub fn efficiency_factor(&self) -> f64 {
        match self {
            Self::AirWater => 0.45,
            Self::GroundWater => 0.55,
            Self::AirAir => 0.40,
        }
    }
}

/// What the heat pump does in one simulated hour. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeatPumpAction {
    Heat,
    Dhw,
    Off,
    Defrost,
    SolarBoost,
}

/// Ranking strategy used by the scheduler's hour-budget selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OptimizationStrategy {
    /// Rank hours by effective cost (price / COP)
    CopOptimized,
    /// Rank hours by raw price, ignoring efficiency
    PriceOptimized,
    /// Prefer hours with PV surplus, then effective cost
    SolarBoost,
    /// No ranking; heat reactively whenever the room is below setpoint
    ComfortFirst,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_level_breakpoints() {
        assert_eq!(PriceLevel::from_ratio(0.60), PriceLevel::VeryLow);
        assert_eq!(PriceLevel::from_ratio(0.61), PriceLevel::Low);
        assert_eq!(PriceLevel::from_ratio(0.85), PriceLevel::Low);
        assert_eq!(PriceLevel::from_ratio(1.0), PriceLevel::Normal);
        assert_eq!(PriceLevel::from_ratio(1.15), PriceLevel::Normal);
        assert_eq!(PriceLevel::from_ratio(1.40), PriceLevel::High);
        assert_eq!(PriceLevel::from_ratio(1.41), PriceLevel::VeryHigh);
        assert_eq!(PriceLevel::from_ratio(5.0), PriceLevel::VeryHigh);
    }

    #[test]
    fn test_action_thresholds() {
        assert_eq!(ForecastAction::from_score(10.0), ForecastAction::Consume);
        assert_eq!(ForecastAction::from_score(7.5), ForecastAction::Consume);
        assert_eq!(ForecastAction::from_score(7.49), ForecastAction::Charge);
        assert_eq!(ForecastAction::from_score(6.0), ForecastAction::Charge);
        assert_eq!(ForecastAction::from_score(4.0), ForecastAction::Hold);
        assert_eq!(ForecastAction::from_score(2.5), ForecastAction::Shift);
        assert_eq!(ForecastAction::from_score(0.0), ForecastAction::Discharge);
    }

    #[test]
    fn test_pump_type_parse_lossy() {
        assert_eq!(PumpType::parse_lossy("ground_water"), PumpType::GroundWater);
        assert_eq!(PumpType::parse_lossy("air_air"), PumpType::AirAir);
        // Unknown types degrade to air/water instead of erroring
        assert_eq!(PumpType::parse_lossy("fusion_reactor"), PumpType::AirWater);
    }

    #[test]
    fn test_strategy_wire_names() {
        assert_eq!(
            "cop_optimized".parse::<OptimizationStrategy>().unwrap(),
            OptimizationStrategy::CopOptimized
        );
        assert_eq!(OptimizationStrategy::SolarBoost.to_string(), "solar_boost");
        assert!("turbo".parse::<OptimizationStrategy>().is_err());
    }
}
