use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::domain::{HeatPumpConfig, Location};

/// Engine configuration: site, PV plant, and heat pump defaults. Every
/// section falls back to built-in defaults, so the engine also constructs
/// with no config file present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub pv: PvConfig,
    #[serde(default)]
    pub heat_pump: HeatPumpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub timezone: String,
    pub country: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let loc = Location::default();
        Self {
            latitude: loc.latitude,
            longitude: loc.longitude,
            elevation_m: loc.elevation_m,
            timezone: loc.timezone,
            country: loc.country,
        }
    }
}

impl SiteConfig {
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation_m: self.elevation_m,
            timezone: self.timezone.clone(),
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PvConfig {
    /// Installed PV peak capacity in kW
    pub peak_kw: f64,
}

impl Default for PvConfig {
    fn default() -> Self {
        Self { peak_kw: 8.0 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("ESCHED__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::default();
        assert!(cfg.site.latitude > 0.0);
        assert_eq!(cfg.pv.peak_kw, 8.0);
        assert_eq!(cfg.heat_pump.hot_water_min_c, 40.0);
    }

    #[test]
    fn test_figment_extract_empty() {
        let cfg: Config = Figment::new().extract().unwrap();
        assert_eq!(cfg.site.country, "DE");
    }
}
