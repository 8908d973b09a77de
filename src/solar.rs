//! # Solar Position Calculator
//!
//! Closed-form sun geometry for a site and instant: declination, equation
//! of time, solar noon, sunrise/sunset, elevation/azimuth, and the PV
//! factor the forecast engine feeds on.
//!
//! All inverse-trig inputs are clamped to [-1, 1] first; at extreme
//! latitudes the intermediate terms drift just outside the domain.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Elevation (degrees) at which the PV factor saturates at 1.0. Fixed
/// calibration constant for mid-latitude peak sun height.
const PV_SATURATION_ELEVATION_DEG: f64 = 60.0;

/// Sun geometry for one site and instant. Recomputed on every query,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarPosition {
    /// The instant this position was computed for
    pub timestamp: DateTime<FixedOffset>,
    /// Local sunrise time, "HH:MM"
    pub sunrise: String,
    /// Local solar noon time, "HH:MM"
    pub solar_noon: String,
    /// Local sunset time, "HH:MM"
    pub sunset: String,
    /// Day length in hours
    pub day_length_hours: f64,
    /// Sun elevation above the horizon in degrees
    pub elevation_deg: f64,
    /// Sun azimuth in degrees (0 = north, 180 = south)
    pub azimuth_deg: f64,
    /// Whether the instant falls between sunrise and sunset
    pub is_daylight: bool,
    /// Normalized PV production factor (0.0-1.0)
    pub pv_factor: f64,
}

/// Fixed-calendar Central European DST rule: UTC+2 for March through
/// October, UTC+1 otherwise. A deliberate simplification; the engine does
/// not carry a timezone database.
pub fn central_european_offset_hours(month: u32) -> f64 {
    if (3..=10).contains(&month) {
        2.0
    } else {
        1.0
    }
}

/// Compute the sun's position for a site at an instant.
///
/// `tz_offset_hours` is the local offset from UTC used to place solar noon
/// on the local clock; the instant's own hour/minute fields are read as
/// local wall time.
pub fn solar_position(
    latitude_deg: f64,
    longitude_deg: f64,
    instant: DateTime<FixedOffset>,
    tz_offset_hours: f64,
) -> SolarPosition {
    let doy = instant.ordinal() as f64;
    let current_hour = instant.hour() as f64 + instant.minute() as f64 / 60.0;

    let lat_rad = latitude_deg * PI / 180.0;

    // Solar declination: -23.45 deg at the winter solstice, +23.45 at the
    // summer solstice
    let declination_deg = -23.45 * (360.0 / 365.0 * (doy + 10.0) * PI / 180.0).cos();
    let declination_rad = declination_deg * PI / 180.0;

    // Equation of time (minutes), two-harmonic approximation
    let b = 360.0 / 365.0 * (doy - 81.0) * PI / 180.0;
    let eot_min = 9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin();

    // Solar noon on the local clock, decimal hours
    let solar_noon = (720.0 - 4.0 * longitude_deg - eot_min + tz_offset_hours * 60.0) / 60.0;

    // Sunrise hour angle; the clamp absorbs polar day/night
    let cos_ha = (-lat_rad.tan() * declination_rad.tan()).clamp(-1.0, 1.0);
    let sunrise_hour_angle_rad = cos_ha.acos();
    let day_length_hours = 2.0 * sunrise_hour_angle_rad.to_degrees() / 15.0;
    let sunrise = solar_noon - day_length_hours / 2.0;
    let sunset = solar_noon + day_length_hours / 2.0;

    // Hour angle of the queried instant
    let hour_angle_deg = 15.0 * (current_hour - solar_noon);
    let hour_angle_rad = hour_angle_deg * PI / 180.0;

    let sin_elevation = (lat_rad.sin() * declination_rad.sin()
        + lat_rad.cos() * declination_rad.cos() * hour_angle_rad.cos())
    .clamp(-1.0, 1.0);
    let elevation_rad = sin_elevation.asin();
    let elevation_deg = elevation_rad.to_degrees();

    let azimuth_cos = ((declination_rad.sin() - lat_rad.sin() * elevation_rad.sin())
        / (lat_rad.cos() * elevation_rad.cos()))
    .clamp(-1.0, 1.0);
    let mut azimuth_deg = azimuth_cos.acos().to_degrees();

    // Afternoon correction: sun moves into the western sky
    if hour_angle_deg > 0.0 {
        azimuth_deg = 360.0 - azimuth_deg;
    }

    let is_daylight = current_hour >= sunrise && current_hour <= sunset;

    let pv_factor = if !is_daylight || elevation_deg <= 0.0 {
        0.0
    } else {
        (elevation_deg / PV_SATURATION_ELEVATION_DEG).clamp(0.0, 1.0)
    };

    SolarPosition {
        timestamp: instant,
        sunrise: format_decimal_hours(sunrise),
        solar_noon: format_decimal_hours(solar_noon),
        sunset: format_decimal_hours(sunset),
        day_length_hours,
        elevation_deg,
        azimuth_deg,
        is_daylight,
        pv_factor,
    }
}

/// Format decimal hours as "HH:MM" on a 24-hour clock.
fn format_decimal_hours(hours: f64) -> String {
    let wrapped = hours.rem_euclid(24.0);
    let mut h = wrapped.floor() as u32;
    let mut m = ((wrapped - h as f64) * 60.0).round() as u32;
    if m == 60 {
        h = (h + 1) % 24;
        m = 0;
    }
    format!("{:02}:{:02}", h, m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local_instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, offset_hours: i32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_summer_noon_central_europe() {
        // June 21st, around local solar noon in central Germany (CEST)
        let instant = local_instant(2024, 6, 21, 13, 21, 2);
        let pos = solar_position(51.0, 10.0, instant, 2.0);

        assert!(pos.is_daylight);
        assert!(pos.elevation_deg > 50.0, "elevation {}", pos.elevation_deg);
        assert!(pos.pv_factor > 0.8, "pv factor {}", pos.pv_factor);
        assert!(pos.day_length_hours > 15.0);
    }

    #[test]
    fn test_midnight_is_dark() {
        let instant = local_instant(2024, 6, 21, 0, 30, 2);
        let pos = solar_position(51.0, 10.0, instant, 2.0);

        assert!(!pos.is_daylight);
        assert_eq!(pos.pv_factor, 0.0);
        assert!(pos.elevation_deg < 0.0);
    }

    #[test]
    fn test_winter_day_is_short() {
        let instant = local_instant(2024, 12, 21, 12, 0, 1);
        let pos = solar_position(51.0, 10.0, instant, 1.0);

        assert!(pos.day_length_hours < 9.0, "day length {}", pos.day_length_hours);
        // Low winter sun caps the PV factor well below saturation
        assert!(pos.pv_factor < 0.35, "pv factor {}", pos.pv_factor);
    }

    #[test]
    fn test_afternoon_azimuth_west_of_south() {
        let morning = solar_position(51.0, 10.0, local_instant(2024, 6, 21, 9, 0, 2), 2.0);
        let afternoon = solar_position(51.0, 10.0, local_instant(2024, 6, 21, 17, 0, 2), 2.0);

        assert!(morning.azimuth_deg < 180.0, "morning azimuth {}", morning.azimuth_deg);
        assert!(afternoon.azimuth_deg > 180.0, "afternoon azimuth {}", afternoon.azimuth_deg);
    }

    #[test]
    fn test_polar_latitude_does_not_panic() {
        // Inverse-trig inputs must be clamped; 89 deg north in midsummer is
        // continuous daylight
        let pos = solar_position(89.0, 0.0, local_instant(2024, 6, 21, 12, 0, 2), 2.0);
        assert!((pos.day_length_hours - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_dst_calendar_rule() {
        assert_eq!(central_european_offset_hours(1), 1.0);
        assert_eq!(central_european_offset_hours(2), 1.0);
        assert_eq!(central_european_offset_hours(3), 2.0);
        assert_eq!(central_european_offset_hours(10), 2.0);
        assert_eq!(central_european_offset_hours(11), 1.0);
        assert_eq!(central_european_offset_hours(12), 1.0);
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_decimal_hours(6.5), "06:30");
        assert_eq!(format_decimal_hours(13.357), "13:21");
        assert_eq!(format_decimal_hours(23.999), "00:00");
        assert_eq!(format_decimal_hours(-0.25), "23:45");
    }
}
