//! Built-in fallback profiles for the forecast engine.

/// Default time-of-use electricity price curve in ct/kWh, indexed by hour
/// of day. Used whenever no per-hour price override is present: cheap
/// night valley, morning ramp, evening peak.
pub const DEFAULT_TOU_PRICES_CT: [f64; 24] = [
    19.0, 18.0, 17.0, 17.0, 18.0, 21.0, // 00-05 night valley
    26.0, 31.0, 33.0, 30.0, 27.0, 25.0, // 06-11 morning ramp and peak
    23.0, 23.0, 24.0, 26.0, 29.0, 33.0, // 12-17 midday dip, late ramp
    36.0, 37.0, 34.0, 29.0, 25.0, 21.0, // 18-23 evening peak, falloff
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tou_curve_shape() {
        // Night valley is the cheapest stretch, evening peak the priciest
        let min = DEFAULT_TOU_PRICES_CT.iter().cloned().fold(f64::MAX, f64::min);
        let max = DEFAULT_TOU_PRICES_CT.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(min, DEFAULT_TOU_PRICES_CT[2]);
        assert_eq!(max, DEFAULT_TOU_PRICES_CT[19]);
        assert!(DEFAULT_TOU_PRICES_CT.iter().all(|p| *p > 0.0));
    }
}
