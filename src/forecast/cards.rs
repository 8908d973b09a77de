//! Presentation card payloads for a dashboard layer.
//!
//! Pure formatting over already-computed forecast records; nothing here
//! feeds back into scoring.

use serde_json::{json, Value};

use crate::domain::{ForecastHour, ForecastSummary};

/// Build flat JSON card payloads from a forecast and its summary.
pub fn build_forecast_cards(summary: &ForecastSummary, hours: &[ForecastHour]) -> Vec<Value> {
    let mut cards = Vec::with_capacity(3);

    cards.push(json!({
        "type": "summary",
        "title": "48h Energy Outlook",
        "avg_price_ct": round2(summary.avg_price_ct),
        "price_range_ct": [round2(summary.min_price_ct), round2(summary.max_price_ct)],
        "cheapest_hour": summary.cheapest_hour,
        "most_expensive_hour": summary.most_expensive_hour,
        "total_pv_estimate_kwh": round2(summary.total_pv_estimate_kwh),
        "daylight_hours": summary.daylight_hours,
        "weather_impacted_hours": summary.weather_impacted_hours,
    }));

    cards.push(json!({
        "type": "windows",
        "title": "Best Windows",
        "best_charge_window": summary.best_charge_window,
        "best_consume_window": summary.best_consume_window,
    }));

    let rows: Vec<Value> = hours
        .iter()
        .map(|h| {
            json!({
                "hour": h.hour,
                "price_ct": round2(h.price_ct),
                "price_level": h.price_level,
                "pv_kw": round2(h.pv_estimate_kw),
                "score": round2(h.score),
                "action": h.action,
            })
        })
        .collect();

    cards.push(json!({
        "type": "hourly",
        "title": "Hour by Hour",
        "rows": rows,
    }));

    cards
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::engine::ForecastEngine;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_cards_are_flat_and_complete() {
        let engine = ForecastEngine::default();
        let now = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
            .unwrap();
        let hours = engine.generate_forecast_at(now);
        let summary = engine.generate_summary(&hours);

        let cards = build_forecast_cards(&summary, &hours);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0]["type"], "summary");
        assert_eq!(cards[2]["rows"].as_array().unwrap().len(), 48);
        // Enum values serialize with their wire names
        let action = cards[2]["rows"][0]["action"].as_str().unwrap();
        assert!(["consume", "charge", "hold", "shift", "discharge"].contains(&action));
    }
}
