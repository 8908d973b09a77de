//! End-to-end heat pump scheduling scenarios.

use chrono::{DateTime, FixedOffset, TimeZone};
use energy_scheduler::domain::{HeatPumpAction, HeatPumpConfig, PumpType};
use energy_scheduler::scheduler::{
    calculate_cop, HeatPumpController, TariffRecord, WeatherRecord,
};

fn plan_start() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
        .unwrap()
}

#[test]
fn ground_water_dhw_recovery_uses_ground_reservoir_cop() {
    let config = HeatPumpConfig {
        pump_type: PumpType::GroundWater,
        current_hot_water_temp_c: 40.0,
        hot_water_min_c: 45.0,
        ..HeatPumpConfig::default()
    };
    let mut controller = HeatPumpController::new(config.clone());
    controller.set_outdoor_temp(0, -15.0); // must not affect a ground-source unit

    let schedule = controller.optimize_at(plan_start(), 24);

    assert_eq!(schedule.hours[0].action, HeatPumpAction::Dhw);
    let expected_cop = calculate_cop(PumpType::GroundWater, -15.0, config.max_flow_temp_c);
    assert_eq!(schedule.hours[0].cop, expected_cop);
    // Same COP as any other outdoor temperature: the 10 C ground loop rules
    assert_eq!(
        expected_cop,
        calculate_cop(PumpType::GroundWater, 25.0, config.max_flow_temp_c)
    );
}

#[test]
fn imported_profiles_flow_into_the_plan() {
    let mut controller = HeatPumpController::default();
    controller.set_hot_water_temp(60.0);

    let weather: Vec<WeatherRecord> = serde_json::from_str(
        r#"[
            {"hour": 0, "temp_c": -8.0},
            {"hour": 1, "temperature_c": -7.5}
        ]"#,
    )
    .unwrap();
    let tariff: Vec<TariffRecord> = serde_json::from_str(
        r#"[
            {"hour": 0, "price": 12.0},
            {"hour": 1, "price_ct": 14.0}
        ]"#,
    )
    .unwrap();
    controller.import_weather(&weather);
    controller.import_tariff(&tariff);

    // Exact-hour override takes precedence over the imported hour-of-day
    // value for hour 0 only
    controller.set_outdoor_temp(0, -20.0);

    let schedule = controller.optimize_at(plan_start(), 48);
    assert_eq!(schedule.hours[0].outdoor_temp_c, -20.0);
    assert_eq!(schedule.hours[1].outdoor_temp_c, -7.5);
    // Hour 24 wraps back to the imported hour-of-day record
    assert_eq!(schedule.hours[24].outdoor_temp_c, -8.0);
    assert_eq!(schedule.hours[0].price_ct, 12.0);
    assert_eq!(schedule.hours[25].price_ct, 14.0);
}

#[test]
fn price_optimized_heats_in_cheaper_hours_than_average() {
    let mut controller = HeatPumpController::default();
    controller.set_strategy("price_optimized");
    controller.set_hot_water_temp(65.0);
    // Mild air so defrost never interferes with the comparison
    for h in 0..48 {
        controller.set_outdoor_temp(h, 6.0);
    }

    let schedule = controller.optimize_at(plan_start(), 48);

    let all_prices: Vec<f64> = schedule.hours.iter().map(|h| h.price_ct).collect();
    let overall_avg = all_prices.iter().sum::<f64>() / all_prices.len() as f64;

    let heat_prices: Vec<f64> = schedule
        .hours
        .iter()
        .filter(|h| h.action == HeatPumpAction::Heat)
        .map(|h| h.price_ct)
        .collect();
    assert!(!heat_prices.is_empty());
    let heat_avg = heat_prices.iter().sum::<f64>() / heat_prices.len() as f64;

    assert!(
        heat_avg < overall_avg,
        "heating hours averaged {:.1} ct against overall {:.1} ct",
        heat_avg,
        overall_avg
    );
}

#[test]
fn solar_boost_strategy_prefers_surplus_hours() {
    let mut controller = HeatPumpController::default();
    controller.set_strategy("solar_boost");
    controller.set_hot_water_temp(65.0);
    controller.set_outdoor_temp(11, 8.0);
    controller.set_outdoor_temp(12, 8.0);
    controller.set_pv_surplus(11, 1.8);
    controller.set_pv_surplus(12, 2.2);

    let schedule = controller.optimize_at(plan_start(), 24);

    assert_eq!(schedule.hours[11].action, HeatPumpAction::SolarBoost);
    assert_eq!(schedule.hours[12].action, HeatPumpAction::SolarBoost);
    assert_eq!(schedule.hours[11].cost_ct, 0.0);
    assert_eq!(schedule.hours[12].pv_used_kw, 2.2);
}

#[test]
fn aggregates_reconcile_with_hours() {
    let mut controller = HeatPumpController::default();
    let schedule = controller.optimize_at(plan_start(), 48);

    let heat: f64 = schedule
        .hours
        .iter()
        .filter(|h| h.action != HeatPumpAction::Off)
        .map(|h| h.heat_kwh)
        .sum();
    let electricity: f64 = schedule
        .hours
        .iter()
        .filter(|h| h.action != HeatPumpAction::Off)
        .map(|h| h.power_kw)
        .sum();
    let cost_ct: f64 = schedule
        .hours
        .iter()
        .filter(|h| h.action != HeatPumpAction::Off)
        .map(|h| h.cost_ct)
        .sum();

    assert!((schedule.total_heat_kwh - heat).abs() < 1e-9);
    assert!((schedule.total_electricity_kwh - electricity).abs() < 1e-9);
    assert!((schedule.total_cost_eur - cost_ct / 100.0).abs() < 1e-9);
    if electricity > 0.0 {
        assert!((schedule.avg_cop - heat / electricity).abs() < 1e-9);
    }

    // COP extrema are tracked across all hours, scheduled or not
    let best = schedule.hours[schedule.best_cop_hour as usize].cop;
    let worst = schedule.hours[schedule.worst_cop_hour as usize].cop;
    for hour in &schedule.hours {
        assert!(hour.cop <= best);
        assert!(hour.cop >= worst);
    }
}

#[test]
fn status_follows_the_cached_plan_only() {
    let mut controller = HeatPumpController::default();
    let schedule = controller.optimize_at(plan_start(), 48);
    let status = controller.get_status();

    let first_active = schedule.first_active_hour().expect("winter plan heats");
    assert_eq!(status.current_action, first_active.action);
    assert_eq!(status.current_cop, first_active.cop);

    // Mutating inputs does not change the status until the next optimize
    controller.set_outdoor_temp(0, 20.0);
    let unchanged = controller.get_status();
    assert_eq!(unchanged.current_action, status.current_action);
    assert_eq!(unchanged.current_power_kw, status.current_power_kw);
}
