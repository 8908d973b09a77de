use anyhow::Result;
use energy_scheduler::config::Config;
use energy_scheduler::forecast::{build_forecast_cards, ForecastEngine};
use energy_scheduler::scheduler::{HeatPumpController, DEFAULT_HORIZON_HOURS};
use energy_scheduler::telemetry::init_tracing;
use serde_json::json;
use tracing::info;

/// One-shot planning cycle: forecast, summary, cards, heat pump plan,
/// status, printed as a single JSON document for downstream consumers.
fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    info!(
        latitude = cfg.site.latitude,
        longitude = cfg.site.longitude,
        pv_peak_kw = cfg.pv.peak_kw,
        "starting planning cycle"
    );

    let engine = ForecastEngine::new(cfg.site.location(), cfg.pv.peak_kw);
    let hours = engine.generate_forecast();
    let summary = engine.generate_summary(&hours);
    let cards = build_forecast_cards(&summary, &hours);

    let mut controller = HeatPumpController::new(cfg.heat_pump.clone());
    let schedule = controller.optimize(DEFAULT_HORIZON_HOURS);
    let status = controller.get_status();

    let output = json!({
        "forecast": hours,
        "summary": summary,
        "cards": cards,
        "schedule": schedule,
        "status": status,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
