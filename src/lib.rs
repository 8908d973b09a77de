//! # Energy & Thermal Scheduling Engine
//!
//! Turns location, time, electricity price, and weather impact signals
//! into (a) a 48-hour production/price/action forecast and (b) a
//! physically grounded, priority-ranked hour-by-hour heat pump operating
//! plan.
//!
//! The crate is a synchronous, pure-computation core: callers supply the
//! hourly input maps and consume the produced forecast/schedule objects.
//! There is no network, filesystem, or persistence boundary of its own.
//!
//! ## Components
//!
//! - [`solar`]: closed-form solar position and PV factor for a site and
//!   instant.
//! - [`forecast`]: the 48-hour forecast and scoring engine.
//! - [`scheduler`]: the heat pump COP scheduler with its stateful forward
//!   simulation.
//! - [`domain`]: the value objects all of the above produce and consume.

pub mod config;
pub mod domain;
pub mod forecast;
pub mod scheduler;
pub mod solar;
pub mod telemetry;
