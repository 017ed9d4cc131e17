//! Butterfly Carbon - personal carbon footprint
//!
//! Annualises four everyday habits and converts them to tonnes of CO2 per
//! year using fixed regional emission factors.

mod calculator;
mod factors;

pub use calculator::{calculate, CarbonInputs, CarbonReport, Category};
pub use factors::{EmissionFactors, Region};
