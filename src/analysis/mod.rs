//! Scenario orchestration
//!
//! A [`Scenario`] pairs one of the built-in request tables with the figure
//! it is drawn as; [`AnomalySweep`] runs the detector over it once per
//! contamination value.

mod scenario;
mod sweep;

pub use scenario::{Scenario, ScenarioKind};
pub use sweep::{AnomalySweep, ContaminationOutcome, FlaggedRow, SweepReport};
