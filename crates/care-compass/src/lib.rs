//! Care Compass core: turns a messy clinic sheet plus a patient's weighted
//! priorities into a deterministic ranked shortlist.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
