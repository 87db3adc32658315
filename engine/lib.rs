#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

pub mod domain;
pub mod evaluate;
pub mod guidelines;
pub mod model;
pub mod settings;
pub mod types;

#[path = "../report/mod.rs"]
pub mod report;

#[path = "../batch/mod.rs"]
pub mod batch;

pub use evaluate::{EngineError, classify, evaluate};
pub use types::{PatientInputs, RiskAssessment, RiskCategory};
