// Domain layer - Battery telemetry models and core rules
pub mod alert;
pub mod cell;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod settings;
pub mod telemetry;
