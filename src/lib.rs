pub mod app;
pub mod cli;
pub mod core;
pub mod screens;
pub mod server;
pub mod utils;

pub use crate::core::{
    PollingHandle, PollingScheduler, Probe, ProbeOutcome, ServiceRecord, ServiceRegistry,
    ServiceStatus, StatusChecker,
};
