pub mod checker;
pub mod registry;
pub mod scheduler;

pub use checker::{Probe, ProbeError, ProbeOutcome, StatusChecker};
pub use registry::{ServiceRecord, ServiceRegistry, ServiceStatus};
pub use scheduler::{PollingHandle, PollingScheduler, Refresher};
