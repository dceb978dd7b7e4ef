/// Service registry: the in-memory key -> latest status mapping
///
/// The registry is owned by the polling task. Everything outside it only ever
/// sees cloned snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::checker::ProbeOutcome;
use crate::utils::SERVICES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Loading,
    Online,
    Offline,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, ServiceStatus::Online)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Loading => "loading",
            ServiceStatus::Online => "online",
            ServiceStatus::Offline => "offline",
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub key: String,
    pub name: String,
    pub port: u16,
    pub description: String,
    pub status: ServiceStatus,
    pub last_checked: Option<DateTime<Utc>>,
    pub response_time_ms: Option<u64>,
}

impl ServiceRecord {
    pub fn new(key: &str, name: &str, port: u16, description: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            port,
            description: description.to_string(),
            status: ServiceStatus::Loading,
            last_checked: None,
            response_time_ms: None,
        }
    }

    /// Swagger UI location for this service on the given host
    pub fn docs_url(&self, host: &str) -> String {
        format!("http://{}:{}/docs", host, self.port)
    }
}

/// Ordered, fixed-size set of service records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRegistry {
    services: Vec<ServiceRecord>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::from_records(
            SERVICES
                .iter()
                .map(|s| ServiceRecord::new(s.key, s.display_name, s.port, s.description))
                .collect(),
        )
    }
}

impl ServiceRegistry {
    pub fn from_records(services: Vec<ServiceRecord>) -> Self {
        Self { services }
    }

    /// Default registry with per-service port overrides applied
    pub fn with_port_overrides(overrides: &HashMap<String, u16>) -> Self {
        let mut registry = Self::default();
        for record in &mut registry.services {
            if let Some(port) = overrides.get(&record.key) {
                record.port = *port;
            }
        }
        registry
    }

    pub fn get(&self, key: &str) -> Option<&ServiceRecord> {
        self.services.iter().find(|s| s.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceRecord> {
        self.services.iter()
    }

    pub fn records(&self) -> &[ServiceRecord] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.services.iter().map(|s| s.key.clone()).collect()
    }

    /// Merge a probe outcome into the record with the given key.
    ///
    /// Returns the previous status when the record exists, `None` for unknown keys
    /// (which are ignored).
    pub fn apply(&mut self, key: &str, outcome: &ProbeOutcome) -> Option<ServiceStatus> {
        let record = self.services.iter_mut().find(|s| s.key == key)?;
        let previous = record.status;

        // Loading is initial-only
        if outcome.status != ServiceStatus::Loading {
            record.status = outcome.status;
        }
        record.last_checked = Some(outcome.checked_at);
        record.response_time_ms = if outcome.status.is_online() {
            Some(outcome.response_time_ms)
        } else {
            None
        };

        Some(previous)
    }

    pub fn count(&self, status: ServiceStatus) -> usize {
        self.services.iter().filter(|s| s.status == status).count()
    }

    /// Status of every record keyed by service key
    pub fn statuses(&self) -> HashMap<String, ServiceStatus> {
        self.services
            .iter()
            .map(|s| (s.key.clone(), s.status))
            .collect()
    }
}
