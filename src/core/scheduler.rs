/// Periodic polling of every registered service
///
/// The scheduler task owns the registry. Probes run in a `JoinSet` owned by the
/// same task and every merge happens on it, so snapshots published through the
/// watch channel are always internally consistent.

use futures::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::core::checker::{Probe, ProbeError, ProbeOutcome};
use crate::core::registry::{ServiceRegistry, ServiceStatus};

enum Command {
    Refresh,
    Shutdown,
}

pub struct PollingScheduler {
    registry: ServiceRegistry,
    probe: Arc<dyn Probe>,
    interval: Duration,
}

impl PollingScheduler {
    pub fn new(registry: ServiceRegistry, probe: impl Probe, interval: Duration) -> Self {
        Self {
            registry,
            probe: Arc::new(probe),
            interval,
        }
    }

    /// Start polling. The initial (all `Loading`) snapshot is visible right away
    /// and the first cycle starts without waiting for the interval.
    pub fn spawn(self) -> PollingHandle {
        let (snapshot_tx, snapshot_rx) = watch::channel(self.registry.clone());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(self.run(snapshot_tx, command_rx));

        PollingHandle {
            snapshot_rx,
            command_tx,
            task: Some(task),
        }
    }

    async fn run(
        mut self,
        snapshot_tx: watch::Sender<ServiceRegistry>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        // Ticks are anchored on the first tick, not on cycle completion
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: JoinSet<(String, ProbeOutcome)> = JoinSet::new();
        let mut pending: HashSet<String> = HashSet::new();

        tracing::info!(
            services = self.registry.len(),
            interval_secs = self.interval.as_secs(),
            "polling started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.start_cycle(&mut in_flight, &mut pending);
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    match joined {
                        Ok((key, outcome)) => {
                            pending.remove(&key);
                            self.merge(&key, &outcome);
                            snapshot_tx.send_replace(self.registry.clone());
                        }
                        Err(e) => {
                            // Probe tasks are only cancelled on shutdown
                            tracing::error!(error = %e, "probe task failed");
                        }
                    }
                }
                command = commands.recv() => {
                    match command {
                        Some(Command::Refresh) => {
                            tracing::debug!("manual refresh requested");
                            self.start_cycle(&mut in_flight, &mut pending);
                        }
                        Some(Command::Shutdown) | None => break,
                    }
                }
            }
        }

        // Dropping the JoinSet aborts any probe still running
        in_flight.shutdown().await;
        tracing::info!("polling stopped");
    }

    /// Issue one probe per service, skipping services whose previous probe
    /// has not finished yet.
    fn start_cycle(
        &self,
        in_flight: &mut JoinSet<(String, ProbeOutcome)>,
        pending: &mut HashSet<String>,
    ) {
        tracing::debug!(outstanding = pending.len(), "polling cycle");

        for record in self.registry.iter() {
            if pending.contains(&record.key) {
                tracing::debug!(service = %record.key, "previous probe still outstanding, skipping");
                continue;
            }

            let key = record.key.clone();
            let probe = self.probe.probe(record.port);
            pending.insert(key.clone());

            in_flight.spawn(async move {
                let outcome = match AssertUnwindSafe(probe).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(_) => ProbeOutcome::offline(0, &ProbeError::Request("probe panicked".to_string())),
                };
                (key, outcome)
            });
        }
    }

    fn merge(&mut self, key: &str, outcome: &ProbeOutcome) {
        let Some(previous) = self.registry.apply(key, outcome) else {
            return;
        };

        match (previous, outcome.status) {
            (prev, next) if prev == next => {}
            (_, ServiceStatus::Online) => {
                tracing::info!(service = key, "service online");
            }
            (_, ServiceStatus::Offline) => {
                tracing::warn!(
                    service = key,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "service offline"
                );
            }
            (_, ServiceStatus::Loading) => {}
        }
    }
}

/// Owner-side handle of a running scheduler.
///
/// Dropping the handle stops polling.
pub struct PollingHandle {
    snapshot_rx: watch::Receiver<ServiceRegistry>,
    command_tx: mpsc::UnboundedSender<Command>,
    task: Option<JoinHandle<()>>,
}

impl PollingHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> ServiceRegistry {
        self.snapshot_rx.borrow().clone()
    }

    /// Stream of snapshots; a new value is published after every merged probe
    pub fn subscribe(&self) -> watch::Receiver<ServiceRegistry> {
        self.snapshot_rx.clone()
    }

    /// Run an extra cycle now. The fixed schedule is not shifted.
    pub fn refresh(&self) {
        let _ = self.command_tx.send(Command::Refresh);
    }

    /// A clonable trigger for `refresh`, for consumers that don't own the handle
    pub fn refresher(&self) -> Refresher {
        Refresher {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Stop polling and wait for the task to exit. No probe is issued afterwards.
    pub async fn cancel(mut self) {
        let _ = self.command_tx.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Clone)]
pub struct Refresher {
    command_tx: mpsc::UnboundedSender<Command>,
}

impl Refresher {
    pub fn refresh(&self) {
        let _ = self.command_tx.send(Command::Refresh);
    }
}
