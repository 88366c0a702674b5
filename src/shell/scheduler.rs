// Periodic driver for the poll and reconciliation cycles.
//
// Each registered job gets one task ticking on its own interval. A job runs to
// completion before its next tick; late ticks are skipped, not queued.
// Stopping takes effect between cycles and never interrupts a running one.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::modules::artist_watch::use_cases::errors::CycleError;
use crate::shell::state::{PollHandler, ReconcileHandler};

#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run_once(&self) -> Result<(), CycleError>;
}

#[async_trait]
impl ScheduledJob for PollHandler {
    fn name(&self) -> &'static str {
        "poll"
    }

    async fn run_once(&self) -> Result<(), CycleError> {
        self.run().await.map(|_| ())
    }
}

#[async_trait]
impl ScheduledJob for ReconcileHandler {
    fn name(&self) -> &'static str {
        "reconcile"
    }

    async fn run_once(&self) -> Result<(), CycleError> {
        self.run().await.map(|_| ())
    }
}

#[derive(Default)]
struct Tasks {
    /// Present while running; dropped or signalled to stop the tasks.
    stop: Option<watch::Sender<bool>>,
    handles: Vec<JoinHandle<()>>,
}

pub struct Scheduler {
    jobs: Vec<(Arc<dyn ScheduledJob>, Duration)>,
    tasks: Mutex<Tasks>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            tasks: Mutex::new(Tasks::default()),
        }
    }

    pub fn every(mut self, period: Duration, job: Arc<dyn ScheduledJob>) -> Self {
        self.jobs.push((job, period));
        self
    }

    /// Starts every job. Tasks of a previous start are stopped and awaited
    /// first, so a cycle still in flight finishes before the new tasks tick.
    pub async fn start(&self) {
        let mut tasks = self.tasks.lock().await;
        if let Some(stop) = tasks.stop.take() {
            let _ = stop.send(true);
        }
        for handle in tasks.handles.drain(..) {
            if let Err(error) = handle.await {
                warn!(%error, "scheduled task ended abnormally");
            }
        }

        let (stop, _) = watch::channel(false);
        tasks.handles = self
            .jobs
            .iter()
            .map(|(job, period)| tokio::spawn(drive(job.clone(), *period, stop.subscribe())))
            .collect();
        tasks.stop = Some(stop);
        info!(jobs = self.jobs.len(), "scheduler started");
    }

    /// Returns false when nothing was running. Does not wait for an in-flight
    /// cycle; the next `start` does.
    pub async fn stop(&self) -> bool {
        match self.tasks.lock().await.stop.take() {
            Some(stop) => {
                let _ = stop.send(true);
                info!("scheduler stop signal sent");
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self) -> bool {
        self.tasks.lock().await.stop.is_some()
    }
}

async fn drive(job: Arc<dyn ScheduledJob>, period: Duration, mut stop: watch::Receiver<bool>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = ticker.tick() => {
                if let Err(error) = job.run_once().await {
                    warn!(job = job.name(), %error, "scheduled cycle failed");
                }
            }
        }
    }
    info!(job = job.name(), "scheduled job stopped");
}
