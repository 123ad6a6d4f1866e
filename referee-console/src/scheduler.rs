use log::debug;
use std::future::Future;
use tokio::{
    task::JoinHandle,
    time::{Duration, MissedTickBehavior, interval},
};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A job that runs on a fixed period until stopped. Each run is awaited
/// before the next tick is taken, so runs of one task never overlap; ticks
/// missed while a run was in flight are skipped rather than bunched up.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
    period: Option<Duration>,
}

impl ScheduledTask {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: None,
            period: None,
        }
    }

    /// Starts the job, replacing any job this task was already running
    pub fn start<F, Fut>(&mut self, period: Duration, mut job: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        let period = period.max(MIN_PERIOD);
        debug!("Starting {} every {period:?}", self.name);

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                job().await;
            }
        }));
        self.period = Some(period);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Stopping {}", self.name);
            handle.abort();
        }
        self.period = None;
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.stop();
    }
}
