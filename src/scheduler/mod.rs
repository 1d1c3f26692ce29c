//! Periodic refresh of the event table.

use crate::api::EventsApi;
use crate::controller::EventListController;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};

/// Default time between refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

/// Source of poll ticks.
pub trait Clock: Send + 'static {
    /// Resolve at the next tick. Must be cancel-safe.
    fn tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// Wall-clock ticks from a tokio interval. The first tick fires immediately.
pub struct IntervalClock {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }
}

impl Clock for IntervalClock {
    async fn tick(&mut self) {
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        interval.tick().await;
    }
}

/// Background task that reloads the controller's table on every tick.
///
/// Loads are spawned independently and may overlap; nothing cancels a
/// slower load when a newer one starts. Dropping the poller stops it.
pub struct Poller {
    stop_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Start polling. Must be called from within a tokio runtime.
    pub fn start<A, C>(controller: Arc<EventListController<A>>, clock: C) -> Self
    where
        A: EventsApi,
        C: Clock,
    {
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let task = tokio::spawn(run_poll_loop(controller, clock, stop_rx));
        tracing::info!("Event poller started");

        Self { stop_tx, task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop ticking and wait for the loop to exit. Loads already in flight
    /// still complete.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Event poller task failed: {}", e);
        }
    }
}

async fn run_poll_loop<A, C>(
    controller: Arc<EventListController<A>>,
    mut clock: C,
    mut stop_rx: broadcast::Receiver<()>,
) where
    A: EventsApi,
    C: Clock,
{
    loop {
        tokio::select! {
            _ = stop_rx.recv() => break,
            _ = clock.tick() => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller.load_and_render().await;
                });
            }
        }
    }

    tracing::info!("Event poller stopped");
}
