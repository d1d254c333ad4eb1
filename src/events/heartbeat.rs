use super::{EventData, EventSender, SessionEventKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

/// Handle to a running `MDS_CONNECTED` heartbeat task.
///
/// The task stops when [`stop`](Self::stop) is called or the handle is
/// dropped. A send in flight at that moment is abandoned.
#[derive(Debug)]
pub struct Heartbeat {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    interval: Duration,
}

impl Heartbeat {
    pub(crate) fn spawn(
        runtime: &Handle,
        sender: Arc<EventSender>,
        interval: Duration,
        data: EventData,
    ) -> Self {
        let cancel = CancellationToken::new();
        let task = runtime.spawn(run(sender, interval, data, cancel.clone()));

        info!(
            interval_ms = interval.as_millis() as u64,
            "Started MDS_CONNECTED heartbeat"
        );

        Self {
            cancel,
            task,
            interval,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(self) {
        self.cancel.cancel();
        info!("Stopped MDS_CONNECTED heartbeat");
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    sender: Arc<EventSender>,
    interval: Duration,
    data: EventData,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut beats: u64 = 0;

    loop {
        // The first tick completes immediately, which sends the initial beat.
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        beats += 1;
        tokio::select! {
            () = cancel.cancelled() => break,
            result = sender.send(SessionEventKind::MdsConnected, &data, 1) => match result {
                Ok(()) => trace!(beat = beats, "Heartbeat sent"),
                // Failures never stop the heartbeat.
                Err(e) if beats == 1 => error!(error = %e, "Failed to send initial heartbeat"),
                Err(e) => error!(beat = beats, error = %e, "Failed to send heartbeat"),
            },
        }
    }
}
