use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tubeqa_logging::{tubeqa_debug, tubeqa_info};

use crate::{Backend, EventSink, GatewayEvent};

pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic health check running on a tokio runtime.
///
/// The first check fires immediately, then one per `interval`. The task stops
/// when [`HealthPoller::stop`] is called or the poller is dropped; a check that
/// is in flight at that moment is abandoned and never reported.
pub struct HealthPoller {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl HealthPoller {
    pub fn spawn(
        runtime: &Handle,
        backend: Arc<dyn Backend>,
        sink: Arc<dyn EventSink>,
        interval: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        // tokio::time::interval panics on a zero period.
        let period = interval.max(Duration::from_millis(1));

        let task = runtime.spawn(async move {
            tubeqa_info!("Health polling started every {:?}", period);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let result = tokio::select! {
                    _ = token.cancelled() => break,
                    result = backend.check_health() => result,
                };
                tubeqa_debug!("Health check result ok={}", result.is_ok());
                sink.emit(GatewayEvent::HealthChecked { result });
            }
            tubeqa_info!("Health polling stopped");
        });

        Self {
            cancel,
            task: Some(task),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops polling and waits for the task to wind down.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Stops polling without waiting.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
