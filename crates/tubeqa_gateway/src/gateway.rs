use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio::runtime::Handle;
use tubeqa_logging::{tubeqa_debug, tubeqa_info, tubeqa_warn};

use crate::{Backend, EventSink, GatewayEvent, GatewaySettings, HealthPoller, ReqwestBackend};

/// Backend calls the application can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCommand {
    Ingest {
        request_id: u64,
        url: String,
    },
    Ask {
        message_id: u64,
        question: String,
        video_id: Option<String>,
    },
    CheckHealth,
    ClearAll,
}

/// Runs backend calls on a dedicated tokio runtime and reports each outcome
/// to the [`EventSink`]. Dropping the handle shuts the runtime down.
pub struct GatewayHandle {
    cmd_tx: mpsc::Sender<GatewayCommand>,
    runtime: Handle,
    backend: Arc<dyn Backend>,
    sink: Arc<dyn EventSink>,
}

impl GatewayHandle {
    pub fn new(settings: GatewaySettings, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        tubeqa_info!("Gateway targeting {}", settings.base_url);
        Self::with_backend(Arc::new(ReqwestBackend::new(settings)), sink)
    }

    pub fn with_backend(backend: Arc<dyn Backend>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("tubeqa-gateway")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        let (cmd_tx, cmd_rx) = mpsc::channel::<GatewayCommand>();

        let worker_backend = backend.clone();
        let worker_sink = sink.clone();
        thread::Builder::new()
            .name("tubeqa-gateway-dispatch".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = worker_backend.clone();
                    let sink = worker_sink.clone();
                    runtime.spawn(async move {
                        let event = execute(backend.as_ref(), command).await;
                        sink.emit(event);
                    });
                }
                tubeqa_debug!("Gateway command channel closed; shutting down runtime");
                runtime.shutdown_background();
            })?;

        Ok(Self {
            cmd_tx,
            runtime: handle,
            backend,
            sink,
        })
    }

    /// Queues a command. Returns false when the dispatch thread is gone and
    /// the command was dropped.
    pub fn dispatch(&self, command: GatewayCommand) -> bool {
        match self.cmd_tx.send(command) {
            Ok(()) => true,
            Err(mpsc::SendError(command)) => {
                tubeqa_warn!("Gateway dispatch thread is gone; dropped {:?}", command);
                false
            }
        }
    }

    /// Starts periodic health checks on the gateway runtime. Polling lasts as
    /// long as the returned poller is alive.
    pub fn start_health_polling(&self, interval: Duration) -> HealthPoller {
        HealthPoller::spawn(
            &self.runtime,
            self.backend.clone(),
            self.sink.clone(),
            interval,
        )
    }
}

pub(crate) async fn execute(backend: &dyn Backend, command: GatewayCommand) -> GatewayEvent {
    match command {
        GatewayCommand::Ingest { request_id, url } => GatewayEvent::IngestCompleted {
            request_id,
            result: backend.ingest(&url).await,
        },
        GatewayCommand::Ask {
            message_id,
            question,
            video_id,
        } => GatewayEvent::AskCompleted {
            message_id,
            result: backend.ask(&question, video_id.as_deref()).await,
        },
        GatewayCommand::CheckHealth => GatewayEvent::HealthChecked {
            result: backend.check_health().await,
        },
        GatewayCommand::ClearAll => GatewayEvent::ClearAllCompleted {
            result: backend.clear_all().await,
        },
    }
}
