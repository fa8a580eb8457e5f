use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use chrono::Utc;
use tubeqa_core::{Answer, ClearReport, Effect, HealthReport, IngestReport, Msg};
use tubeqa_gateway::{
    AskResponse, DeleteResponse, Envelope, EventSink, GatewayCommand, GatewayEvent,
    GatewayHandle, GatewaySettings, HealthPoller, HealthResponse, IngestResponse,
};
use tubeqa_logging::tubeqa_debug;

use super::app::AppInput;

/// Executes core effects. Implemented by the gateway-backed runner and by
/// recorders in tests.
pub trait EffectExecutor {
    fn execute(&self, effects: Vec<Effect>);
}

pub struct EffectRunner {
    gateway: GatewayHandle,
}

impl EffectRunner {
    pub fn new(settings: GatewaySettings, sink: Arc<dyn EventSink>) -> std::io::Result<Self> {
        Ok(Self {
            gateway: GatewayHandle::new(settings, sink)?,
        })
    }

    pub fn start_health_polling(&self, interval: Duration) -> HealthPoller {
        self.gateway.start_health_polling(interval)
    }
}

impl EffectExecutor for EffectRunner {
    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            let command = map_effect(effect);
            tubeqa_debug!("Dispatching {} command", command_label(&command));
            self.gateway.dispatch(command);
        }
    }
}

pub(crate) fn map_effect(effect: Effect) -> GatewayCommand {
    match effect {
        Effect::Ingest { request_id, url } => GatewayCommand::Ingest { request_id, url },
        Effect::Ask {
            message_id,
            question,
            video_id,
        } => GatewayCommand::Ask {
            message_id,
            question,
            video_id,
        },
        Effect::CheckHealth => GatewayCommand::CheckHealth,
        Effect::ClearAll => GatewayCommand::ClearAll,
    }
}

fn command_label(command: &GatewayCommand) -> &'static str {
    match command {
        GatewayCommand::Ingest { .. } => "ingest",
        GatewayCommand::Ask { .. } => "ask",
        GatewayCommand::CheckHealth => "health",
        GatewayCommand::ClearAll => "clear-all",
    }
}

/// Turns gateway completions into core messages for the application loop.
///
/// Once the application has been torn down, completions are discarded so no
/// state update happens after teardown.
pub struct AppEventSink {
    tx: mpsc::Sender<AppInput>,
    alive: Arc<AtomicBool>,
}

impl AppEventSink {
    pub fn new(tx: mpsc::Sender<AppInput>, alive: Arc<AtomicBool>) -> Self {
        Self { tx, alive }
    }
}

impl EventSink for AppEventSink {
    fn emit(&self, event: GatewayEvent) {
        if !self.alive.load(Ordering::Acquire) {
            tubeqa_debug!("Discarding gateway event after teardown");
            return;
        }
        let _ = self.tx.send(AppInput::Msg(map_event(event)));
    }
}

pub(crate) fn map_event(event: GatewayEvent) -> Msg {
    match event {
        GatewayEvent::IngestCompleted { request_id, result } => Msg::IngestCompleted {
            request_id,
            result: map_envelope(result, map_ingest),
            at: Utc::now(),
        },
        GatewayEvent::AskCompleted { message_id, result } => Msg::AnswerReceived {
            message_id,
            result: map_envelope(result, map_answer),
        },
        GatewayEvent::HealthChecked { result } => Msg::HealthChecked {
            result: map_envelope(result, map_health),
        },
        GatewayEvent::ClearAllCompleted { result } => Msg::ClearAllCompleted {
            result: map_envelope(result, map_clear),
        },
    }
}

fn map_envelope<T, U>(result: Envelope<T>, f: impl FnOnce(T) -> U) -> Result<U, String> {
    result.map(f).map_err(|err| err.to_string())
}

fn map_ingest(response: IngestResponse) -> IngestReport {
    IngestReport {
        message: response.message,
        video_id: response.video_id,
        chunks_created: response.chunks_created,
        title: response.title,
        suggested_questions: response.suggested_questions,
    }
}

fn map_answer(response: AskResponse) -> Answer {
    Answer {
        answer: response.answer,
        sources: response.sources,
    }
}

fn map_health(response: HealthResponse) -> HealthReport {
    HealthReport {
        status: response.status,
        database: response.database,
        message: response.message,
    }
}

fn map_clear(response: DeleteResponse) -> ClearReport {
    ClearReport {
        message: response.message,
        deleted_count: response.deleted_count,
    }
}
