use std::sync::mpsc;

use crate::types::{AskResponse, DeleteResponse, HealthResponse, IngestResponse};
use crate::Envelope;

/// Completion of one backend call, tagged with the correlation id of the
/// command that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    IngestCompleted {
        request_id: u64,
        result: Envelope<IngestResponse>,
    },
    AskCompleted {
        message_id: u64,
        result: Envelope<AskResponse>,
    },
    HealthChecked {
        result: Envelope<HealthResponse>,
    },
    ClearAllCompleted {
        result: Envelope<DeleteResponse>,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: GatewayEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<GatewayEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<GatewayEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: GatewayEvent) {
        let _ = self.tx.send(event);
    }
}
