//! TubeQA gateway: the only code that talks to the RAG backend.
mod backend;
mod envelope;
mod gateway;
mod health;
mod sink;
mod types;

pub use backend::{Backend, GatewaySettings, ReqwestBackend, DEFAULT_BASE_URL};
pub use envelope::{ApiError, Envelope, GENERIC_SERVER_DETAIL, UNREACHABLE_MESSAGE};
pub use gateway::{GatewayCommand, GatewayHandle};
pub use health::{HealthPoller, DEFAULT_HEALTH_INTERVAL};
pub use sink::{ChannelEventSink, EventSink, GatewayEvent};
pub use types::{
    AskRequest, AskResponse, DeleteResponse, HealthResponse, IngestRequest, IngestResponse,
};
