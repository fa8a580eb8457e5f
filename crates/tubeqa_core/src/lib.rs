//! TubeQA core: pure state machine and view-model helpers for the video
//! question-answering client.
mod chat;
mod effect;
mod msg;
mod registry;
mod state;
mod update;
mod view_model;
mod youtube;

pub use chat::{Answer, AskRequest, ChatMessage, ChatSession, MessageId, Role, SubmitRejection};
pub use effect::Effect;
pub use msg::Msg;
pub use registry::{IngestedVideo, RegisterOutcome, VideoRegistry};
pub use state::{
    AppState, Banner, BannerKind, ClearReport, HealthReport, HealthStatus, IngestReport,
    RequestId, CLEARED_FALLBACK_MESSAGE,
};
pub use update::update;
pub use view_model::{AppViewModel, VideoRowView, ALL_VIDEOS_LABEL};
pub use youtube::{is_valid_youtube_url, INVALID_URL_MESSAGE};
