use crate::{MessageId, RequestId};

/// IO the core asks the presentation layer to perform. Every effect maps to
/// exactly one backend call whose outcome comes back as a [`crate::Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Ingest {
        request_id: RequestId,
        url: String,
    },
    Ask {
        message_id: MessageId,
        question: String,
        video_id: Option<String>,
    },
    CheckHealth,
    ClearAll,
}
