use chrono::{DateTime, Utc};

use crate::{Answer, ClearReport, HealthReport, IngestReport, MessageId, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the video URL input.
    IngestInputChanged(String),
    /// User submitted the current URL input for ingestion.
    IngestSubmitted,
    /// Backend finished an ingestion request.
    IngestCompleted {
        request_id: RequestId,
        result: Result<IngestReport, String>,
        at: DateTime<Utc>,
    },
    /// User edited the question input.
    ChatInputChanged(String),
    /// User submitted the current question input.
    QuestionSubmitted { at: DateTime<Utc> },
    /// User clicked a suggested question under a video.
    SuggestedQuestionClicked {
        video_id: String,
        question: String,
        at: DateTime<Utc>,
    },
    /// Backend answered (or failed to answer) the question whose placeholder
    /// is `message_id`.
    AnswerReceived {
        message_id: MessageId,
        result: Result<Answer, String>,
    },
    /// User clicked a video in the list (toggles the scope).
    VideoClicked { video_id: String },
    /// User confirmed deleting every stored video.
    ClearAllClicked,
    ClearAllCompleted { result: Result<ClearReport, String> },
    /// User asked for an immediate connectivity check.
    HealthRetryClicked,
    HealthChecked { result: Result<HealthReport, String> },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
