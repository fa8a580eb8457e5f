use chrono::{DateTime, Utc};
use tubeqa_logging::{tubeqa_debug, tubeqa_info, tubeqa_warn};

use crate::chat::{AskRequest, ChatSession, SubmitRejection};
use crate::registry::{IngestedVideo, VideoRegistry};
use crate::view_model::{AppViewModel, VideoRowView};
use crate::{Answer, MessageId};

/// Correlates an ingestion effect with its completion message.
pub type RequestId = u64;

pub const CLEARED_FALLBACK_MESSAGE: &str = "All videos cleared.";

/// Successful ingestion payload as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub message: String,
    pub video_id: String,
    pub chunks_created: u32,
    pub title: String,
    pub suggested_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearReport {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub database: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthStatus {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
    /// Non-error notice, e.g. a video that had nothing new to ingest.
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    fn new(kind: BannerKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct IngestPanel {
    input: String,
    in_flight: Option<RequestId>,
    next_request_id: RequestId,
    banner: Option<Banner>,
    banner_revision: u64,
    clearing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    registry: VideoRegistry,
    chat: ChatSession,
    ingest: IngestPanel,
    health: HealthStatus,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &VideoRegistry {
        &self.registry
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn health(&self) -> HealthStatus {
        self.health
    }

    pub fn is_ingesting(&self) -> bool {
        self.ingest.in_flight.is_some()
    }

    pub fn is_clearing(&self) -> bool {
        self.ingest.clearing
    }

    pub fn view(&self) -> AppViewModel {
        let selected = self.registry.selected_video();
        let videos = self
            .registry
            .list()
            .iter()
            .map(|video| VideoRowView {
                video_id: video.video_id.clone(),
                title: video.title.clone(),
                chunks_created: video.chunks_created,
                suggested_questions: video.suggested_questions.clone(),
                selected: self.registry.selected() == Some(video.video_id.as_str()),
            })
            .collect();

        AppViewModel {
            health: self.health,
            videos,
            selected_video_id: self.registry.selected().map(ToOwned::to_owned),
            selected_video_title: selected.map(|v| v.title.clone()),
            messages: self.chat.messages().to_vec(),
            ingest_input: self.ingest.input.clone(),
            chat_input: self.chat.input().to_string(),
            ingesting: self.is_ingesting(),
            submitting: self.chat.is_submitting(),
            clearing: self.ingest.clearing,
            banner: self.ingest.banner.clone(),
            banner_revision: self.ingest.banner_revision,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_ingest_input(&mut self, text: String) {
        self.ingest.input = text;
        self.mark_dirty();
    }

    pub(crate) fn set_chat_input(&mut self, text: String) {
        self.chat.set_input(text);
        self.mark_dirty();
    }

    pub(crate) fn ingest_input(&self) -> &str {
        &self.ingest.input
    }

    pub(crate) fn set_banner(&mut self, banner: Option<Banner>) {
        if banner.is_some() {
            self.ingest.banner_revision += 1;
        }
        self.ingest.banner = banner;
        self.mark_dirty();
    }

    pub(crate) fn set_error_banner(&mut self, text: impl Into<String>) {
        self.set_banner(Some(Banner::new(BannerKind::Error, text)));
    }

    /// Marks an ingestion as outstanding and returns its correlation id.
    pub(crate) fn begin_ingest(&mut self) -> RequestId {
        self.ingest.next_request_id += 1;
        let request_id = self.ingest.next_request_id;
        self.ingest.in_flight = Some(request_id);
        self.mark_dirty();
        request_id
    }

    pub(crate) fn apply_ingest_result(
        &mut self,
        request_id: RequestId,
        result: Result<IngestReport, String>,
        at: DateTime<Utc>,
    ) {
        if self.ingest.in_flight != Some(request_id) {
            tubeqa_warn!("Ignoring stale ingest result request_id={}", request_id);
            return;
        }
        self.ingest.in_flight = None;
        self.mark_dirty();

        let report = match result {
            Ok(report) => report,
            Err(error) => {
                tubeqa_warn!("Ingest request_id={} failed: {}", request_id, error);
                self.set_error_banner(error);
                return;
            }
        };

        self.ingest.input.clear();
        if report.chunks_created == 0 {
            tubeqa_info!(
                "Ingest request_id={} video_id={} produced no chunks",
                request_id,
                report.video_id
            );
            self.set_banner(Some(Banner::new(BannerKind::Info, report.message)));
            return;
        }

        self.set_banner(Some(Banner::new(
            BannerKind::Success,
            format!(
                "Ingested \"{}\" ({} chunks)",
                report.title, report.chunks_created
            ),
        )));
        let outcome = self.registry.register(IngestedVideo {
            video_id: report.video_id,
            title: report.title,
            chunks_created: report.chunks_created,
            suggested_questions: report.suggested_questions,
            ingested_at: at,
        });
        tubeqa_info!(
            "Registered video ({:?}); registry now holds {}",
            outcome,
            self.registry.len()
        );
    }

    /// Routes a question through the chat session using the current selection
    /// as scope. Questions are only accepted once at least one video exists.
    pub(crate) fn submit_question(
        &mut self,
        question: &str,
        at: DateTime<Utc>,
    ) -> Option<AskRequest> {
        if self.registry.is_empty() {
            tubeqa_debug!("Question ignored: no videos ingested yet");
            return None;
        }
        let scope = self.registry.selected().map(ToOwned::to_owned);
        match self.chat.submit(question, scope.as_deref(), at) {
            Ok(request) => {
                tubeqa_info!(
                    "Question accepted message_id={} scope={:?}",
                    request.message_id,
                    request.video_id
                );
                self.mark_dirty();
                Some(request)
            }
            Err(SubmitRejection::EmptyQuestion) => None,
            Err(SubmitRejection::AlreadySubmitting) => {
                tubeqa_debug!("Question dropped: another question is in flight");
                None
            }
        }
    }

    pub(crate) fn select_video(&mut self, video_id: &str) -> bool {
        let known = self.registry.select(video_id);
        if known {
            self.mark_dirty();
        }
        known
    }

    pub(crate) fn toggle_video(&mut self, video_id: &str) {
        if self.registry.toggle_select(video_id) {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_answer(&mut self, message_id: MessageId, result: Result<Answer, String>) {
        if let Err(error) = &result {
            tubeqa_warn!("Question message_id={} failed: {}", message_id, error);
        }
        if self.chat.resolve(message_id, result) {
            self.mark_dirty();
        } else {
            tubeqa_warn!("Ignoring answer for unknown message_id={}", message_id);
        }
    }

    pub(crate) fn begin_clear(&mut self) -> bool {
        if self.ingest.clearing {
            return false;
        }
        self.ingest.clearing = true;
        self.ingest.banner = None;
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_clear_result(&mut self, result: Result<ClearReport, String>) {
        if !self.ingest.clearing {
            tubeqa_warn!("Ignoring clear-all result with no request outstanding");
            return;
        }
        self.ingest.clearing = false;
        match result {
            Ok(report) => {
                tubeqa_info!("Cleared {} stored chunks", report.deleted_count);
                self.registry.clear();
                let text = if report.message.is_empty() {
                    CLEARED_FALLBACK_MESSAGE.to_string()
                } else {
                    report.message
                };
                self.set_banner(Some(Banner::new(BannerKind::Success, text)));
            }
            Err(error) => {
                tubeqa_warn!("Clear-all failed: {}", error);
                self.set_error_banner(error);
            }
        }
    }

    pub(crate) fn set_health(&mut self, status: HealthStatus) {
        if self.health != status {
            self.health = status;
            self.mark_dirty();
        }
    }
}
