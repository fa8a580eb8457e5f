use crate::{Banner, ChatMessage, HealthStatus};

pub const ALL_VIDEOS_LABEL: &str = "All videos";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub health: HealthStatus,
    pub videos: Vec<VideoRowView>,
    pub selected_video_id: Option<String>,
    pub selected_video_title: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub ingest_input: String,
    pub chat_input: String,
    pub ingesting: bool,
    pub submitting: bool,
    pub clearing: bool,
    pub banner: Option<Banner>,
    /// Bumped every time a banner is posted, including one identical to the
    /// previous banner.
    pub banner_revision: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRowView {
    pub video_id: String,
    pub title: String,
    pub chunks_created: u32,
    pub suggested_questions: Vec<String>,
    pub selected: bool,
}

impl AppViewModel {
    /// Questions can be typed once a video exists and nothing is in flight.
    pub fn chat_enabled(&self) -> bool {
        !self.videos.is_empty() && !self.submitting
    }

    /// Name of the current scope: the selected video's title, its id when the
    /// title is unknown, or "All videos".
    pub fn scope_label(&self) -> &str {
        self.selected_video_title
            .as_deref()
            .or(self.selected_video_id.as_deref())
            .unwrap_or(ALL_VIDEOS_LABEL)
    }

    /// Hint shown while the chat thread is still empty.
    pub fn empty_chat_hint(&self) -> String {
        if self.videos.is_empty() {
            return "Ingest a YouTube video first, then come back here to ask questions."
                .to_string();
        }
        if self.selected_video_id.is_some() {
            format!(
                "Questions will be answered using \"{}\" only. Or pick a suggested question!",
                self.scope_label()
            )
        } else {
            "Your questions will be answered using all ingested video transcripts.".to_string()
        }
    }
}
