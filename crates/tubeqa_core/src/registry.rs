use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedVideo {
    pub video_id: String,
    pub title: String,
    pub chunks_created: u32,
    pub suggested_questions: Vec<String>,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Added,
    Updated,
}

/// Videos ingested during this session, in registration order, plus the
/// optional selected video that scopes questions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoRegistry {
    videos: Vec<IngestedVideo>,
    selected: Option<String>,
}

impl VideoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts by `video_id`. An existing entry is replaced in place so its
    /// position is kept. The registered video becomes the selection either way.
    pub fn register(&mut self, video: IngestedVideo) -> RegisterOutcome {
        let video_id = video.video_id.clone();
        let outcome = match self.videos.iter_mut().find(|v| v.video_id == video_id) {
            Some(existing) => {
                *existing = video;
                RegisterOutcome::Updated
            }
            None => {
                self.videos.push(video);
                RegisterOutcome::Added
            }
        };
        self.selected = Some(video_id);
        outcome
    }

    pub fn clear(&mut self) {
        self.videos.clear();
        self.selected = None;
    }

    /// Sets the selection. Unknown ids are ignored and return false.
    pub fn select(&mut self, video_id: &str) -> bool {
        if !self.contains(video_id) {
            return false;
        }
        self.selected = Some(video_id.to_string());
        true
    }

    /// Selects `video_id`, or clears the selection when it is already selected.
    /// Unknown ids are ignored and return false.
    pub fn toggle_select(&mut self, video_id: &str) -> bool {
        if !self.contains(video_id) {
            return false;
        }
        if self.selected.as_deref() == Some(video_id) {
            self.selected = None;
        } else {
            self.selected = Some(video_id.to_string());
        }
        true
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_video(&self) -> Option<&IngestedVideo> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn list(&self) -> &[IngestedVideo] {
        &self.videos
    }

    pub fn get(&self, video_id: &str) -> Option<&IngestedVideo> {
        self.videos.iter().find(|v| v.video_id == video_id)
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.get(video_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
