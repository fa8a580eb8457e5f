use chrono::Local;
use tubeqa_core::{
    AppViewModel, Banner, BannerKind, ChatMessage, HealthStatus, MessageId, Role,
};

pub const INGEST_NOTICE: &str = "Processing video... this may take a minute for long videos.";
const THINKING: &str = "assistant is thinking...";

/// Turns successive view models into terminal lines. Only what changed since
/// the previous render is emitted; chat messages are printed once, when they
/// are resolved.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    printed_messages: usize,
    announced_pending: Option<MessageId>,
    health: Option<HealthStatus>,
    banner_revision: u64,
    scope: Option<String>,
    ingesting: bool,
    clearing: bool,
    started: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if self.health != Some(view.health) {
            self.health = Some(view.health);
            lines.push(health_badge(view.health));
        }

        if view.ingesting && !self.ingesting {
            lines.push(INGEST_NOTICE.to_string());
        }
        self.ingesting = view.ingesting;

        if view.clearing && !self.clearing {
            lines.push("Clearing all videos...".to_string());
        }
        self.clearing = view.clearing;

        if view.banner_revision != self.banner_revision {
            if let Some(banner) = &view.banner {
                lines.push(banner_line(banner));
            }
            self.banner_revision = view.banner_revision;
        }

        let scope = (!view.videos.is_empty()).then(|| view.scope_label().to_string());
        if scope != self.scope {
            if let Some(label) = &scope {
                lines.push(format!("Showing results from: {label}"));
            }
            self.scope = scope;
        }

        if !self.started {
            self.started = true;
            if view.messages.is_empty() {
                lines.push(view.empty_chat_hint());
            }
        }

        lines.extend(self.render_messages(&view.messages));
        lines
    }

    fn render_messages(&mut self, messages: &[ChatMessage]) -> Vec<String> {
        let mut lines = Vec::new();
        for message in messages.iter().skip(self.printed_messages) {
            if message.pending {
                if self.announced_pending != Some(message.id) {
                    self.announced_pending = Some(message.id);
                    lines.push(THINKING.to_string());
                }
                break;
            }
            lines.extend(message_lines(message));
            self.printed_messages += 1;
        }
        lines
    }
}

pub fn health_badge(status: HealthStatus) -> String {
    match status {
        HealthStatus::Checking => "[ .. ] Checking backend...".to_string(),
        HealthStatus::Connected => "[ ok ] Backend Connected".to_string(),
        HealthStatus::Disconnected => {
            "[ !! ] Backend Offline (type /health to retry)".to_string()
        }
    }
}

fn banner_line(banner: &Banner) -> String {
    match banner.kind {
        BannerKind::Error => format!("error: {}", banner.text),
        BannerKind::Success => format!("ok: {}", banner.text),
        BannerKind::Info => format!("note: {}", banner.text),
    }
}

fn message_lines(message: &ChatMessage) -> Vec<String> {
    let time = message.created_at.with_timezone(&Local).format("%H:%M");
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut lines = vec![format!("[{time}] {speaker}: {}", message.content)];
    if let Some(sources) = message.sources.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("        sources: {}", sources.join(", ")));
    }
    lines
}

/// Numbered video list with suggested questions, as printed by `/videos`.
pub fn video_list(view: &AppViewModel) -> Vec<String> {
    if view.videos.is_empty() {
        return vec!["No videos ingested yet. Use /ingest <url>.".to_string()];
    }
    let mut lines = vec![format!("Ingested videos ({}):", view.videos.len())];
    for (index, video) in view.videos.iter().enumerate() {
        let marker = if video.selected { "*" } else { " " };
        lines.push(format!(
            "{marker} {}. {} [{} · {} chunks]",
            index + 1,
            video.title,
            video.video_id,
            video.chunks_created
        ));
        for (q_index, question) in video.suggested_questions.iter().enumerate() {
            lines.push(format!("      {}.{} {question}", index + 1, q_index + 1));
        }
    }
    lines.push(format!("Showing results from: {}", view.scope_label()));
    lines
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tubeqa_core::VideoRowView;

    use super::*;

    fn message(id: MessageId, role: Role, content: &str, pending: bool) -> ChatMessage {
        ChatMessage {
            id,
            role,
            content: content.to_string(),
            sources: None,
            created_at: Utc::now(),
            pending,
        }
    }

    fn video(id: &str, title: &str, selected: bool) -> VideoRowView {
        VideoRowView {
            video_id: id.to_string(),
            title: title.to_string(),
            chunks_created: 12,
            suggested_questions: vec!["What is X?".to_string()],
            selected,
        }
    }

    #[test]
    fn first_render_shows_health_and_hint() {
        let mut renderer = TerminalRenderer::new();
        let lines = renderer.render(&AppViewModel::default());
        assert_eq!(lines[0], health_badge(HealthStatus::Checking));
        assert!(lines[1].starts_with("Ingest a YouTube video first"));

        assert!(renderer.render(&AppViewModel::default()).is_empty());
    }

    #[test]
    fn messages_print_once_after_resolution() {
        let mut renderer = TerminalRenderer::new();
        let mut view = AppViewModel {
            videos: vec![video("abc123", "Intro", true)],
            selected_video_id: Some("abc123".to_string()),
            selected_video_title: Some("Intro".to_string()),
            ..AppViewModel::default()
        };
        renderer.render(&view);

        view.messages = vec![
            message(1, Role::User, "What happens at 3:00?", false),
            message(2, Role::Assistant, "", true),
        ];
        let lines = renderer.render(&view);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("you: What happens at 3:00?"));
        assert_eq!(lines[1], THINKING);

        // Re-rendering while still pending prints nothing new.
        assert!(renderer.render(&view).is_empty());

        view.messages[1] = ChatMessage {
            content: "It explains Y".to_string(),
            sources: Some(vec!["abc123".to_string()]),
            pending: false,
            ..view.messages[1].clone()
        };
        let lines = renderer.render(&view);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("assistant: It explains Y"));
        assert_eq!(lines[1], "        sources: abc123");

        assert!(renderer.render(&view).is_empty());
    }

    #[test]
    fn banner_and_scope_changes_are_announced() {
        let mut renderer = TerminalRenderer::new();
        renderer.render(&AppViewModel::default());

        let view = AppViewModel {
            videos: vec![video("abc123", "Intro", true)],
            selected_video_id: Some("abc123".to_string()),
            selected_video_title: Some("Intro".to_string()),
            banner: Some(Banner {
                kind: BannerKind::Success,
                text: "Ingested \"Intro\" (12 chunks)".to_string(),
            }),
            banner_revision: 1,
            ..AppViewModel::default()
        };
        let lines = renderer.render(&view);
        assert_eq!(
            lines,
            vec![
                "ok: Ingested \"Intro\" (12 chunks)".to_string(),
                "Showing results from: Intro".to_string(),
            ]
        );

        let deselected = AppViewModel {
            selected_video_id: None,
            selected_video_title: None,
            videos: vec![video("abc123", "Intro", false)],
            ..view.clone()
        };
        assert_eq!(
            renderer.render(&deselected),
            vec!["Showing results from: All videos".to_string()]
        );
    }

    #[test]
    fn identical_banner_is_reprinted_when_posted_again() {
        let mut renderer = TerminalRenderer::new();
        renderer.render(&AppViewModel::default());
        let mut view = AppViewModel {
            banner: Some(Banner {
                kind: BannerKind::Error,
                text: "bad url".to_string(),
            }),
            banner_revision: 1,
            ..AppViewModel::default()
        };
        assert_eq!(renderer.render(&view), vec!["error: bad url".to_string()]);
        assert!(renderer.render(&view).is_empty());

        view.banner_revision = 2;
        assert_eq!(renderer.render(&view), vec!["error: bad url".to_string()]);
    }

    #[test]
    fn ingesting_notice_is_printed_on_start_only() {
        let mut renderer = TerminalRenderer::new();
        renderer.render(&AppViewModel::default());
        let busy = AppViewModel {
            ingesting: true,
            ..AppViewModel::default()
        };
        assert_eq!(renderer.render(&busy), vec![INGEST_NOTICE.to_string()]);
        assert!(renderer.render(&busy).is_empty());
    }

    #[test]
    fn video_list_numbers_videos_and_questions() {
        let view = AppViewModel {
            videos: vec![video("abc123", "Intro", true), video("def", "Second", false)],
            selected_video_id: Some("abc123".to_string()),
            selected_video_title: Some("Intro".to_string()),
            ..AppViewModel::default()
        };
        let lines = video_list(&view);
        assert_eq!(lines[0], "Ingested videos (2):");
        assert_eq!(lines[1], "* 1. Intro [abc123 · 12 chunks]");
        assert_eq!(lines[2], "      1.1 What is X?");
        assert_eq!(lines[3], "  2. Second [def · 12 chunks]");
        assert_eq!(lines.last().map(String::as_str), Some("Showing results from: Intro"));
    }
}
