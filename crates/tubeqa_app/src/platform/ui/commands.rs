//! Terminal input: each line is either a slash command or a question.

use chrono::{DateTime, Utc};
use tubeqa_core::{AppViewModel, Msg};

pub const HELP_TEXT: &str = "\
Commands:
  /ingest <url>     process a YouTube video (youtube.com/watch?v=... or youtu.be/...)
  /videos           list ingested videos and their suggested questions
  /select <n|id>    scope questions to a video (again to go back to all videos)
  /ask <n> <k>      ask suggested question k of video n
  /clear            delete ALL stored videos on the server
  /health           re-check the backend connection
  /help             show this help
  /quit             exit
Anything else is sent as a question.";

pub const NO_VIDEOS_NOTICE: &str = "Ingest a video with /ingest <url> before asking questions.";
pub const BUSY_NOTICE: &str = "Still waiting for the previous answer; question not sent.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Ask(String),
    Ingest(String),
    Videos,
    Select(String),
    Suggested { video: usize, question: usize },
    Clear,
    Health,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> UserCommand {
    let line = line.trim();
    if line.is_empty() {
        return UserCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return UserCommand::Ask(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match (name.to_ascii_lowercase().as_str(), arg) {
        ("ingest", "") => UserCommand::Invalid("Usage: /ingest <youtube url>".to_string()),
        ("ingest", url) => UserCommand::Ingest(url.to_string()),
        ("videos", _) => UserCommand::Videos,
        ("select", "") => UserCommand::Invalid("Usage: /select <number or video id>".to_string()),
        ("select", target) => UserCommand::Select(target.to_string()),
        ("ask", args) => parse_suggested(args),
        ("clear", _) => UserCommand::Clear,
        ("health", _) => UserCommand::Health,
        ("help", _) | ("?", _) => UserCommand::Help,
        ("quit", _) | ("exit", _) | ("q", _) => UserCommand::Quit,
        (other, _) => UserCommand::Invalid(format!("Unknown command /{other}. Type /help.")),
    }
}

fn parse_suggested(args: &str) -> UserCommand {
    let mut parts = args.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(video)), Some(Ok(question)), None) if video > 0 && question > 0 => {
            UserCommand::Suggested { video, question }
        }
        _ => UserCommand::Invalid("Usage: /ask <video number> <question number>".to_string()),
    }
}

/// What the application loop should do with a parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dispatch(Vec<Msg>),
    Print(Vec<String>),
    ConfirmClear,
    Quit,
}

/// Maps a command onto core messages, using the current view to resolve
/// video numbers into ids.
pub fn resolve(command: UserCommand, view: &AppViewModel, at: DateTime<Utc>) -> Action {
    match command {
        UserCommand::Empty => Action::Dispatch(Vec::new()),
        UserCommand::Ask(text) => {
            Action::Dispatch(vec![Msg::ChatInputChanged(text), Msg::QuestionSubmitted { at }])
        }
        UserCommand::Ingest(url) => {
            Action::Dispatch(vec![Msg::IngestInputChanged(url), Msg::IngestSubmitted])
        }
        UserCommand::Videos => Action::Print(super::render::video_list(view)),
        UserCommand::Select(target) => match find_video(view, &target) {
            Some(video_id) => Action::Dispatch(vec![Msg::VideoClicked { video_id }]),
            None => Action::Print(vec![format!("No ingested video matches \"{target}\".")]),
        },
        UserCommand::Suggested { video, question } => {
            let Some(row) = view.videos.get(video - 1) else {
                return Action::Print(vec![format!("There is no video number {video}.")]);
            };
            let Some(text) = row.suggested_questions.get(question - 1) else {
                return Action::Print(vec![format!(
                    "\"{}\" has no suggested question number {question}.",
                    row.title
                )]);
            };
            Action::Dispatch(vec![Msg::SuggestedQuestionClicked {
                video_id: row.video_id.clone(),
                question: text.clone(),
                at,
            }])
        }
        UserCommand::Clear => Action::ConfirmClear,
        UserCommand::Health => Action::Dispatch(vec![Msg::HealthRetryClicked]),
        UserCommand::Help => Action::Print(HELP_TEXT.lines().map(ToOwned::to_owned).collect()),
        UserCommand::Quit => Action::Quit,
        UserCommand::Invalid(message) => Action::Print(vec![message]),
    }
}

/// Explains why a question the user just typed will not be sent. The core
/// drops such questions silently.
pub fn blocked_question_notice(
    command: &UserCommand,
    view: &AppViewModel,
) -> Option<&'static str> {
    match command {
        UserCommand::Ask(_) if view.videos.is_empty() => Some(NO_VIDEOS_NOTICE),
        UserCommand::Ask(_) | UserCommand::Suggested { .. } if view.submitting => {
            Some(BUSY_NOTICE)
        }
        _ => None,
    }
}

fn find_video(view: &AppViewModel, target: &str) -> Option<String> {
    if let Ok(index) = target.parse::<usize>() {
        if let Some(row) = index.checked_sub(1).and_then(|i| view.videos.get(i)) {
            return Some(row.video_id.clone());
        }
    }
    view.videos
        .iter()
        .find(|row| row.video_id == target)
        .map(|row| row.video_id.clone())
}

pub fn is_confirmation(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
