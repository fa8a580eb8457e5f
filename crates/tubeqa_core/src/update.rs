use tubeqa_logging::{tubeqa_debug, tubeqa_info};

use crate::{is_valid_youtube_url, AppState, AskRequest, Effect, HealthStatus, Msg, INVALID_URL_MESSAGE};

const HEALTHY_STATUS: &str = "healthy";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::IngestInputChanged(text) => {
            state.set_ingest_input(text);
            Vec::new()
        }
        Msg::IngestSubmitted => {
            let url = state.ingest_input().trim().to_string();
            if url.is_empty() || state.is_ingesting() {
                return (state, Vec::new());
            }
            state.set_banner(None);
            if !is_valid_youtube_url(&url) {
                state.set_error_banner(INVALID_URL_MESSAGE);
                return (state, Vec::new());
            }
            let request_id = state.begin_ingest();
            tubeqa_info!("Ingest requested request_id={}", request_id);
            tubeqa_debug!("Ingest url={}", url);
            vec![Effect::Ingest { request_id, url }]
        }
        Msg::IngestCompleted {
            request_id,
            result,
            at,
        } => {
            state.apply_ingest_result(request_id, result, at);
            Vec::new()
        }
        Msg::ChatInputChanged(text) => {
            state.set_chat_input(text);
            Vec::new()
        }
        Msg::QuestionSubmitted { at } => {
            let question = state.chat().input().trim().to_string();
            state
                .submit_question(&question, at)
                .map(ask_effect)
                .into_iter()
                .collect()
        }
        Msg::SuggestedQuestionClicked {
            video_id,
            question,
            at,
        } => {
            // Scope follows the clicked video even when the question itself is
            // dropped because another one is still in flight.
            if !state.select_video(&video_id) {
                return (state, Vec::new());
            }
            state
                .submit_question(&question, at)
                .map(ask_effect)
                .into_iter()
                .collect()
        }
        Msg::AnswerReceived { message_id, result } => {
            state.apply_answer(message_id, result);
            Vec::new()
        }
        Msg::VideoClicked { video_id } => {
            state.toggle_video(&video_id);
            Vec::new()
        }
        Msg::ClearAllClicked => {
            if state.begin_clear() {
                tubeqa_info!("Clear-all requested");
                vec![Effect::ClearAll]
            } else {
                Vec::new()
            }
        }
        Msg::ClearAllCompleted { result } => {
            state.apply_clear_result(result);
            Vec::new()
        }
        Msg::HealthRetryClicked => {
            state.set_health(HealthStatus::Checking);
            vec![Effect::CheckHealth]
        }
        Msg::HealthChecked { result } => {
            let status = match result {
                Ok(report) if report.status == HEALTHY_STATUS => HealthStatus::Connected,
                Ok(report) => {
                    tubeqa_debug!("Backend reported status={}", report.status);
                    HealthStatus::Disconnected
                }
                Err(error) => {
                    tubeqa_debug!("Health check failed: {}", error);
                    HealthStatus::Disconnected
                }
            };
            state.set_health(status);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn ask_effect(request: AskRequest) -> Effect {
    Effect::Ask {
        message_id: request.message_id,
        question: request.question,
        video_id: request.video_id,
    }
}
