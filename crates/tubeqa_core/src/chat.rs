use chrono::{DateTime, Utc};

/// Per-session message identifier. Allocated from a counter owned by the
/// [`ChatSession`], so two sessions never share state.
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    /// Empty only while `pending` is true.
    pub content: String,
    /// Video ids the answer was drawn from. `None` for user messages, errors
    /// and answers without sources.
    pub sources: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub pending: bool,
}

/// Successful answer payload as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Request the session wants dispatched to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    /// Identity of the pending assistant placeholder; the answer is routed
    /// back to it by this id.
    pub message_id: MessageId,
    pub question: String,
    /// Scope captured at submit time.
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyQuestion,
    AlreadySubmitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    placeholder: MessageId,
    scope: Option<String>,
}

/// Append-only chat thread with at most one question in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
    in_flight: Option<InFlight>,
    input: String,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Scope of the outstanding question, if any.
    pub fn in_flight_scope(&self) -> Option<&str> {
        self.in_flight.as_ref().and_then(|f| f.scope.as_deref())
    }

    /// Accepts a question: appends the user message and its pending
    /// assistant placeholder, clears the input buffer and returns the request
    /// to dispatch. Rejections leave the session untouched.
    pub fn submit(
        &mut self,
        question: &str,
        scope: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<AskRequest, SubmitRejection> {
        if question.trim().is_empty() {
            return Err(SubmitRejection::EmptyQuestion);
        }
        if self.in_flight.is_some() {
            return Err(SubmitRejection::AlreadySubmitting);
        }

        let user_id = self.allocate_id();
        self.messages.push(ChatMessage {
            id: user_id,
            role: Role::User,
            content: question.to_string(),
            sources: None,
            created_at: at,
            pending: false,
        });

        let placeholder = self.allocate_id();
        self.messages.push(ChatMessage {
            id: placeholder,
            role: Role::Assistant,
            content: String::new(),
            sources: None,
            created_at: at,
            pending: true,
        });

        let scope = scope.filter(|s| !s.is_empty()).map(ToOwned::to_owned);
        self.in_flight = Some(InFlight {
            placeholder,
            scope: scope.clone(),
        });
        self.input.clear();

        Ok(AskRequest {
            message_id: placeholder,
            question: question.to_string(),
            video_id: scope,
        })
    }

    /// Resolves the pending placeholder identified by `id` with either the
    /// answer or the error text. Returns false when no pending message has
    /// that id (already resolved or unknown), in which case nothing changes.
    pub fn resolve(&mut self, id: MessageId, result: Result<Answer, String>) -> bool {
        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.pending)
        else {
            return false;
        };

        match result {
            Ok(answer) => {
                message.content = answer.answer;
                message.sources = if answer.sources.is_empty() {
                    None
                } else {
                    Some(answer.sources)
                };
            }
            Err(error) => {
                message.content = error;
                message.sources = None;
            }
        }
        message.pending = false;

        if self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.placeholder == id)
        {
            self.in_flight = None;
        }
        true
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        self.next_id
    }
}
