//! Chat controller - drives one session against the answering service

use chat_core::{AnswerError, AnswerService, ChatMode};

use crate::session::{ChatSession, SessionError};

/// What happened to the closing evaluation of a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingOutcome {
    Graded(String),
    Failed(AnswerError),
}

/// Result of one user turn. Failures are already in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, nothing sent.
    Ignored,
    /// The session could not take input right now; nothing sent.
    Rejected(SessionError),
    Answered {
        answer: String,
        grading: Option<GradingOutcome>,
    },
    Failed(AnswerError),
}

pub struct ChatController<S: AnswerService> {
    session: ChatSession,
    service: S,
}

impl<S: AnswerService> ChatController<S> {
    pub fn new(service: S) -> Self {
        Self::with_session(ChatSession::new(), service)
    }

    pub fn with_session(session: ChatSession, service: S) -> Self {
        Self { session, service }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn toggle_tutor_mode(&mut self) -> Result<ChatMode, SessionError> {
        self.session.toggle_mode()
    }

    /// Runs one turn. Taking `&mut self` keeps a session to one request in
    /// flight; the grading call only starts after the turn's reply resolved.
    pub async fn handle_user_input(&mut self, input: &str) -> TurnOutcome {
        if input.trim().is_empty() {
            return TurnOutcome::Ignored;
        }
        self.session.record_user_input(input);

        let plan = match self.session.plan_turn(input) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "turn rejected");
                self.session.record_error(&e.to_string());
                return TurnOutcome::Rejected(e);
            }
        };

        let request = self.session.answer_request(&plan);
        tracing::debug!(
            mode = request.mode.as_str(),
            history_len = request.chat_history.len(),
            phase = self.session.tutor_state().phase.as_str(),
            "sending turn"
        );

        let reply = match self.service.answer(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "answer request failed");
                self.session.record_error(e.detail());
                return TurnOutcome::Failed(e);
            }
        };

        if let Err(e) = self.session.commit_reply(plan, &reply.answer) {
            tracing::error!(error = %e, "could not commit reply");
            self.session.record_error(&e.to_string());
            return TurnOutcome::Rejected(e);
        }

        let grading = if self.session.awaiting_grading() {
            Some(self.run_grading().await)
        } else {
            None
        };

        TurnOutcome::Answered {
            answer: reply.answer,
            grading,
        }
    }

    async fn run_grading(&mut self) -> GradingOutcome {
        let Some(request) = self.session.grading_request() else {
            return GradingOutcome::Failed(AnswerError::Protocol(
                "no quiz awaiting grading".to_string(),
            ));
        };

        tracing::info!(
            topic = %self.session.tutor_state().topic,
            "quiz complete, requesting grading"
        );

        let result = self.service.grade(&request).await;
        let (reply, outcome) = match result {
            Ok(reply) => {
                let answer = reply.answer;
                (Some(answer.clone()), GradingOutcome::Graded(answer))
            }
            Err(e) => {
                tracing::error!(error = %e, "grading request failed");
                self.session.record_error(e.detail());
                (None, GradingOutcome::Failed(e))
            }
        };

        if let Err(e) = self.session.finish_grading(request, reply.as_deref()) {
            tracing::error!(error = %e, "could not close quiz");
        }
        outcome
    }
}
