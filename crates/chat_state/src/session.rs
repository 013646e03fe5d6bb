//! Chat session - everything one conversation carries between turns
//!
//! A turn is two-phase: `plan_turn` works out the prompt and the tutor event
//! without touching the session, and `commit_reply` applies both together
//! once the reply is in. A failed request therefore never leaves the phase
//! advanced without a matching history entry.

use chat_core::{
    AnswerRequest, ChatHistory, ChatMode, GradingRequest, HistoryEntry, Transcript,
    TranscriptEntry,
};
use thiserror::Error;
use uuid::Uuid;

use crate::machine::{TransitionError, TutorEvent, TutorMachine, TutorPhase, TutorState};
use crate::prompts;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Tutor is not accepting input while {0:?}")]
    NotAcceptingInput(TutorPhase),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A prepared turn that has not been sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    /// Templated prompt; becomes the first half of the history entry.
    pub prompt: String,
    pub raw_question: String,
    pub mode: ChatMode,
    /// Tutor event to apply once the reply arrives.
    pub tutor_event: Option<TutorEvent>,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation_id: Uuid,
    mode: ChatMode,
    history: ChatHistory,
    tutor: TutorMachine,
    transcript: Transcript,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_conversation_id(Uuid::new_v4())
    }

    pub fn with_conversation_id(conversation_id: Uuid) -> Self {
        Self {
            conversation_id,
            mode: ChatMode::Normal,
            history: ChatHistory::new(),
            tutor: TutorMachine::new(),
            transcript: Transcript::new(),
        }
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn tutor_state(&self) -> &TutorState {
        self.tutor.state()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Flips normal/tutor. History and transcript start over and the quiz
    /// restarts from the topic question.
    pub fn toggle_mode(&mut self) -> Result<ChatMode> {
        let next = self.mode.toggled();
        let event = match next {
            ChatMode::Tutor => TutorEvent::Activated,
            ChatMode::Normal => TutorEvent::Deactivated,
        };
        if next.is_tutor() && self.tutor.phase().is_active() {
            self.tutor.reset();
        }
        self.tutor.handle_event(event)?;

        self.mode = next;
        self.history.clear();
        self.transcript.clear();
        self.transcript.push(TranscriptEntry::bot(match next {
            ChatMode::Tutor => prompts::TUTOR_ON_MESSAGE,
            ChatMode::Normal => prompts::TUTOR_OFF_MESSAGE,
        }));

        tracing::info!(mode = next.as_str(), "chat mode toggled");
        Ok(next)
    }

    /// Picks the template for `input` given the current mode and phase.
    pub fn plan_turn(&self, input: &str) -> Result<TurnPlan> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let (prompt, tutor_event) = match self.mode {
            ChatMode::Normal => (prompts::normal_prompt(input), None),
            ChatMode::Tutor => {
                let state = self.tutor.state();
                if !state.phase.accepts_user_input() {
                    return Err(SessionError::NotAcceptingInput(state.phase));
                }
                match state.phase.question_number() {
                    None => (
                        prompts::tutor_intake_prompt(input),
                        Some(TutorEvent::TopicAccepted {
                            topic: input.to_string(),
                        }),
                    ),
                    Some(number) => (
                        prompts::tutor_answer_prompt(&state.topic, number, input),
                        Some(TutorEvent::AnswerAccepted),
                    ),
                }
            }
        };

        if let Some(event) = &tutor_event {
            self.tutor.preview(event)?;
        }

        Ok(TurnPlan {
            prompt,
            raw_question: input.to_string(),
            mode: self.mode,
            tutor_event,
        })
    }

    pub fn answer_request(&self, plan: &TurnPlan) -> AnswerRequest {
        AnswerRequest {
            full_prompt: plan.prompt.clone(),
            raw_question: plan.raw_question.clone(),
            chat_history: self.history.clone(),
            mode: plan.mode,
            conversation_id: self.conversation_id.to_string(),
        }
    }

    /// Applies a successful reply: phase advance and history append happen
    /// together or not at all.
    pub fn commit_reply(&mut self, plan: TurnPlan, answer: &str) -> Result<()> {
        if plan.mode != self.mode {
            return Err(SessionError::Transition(TransitionError::InvalidTransition {
                from: self.tutor.phase(),
                event: "stale_turn".to_string(),
            }));
        }
        if let Some(event) = plan.tutor_event {
            self.tutor.handle_event(event)?;
        }
        self.history.push(HistoryEntry::new(plan.prompt, answer));
        self.transcript.push(TranscriptEntry::bot(answer));
        Ok(())
    }

    /// True right after the last quiz answer was committed.
    pub fn awaiting_grading(&self) -> bool {
        self.mode.is_tutor() && self.tutor.phase() == TutorPhase::Grading
    }

    pub fn grading_request(&self) -> Option<GradingRequest> {
        self.awaiting_grading().then(|| GradingRequest {
            question: prompts::grading_prompt(&self.tutor.state().topic),
            chat_history: self.history.clone(),
        })
    }

    /// Closes the quiz. `reply` is `None` when the grading call failed; the
    /// machine goes back to `WaitingTopic` either way.
    pub fn finish_grading(&mut self, request: GradingRequest, reply: Option<&str>) -> Result<()> {
        self.tutor.handle_event(TutorEvent::GradingFinished)?;
        if let Some(answer) = reply {
            self.history.push(HistoryEntry::new(request.question, answer));
            self.transcript.push(TranscriptEntry::bot(answer));
        }
        Ok(())
    }

    pub fn record_user_input(&mut self, input: &str) {
        self.transcript.push(TranscriptEntry::user(input.trim()));
    }

    pub fn record_error(&mut self, detail: &str) {
        self.transcript
            .push(TranscriptEntry::bot(prompts::error_message(detail)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::Sender;

    fn tutor_session() -> ChatSession {
        let mut session = ChatSession::new();
        session.toggle_mode().unwrap();
        session
    }

    #[test]
    fn new_session_is_normal_and_empty() {
        let session = ChatSession::new();
        assert_eq!(session.mode(), ChatMode::Normal);
        assert!(session.history().is_empty());
        assert_eq!(session.tutor_state(), &TutorState::idle());
    }

    #[test]
    fn normal_plan_wraps_raw_text() {
        let session = ChatSession::new();
        let plan = session.plan_turn("  hola ").unwrap();
        assert_eq!(plan.raw_question, "hola");
        assert_eq!(plan.prompt, prompts::normal_prompt("hola"));
        assert!(plan.tutor_event.is_none());

        let request = session.answer_request(&plan);
        assert_eq!(request.mode, ChatMode::Normal);
        assert_eq!(request.conversation_id, session.conversation_id().to_string());
    }

    #[test]
    fn planning_does_not_mutate() {
        let session = tutor_session();
        let before = session.tutor_state().clone();
        let plan = session.plan_turn("derivadas").unwrap();
        assert_eq!(
            plan.tutor_event,
            Some(TutorEvent::TopicAccepted {
                topic: "derivadas".into()
            })
        );
        assert_eq!(session.tutor_state(), &before);
        assert!(session.history().is_empty());
    }

    #[test]
    fn commit_advances_and_appends_together() {
        let mut session = tutor_session();
        let plan = session.plan_turn("derivadas").unwrap();
        let prompt = plan.prompt.clone();
        session.commit_reply(plan, "Listo, pregunta 1").unwrap();

        assert_eq!(session.tutor_state().phase, TutorPhase::WaitingAnswer1);
        assert_eq!(session.tutor_state().topic, "derivadas");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().entries()[0].prompt(), prompt);
    }

    #[test]
    fn answer_prompts_follow_question_number() {
        let mut session = tutor_session();
        let plan = session.plan_turn("derivadas").unwrap();
        session.commit_reply(plan, "P1").unwrap();

        let plan = session.plan_turn("la pendiente").unwrap();
        assert_eq!(
            plan.prompt,
            prompts::tutor_answer_prompt("derivadas", 1, "la pendiente")
        );
    }

    #[test]
    fn last_round_uses_closing_answer_prompt() {
        let mut session = tutor_session();
        for input in ["derivadas", "a1", "a2"] {
            let plan = session.plan_turn(input).unwrap();
            session.commit_reply(plan, "ok").unwrap();
        }
        assert_eq!(session.tutor_state().phase, TutorPhase::WaitingAnswer3);

        let plan = session.plan_turn("a3").unwrap();
        assert_eq!(plan.prompt, prompts::tutor_answer_prompt("derivadas", 3, "a3"));
        assert_eq!(plan.tutor_event, Some(TutorEvent::AnswerAccepted));
    }

    #[test]
    fn empty_input_is_rejected() {
        let session = ChatSession::new();
        assert_eq!(session.plan_turn("   "), Err(SessionError::EmptyInput));
    }

    #[test]
    fn grading_blocks_new_input() {
        let mut session = tutor_session();
        for input in ["derivadas", "a1", "a2", "a3"] {
            let plan = session.plan_turn(input).unwrap();
            session.commit_reply(plan, "ok").unwrap();
        }
        assert!(session.awaiting_grading());
        assert_eq!(
            session.plan_turn("otra"),
            Err(SessionError::NotAcceptingInput(TutorPhase::Grading))
        );

        let request = session.grading_request().unwrap();
        assert_eq!(request.chat_history.len(), 4);
        session.finish_grading(request, Some("¡Bien hecho!")).unwrap();
        assert_eq!(session.tutor_state(), &TutorState::initial());
        assert_eq!(session.history().len(), 5);
    }

    #[test]
    fn failed_grading_still_resets_without_history() {
        let mut session = tutor_session();
        for input in ["derivadas", "a1", "a2", "a3"] {
            let plan = session.plan_turn(input).unwrap();
            session.commit_reply(plan, "ok").unwrap();
        }
        let request = session.grading_request().unwrap();
        session.finish_grading(request, None).unwrap();
        assert_eq!(session.tutor_state(), &TutorState::initial());
        assert_eq!(session.history().len(), 4);
    }

    #[test]
    fn toggle_resets_history_and_quiz() {
        let mut session = tutor_session();
        let plan = session.plan_turn("derivadas").unwrap();
        session.commit_reply(plan, "P1").unwrap();

        assert_eq!(session.toggle_mode().unwrap(), ChatMode::Normal);
        assert!(session.history().is_empty());
        assert_eq!(session.tutor_state(), &TutorState::idle());
        assert_eq!(
            session.transcript().entries(),
            &[TranscriptEntry::bot(prompts::TUTOR_OFF_MESSAGE)]
        );

        assert_eq!(session.toggle_mode().unwrap(), ChatMode::Tutor);
        assert!(session.history().is_empty());
        assert_eq!(session.tutor_state(), &TutorState::initial());
    }

    #[test]
    fn stale_plan_from_other_mode_is_refused() {
        let mut session = ChatSession::new();
        let plan = session.plan_turn("hola").unwrap();
        session.toggle_mode().unwrap();
        assert!(session.commit_reply(plan, "¡Hola!").is_err());
        assert!(session.history().is_empty());
    }

    #[test]
    fn transcript_records_user_and_errors() {
        let mut session = ChatSession::new();
        session.record_user_input(" hola ");
        session.record_error("Failed to fetch");
        let entries = session.transcript().entries();
        assert_eq!(entries[0].sender, Sender::User);
        assert_eq!(entries[0].text, "hola");
        assert_eq!(entries[1].text, "Lo siento, ocurrió un error: Failed to fetch.");
    }
}
