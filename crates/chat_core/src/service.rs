use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::{AnswerReply, AnswerRequest, GradingRequest};

/// The remote answering endpoint as seen by the chat controller.
///
/// Callers issue one request at a time per session; implementations do not
/// enforce this.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Regular chat turn (normal mode or a tutor round).
    async fn answer(&self, request: &AnswerRequest) -> Result<AnswerReply>;

    /// Closing evaluation sent after the last tutor question.
    async fn grade(&self, request: &GradingRequest) -> Result<AnswerReply>;
}
