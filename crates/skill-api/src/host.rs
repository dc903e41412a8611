use async_trait::async_trait;

/// Services the assistant host offers to a skill.
///
/// All replies are plain text. The host turns them into speech, and routes
/// them to the dialog identified by `session_id`.
#[async_trait]
pub trait Host: Send + Sync {
    /// Speak outside of any dialog
    async fn say(&self, text: String);

    async fn end_dialog(&self, session_id: &str, text: String);

    /// Ask a question, and only accept an answer matching one of the intents
    /// in `intent_filter`. The answer is routed back with `state`.
    async fn continue_dialog(
        &self,
        session_id: &str,
        text: String,
        intent_filter: &[&str],
        state: &str,
    );

    /// The skill failed permanently, and will not retry on its own
    async fn report_failure(&self, skill: &str, reason: &str);
}
