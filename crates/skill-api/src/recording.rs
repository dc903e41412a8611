use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::host::Host;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Say(String),
    End {
        session_id: String,
        text: String,
    },
    Continue {
        session_id: String,
        text: String,
        intent_filter: Vec<String>,
        state: String,
    },
    Failure {
        skill: String,
        reason: String,
    },
}

impl Reply {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Say(text) | Self::End { text, .. } | Self::Continue { text, .. } => text,
            Self::Failure { reason, .. } => reason,
        }
    }
}

/// A [`Host`] that remembers every reply, for driving skills without an
/// assistant around them.
#[derive(Debug, Default)]
pub struct RecordingHost {
    replies: Mutex<Vec<Reply>>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replies(&self) -> Vec<Reply> {
        self.replies.lock().await.clone()
    }

    /// Return recorded replies, and start over
    pub async fn take(&self) -> Vec<Reply> {
        std::mem::take(&mut *self.replies.lock().await)
    }

    async fn push(&self, reply: Reply) {
        self.replies.lock().await.push(reply);
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn say(&self, text: String) {
        self.push(Reply::Say(text)).await;
    }

    async fn end_dialog(&self, session_id: &str, text: String) {
        self.push(Reply::End {
            session_id: session_id.to_string(),
            text,
        })
        .await;
    }

    async fn continue_dialog(
        &self,
        session_id: &str,
        text: String,
        intent_filter: &[&str],
        state: &str,
    ) {
        self.push(Reply::Continue {
            session_id: session_id.to_string(),
            text,
            intent_filter: intent_filter.iter().map(ToString::to_string).collect(),
            state: state.to_string(),
        })
        .await;
    }

    async fn report_failure(&self, skill: &str, reason: &str) {
        self.push(Reply::Failure {
            skill: skill.to_string(),
            reason: reason.to_string(),
        })
        .await;
    }
}
