use std::str::FromStr;

use async_trait::async_trait;
use itertools::Itertools;

use skill_api::dialog::DialogSession;
use skill_api::host::Host;

pub const CONSOLE_SESSION: &str = "console";

/// Host for running the skill from a terminal. Replies are printed to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleHost;

#[async_trait]
impl Host for ConsoleHost {
    async fn say(&self, text: String) {
        println!("> {text}");
    }

    async fn end_dialog(&self, session_id: &str, text: String) {
        log::debug!("Ending dialog [{session_id}]");
        println!("> {text}");
    }

    async fn continue_dialog(
        &self,
        session_id: &str,
        text: String,
        intent_filter: &[&str],
        state: &str,
    ) {
        log::debug!(
            "Continuing dialog [{session_id}] in state {state}, expecting {}",
            intent_filter.iter().join(" or ")
        );
        println!("> {text}");
    }

    async fn report_failure(&self, skill: &str, reason: &str) {
        log::error!("Skill {skill} failed: {reason}");
    }
}

/// One line of console input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `Intent Slot=value Slot=value ..`
    Intent {
        name: String,
        session: DialogSession,
    },
    Sleep,
    Press,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Err("empty command".to_string());
        };

        match first {
            "sleep" => return Ok(Self::Sleep),
            "press" => return Ok(Self::Press),
            "quit" | "exit" => return Ok(Self::Quit),
            _ => {}
        }

        let session = words.try_fold(DialogSession::new(CONSOLE_SESSION), |session, word| {
            word.split_once('=')
                .map(|(slot, value)| session.with_slot(slot, value))
                .ok_or_else(|| format!("expected Slot=value, found {word:?}"))
        })?;

        Ok(Self::Intent {
            name: first.to_string(),
            session,
        })
    }
}
