use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;

use skill_api::dialog::DialogSession;

use crate::error::SkillError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    PowerOnLights,
    PowerOffLights,
    SetLightsScene,
    ManageLights,
    DimLights,
    AnswerPercent,
    UserRandomAnswer,
}

impl Intent {
    pub const ALL: [Self; 7] = [
        Self::PowerOnLights,
        Self::PowerOffLights,
        Self::SetLightsScene,
        Self::ManageLights,
        Self::DimLights,
        Self::AnswerPercent,
        Self::UserRandomAnswer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PowerOnLights => "PowerOnLights",
            Self::PowerOffLights => "PowerOffLights",
            Self::SetLightsScene => "SetLightsScene",
            Self::ManageLights => "ManageLights",
            Self::DimLights => "DimLights",
            Self::AnswerPercent => "AnswerPercent",
            Self::UserRandomAnswer => "UserRandomAnswer",
        }
    }

    /// Protected intents are only accepted as the answer to a question
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::AnswerPercent | Self::UserRandomAnswer)
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| SkillError::UnknownIntent(s.to_string()))
    }
}

/// Question the skill is waiting on an answer for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogState {
    WhatPercentage,
    WhatScenery,
}

impl DialogState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WhatPercentage => "whatPercentage",
            Self::WhatScenery => "whatScenery",
        }
    }

    /// The only intent accepted as an answer
    #[must_use]
    pub const fn answered_by(self) -> Intent {
        match self {
            Self::WhatPercentage => Intent::AnswerPercent,
            Self::WhatScenery => Intent::UserRandomAnswer,
        }
    }

    /// Intent handler that continues once the answer arrives
    #[must_use]
    pub const fn resumes(self) -> Intent {
        match self {
            Self::WhatPercentage => Intent::DimLights,
            Self::WhatScenery => Intent::SetLightsScene,
        }
    }
}

/// How long a question waits for its answer
pub const QUESTION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Debug)]
pub struct PendingQuestion {
    pub state: DialogState,
    /// The turn that asked the question
    pub previous: DialogSession,
    asked: Instant,
}

impl PendingQuestion {
    #[must_use]
    pub fn new(state: DialogState, previous: DialogSession) -> Self {
        Self {
            state,
            previous,
            asked: Instant::now(),
        }
    }

    #[must_use]
    pub fn accepts(&self, intent: Intent) -> bool {
        intent == self.state.answered_by()
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.asked.elapsed() >= QUESTION_TIMEOUT
    }
}
