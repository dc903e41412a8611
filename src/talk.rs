use rand::seq::IndexedRandom;

/// Everything the skill can say.
///
/// Each reply has a few phrasings, picked at random so the assistant does not
/// sound like a recording. `{}` is replaced by the reply argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Talk {
    Confirm,
    RoomUnknown(String),
    SceneUnknown(String),
    SceneNotInThisRoom,
    CantSpecifyMoreThanOneScene,
    WhatScenery,
    WhatPercentage,
    PressBridgeButton,
    PressBridgeButtonConfirmation,
    PressBridgeButtonTimeout,
}

impl Talk {
    const fn templates(&self) -> &'static [&'static str] {
        match self {
            Self::Confirm => &["Ok", "Done", "There you go"],
            Self::RoomUnknown(_) => &[
                "I don't know any room called {}",
                "Sorry, there is no {} on the bridge",
            ],
            Self::SceneUnknown(_) => &[
                "I don't know the scene {}",
                "Sorry, the bridge has no scene called {}",
            ],
            Self::SceneNotInThisRoom => &[
                "That scene is not available in this room",
                "Sorry, this room does not have that scene",
            ],
            Self::CantSpecifyMoreThanOneScene => &[
                "I can only set one scene at a time",
                "Please name just one scene",
            ],
            Self::WhatScenery => &["Which scene would you like?", "What scenery?"],
            Self::WhatPercentage => &["To what percentage?", "How bright, in percent?"],
            Self::PressBridgeButton => &[
                "Please press the button on your Philips Hue bridge",
                "I need you to press the link button on the Hue bridge",
            ],
            Self::PressBridgeButtonConfirmation => &[
                "Thank you, I am now connected to your Philips Hue bridge",
                "The Hue bridge is paired, all good",
            ],
            Self::PressBridgeButtonTimeout => &[
                "I could not pair with the Philips Hue bridge, the button was not pressed",
                "Pairing with the Hue bridge timed out",
            ],
        }
    }

    fn fill(&self, template: &str) -> String {
        match self {
            Self::RoomUnknown(arg) | Self::SceneUnknown(arg) => template.replace("{}", arg),
            _ => template.to_string(),
        }
    }

    /// Pick a random phrasing
    #[must_use]
    pub fn render(&self) -> String {
        let template = self
            .templates()
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default();

        self.fill(template)
    }

    /// Whether `text` is one of the phrasings of this reply
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.templates()
            .iter()
            .any(|template| self.fill(template) == text)
    }
}
