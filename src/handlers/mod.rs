mod dim;
mod manage;
mod power;
mod scene;

#[cfg(test)]
mod fixture;

pub use dim::{PERCENT_SLOT, brightness_from_percent, dim};
pub use manage::manage;
pub use power::{power_off, power_on};
pub use scene::{SCENE_SLOT, set_scene};

use skill_api::dialog::DialogSession;
use skill_api::host::Host;

use crate::daytime::DayPhase;
use crate::intent::DialogState;
use crate::talk::Talk;

/// What a handler needs for one intent: the bridge, the host to reply
/// through, and the assistant settings in effect.
pub struct IntentContext<'a, B: ?Sized, H: ?Sized> {
    pub bridge: &'a mut B,
    pub host: &'a H,
    pub device_name: &'a str,
    pub phase: DayPhase,
}

/// How a handler left the dialog
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Done,
    /// A question was asked, and the dialog waits for the answer
    Asked(DialogState),
}

async fn confirm<H: Host + ?Sized>(host: &H, session: &DialogSession) {
    host.end_dialog(&session.session_id, Talk::Confirm.render())
        .await;
}

async fn ask<H: Host + ?Sized>(host: &H, session: &DialogSession, state: DialogState) -> Flow {
    let talk = match state {
        DialogState::WhatPercentage => Talk::WhatPercentage,
        DialogState::WhatScenery => Talk::WhatScenery,
    };

    host.continue_dialog(
        &session.session_id,
        talk.render(),
        &[state.answered_by().as_str()],
        state.as_str(),
    )
    .await;

    Flow::Asked(state)
}
