#![allow(dead_code)]

use std::sync::Arc;

use hue::legacy_api::{ApiBridgeState, ApiGroup, ApiLight, ApiLightStateUpdate, ApiScene};
use hue::sim::SimBridge;
use hue_skill::config::AppConfig;
use hue_skill::daytime::FixedClock;
use hue_skill::skill::HueSkill;
use hue_skill::talk::Talk;
use skill_api::dialog::DialogSession;
use skill_api::recording::{RecordingHost, Reply};

pub type TestSkill = HueSkill<SimBridge, RecordingHost>;

pub const EVENING: FixedClock = FixedClock(20);

/// Kitchen (lights 1, 2) and loft (light 3). Only the loft has an "Evening"
/// scene.
pub fn house() -> ApiBridgeState {
    let mut state = ApiBridgeState::default();
    for (id, name) in [("1", "Ceiling"), ("2", "Counter"), ("3", "Bed")] {
        state.lights.insert(id.into(), ApiLight::new(name));
    }
    state.groups.insert("1".into(), ApiGroup::room("Kitchen", &["1", "2"]));
    state.groups.insert("2".into(), ApiGroup::room("Loft", &["3"]));
    state.scenes.insert(
        "evening-loft".into(),
        ApiScene::for_group("Evening", 2, &["3"]).with_lightstate(
            "3",
            ApiLightStateUpdate {
                bri: Some(77),
                ..ApiLightStateUpdate::default()
            },
        ),
    );
    state
}

pub fn authorized_bridge() -> SimBridge {
    SimBridge::new(house()).with_authorized_user("10.0.0.2", "alice")
}

/// Skill on an authorized bridge, in the evening
pub async fn started_skill(device_name: &str) -> (TestSkill, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::new());
    let mut skill = HueSkill::new(AppConfig::new(device_name), authorized_bridge(), host.clone())
        .with_clock(EVENING);
    skill.on_start().await.unwrap();
    (skill, host)
}

pub fn session(id: &str, slots: &[(&str, &str)]) -> DialogSession {
    slots
        .iter()
        .fold(DialogSession::new(id), |session, (slot, value)| {
            session.with_slot(slot, value)
        })
}

pub async fn light_on(skill: &TestSkill, id: &str) -> bool {
    let bridge = skill.bridge();
    let on = bridge.lock().await.state().lights[id].state.on;
    on
}

pub async fn bri(skill: &TestSkill, id: &str) -> Option<u8> {
    let bridge = skill.bridge();
    let bri = bridge.lock().await.state().lights[id].state.bri;
    bri
}

pub fn said(replies: &[Reply], talk: &Talk) -> usize {
    replies
        .iter()
        .filter(|reply| matches!(reply, Reply::Say(text) if talk.matches(text)))
        .count()
}

pub fn ended_with(replies: &[Reply], talk: &Talk) -> bool {
    matches!(replies, [Reply::End { text, .. }] if talk.matches(text))
}
