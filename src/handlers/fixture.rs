use hue::legacy_api::{ApiBridgeState, ApiGroup, ApiLight, ApiLightStateUpdate, ApiScene};
use hue::sim::SimBridge;
use skill_api::dialog::DialogSession;
use skill_api::recording::{RecordingHost, Reply};

use crate::daytime::DayPhase;
use crate::handlers::IntentContext;
use crate::location::LOCATION_SLOT;
use crate::talk::Talk;

/// Kitchen (lights 1, 2) has no "Evening" scene, loft (light 3) does
pub fn house() -> SimBridge {
    let mut state = ApiBridgeState::default();
    for (id, name) in [("1", "Ceiling"), ("2", "Counter"), ("3", "Bed")] {
        state.lights.insert(id.into(), ApiLight::new(name));
    }
    state.groups.insert("1".into(), ApiGroup::room("Kitchen", &["1", "2"]));
    state.groups.insert("2".into(), ApiGroup::room("Loft", &["3"]));
    state.scenes.insert(
        "ev".into(),
        ApiScene::for_group("Evening", 2, &["3"]).with_lightstate(
            "3",
            ApiLightStateUpdate {
                bri: Some(77),
                ..ApiLightStateUpdate::default()
            },
        ),
    );
    state
        .scenes
        .insert("ck".into(), ApiScene::for_lights("Cooking", &["1", "2"]));
    SimBridge::new(state)
}

pub fn context<'a>(
    bridge: &'a mut SimBridge,
    host: &'a RecordingHost,
    phase: DayPhase,
) -> IntentContext<'a, SimBridge, RecordingHost> {
    IntentContext {
        bridge,
        host,
        device_name: "Loft",
        phase,
    }
}

pub fn session(locations: &[&str]) -> DialogSession {
    locations
        .iter()
        .fold(DialogSession::new("test"), |session, location| {
            session.with_slot(LOCATION_SLOT, location)
        })
}

pub fn light_on(bridge: &SimBridge, id: &str) -> bool {
    bridge.state().lights[id].state.on
}

pub fn bri(bridge: &SimBridge, id: &str) -> Option<u8> {
    bridge.state().lights[id].state.bri
}

/// Assert that the only reply is an end of dialog saying `talk`
pub async fn assert_ended_with(host: &RecordingHost, talk: &Talk) {
    let replies = host.take().await;
    assert_eq!(replies.len(), 1, "expected one reply, got {replies:?}");
    assert!(
        matches!(&replies[0], Reply::End { text, .. } if talk.matches(text)),
        "expected {talk:?}, got {replies:?}"
    );
}
