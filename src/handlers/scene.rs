use hue::bridge::BridgeClient;
use skill_api::dialog::DialogSession;
use skill_api::host::Host;

use crate::error::SkillResult;
use crate::handlers::{Flow, IntentContext, ask, confirm};
use crate::intent::DialogState;
use crate::lights::{self, SceneOutcome};
use crate::location;
use crate::talk::Talk;

pub const SCENE_SLOT: &str = "Scene";

pub async fn set_scene<B, H>(
    ctx: &mut IntentContext<'_, B, H>,
    session: &DialogSession,
) -> SkillResult<Flow>
where
    B: BridgeClient + ?Sized,
    H: Host + ?Sized,
{
    let scenes: Vec<&str> = session.slot_values(SCENE_SLOT).collect();

    let scene = match scenes.as_slice() {
        [] | [""] => return Ok(ask(ctx.host, session, DialogState::WhatScenery).await),
        [scene] => *scene,
        _ => {
            ctx.host
                .end_dialog(
                    &session.session_id,
                    Talk::CantSpecifyMoreThanOneScene.render(),
                )
                .await;
            return Ok(Flow::Done);
        }
    };

    if !lights::scene_exists(&*ctx.bridge, scene).await? {
        log::info!("Scene {scene:?} is not known to the Philips Hue bridge");
        ctx.host
            .end_dialog(
                &session.session_id,
                Talk::SceneUnknown(scene.to_string()).render(),
            )
            .await;
        return Ok(Flow::Done);
    }

    let locations = location::resolve(&*ctx.bridge, ctx.host, session, ctx.device_name).await?;
    if locations.is_empty() {
        return Ok(Flow::Done);
    }

    let mut applied = 0;
    for target in locations.targets() {
        let Some(group) = lights::find_group(&*ctx.bridge, &target).await? else {
            log::warn!("Requested group \"{target}\" does not exist on the Philips Hue bridge");
            continue;
        };

        match lights::apply_scene(&mut *ctx.bridge, group.id, scene)
            .await?
            .strict()?
        {
            SceneOutcome::Applied => applied += 1,
            _ => {
                log::warn!(
                    "Requested scene {scene:?} for group \"{}\" does not exist on the Philips Hue bridge",
                    group.name
                );
            }
        }
    }

    if applied == 0 {
        ctx.host
            .end_dialog(&session.session_id, Talk::SceneNotInThisRoom.render())
            .await;
    } else {
        confirm(ctx.host, session).await;
    }

    Ok(Flow::Done)
}
