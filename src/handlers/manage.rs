use hue::bridge::BridgeClient;
use skill_api::dialog::DialogSession;
use skill_api::host::Host;

use crate::error::SkillResult;
use crate::handlers::{Flow, IntentContext, confirm};
use crate::lights::{self, SceneOutcome};
use crate::location;

/// Toggle lights: groups that are on are switched off, groups that are off
/// get the scene for the current time of day.
pub async fn manage<B, H>(
    ctx: &mut IntentContext<'_, B, H>,
    session: &DialogSession,
) -> SkillResult<Flow>
where
    B: BridgeClient + ?Sized,
    H: Host + ?Sized,
{
    let scene = ctx.phase.scene_name();

    let locations = location::resolve(&*ctx.bridge, ctx.host, session, ctx.device_name).await?;
    if locations.is_empty() {
        return Ok(Flow::Done);
    }

    for target in locations.targets() {
        let Some(group) = lights::find_group(&*ctx.bridge, &target).await? else {
            log::warn!("Requested group \"{target}\" does not exist on the Philips Hue bridge");
            continue;
        };

        if group.is_all_lights() {
            ctx.bridge.set_on(group.id, !group.on).await?;
            break;
        }

        if group.on {
            ctx.bridge.set_on(group.id, false).await?;
            continue;
        }

        match lights::apply_scene(&mut *ctx.bridge, group.id, scene).await? {
            SceneOutcome::Applied => {}
            SceneOutcome::UnknownScene | SceneOutcome::NotInGroup => {
                ctx.bridge.set_on(group.id, true).await?;
            }
            SceneOutcome::UnknownLight(light) => {
                log::debug!(
                    "Scene {scene} for group \"{}\" refers to missing light {light}",
                    group.name
                );
            }
        }
    }

    confirm(ctx.host, session).await;
    Ok(Flow::Done)
}
