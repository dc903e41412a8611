use hue::bridge::BridgeClient;
use skill_api::dialog::DialogSession;
use skill_api::host::Host;

use crate::error::SkillResult;
use crate::handlers::{Flow, IntentContext, confirm};
use crate::lights::{self, SceneOutcome};
use crate::location;

/// Switch lights on, using the scene for the current time of day when the
/// group has one. Stops at the first group the scene was applied to.
pub async fn power_on<B, H>(
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

        match lights::apply_scene(&mut *ctx.bridge, group.id, scene)
            .await?
            .strict()?
        {
            SceneOutcome::Applied => break,
            _ => {
                log::debug!(
                    "No scene {scene} for group \"{}\", switching on instead",
                    group.name
                );
                ctx.bridge.set_on(group.id, true).await?;
            }
        }
    }

    confirm(ctx.host, session).await;
    Ok(Flow::Done)
}

pub async fn power_off<B, H>(
    ctx: &mut IntentContext<'_, B, H>,
    session: &DialogSession,
) -> SkillResult<Flow>
where
    B: BridgeClient + ?Sized,
    H: Host + ?Sized,
{
    let locations = location::resolve(&*ctx.bridge, ctx.host, session, ctx.device_name).await?;
    if locations.is_empty() {
        return Ok(Flow::Done);
    }

    for target in locations.targets() {
        match lights::find_group(&*ctx.bridge, &target).await? {
            Some(group) => ctx.bridge.set_on(group.id, false).await?,
            None => {
                log::warn!("Requested group \"{target}\" does not exist on the Philips Hue bridge");
            }
        }
    }

    confirm(ctx.host, session).await;
    Ok(Flow::Done)
}

#[cfg(test)]
mod tests {
    use hue::bridge::BridgeClient;

    use crate::daytime::DayPhase;
    use crate::handlers::fixture::{assert_ended_with, bri, context, house, light_on, session};
    use crate::handlers::{Flow, power_off, power_on};
    use crate::talk::Talk;

    #[tokio::test]
    async fn power_on_applies_day_phase_scene() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Evening);

        let flow = power_on(&mut ctx, &session(&["loft"])).await.unwrap();
        assert_eq!(flow, Flow::Done);

        assert!(light_on(&bridge, "3"));
        assert_eq!(bri(&bridge, "3"), Some(77));
        assert_ended_with(&host, &Talk::Confirm).await;
    }

    #[tokio::test]
    async fn power_on_falls_back_to_plain_on() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Evening);

        power_on(&mut ctx, &session(&["kitchen"])).await.unwrap();

        assert!(light_on(&bridge, "1"));
        assert!(light_on(&bridge, "2"));
        assert_eq!(bri(&bridge, "1"), None);
        assert_ended_with(&host, &Talk::Confirm).await;
    }

    #[tokio::test]
    async fn power_on_with_unknown_phase_scene() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Morning);

        power_on(&mut ctx, &session(&["loft"])).await.unwrap();

        assert!(light_on(&bridge, "3"));
        assert_eq!(bri(&bridge, "3"), None);
    }

    #[tokio::test]
    async fn power_on_stops_after_first_scene() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Evening);

        power_on(&mut ctx, &session(&["loft", "kitchen"])).await.unwrap();

        assert!(light_on(&bridge, "3"));
        assert!(!light_on(&bridge, "1"));
    }

    #[tokio::test]
    async fn power_on_everywhere_uses_all_lights() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Evening);

        power_on(&mut ctx, &session(&["kitchen", "everywhere", "garage"]))
            .await
            .unwrap();

        for light in ["1", "2", "3"] {
            assert!(light_on(&bridge, light));
        }
        assert_ended_with(&host, &Talk::Confirm).await;
    }

    #[tokio::test]
    async fn power_on_unknown_room_does_nothing() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Evening);

        power_on(&mut ctx, &session(&["garage"])).await.unwrap();

        assert!(!bridge.group(&hue::bridge::GroupRef::All).await.unwrap().on);
        assert_ended_with(&host, &Talk::RoomUnknown("garage".into())).await;
    }

    #[tokio::test]
    async fn power_on_missing_light_is_an_error() {
        let mut bridge = house();
        bridge.state_mut().lights.remove("3");
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Evening);

        assert!(power_on(&mut ctx, &session(&["loft"])).await.is_err());
    }

    #[tokio::test]
    async fn power_off_named_and_everywhere() {
        let mut bridge = house();
        bridge.set_on(0, true).await.unwrap();
        let host = Default::default();

        let mut ctx = context(&mut bridge, &host, DayPhase::Night);
        power_off(&mut ctx, &session(&["kitchen"])).await.unwrap();
        assert!(!light_on(&bridge, "1"));
        assert!(light_on(&bridge, "3"));
        assert_ended_with(&host, &Talk::Confirm).await;

        let mut ctx = context(&mut bridge, &host, DayPhase::Night);
        power_off(&mut ctx, &session(&["loft", "everywhere"]))
            .await
            .unwrap();
        assert!(!light_on(&bridge, "3"));
        assert_ended_with(&host, &Talk::Confirm).await;
    }
}
