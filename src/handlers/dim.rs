use hue::MAX_BRIGHTNESS;
use hue::bridge::BridgeClient;
use skill_api::dialog::DialogSession;
use skill_api::host::Host;

use crate::error::SkillResult;
use crate::handlers::{Flow, IntentContext, ask, confirm};
use crate::intent::DialogState;
use crate::lights;
use crate::location;

pub const PERCENT_SLOT: &str = "Percent";

/// Convert a percentage to a bridge brightness, clamping to 0-100% first.
/// Halves round to even.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn brightness_from_percent(percent: f64) -> u8 {
    let percent = percent.clamp(0.0, 100.0);
    (f64::from(MAX_BRIGHTNESS) * percent / 100.0).round_ties_even() as u8
}

fn parse_percent(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches('%')
        .trim_end()
        .parse::<f64>()
        .ok()
        .filter(|percent| percent.is_finite())
}

pub async fn dim<B, H>(ctx: &mut IntentContext<'_, B, H>, session: &DialogSession) -> SkillResult<Flow>
where
    B: BridgeClient + ?Sized,
    H: Host + ?Sized,
{
    let Some(percent) = session.slot_value(PERCENT_SLOT).and_then(parse_percent) else {
        return Ok(ask(ctx.host, session, DialogState::WhatPercentage).await);
    };
    let brightness = brightness_from_percent(percent);

    let locations = location::resolve(&*ctx.bridge, ctx.host, session, ctx.device_name).await?;
    if locations.is_empty() {
        return Ok(Flow::Done);
    }

    for target in locations.targets() {
        match lights::find_group(&*ctx.bridge, &target).await? {
            Some(group) => {
                log::debug!("Setting brightness of \"{}\" to {brightness}", group.name);
                ctx.bridge.set_brightness(group.id, brightness).await?;
            }
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
    use skill_api::recording::Reply;

    use crate::daytime::DayPhase;
    use crate::handlers::dim::parse_percent;
    use crate::handlers::fixture::{assert_ended_with, bri, context, house, session};
    use crate::handlers::{Flow, PERCENT_SLOT, brightness_from_percent, dim};
    use crate::intent::DialogState;
    use crate::talk::Talk;

    #[test]
    fn percent_to_brightness() {
        assert_eq!(brightness_from_percent(0.0), 0);
        assert_eq!(brightness_from_percent(50.0), 127);
        assert_eq!(brightness_from_percent(100.0), 254);
        assert_eq!(brightness_from_percent(-20.0), 0);
        assert_eq!(brightness_from_percent(250.0), 254);
        assert_eq!(brightness_from_percent(33.0), 84);
        assert_eq!(brightness_from_percent(75.0), 190);
        assert_eq!(brightness_from_percent(25.0), 64);
    }

    #[test]
    fn percent_parsing() {
        assert_eq!(parse_percent("40"), Some(40.0));
        assert_eq!(parse_percent(" 12.5 % "), Some(12.5));
        assert_eq!(parse_percent("lots"), None);
        assert_eq!(parse_percent("NaN"), None);
        assert_eq!(parse_percent("inf"), None);
    }

    #[tokio::test]
    async fn dims_named_rooms() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Night);

        let session = session(&["kitchen"]).with_slot(PERCENT_SLOT, "50");
        assert_eq!(dim(&mut ctx, &session).await.unwrap(), Flow::Done);

        assert_eq!(bri(&bridge, "1"), Some(127));
        assert_eq!(bri(&bridge, "2"), Some(127));
        assert_eq!(bri(&bridge, "3"), None);
        assert_ended_with(&host, &Talk::Confirm).await;
    }

    #[tokio::test]
    async fn dims_everywhere_clamped() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Night);

        let session = session(&["loft", "everywhere"]).with_slot(PERCENT_SLOT, "180");
        dim(&mut ctx, &session).await.unwrap();

        for light in ["1", "2", "3"] {
            assert_eq!(bri(&bridge, light), Some(254));
        }
        assert_ended_with(&host, &Talk::Confirm).await;
    }

    #[tokio::test]
    async fn missing_percent_asks() {
        let mut bridge = house();
        let host = Default::default();
        let mut ctx = context(&mut bridge, &host, DayPhase::Night);

        let flow = dim(&mut ctx, &session(&["garage"])).await.unwrap();
        assert_eq!(flow, Flow::Asked(DialogState::WhatPercentage));

        let replies = host.take().await;
        assert_eq!(replies.len(), 1);
        assert!(matches!(
            &replies[0],
            Reply::Continue { intent_filter, state, .. }
                if intent_filter == &["AnswerPercent"] && state == "whatPercentage"
        ));
    }
}
