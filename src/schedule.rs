use std::future::Future;
use std::time::Duration;

use chrono::{Local, Timelike};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use hue::ALL_LIGHTS_GROUP;
use hue::bridge::BridgeClient;

use crate::daytime::DayPhase;
use crate::error::SkillResult;
use crate::lights::{self, SceneOutcome};

const HOUR: Duration = Duration::from_secs(3600);

/// Bring every group that is on in line with the scene for `phase`.
///
/// Returns the number of groups the scene was applied to.
pub async fn full_hour<B>(bridge: &mut B, phase: DayPhase, enabled: bool) -> SkillResult<usize>
where
    B: BridgeClient + ?Sized,
{
    if !enabled {
        return Ok(0);
    }

    let scene = phase.scene_name();
    if !lights::scene_exists(&*bridge, scene).await? {
        log::debug!("No scene {scene} on the bridge, leaving lights alone");
        return Ok(0);
    }

    let mut applied = 0;
    for group in bridge.groups().await? {
        if !group.on || !group.has_scene(scene) {
            continue;
        }

        match lights::apply_scene(&mut *bridge, group.id, scene).await?.strict()? {
            SceneOutcome::Applied => applied += 1,
            _ => log::info!("Scene {scene} not available for group \"{}\"", group.name),
        }
    }

    log::debug!("Applied scene {scene} to {applied} groups");
    Ok(applied)
}

/// Power down every light
pub async fn sleep<B>(bridge: &mut B) -> SkillResult<()>
where
    B: BridgeClient + ?Sized,
{
    log::info!("Going to sleep, switching all lights off");
    Ok(bridge.set_on(ALL_LIGHTS_GROUP, false).await?)
}

/// Time left until the next full hour
pub fn until_next_hour(now: &impl Timelike) -> Duration {
    let into_hour = Duration::from_secs(u64::from(now.minute() * 60 + now.second()))
        + Duration::from_nanos(u64::from(now.nanosecond()));

    HOUR.saturating_sub(into_hour)
}

/// Call `tick` at every full hour of the local clock
pub fn spawn_full_hour_ticker<F, Fut>(mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let first = Instant::now() + until_next_hour(&Local::now());
        let mut interval = tokio::time::interval_at(first, HOUR);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            log::debug!("Full hour");
            tick().await;
        }
    })
}
