use hue::bridge::{BridgeClient, Group, GroupRef};
use hue::error::{HueError, HueResult};

/// Result of trying to recall a scene for a group
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneOutcome {
    Applied,
    /// No scene by that name exists on the bridge
    UnknownScene,
    /// The scene exists, but not for this group
    NotInGroup,
    /// The scene refers to a light the bridge no longer has
    UnknownLight(String),
}

impl SceneOutcome {
    /// Treat a missing light as a hard error. Only the toggle intent is
    /// allowed to ignore it.
    pub fn strict(self) -> HueResult<Self> {
        match self {
            Self::UnknownLight(light) => Err(HueError::NoSuchLight(light)),
            outcome => Ok(outcome),
        }
    }
}

/// Look up a group, mapping a missing group to `None`
pub async fn find_group<B>(bridge: &B, group: &GroupRef) -> HueResult<Option<Group>>
where
    B: BridgeClient + ?Sized,
{
    match bridge.group(group).await {
        Ok(group) => Ok(Some(group)),
        Err(HueError::NoSuchGroup(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

pub async fn apply_scene<B>(bridge: &mut B, group: u32, scene: &str) -> HueResult<SceneOutcome>
where
    B: BridgeClient + ?Sized,
{
    match bridge.recall_scene(group, scene).await {
        Ok(()) => Ok(SceneOutcome::Applied),
        Err(HueError::NoSuchScene(_)) => Ok(SceneOutcome::UnknownScene),
        Err(HueError::NoSuchSceneInGroup { .. }) => Ok(SceneOutcome::NotInGroup),
        Err(HueError::NoSuchLight(light)) => Ok(SceneOutcome::UnknownLight(light)),
        Err(err) => Err(err),
    }
}

/// Whether the bridge has a scene called `name` for any group
pub async fn scene_exists<B>(bridge: &B, name: &str) -> HueResult<bool>
where
    B: BridgeClient + ?Sized,
{
    Ok(bridge
        .scene_names()
        .await?
        .iter()
        .any(|scene| scene.eq_ignore_ascii_case(name)))
}
