use std::collections::BTreeSet;
use std::fmt::{self, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ALL_LIGHTS_GROUP;
use crate::error::HueResult;

/// Address of a group on the bridge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupRef {
    /// The reserved group 0, containing every light
    All,
    Id(u32),
    /// Group name, matched case-insensitively
    Name(String),
}

impl GroupRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all lights"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Snapshot of a group, as seen by the bridge when it was requested.
///
/// Commands are never issued through a snapshot. Use the group `id` with
/// the [`BridgeClient`] command methods instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: u32,
    pub name: String,
    pub on: bool,
    pub brightness: u8,
    /// Names of the scenes that can be recalled for this group
    pub scenes: BTreeSet<String>,
}

impl Group {
    #[must_use]
    pub const fn is_all_lights(&self) -> bool {
        self.id == ALL_LIGHTS_GROUP
    }

    #[must_use]
    pub fn has_scene(&self, name: &str) -> bool {
        self.scenes.iter().any(|scene| scene.eq_ignore_ascii_case(name))
    }
}

/// Bridge address and the username handed out by the bridge on registration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Everything the skill needs from a Hue bridge.
///
/// Lookups by name are case-insensitive. Lookup failures are reported as
/// [`crate::error::HueError::NoSuchGroup`], [`crate::error::HueError::NoSuchScene`],
/// [`crate::error::HueError::NoSuchSceneInGroup`] and
/// [`crate::error::HueError::NoSuchLight`], so callers can pick a fallback.
#[async_trait]
pub trait BridgeClient: Send + Sync {
    fn credentials(&self) -> Credentials;

    fn set_credentials(&mut self, credentials: Credentials);

    /// Connect to the bridge, discovering its address first if it is unknown
    /// and `autodiscover` is set. Returns `false` if no bridge could be found.
    async fn connect(&mut self, autodiscover: bool) -> HueResult<bool>;

    /// Ask the bridge for a new username. Only succeeds shortly after the
    /// physical link button has been pressed.
    async fn register(&mut self) -> HueResult<String>;

    /// All groups except the reserved all-lights group
    async fn groups(&self) -> HueResult<Vec<Group>>;

    async fn group(&self, group: &GroupRef) -> HueResult<Group>;

    async fn group_names(&self) -> HueResult<BTreeSet<String>>;

    async fn scene_names(&self) -> HueResult<BTreeSet<String>>;

    async fn set_on(&mut self, group: u32, on: bool) -> HueResult<()>;

    async fn set_brightness(&mut self, group: u32, brightness: u8) -> HueResult<()>;

    async fn recall_scene(&mut self, group: u32, scene: &str) -> HueResult<()>;
}
