use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiLightState {
    pub on: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ct: Option<u16>,
    #[serde(default = "ApiLightState::default_reachable")]
    pub reachable: bool,
}

impl ApiLightState {
    const fn default_reachable() -> bool {
        true
    }
}

impl Default for ApiLightState {
    fn default() -> Self {
        Self {
            on: false,
            bri: None,
            ct: None,
            reachable: Self::default_reachable(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiLight {
    pub name: String,
    #[serde(default)]
    pub state: ApiLightState,
    #[serde(rename = "type", default = "ApiLight::default_type")]
    pub light_type: String,
}

impl ApiLight {
    fn default_type() -> String {
        "Extended color light".to_string()
    }

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ApiLightState::default(),
            light_type: Self::default_type(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum ApiGroupType {
    Entertainment,
    #[default]
    LightGroup,
    Room,
    Zone,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiGroup {
    pub name: String,
    pub lights: Vec<String>,
    #[serde(rename = "type", default)]
    pub group_type: ApiGroupType,
}

impl ApiGroup {
    #[must_use]
    pub fn room(name: impl Into<String>, lights: &[&str]) -> Self {
        Self {
            name: name.into(),
            lights: lights.iter().map(ToString::to_string).collect(),
            group_type: ApiGroupType::Room,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiGroupState {
    pub all_on: bool,
    pub any_on: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ApiLightStateUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ct: Option<u16>,
}

impl ApiLightStateUpdate {
    pub fn apply(&self, state: &mut ApiLightState) {
        state.on = self.on.unwrap_or(true);
        if let Some(bri) = self.bri {
            state.bri = Some(bri);
        }
        if let Some(ct) = self.ct {
            state.ct = Some(ct);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum ApiSceneType {
    #[default]
    LightScene,
    GroupScene,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiScene {
    pub name: String,
    #[serde(rename = "type", default)]
    pub scene_type: ApiSceneType,
    pub lights: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub lightstates: BTreeMap<String, ApiLightStateUpdate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group: Option<String>,
}

impl ApiScene {
    /// Scene bound to a single group
    #[must_use]
    pub fn for_group(name: impl Into<String>, group: u32, lights: &[&str]) -> Self {
        Self {
            name: name.into(),
            scene_type: ApiSceneType::GroupScene,
            lights: lights.iter().map(ToString::to_string).collect(),
            lightstates: BTreeMap::new(),
            group: Some(group.to_string()),
        }
    }

    /// Scene defined by a set of lights, usable by any group containing them
    #[must_use]
    pub fn for_lights(name: impl Into<String>, lights: &[&str]) -> Self {
        Self {
            name: name.into(),
            scene_type: ApiSceneType::LightScene,
            lights: lights.iter().map(ToString::to_string).collect(),
            lightstates: BTreeMap::new(),
            group: None,
        }
    }

    #[must_use]
    pub fn with_lightstate(mut self, light: &str, update: ApiLightStateUpdate) -> Self {
        self.lightstates.insert(light.to_string(), update);
        self
    }
}

/// The subset of the v1 full-state dump (`GET /api/<username>`) that
/// describes lights, groups and scenes.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ApiBridgeState {
    #[serde(default)]
    pub lights: BTreeMap<String, ApiLight>,
    #[serde(default)]
    pub groups: BTreeMap<String, ApiGroup>,
    #[serde(default)]
    pub scenes: BTreeMap<String, ApiScene>,
}
