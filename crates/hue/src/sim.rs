use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use camino::Utf8Path;
use tokio::time::Instant;
use uuid::Uuid;

use crate::bridge::{BridgeClient, Credentials, Group, GroupRef};
use crate::error::{HueError, HueResult};
use crate::legacy_api::{ApiBridgeState, ApiGroupState, ApiLight, ApiScene};
use crate::{ALL_LIGHTS_GROUP, MAX_BRIGHTNESS};

/// In-memory Hue bridge.
///
/// Behaves like a real bridge towards [`BridgeClient`] users: it only accepts
/// whitelisted usernames, hands out new usernames while the link button is
/// active, and resolves groups and scenes the way the v1 api does.
#[derive(Clone, Debug)]
pub struct SimBridge {
    state: ApiBridgeState,
    credentials: Credentials,
    discovered: Option<String>,
    whitelist: BTreeSet<String>,
    linkbutton_until: Option<Instant>,
    registration_fault: Option<String>,
    registrations: usize,
}

impl SimBridge {
    #[must_use]
    pub fn new(state: ApiBridgeState) -> Self {
        Self {
            state,
            credentials: Credentials::default(),
            discovered: None,
            whitelist: BTreeSet::new(),
            linkbutton_until: None,
            registration_fault: None,
            registrations: 0,
        }
    }

    pub fn from_reader(rdr: impl Read) -> HueResult<Self> {
        Ok(Self::new(serde_yml::from_reader(rdr)?))
    }

    /// Load bridge state from a v1 state dump, either as json or yaml.
    pub fn from_file(path: &Utf8Path) -> HueResult<Self> {
        let fd = File::open(path)?;
        if path.extension() == Some("json") {
            Ok(Self::new(serde_json::from_reader(fd)?))
        } else {
            Self::from_reader(fd)
        }
    }

    /// Address reported by network discovery
    #[must_use]
    pub fn with_discovery(mut self, address: impl Into<String>) -> Self {
        self.discovered = Some(address.into());
        self
    }

    /// Whitelist `username`, and use it for subsequent connects
    #[must_use]
    pub fn with_authorized_user(mut self, address: &str, username: &str) -> Self {
        self.whitelist.insert(username.to_string());
        self.credentials = Credentials {
            address: Some(address.to_string()),
            username: Some(username.to_string()),
        };
        self
    }

    /// Make every registration fail with a non-recoverable error
    #[must_use]
    pub fn with_registration_fault(mut self, reason: impl Into<String>) -> Self {
        self.registration_fault = Some(reason.into());
        self
    }

    pub fn press_link_button(&mut self, active_for: Duration) {
        log::info!("Link button pressed, active for {}s", active_for.as_secs());
        self.linkbutton_until = Some(Instant::now() + active_for);
    }

    pub fn linkbutton_active(&mut self) -> bool {
        let now = Instant::now();
        match self.linkbutton_until {
            Some(until) if until > now => true,
            Some(_) => {
                self.linkbutton_until = None;
                false
            }
            None => false,
        }
    }

    /// Number of registration attempts seen so far
    #[must_use]
    pub const fn registrations(&self) -> usize {
        self.registrations
    }

    #[must_use]
    pub const fn state(&self) -> &ApiBridgeState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut ApiBridgeState {
        &mut self.state
    }

    fn members(&self, id: u32) -> HueResult<Vec<String>> {
        if id == ALL_LIGHTS_GROUP {
            return Ok(self.state.lights.keys().cloned().collect());
        }

        self.state
            .groups
            .get(&id.to_string())
            .map(|group| group.lights.clone())
            .ok_or_else(|| HueError::NoSuchGroup(id.to_string()))
    }

    fn group_name(&self, id: u32) -> String {
        self.state
            .groups
            .get(&id.to_string())
            .map_or_else(|| format!("Group {id}"), |group| group.name.clone())
    }

    fn resolve(&self, group: &GroupRef) -> HueResult<u32> {
        match group {
            GroupRef::All => Ok(ALL_LIGHTS_GROUP),
            GroupRef::Id(id) => {
                if *id == ALL_LIGHTS_GROUP || self.state.groups.contains_key(&id.to_string()) {
                    Ok(*id)
                } else {
                    Err(HueError::NoSuchGroup(id.to_string()))
                }
            }
            GroupRef::Name(name) => {
                let name = name.to_lowercase();
                self.state
                    .groups
                    .iter()
                    .find(|(_, group)| group.name.to_lowercase() == name)
                    .and_then(|(id, _)| id.parse().ok())
                    .ok_or_else(|| HueError::NoSuchGroup(name.clone()))
            }
        }
    }

    fn scene_applies(scene: &ApiScene, id: u32, members: &[String]) -> bool {
        match &scene.group {
            Some(group) => group.parse::<u32>().is_ok_and(|group| group == id),
            None => {
                !scene.lights.is_empty() && scene.lights.iter().all(|light| members.contains(light))
            }
        }
    }

    pub fn group_state(&self, id: u32) -> HueResult<ApiGroupState> {
        let members = self.members(id)?;
        let lights: Vec<_> = members
            .iter()
            .filter_map(|light| self.state.lights.get(light))
            .collect();

        Ok(ApiGroupState {
            all_on: !lights.is_empty() && lights.iter().all(|light| light.state.on),
            any_on: lights.iter().any(|light| light.state.on),
        })
    }

    fn snapshot(&self, id: u32) -> HueResult<Group> {
        let members = self.members(id)?;
        let brightness = members
            .iter()
            .filter_map(|light| self.state.lights.get(light))
            .filter_map(|light| light.state.bri)
            .max()
            .unwrap_or(0);

        let scenes = self
            .state
            .scenes
            .values()
            .filter(|scene| Self::scene_applies(scene, id, &members))
            .map(|scene| scene.name.clone())
            .collect();

        Ok(Group {
            id,
            name: self.group_name(id),
            on: self.group_state(id)?.any_on,
            brightness,
            scenes,
        })
    }

    fn update_lights(&mut self, group: u32, func: impl Fn(&mut ApiLight)) -> HueResult<()> {
        for id in self.members(group)? {
            if let Some(light) = self.state.lights.get_mut(&id) {
                func(light);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BridgeClient for SimBridge {
    fn credentials(&self) -> Credentials {
        self.credentials.clone()
    }

    fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    async fn connect(&mut self, autodiscover: bool) -> HueResult<bool> {
        if self.credentials.address.is_none() {
            if !autodiscover {
                return Err(HueError::NoBridgeAddress);
            }

            let Some(address) = self.discovered.clone() else {
                log::warn!("Bridge discovery found no bridges");
                return Ok(false);
            };

            log::info!("Discovered bridge at {address}");
            self.credentials.address = Some(address);
        }

        match &self.credentials.username {
            Some(username) if self.whitelist.contains(username) => Ok(true),
            _ => Err(HueError::UnauthorizedUser),
        }
    }

    async fn register(&mut self) -> HueResult<String> {
        self.registrations += 1;

        if let Some(fault) = &self.registration_fault {
            return Err(HueError::Registration(fault.clone()));
        }

        if !self.linkbutton_active() {
            return Err(HueError::LinkButtonNotPressed);
        }

        let username = Uuid::new_v4().simple().to_string();
        self.whitelist.insert(username.clone());
        self.credentials.username = Some(username.clone());

        Ok(username)
    }

    async fn groups(&self) -> HueResult<Vec<Group>> {
        self.state
            .groups
            .keys()
            .filter_map(|id| id.parse().ok())
            .map(|id| self.snapshot(id))
            .collect()
    }

    async fn group(&self, group: &GroupRef) -> HueResult<Group> {
        self.snapshot(self.resolve(group)?)
    }

    async fn group_names(&self) -> HueResult<BTreeSet<String>> {
        Ok(self.state.groups.values().map(|g| g.name.clone()).collect())
    }

    async fn scene_names(&self) -> HueResult<BTreeSet<String>> {
        Ok(self.state.scenes.values().map(|s| s.name.clone()).collect())
    }

    async fn set_on(&mut self, group: u32, on: bool) -> HueResult<()> {
        self.update_lights(group, |light| light.state.on = on)
    }

    async fn set_brightness(&mut self, group: u32, brightness: u8) -> HueResult<()> {
        let brightness = brightness.min(MAX_BRIGHTNESS);
        self.update_lights(group, |light| light.state.bri = Some(brightness))
    }

    async fn recall_scene(&mut self, group: u32, scene: &str) -> HueResult<()> {
        let members = self.members(group)?;

        let named: Vec<&ApiScene> = self
            .state
            .scenes
            .values()
            .filter(|candidate| candidate.name.eq_ignore_ascii_case(scene))
            .collect();

        if named.is_empty() {
            return Err(HueError::NoSuchScene(scene.to_string()));
        }

        let Some(found) = named
            .into_iter()
            .find(|candidate| Self::scene_applies(candidate, group, &members))
            .cloned()
        else {
            return Err(HueError::NoSuchSceneInGroup {
                scene: scene.to_string(),
                group: self.group_name(group),
            });
        };

        if let Some(missing) = found
            .lights
            .iter()
            .find(|light| !self.state.lights.contains_key(*light))
        {
            return Err(HueError::NoSuchLight(missing.clone()));
        }

        for id in &found.lights {
            if let Some(light) = self.state.lights.get_mut(id) {
                match found.lightstates.get(id) {
                    Some(update) => update.apply(&mut light.state),
                    None => light.state.on = true,
                }
            }
        }

        Ok(())
    }
}
