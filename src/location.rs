use hue::bridge::{BridgeClient, GroupRef};
use skill_api::dialog::DialogSession;
use skill_api::host::Host;

use crate::error::SkillResult;
use crate::talk::Talk;

/// Pseudo-location addressing every light
pub const EVERYWHERE: &str = "everywhere";

pub const LOCATION_SLOT: &str = "Location";

/// Validated, lower-cased location names from a dialog.
///
/// An empty list means validation failed and the user has already been told.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locations(Vec<String>);

impl Locations {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn everywhere(&self) -> bool {
        self.0.iter().any(|location| location == EVERYWHERE)
    }

    /// Groups to act on. "everywhere" wins over any named location.
    #[must_use]
    pub fn targets(&self) -> Vec<GroupRef> {
        if self.everywhere() {
            vec![GroupRef::All]
        } else {
            self.0.iter().cloned().map(GroupRef::Name).collect()
        }
    }
}

fn requested(session: &DialogSession, device_name: &str) -> Vec<String> {
    let locations: Vec<String> = session
        .slot_values(LOCATION_SLOT)
        .map(str::to_lowercase)
        .collect();

    if locations.is_empty() {
        vec![device_name.to_lowercase()]
    } else {
        locations
    }
}

/// Resolve the locations of `session` against the groups on the bridge.
///
/// Without a location slot, the device the assistant runs on is used. On the
/// first unknown location, the dialog is ended with a "room unknown" reply,
/// and an empty list is returned.
pub async fn resolve<B, H>(
    bridge: &B,
    host: &H,
    session: &DialogSession,
    device_name: &str,
) -> SkillResult<Locations>
where
    B: BridgeClient + ?Sized,
    H: Host + ?Sized,
{
    let locations = Locations(requested(session, device_name));
    if locations.everywhere() {
        return Ok(locations);
    }

    let groups: Vec<String> = bridge
        .group_names()
        .await?
        .iter()
        .map(|name| name.to_lowercase())
        .collect();

    if let Some(unknown) = locations.0.iter().find(|location| !groups.contains(location)) {
        log::info!("Location {unknown:?} does not match any group on the bridge");
        host.end_dialog(
            &session.session_id,
            Talk::RoomUnknown(unknown.clone()).render(),
        )
        .await;
        return Ok(Locations::default());
    }

    Ok(locations)
}
