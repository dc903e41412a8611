use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Settings owned by the assistant itself, shared by every skill
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct AssistantConfig {
    /// Name of the device the assistant runs on. Used as the location when
    /// the user does not name one.
    pub device_name: String,
    #[serde(default)]
    pub stay_completely_offline: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct HueConfig {
    /// Bridge address. Discovered on the network when missing.
    #[serde(default)]
    pub bridge_ip: Option<String>,
    #[serde(default)]
    pub match_light_with_daytime: bool,
    /// Where the bridge address and username are remembered
    #[serde(default)]
    pub credentials_file: Option<Utf8PathBuf>,
    /// State dump loaded into the simulated bridge
    #[serde(default)]
    pub bridge_state_file: Option<Utf8PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub hue: HueConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new(device_name: &str) -> Self {
        Self {
            assistant: AssistantConfig {
                device_name: device_name.to_string(),
                stay_completely_offline: false,
            },
            hue: HueConfig {
                bridge_ip: None,
                match_light_with_daytime: true,
                credentials_file: None,
                bridge_state_file: None,
            },
        }
    }
}
