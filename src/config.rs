use camino::Utf8Path;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub use skill_api::config::*;

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("assistant.device_name", "default")?
        .set_default("assistant.stay_completely_offline", false)?
        .set_default("hue.match_light_with_daytime", true)?
        .set_default("hue.credentials_file", "phue-credentials.yaml")?
        .set_default("hue.bridge_state_file", "bridge.yaml")
}

pub fn parse(filename: &Utf8Path) -> Result<AppConfig, ConfigError> {
    let settings = defaults()?
        .add_source(config::File::with_name(filename.as_str()))
        .build()?;

    settings.try_deserialize()
}
