pub mod bridge;
pub mod error;
pub mod legacy_api;
pub mod sim;

/// Group id every bridge reserves for "all lights"
pub const ALL_LIGHTS_GROUP: u32 = 0;

/// Highest brightness value accepted by the bridge
pub const MAX_BRIGHTNESS: u8 = 254;
