//! Live viewer settings
//!
//! A single mutable [`Settings`] instance exists per session. It is
//! mutated exclusively through the session's setters (which validate
//! ranges) and read by the particle field builder and the snapshot
//! exporter. Settings reset to defaults at session start and are never
//! persisted.

use serde::{Deserialize, Serialize};

/// Control-panel bounds for the particle size slider
pub const PARTICLE_SIZE_RANGE: std::ops::RangeInclusive<f32> = 0.01..=1.0;

/// Control-panel bounds for the fog density slider
pub const FOG_DENSITY_RANGE: std::ops::RangeInclusive<f32> = 0.0..=0.1;

/// Valid export resolution multipliers
pub const EXPORT_SCALE_RANGE: std::ops::RangeInclusive<u32> = 1..=4;

/// Live, session-scoped visual parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub particle_size: f32,
    pub sprite_label: String,
    pub fog_enabled: bool,
    pub fog_density: f32,
    pub export_scale: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particle_size: 0.5,
            sprite_label: "point".to_string(),
            fog_enabled: false,
            fog_density: 0.0,
            export_scale: 2,
        }
    }
}
