//! Ambient weather requests - where an effect is anchored and how it looks.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where a weather effect lives in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeatherAnchor {
    /// Parented to the viewpoint (camera) at a local offset, so it follows the view.
    Viewpoint { local_offset: Vec3 },

    /// Fixed at a world position.
    World { position: Vec3 },
}

impl WeatherAnchor {
    /// Pick the viewpoint when there is one, otherwise fall back to a world
    /// position above `fallback_origin`.
    pub fn prefer_viewpoint(
        viewpoint_available: bool,
        local_offset: Vec3,
        fallback_origin: Vec3,
        fallback_offset: Vec3,
    ) -> Self {
        if viewpoint_available {
            WeatherAnchor::Viewpoint { local_offset }
        } else {
            WeatherAnchor::World {
                position: fallback_origin + fallback_offset,
            }
        }
    }
}

/// Particle settings for a rain curtain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainProfile {
    /// Seconds each drop lives.
    pub drop_lifetime: f32,
    pub drop_size: f32,
    pub max_drops: u32,
    /// Drops emitted per second.
    pub emission_rate: f32,
    /// Width of the emitter box.
    pub curtain_width: f32,
    /// Vertical drop velocity (negative falls).
    pub fall_speed: f32,
}

impl Default for RainProfile {
    fn default() -> Self {
        Self {
            drop_lifetime: 1.4,
            drop_size: 0.05,
            max_drops: 600,
            emission_rate: 260.0,
            curtain_width: 30.0,
            fall_speed: -14.0,
        }
    }
}

/// A request to start an ambient weather effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    pub anchor: WeatherAnchor,
    pub rain: RainProfile,
}

impl WeatherRequest {
    /// Rain with the default profile at the given anchor.
    pub fn rain(anchor: WeatherAnchor) -> Self {
        Self {
            anchor,
            rain: RainProfile::default(),
        }
    }
}
