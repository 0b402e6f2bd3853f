//! Proximity prompt gating.

use glam::Vec3;
use scene_rules::planar_distance;

/// Decides, each tick, whether the "press to talk" prompt should be visible.
#[derive(Debug, Clone, Copy)]
pub struct ProximityGate {
    interact_radius: f32,
}

impl ProximityGate {
    /// Create a gate. A negative or NaN radius becomes 0.
    pub fn new(interact_radius: f32) -> Self {
        Self {
            interact_radius: if interact_radius.is_nan() {
                0.0
            } else {
                interact_radius.max(0.0)
            },
        }
    }

    pub fn interact_radius(&self) -> f32 {
        self.interact_radius
    }

    /// Prompt visibility for this tick.
    ///
    /// Visible iff the conversation has not started and the player is resolved
    /// and within the radius (inclusive). No hysteresis.
    pub fn tick(&self, player: Option<Vec3>, anchor: Vec3, started: bool) -> bool {
        if started {
            return false;
        }
        match player {
            Some(position) => self.in_range(position, anchor),
            None => false,
        }
    }

    pub fn in_range(&self, player: Vec3, anchor: Vec3) -> bool {
        planar_distance(player, anchor) <= self.interact_radius
    }
}
