//! Spawn blueprints for scripted actors.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::motion::Color;

/// Everything the host needs to materialise a scripted actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Name given to the spawned instance.
    pub name: String,

    /// Resource path of the preferred prefab.
    pub prefab: Option<String>,

    /// Tint applied when the prefab is missing and the host builds a stand-in.
    pub fallback_tint: Color,

    /// World position the actor appears at.
    pub position: Vec3,

    /// Whether the host should switch off the actor's own behaviours,
    /// physics and colliders so it only moves when commanded.
    pub neutralize: bool,
}

impl SpawnRequest {
    /// Create a request for a named actor at the given position.
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            prefab: None,
            fallback_tint: Color::WHITE,
            position,
            neutralize: true,
        }
    }

    /// Set the preferred prefab path.
    pub fn with_prefab(mut self, prefab: impl Into<String>) -> Self {
        self.prefab = Some(prefab.into());
        self
    }

    /// Set the stand-in tint.
    pub fn with_fallback_tint(mut self, tint: Color) -> Self {
        self.fallback_tint = tint;
        self
    }

    /// Keep the actor's own behaviours running.
    pub fn with_behaviours(mut self) -> Self {
        self.neutralize = false;
        self
    }

    /// The antagonist who steps through the portal in the introduction.
    pub fn malverik(position: Vec3) -> Self {
        Self::new("Malverik", position)
            .with_prefab("Prefabs/Enemies/Boses/Boss_Big_Demon")
            .with_fallback_tint(Color::rgb(0.4, 0.15, 0.6))
    }
}
