//! Handles for host-owned objects the cutscene can command.

mod blueprint;

pub use blueprint::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to an actor spawned by the host on behalf of a cutscene.
///
/// The cutscene only commands the actor through this handle; creation and
/// destruction mechanics belong to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorHandle(pub Uuid);

impl ActorHandle {
    /// Create a new random actor handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an actor handle from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ActorHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Handle to the player's movement capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerHandle(pub Uuid);

impl PlayerHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

/// Handle to a running ambient weather effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherHandle(pub Uuid);

impl WeatherHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WeatherHandle {
    fn default() -> Self {
        Self::new()
    }
}
