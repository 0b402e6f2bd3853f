//! Player control freezing.

use scene_rules::{MovementControl, PlayerHandle};

/// Freezes and releases the bound player's movement.
///
/// A single boolean: repeated freezes are not counted and one release always
/// restores control.
#[derive(Debug, Clone, Default)]
pub struct PlayerControlGate {
    frozen: bool,
    player: Option<PlayerHandle>,
}

impl PlayerControlGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the resolved player.
    pub fn bind(&mut self, player: PlayerHandle) {
        self.player = Some(player);
    }

    /// Forget the player after its reference went stale.
    pub fn unbind(&mut self) {
        self.player = None;
    }

    pub fn player(&self) -> Option<PlayerHandle> {
        self.player
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze (`true`) or release (`false`) the player. Velocity is zeroed on
    /// both edges. With no bound player only the flag changes.
    pub fn freeze<M: MovementControl + ?Sized>(&mut self, freeze: bool, movement: &mut M) {
        self.frozen = freeze;

        if let Some(player) = self.player {
            movement.set_movement_enabled(player, !freeze);
            movement.clear_velocity(player);
        }
    }
}
