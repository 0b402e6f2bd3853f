//! Port traits the host engine implements for a cutscene.
//!
//! Every method is infallible from the caller's point of view: a missing
//! collaborator is reported as `None`/`false`, never as an error.

use glam::Vec3;

use crate::actors::{ActorHandle, PlayerHandle, SpawnRequest, WeatherHandle};
use crate::environment::WeatherRequest;
use crate::motion::Color;

/// Finds the player in the scene.
pub trait PlayerLocator {
    /// Look the player up. Only called while no player is bound.
    fn resolve_player(&mut self) -> Option<PlayerHandle>;

    /// Current position of a previously resolved player, `None` once the
    /// reference has gone stale.
    fn player_position(&self, player: PlayerHandle) -> Option<Vec3>;
}

/// The player's movement capability.
pub trait MovementControl {
    /// Enable or disable movement/input processing.
    fn set_movement_enabled(&mut self, player: PlayerHandle, enabled: bool);

    /// Zero any residual physics velocity.
    fn clear_velocity(&mut self, player: PlayerHandle);
}

/// Edge-triggered input.
pub trait InputSource {
    /// True only on the tick the advance key went down.
    fn advance_pressed(&self) -> bool;
}

/// Prompt and dialogue surface.
pub trait PresentationPort {
    fn set_prompt_visible(&mut self, visible: bool);

    /// Show a line. `speaker` is `None` for narration; `is_last_line` hides
    /// the continue hint.
    fn show_line(&mut self, speaker: Option<&str>, text: &str, is_last_line: bool);

    fn hide_dialogue(&mut self);

    /// Destroy the surface. Called once at teardown.
    fn release_surface(&mut self);
}

/// World mutations a cutscene may request.
pub trait WorldEffectPort {
    fn spawn_actor(&mut self, request: &SpawnRequest) -> Option<ActorHandle>;
    fn actor_exists(&self, actor: ActorHandle) -> bool;
    fn move_actor(&mut self, actor: ActorHandle, position: Vec3);
    fn remove_actor(&mut self, actor: ActorHandle);

    /// Current ambient tint, `None` when there is no tint target (no camera).
    fn ambient_tint(&self) -> Option<Color>;
    fn set_ambient_tint(&mut self, color: Color);

    /// Whether a viewpoint exists that effects can be parented to.
    fn viewpoint_available(&self) -> bool;
    fn start_weather_effect(&mut self, request: &WeatherRequest) -> WeatherHandle;
    fn stop_weather_effect(&mut self, weather: WeatherHandle);

    /// Tint every visual of the capture target.
    fn tint_capture_target(&mut self, color: Color);

    /// Disable the capture target's visuals and collision. It stays in the scene.
    fn conceal_capture_target(&mut self);
}

/// Simulation time.
pub trait Clock {
    /// Seconds since the previous tick.
    fn delta_seconds(&self) -> f32;

    /// Seconds since the scene started, independent of tick cadence.
    fn elapsed_seconds(&self) -> f32;
}

/// Everything a cutscene needs from its host.
pub trait SceneHost:
    PlayerLocator + MovementControl + InputSource + PresentationPort + WorldEffectPort + Clock
{
}

impl<T> SceneHost for T where
    T: PlayerLocator + MovementControl + InputSource + PresentationPort + WorldEffectPort + Clock
{
}
