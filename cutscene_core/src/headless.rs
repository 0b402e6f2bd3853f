//! An in-memory scene host that records every port call.
//!
//! Used by the test suite and the `intro_playthrough` binary to drive a
//! sequencer without an engine: the player, camera, actors and dialogue
//! surface are plain fields, and each call the sequencer makes is appended to
//! a transcript of [`StageCall`]s.

use glam::Vec3;
use serde::Serialize;
use std::collections::HashMap;

use scene_rules::{
    ActorHandle, Clock, Color, InputSource, MovementControl, PlayerHandle, PlayerLocator,
    PresentationPort, SpawnRequest, WeatherAnchor, WeatherHandle, WeatherRequest, WorldEffectPort,
};

use crate::sequencer::IntroSequencer;

/// One call made by the sequencer into the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum StageCall {
    PromptVisible { visible: bool },
    ShowLine {
        speaker: Option<String>,
        text: String,
        is_last_line: bool,
    },
    HideDialogue,
    ReleaseSurface,
    SpawnActor { name: String, position: Vec3 },
    MoveActor { actor: ActorHandle, position: Vec3 },
    RemoveActor { actor: ActorHandle },
    AmbientTint { color: Color },
    StartWeather { anchor: WeatherAnchor },
    StopWeather { weather: WeatherHandle },
    TintCaptureTarget { color: Color },
    ConcealCaptureTarget,
    MovementEnabled { enabled: bool },
    ClearVelocity,
}

/// Scene state plus the call transcript.
#[derive(Debug)]
pub struct HeadlessScene {
    player: Option<PlayerHandle>,
    player_position: Vec3,
    resolve_attempts: u32,
    movement_enabled: bool,

    advance_pressed: bool,
    delta: f32,
    elapsed: f32,

    ambient_tint: Option<Color>,
    viewpoint: bool,
    spawn_fails: bool,
    actors: HashMap<ActorHandle, Vec3>,
    weather: Option<WeatherHandle>,

    prompt_visible: bool,
    dialogue_visible: bool,
    surface_released: bool,
    capture_target_visible: bool,

    calls: Vec<StageCall>,
}

impl HeadlessScene {
    /// A scene with a player at the origin, a camera with a black tint, and a
    /// fixed tick of `delta` seconds.
    pub fn new(delta: f32) -> Self {
        Self {
            player: Some(PlayerHandle::new()),
            player_position: Vec3::ZERO,
            resolve_attempts: 0,
            movement_enabled: true,
            advance_pressed: false,
            delta,
            elapsed: 0.0,
            ambient_tint: Some(Color::BLACK),
            viewpoint: true,
            spawn_fails: false,
            actors: HashMap::new(),
            weather: None,
            prompt_visible: false,
            dialogue_visible: false,
            surface_released: false,
            capture_target_visible: true,
            calls: Vec::new(),
        }
    }

    /// No player in the scene until [`spawn_player`](Self::spawn_player).
    pub fn without_player(mut self) -> Self {
        self.player = None;
        self
    }

    /// No camera: no tint target and nothing to parent weather to.
    pub fn without_camera(mut self) -> Self {
        self.ambient_tint = None;
        self.viewpoint = false;
        self
    }

    /// Every spawn request fails.
    pub fn with_failing_spawns(mut self) -> Self {
        self.spawn_fails = true;
        self
    }

    pub fn spawn_player(&mut self, position: Vec3) -> PlayerHandle {
        let player = PlayerHandle::new();
        self.player = Some(player);
        self.player_position = position;
        player
    }

    /// Drop the player; previously resolved handles go stale.
    pub fn despawn_player(&mut self) {
        self.player = None;
    }

    pub fn place_player(&mut self, position: Vec3) {
        self.player_position = position;
    }

    /// Remove the camera mid-scene.
    pub fn destroy_camera(&mut self) {
        self.ambient_tint = None;
        self.viewpoint = false;
    }

    /// Remove an actor behind the sequencer's back.
    pub fn destroy_actor(&mut self, actor: ActorHandle) {
        self.actors.remove(&actor);
    }

    /// Press the advance key for the next tick.
    pub fn press_advance(&mut self) {
        self.advance_pressed = true;
    }

    /// Advance the clock by one tick without running anything.
    pub fn advance_clock(&mut self) {
        self.elapsed += self.delta;
    }

    /// Advance the clock by one tick and let the sequencer run.
    pub fn tick(&mut self, sequencer: &mut IntroSequencer) {
        self.advance_clock();
        sequencer.tick(self);
        self.advance_pressed = false;
    }

    pub fn tick_n(&mut self, sequencer: &mut IntroSequencer, ticks: usize) {
        for _ in 0..ticks {
            self.tick(sequencer);
        }
    }

    /// Tick for at least `seconds` of scene time.
    pub fn run_for(&mut self, sequencer: &mut IntroSequencer, seconds: f32) {
        let ticks = (seconds / self.delta).ceil().max(0.0) as usize;
        self.tick_n(sequencer, ticks);
    }

    /// Press once and tick.
    pub fn press_and_tick(&mut self, sequencer: &mut IntroSequencer) {
        self.press_advance();
        self.tick(sequencer);
    }

    pub fn calls(&self) -> &[StageCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn count_calls(&self, predicate: impl Fn(&StageCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Lines shown so far, in order.
    pub fn shown_lines(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StageCall::ShowLine { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn resolve_attempts(&self) -> u32 {
        self.resolve_attempts
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn dialogue_visible(&self) -> bool {
        self.dialogue_visible
    }

    pub fn surface_released(&self) -> bool {
        self.surface_released
    }

    pub fn capture_target_visible(&self) -> bool {
        self.capture_target_visible
    }

    pub fn current_tint(&self) -> Option<Color> {
        self.ambient_tint
    }

    pub fn actor_position(&self, actor: ActorHandle) -> Option<Vec3> {
        self.actors.get(&actor).copied()
    }

    pub fn live_actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn weather(&self) -> Option<WeatherHandle> {
        self.weather
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl PlayerLocator for HeadlessScene {
    fn resolve_player(&mut self) -> Option<PlayerHandle> {
        self.resolve_attempts += 1;
        self.player
    }

    fn player_position(&self, player: PlayerHandle) -> Option<Vec3> {
        (self.player == Some(player)).then_some(self.player_position)
    }
}

impl MovementControl for HeadlessScene {
    fn set_movement_enabled(&mut self, _player: PlayerHandle, enabled: bool) {
        self.movement_enabled = enabled;
        self.calls.push(StageCall::MovementEnabled { enabled });
    }

    fn clear_velocity(&mut self, _player: PlayerHandle) {
        self.calls.push(StageCall::ClearVelocity);
    }
}

impl InputSource for HeadlessScene {
    fn advance_pressed(&self) -> bool {
        self.advance_pressed
    }
}

impl PresentationPort for HeadlessScene {
    fn set_prompt_visible(&mut self, visible: bool) {
        self.prompt_visible = visible;
        self.calls.push(StageCall::PromptVisible { visible });
    }

    fn show_line(&mut self, speaker: Option<&str>, text: &str, is_last_line: bool) {
        self.dialogue_visible = true;
        self.calls.push(StageCall::ShowLine {
            speaker: speaker.map(str::to_string),
            text: text.to_string(),
            is_last_line,
        });
    }

    fn hide_dialogue(&mut self) {
        self.dialogue_visible = false;
        self.calls.push(StageCall::HideDialogue);
    }

    fn release_surface(&mut self) {
        self.surface_released = true;
        self.dialogue_visible = false;
        self.prompt_visible = false;
        self.calls.push(StageCall::ReleaseSurface);
    }
}

impl WorldEffectPort for HeadlessScene {
    fn spawn_actor(&mut self, request: &SpawnRequest) -> Option<ActorHandle> {
        self.calls.push(StageCall::SpawnActor {
            name: request.name.clone(),
            position: request.position,
        });
        if self.spawn_fails {
            return None;
        }
        let actor = ActorHandle::new();
        self.actors.insert(actor, request.position);
        Some(actor)
    }

    fn actor_exists(&self, actor: ActorHandle) -> bool {
        self.actors.contains_key(&actor)
    }

    fn move_actor(&mut self, actor: ActorHandle, position: Vec3) {
        if let Some(current) = self.actors.get_mut(&actor) {
            *current = position;
        }
        self.calls.push(StageCall::MoveActor { actor, position });
    }

    fn remove_actor(&mut self, actor: ActorHandle) {
        self.actors.remove(&actor);
        self.calls.push(StageCall::RemoveActor { actor });
    }

    fn ambient_tint(&self) -> Option<Color> {
        self.ambient_tint
    }

    fn set_ambient_tint(&mut self, color: Color) {
        if self.ambient_tint.is_some() {
            self.ambient_tint = Some(color);
        }
        self.calls.push(StageCall::AmbientTint { color });
    }

    fn viewpoint_available(&self) -> bool {
        self.viewpoint
    }

    fn start_weather_effect(&mut self, request: &WeatherRequest) -> WeatherHandle {
        let weather = WeatherHandle::new();
        self.weather = Some(weather);
        self.calls.push(StageCall::StartWeather {
            anchor: request.anchor,
        });
        weather
    }

    fn stop_weather_effect(&mut self, weather: WeatherHandle) {
        if self.weather == Some(weather) {
            self.weather = None;
        }
        self.calls.push(StageCall::StopWeather { weather });
    }

    fn tint_capture_target(&mut self, color: Color) {
        self.calls.push(StageCall::TintCaptureTarget { color });
    }

    fn conceal_capture_target(&mut self) {
        self.capture_target_visible = false;
        self.calls.push(StageCall::ConcealCaptureTarget);
    }
}

impl Clock for HeadlessScene {
    fn delta_seconds(&self) -> f32 {
        self.delta
    }

    fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }
}
