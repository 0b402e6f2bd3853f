//! The introduction sequencer - one tick drives proximity, dialogue and choreography.
//!
//! Per tick, in order:
//! 1. Bind the player if it is not bound yet; unbind it if its reference went stale
//! 2. Release a stale freeze left over from before the conversation
//! 3. Publish prompt visibility
//! 4. Turn an advance press into at most one line, raising its routines
//! 5. Step every running routine
//!
//! Nothing here fails. A missing player hides the prompt and is looked up
//! again next tick; once the conversation has started, presses keep advancing
//! it even while the player is missing.

use std::sync::Arc;

use glam::Vec3;
use scene_rules::SceneHost;
use tracing::{debug, info};

use crate::choreography::EventChoreographer;
use crate::config::SequencerConfig;
use crate::control::PlayerControlGate;
use crate::conversation::{ConversationStateMachine, EmittedLine};
use crate::proximity::ProximityGate;
use crate::script::Script;

/// Drives one scripted encounter from prompt to player release.
#[derive(Debug)]
pub struct IntroSequencer {
    config: SequencerConfig,
    anchor: Vec3,
    proximity: ProximityGate,
    conversation: ConversationStateMachine,
    choreographer: EventChoreographer,
    control: PlayerControlGate,
    torn_down: bool,
}

impl IntroSequencer {
    /// Create a sequencer for `script`, hosted by the entity at `anchor`.
    pub fn new(script: Arc<Script>, config: SequencerConfig, anchor: Vec3) -> Self {
        Self {
            proximity: ProximityGate::new(config.interact_radius()),
            conversation: ConversationStateMachine::new(script),
            choreographer: EventChoreographer::new(&config),
            control: PlayerControlGate::new(),
            config,
            anchor,
            torn_down: false,
        }
    }

    /// The built-in introduction with default tuning.
    pub fn introduction(anchor: Vec3) -> Self {
        Self::new(
            Arc::new(Script::introduction()),
            SequencerConfig::default(),
            anchor,
        )
    }

    pub fn tick<H: SceneHost>(&mut self, host: &mut H) {
        if self.torn_down {
            self.choreographer
                .advance(host, &mut self.control, self.anchor);
            return;
        }

        let player_position = self.refresh_player(host);

        if self.control.player().is_some()
            && !self.conversation.is_started()
            && self.control.is_frozen()
        {
            self.control.freeze(false, host);
        }

        let in_range = self
            .proximity
            .tick(player_position, self.anchor, self.conversation.is_started());
        host.set_prompt_visible(in_range);

        if host.advance_pressed() {
            if !self.conversation.is_started() {
                if in_range {
                    self.begin_conversation(host);
                }
            } else if let Some(line) = self.conversation.advance(host) {
                self.dispatch(line);
            }
        }

        self.choreographer
            .advance(host, &mut self.control, self.anchor);
    }

    /// Bind the player while unbound and read its position.
    fn refresh_player<H: SceneHost>(&mut self, host: &mut H) -> Option<Vec3> {
        if self.control.player().is_none() {
            let player = host.resolve_player()?;
            debug!(%player, "player resolved");
            self.control.bind(player);
            if self.control.is_frozen() {
                self.control.freeze(true, host);
            }
        }

        let player = self.control.player()?;
        let position = host.player_position(player);
        if position.is_none() {
            debug!(%player, "player reference lost");
            self.control.unbind();
        }
        position
    }

    fn begin_conversation<H: SceneHost>(&mut self, host: &mut H) {
        info!(lines = self.conversation.script().len(), "conversation started");
        host.set_prompt_visible(false);
        self.control.freeze(true, host);
        if let Some(line) = self.conversation.begin(host) {
            self.dispatch(line);
        }
    }

    fn dispatch(&mut self, line: EmittedLine) {
        debug!(index = line.index, marker = ?line.marker, "line shown");
        for kind in line.raised_events() {
            self.choreographer.trigger(kind);
        }
        if line.is_last {
            info!("final line shown");
        }
    }

    /// Release everything the sequence created. Runs once.
    ///
    /// Removes the antagonist if still present, stops the rain, releases the
    /// dialogue surface and gives control back to a player frozen by the
    /// conversation. Routines already running finish without touching
    /// released resources.
    pub fn teardown<H: SceneHost>(&mut self, host: &mut H) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.choreographer.teardown(host);
        if self.conversation.is_started() {
            self.control.freeze(false, host);
        }
        info!("sequence torn down");
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Move the anchor, e.g. when the hosting entity moves.
    pub fn set_anchor(&mut self, anchor: Vec3) {
        self.anchor = anchor;
    }

    pub fn conversation(&self) -> &ConversationStateMachine {
        &self.conversation
    }

    pub fn choreographer(&self) -> &EventChoreographer {
        &self.choreographer
    }

    pub fn control(&self) -> &PlayerControlGate {
        &self.control
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// True once the dialogue is over and every routine has finished.
    pub fn is_complete(&self) -> bool {
        self.conversation.is_finished() && self.choreographer.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreography::{RAIN_VIEWPOINT_OFFSET, RAIN_WORLD_OFFSET};
    use crate::events::EventKind;
    use crate::headless::{HeadlessScene, StageCall};
    use crate::script::{DialogueLine, LineMarker};
    use scene_rules::WeatherAnchor;

    const DELTA: f32 = 0.125;

    fn anchor() -> Vec3 {
        Vec3::new(10.0, 0.0, 1.0)
    }

    /// Introduction sequencer with the player standing next to the anchor.
    fn staged() -> (IntroSequencer, HeadlessScene) {
        let sequencer = IntroSequencer::introduction(anchor());
        let mut scene = HeadlessScene::new(DELTA);
        scene.place_player(Vec3::new(9.0, 0.5, 0.0));
        (sequencer, scene)
    }

    fn press_times(scene: &mut HeadlessScene, sequencer: &mut IntroSequencer, presses: usize) {
        for _ in 0..presses {
            scene.press_and_tick(sequencer);
        }
    }

    #[test]
    fn test_prompt_follows_proximity() {
        let mut sequencer = IntroSequencer::introduction(Vec3::new(10.0, 0.0, 0.0));
        let mut scene = HeadlessScene::new(DELTA);

        scene.tick(&mut sequencer);
        assert!(!scene.prompt_visible());

        // Exactly on the interaction radius.
        scene.place_player(Vec3::new(8.25, 0.0, 0.0));
        scene.tick(&mut sequencer);
        assert!(scene.prompt_visible());

        scene.place_player(Vec3::new(8.0, 0.0, 0.0));
        scene.tick(&mut sequencer);
        assert!(!scene.prompt_visible());
    }

    #[test]
    fn test_press_out_of_range_does_not_start() {
        let (mut sequencer, mut scene) = staged();
        scene.place_player(Vec3::ZERO);

        press_times(&mut scene, &mut sequencer, 3);
        assert!(!sequencer.conversation().is_started());
        assert!(scene.shown_lines().is_empty());
        assert!(scene.movement_enabled());
    }

    #[test]
    fn test_begin_hides_prompt_and_freezes() {
        let (mut sequencer, mut scene) = staged();
        scene.tick(&mut sequencer);
        assert!(scene.prompt_visible());

        scene.press_and_tick(&mut sequencer);
        assert!(sequencer.conversation().is_started());
        assert_eq!(sequencer.conversation().line_index(), Some(0));
        assert!(!scene.prompt_visible());
        assert!(!scene.movement_enabled());
        assert!(sequencer.control().is_frozen());
        assert_eq!(scene.shown_lines().len(), 1);

        // Still in range, but the prompt stays hidden once started.
        scene.tick(&mut sequencer);
        assert!(!scene.prompt_visible());
    }

    #[test]
    fn test_each_marker_routine_starts_once() {
        let (mut sequencer, mut scene) = staged();

        press_times(&mut scene, &mut sequencer, 10);
        assert!(!sequencer.choreographer().has_started(EventKind::Capture));
        scene.press_and_tick(&mut sequencer);
        assert_eq!(sequencer.conversation().line_index(), Some(10));
        assert!(sequencer.choreographer().has_started(EventKind::Capture));

        press_times(&mut scene, &mut sequencer, 5);
        assert!(!sequencer.choreographer().has_started(EventKind::Completion));
        scene.press_and_tick(&mut sequencer);
        assert_eq!(sequencer.conversation().line_index(), Some(16));
        assert!(sequencer.conversation().is_finished());
        assert!(sequencer.choreographer().has_started(EventKind::Completion));

        // The last line carries a fade-out marker too; only one completion runs.
        let completions = sequencer
            .choreographer()
            .running()
            .into_iter()
            .filter(|kind| *kind == EventKind::Completion)
            .count();
        assert_eq!(completions, 1);

        press_times(&mut scene, &mut sequencer, 5);
        assert_eq!(scene.shown_lines().len(), 17);
        assert_eq!(sequencer.conversation().line_index(), Some(16));

        scene.run_for(&mut sequencer, 3.0);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::ConcealCaptureTarget)), 1);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::SpawnActor { .. })), 1);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::RemoveActor { .. })), 1);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::StartWeather { .. })), 1);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::HideDialogue)), 1);
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_last_line_flagged() {
        let (mut sequencer, mut scene) = staged();
        press_times(&mut scene, &mut sequencer, 17);

        let flags: Vec<bool> = scene
            .calls()
            .iter()
            .filter_map(|call| match call {
                StageCall::ShowLine { is_last_line, .. } => Some(*is_last_line),
                _ => None,
            })
            .collect();
        assert_eq!(flags.len(), 17);
        assert!(flags[16]);
        assert!(flags[..16].iter().all(|flag| !flag));
    }

    #[test]
    fn test_full_playthrough_releases_player() {
        let (mut sequencer, mut scene) = staged();
        press_times(&mut scene, &mut sequencer, 17);
        assert!(!scene.movement_enabled());
        assert!(scene.dialogue_visible());

        scene.run_for(&mut sequencer, 1.0);
        assert!(!scene.movement_enabled());

        scene.run_for(&mut sequencer, 1.0);
        assert!(scene.movement_enabled());
        assert!(!scene.dialogue_visible());
        assert!(!sequencer.control().is_frozen());
        assert_eq!(scene.current_tint(), Some(crate::choreography::STORM_TINT));
        assert!(!scene.capture_target_visible());
        assert_eq!(scene.live_actor_count(), 0);
        assert!(scene.weather().is_some());
    }

    #[test]
    fn test_antagonist_spawns_beside_anchor() {
        let (mut sequencer, mut scene) = staged();
        press_times(&mut scene, &mut sequencer, 7);

        let spawn = scene.calls().iter().find_map(|call| match call {
            StageCall::SpawnActor { name, position } => Some((name.clone(), *position)),
            _ => None,
        });
        assert_eq!(spawn, Some(("Malverik".to_string(), Vec3::new(7.0, 3.25, 1.0))));
        assert!(sequencer.choreographer().summoned_actor().is_some());
    }

    #[test]
    fn test_dismiss_without_summon_starts_rain() {
        let script = Script::new([
            DialogueLine::narration("The portal shudders."),
            DialogueLine::new("Malverik", "Enough.").with_marker(LineMarker::PortalClose),
            DialogueLine::narration("Silence."),
        ])
        .unwrap();
        let mut sequencer =
            IntroSequencer::new(Arc::new(script), SequencerConfig::default(), anchor());
        let mut scene = HeadlessScene::new(DELTA);
        scene.place_player(anchor());

        press_times(&mut scene, &mut sequencer, 2);
        scene.run_for(&mut sequencer, 1.0);

        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::SpawnActor { .. })), 0);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::RemoveActor { .. })), 0);
        assert!(scene.calls().contains(&StageCall::StartWeather {
            anchor: WeatherAnchor::Viewpoint {
                local_offset: RAIN_VIEWPOINT_OFFSET,
            },
        }));
        assert!(sequencer.choreographer().weather().is_some());
    }

    #[test]
    fn test_player_lost_mid_conversation() {
        let (mut sequencer, mut scene) = staged();
        press_times(&mut scene, &mut sequencer, 3);

        scene.despawn_player();
        press_times(&mut scene, &mut sequencer, 2);
        assert_eq!(scene.shown_lines().len(), 5);
        assert!(sequencer.control().player().is_none());
        assert!(!scene.prompt_visible());
        assert!(!sequencer.conversation().is_finished());
    }

    #[test]
    fn test_player_resolved_only_while_unbound() {
        let mut sequencer = IntroSequencer::introduction(anchor());
        let mut scene = HeadlessScene::new(DELTA).without_player();

        scene.tick_n(&mut sequencer, 3);
        assert_eq!(scene.resolve_attempts(), 3);
        assert!(!scene.prompt_visible());

        scene.spawn_player(anchor());
        scene.tick_n(&mut sequencer, 4);
        assert_eq!(scene.resolve_attempts(), 4);
        assert!(scene.prompt_visible());
    }

    #[test]
    fn test_stale_freeze_released_before_start() {
        let (mut sequencer, mut scene) = staged();
        scene.tick(&mut sequencer);
        sequencer.control.freeze(true, &mut scene);
        assert!(!scene.movement_enabled());

        scene.tick(&mut sequencer);
        assert!(!sequencer.control().is_frozen());
        assert!(scene.movement_enabled());
    }

    #[test]
    fn test_teardown_releases_once() {
        let (mut sequencer, mut scene) = staged();
        press_times(&mut scene, &mut sequencer, 8);
        assert_eq!(scene.live_actor_count(), 1);

        sequencer.teardown(&mut scene);
        assert!(sequencer.is_torn_down());
        assert_eq!(scene.live_actor_count(), 0);
        assert!(scene.surface_released());
        assert!(scene.movement_enabled());

        let calls = scene.calls().len();
        sequencer.teardown(&mut scene);
        assert_eq!(scene.calls().len(), calls);

        // Presses are ignored and no rain starts afterwards.
        press_times(&mut scene, &mut sequencer, 10);
        scene.run_for(&mut sequencer, 4.0);
        assert_eq!(scene.shown_lines().len(), 8);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::RemoveActor { .. })), 1);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::ReleaseSurface)), 1);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::StartWeather { .. })), 0);
        assert!(!sequencer.choreographer().has_started(EventKind::Summon));
    }

    #[test]
    fn test_teardown_before_start_leaves_player_alone() {
        let (mut sequencer, mut scene) = staged();
        scene.tick(&mut sequencer);

        sequencer.teardown(&mut scene);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::MovementEnabled { .. })), 0);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::ReleaseSurface)), 1);
    }

    #[test]
    fn test_failed_spawn_degrades() {
        let (mut sequencer, _) = staged();
        let mut scene = HeadlessScene::new(DELTA).with_failing_spawns();
        scene.place_player(anchor());

        press_times(&mut scene, &mut sequencer, 17);
        scene.run_for(&mut sequencer, 3.0);

        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::SpawnActor { .. })), 1);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::MoveActor { .. })), 0);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::RemoveActor { .. })), 0);
        assert!(scene.weather().is_some());
        assert!(scene.movement_enabled());
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_no_camera_skips_rumble_and_anchors_rain_in_world() {
        let mut sequencer = IntroSequencer::introduction(anchor());
        let mut scene = HeadlessScene::new(DELTA).without_camera();
        scene.place_player(anchor());

        press_times(&mut scene, &mut sequencer, 17);
        scene.run_for(&mut sequencer, 3.0);

        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::AmbientTint { .. })), 0);
        assert!(scene.calls().contains(&StageCall::StartWeather {
            anchor: WeatherAnchor::World {
                position: anchor() + RAIN_WORLD_OFFSET,
            },
        }));
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_early_fade_out_completes_once() {
        let script = Script::new([
            DialogueLine::new("Eldric", "Stay close."),
            DialogueLine::narration("(The screen fades.)").with_marker(LineMarker::FadeOut),
            DialogueLine::new("Cassius", "Dad?"),
            DialogueLine::new("Eldric", "I'm here."),
        ])
        .unwrap();
        let mut sequencer =
            IntroSequencer::new(Arc::new(script), SequencerConfig::default(), anchor());
        let mut scene = HeadlessScene::new(DELTA);
        scene.place_player(anchor());

        press_times(&mut scene, &mut sequencer, 2);
        assert_eq!(sequencer.conversation().line_index(), Some(1));
        assert!(sequencer.choreographer().has_started(EventKind::Completion));
        assert_eq!(sequencer.choreographer().running(), vec![EventKind::Completion]);

        // The final line arrives while the fade-out completion is still waiting.
        press_times(&mut scene, &mut sequencer, 2);
        assert!(sequencer.conversation().is_finished());
        assert_eq!(sequencer.choreographer().running(), vec![EventKind::Completion]);

        // Released 1.5 s after the fade-out line, not after the final line.
        scene.tick_n(&mut sequencer, 9);
        assert!(!scene.movement_enabled());
        scene.tick(&mut sequencer);
        assert!(scene.movement_enabled());
        assert!(sequencer.is_complete());

        scene.run_for(&mut sequencer, 3.0);
        assert_eq!(scene.count_calls(|call| matches!(call, StageCall::HideDialogue)), 1);
    }

    #[test]
    fn test_reresolved_player_stays_frozen() {
        let (mut sequencer, mut scene) = staged();
        press_times(&mut scene, &mut sequencer, 3);

        scene.despawn_player();
        scene.tick(&mut sequencer);
        assert!(sequencer.control().player().is_none());
        let freezes = |scene: &HeadlessScene| {
            scene.count_calls(|call| matches!(call, StageCall::MovementEnabled { enabled: false }))
        };
        let before = freezes(&scene);

        scene.spawn_player(anchor());
        scene.tick(&mut sequencer);
        assert!(sequencer.control().player().is_some());
        assert!(sequencer.control().is_frozen());
        assert_eq!(freezes(&scene), before + 1);
        assert!(!scene.movement_enabled());
    }
}
