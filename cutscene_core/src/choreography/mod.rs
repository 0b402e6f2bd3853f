//! Event Choreographer - runs the timed world routines raised by dialogue.
//!
//! Each event kind maps to exactly one routine:
//! 1. **Rumble**: ambient tint darkens to the storm color
//! 2. **Summon**: the antagonist spawns and eases towards the anchor
//! 3. **Capture**: the capture target pulses, then is concealed
//! 4. **Dismiss**: the antagonist eases out and is removed; rain starts
//! 5. **Completion**: after a delay the dialogue closes and the player is released
//!
//! Routines start at most once, run concurrently with each other and with
//! dialogue, and always run to completion.

mod registry;
mod routines;

pub use registry::*;
pub use routines::{
    capture_pulse, CAPTURE_TINT, RAIN_VIEWPOINT_OFFSET, RAIN_WORLD_OFFSET, RUMBLE_SECONDS,
    STORM_TINT, SUMMON_TARGET_OFFSET,
};

use glam::Vec3;
use scene_rules::{ActorHandle, SceneHost, WeatherHandle};
use tracing::debug;

use crate::config::SequencerConfig;
use crate::control::PlayerControlGate;
use crate::events::EventKind;
use routines::{
    Routine, RoutineContext, RoutineStatus, RoutineTimings, SceneResources, StageFrame,
};

/// Schedules choreography routines and owns the resources they create.
#[derive(Debug)]
pub struct EventChoreographer {
    timings: RoutineTimings,
    registry: EventRoutineRegistry,
    active: Vec<Routine>,
    resources: SceneResources,
}

impl EventChoreographer {
    pub fn new(config: &SequencerConfig) -> Self {
        Self {
            timings: RoutineTimings::from(config),
            registry: EventRoutineRegistry::new(),
            active: Vec::new(),
            resources: SceneResources::default(),
        }
    }

    /// Start the routine for `kind` unless it already started.
    ///
    /// Returns `true` if a routine was launched. The routine takes its first
    /// step on the next [`advance`](Self::advance).
    pub fn trigger(&mut self, kind: EventKind) -> bool {
        if self.resources.torn_down || !self.registry.try_claim(kind) {
            return false;
        }

        debug!(routine = %kind, "choreography routine started");
        self.active.push(Routine::for_event(kind, &self.timings));
        true
    }

    /// Step every running routine once with this tick's clock.
    pub fn advance<H: SceneHost>(
        &mut self,
        host: &mut H,
        control: &mut PlayerControlGate,
        anchor: Vec3,
    ) {
        if self.active.is_empty() {
            return;
        }

        let frame = StageFrame {
            delta: host.delta_seconds().max(0.0),
            time: host.elapsed_seconds(),
            anchor,
        };
        let mut ctx = RoutineContext {
            host,
            resources: &mut self.resources,
            control,
            frame,
        };

        self.active.retain_mut(|routine| match routine.step(&mut ctx) {
            RoutineStatus::Running => true,
            RoutineStatus::Finished => {
                debug!(routine = %routine.kind(), "choreography routine finished");
                false
            }
        });
    }

    /// Release everything the routines created. Runs once; later calls do nothing.
    ///
    /// Routines still running keep stepping afterwards but no longer touch
    /// released resources, and no new routine can start.
    pub fn teardown<H: SceneHost>(&mut self, host: &mut H) {
        if self.resources.torn_down {
            return;
        }
        self.resources.torn_down = true;

        if let Some(actor) = self.resources.villain.take() {
            if host.actor_exists(actor.handle) {
                host.remove_actor(actor.handle);
            }
        }
        if let Some(weather) = self.resources.weather.take() {
            host.stop_weather_effect(weather);
        }
        if !self.resources.surface_released {
            host.release_surface();
            self.resources.surface_released = true;
        }
        self.registry.reset();
    }

    pub fn registry(&self) -> &EventRoutineRegistry {
        &self.registry
    }

    pub fn has_started(&self, kind: EventKind) -> bool {
        self.registry.has_started(kind)
    }

    /// Kinds of the routines still running, in start order.
    pub fn running(&self) -> Vec<EventKind> {
        self.active.iter().map(Routine::kind).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// The antagonist, while it is in the scene.
    pub fn summoned_actor(&self) -> Option<ActorHandle> {
        self.resources.villain.map(|actor| actor.handle)
    }

    pub fn weather(&self) -> Option<WeatherHandle> {
        self.resources.weather
    }

    pub fn is_torn_down(&self) -> bool {
        self.resources.torn_down
    }
}
