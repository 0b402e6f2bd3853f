//! Timed choreography routines.
//!
//! Each routine is a small resumable state machine advanced once per tick by
//! [`Routine::step`]. Routines never block dialogue, cannot be cancelled, and
//! check that a resource still exists before every host call that touches it.

use glam::{Vec2, Vec3};
use scene_rules::{
    ease_between, ping_pong, ActorHandle, Color, SceneHost, SpawnRequest, WeatherAnchor,
    WeatherHandle, WeatherRequest,
};
use tracing::{debug, info, warn};

use crate::config::SequencerConfig;
use crate::control::PlayerControlGate;
use crate::events::EventKind;

/// How long the sky takes to darken.
pub const RUMBLE_SECONDS: f32 = 1.2;

/// Ambient tint the rumble darkens towards.
pub const STORM_TINT: Color = Color::rgb(0.2, 0.22, 0.35);

/// Far end of the capture pulse (the near end is white).
pub const CAPTURE_TINT: Color = Color::rgb(0.4, 0.1, 0.8);

const CAPTURE_PULSE_RATE: f32 = 2.0;
const CAPTURE_PULSE_SPAN: f32 = 0.5;

/// Where the antagonist stops, relative to the anchor.
pub const SUMMON_TARGET_OFFSET: Vec3 = Vec3::new(0.0, 0.5, 0.0);

/// Rain emitter offset when parented to the viewpoint.
pub const RAIN_VIEWPOINT_OFFSET: Vec3 = Vec3::new(0.0, 6.0, 0.0);

/// Rain emitter offset above the anchor when there is no viewpoint.
pub const RAIN_WORLD_OFFSET: Vec3 = Vec3::new(0.0, 8.0, 0.0);

/// Durations and offsets resolved from config once, at construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoutineTimings {
    pub summon_seconds: f32,
    pub dismiss_seconds: f32,
    pub capture_seconds: f32,
    pub resume_delay_seconds: f32,
    pub spawn_offset: Vec2,
    pub exit_offset: Vec2,
}

impl From<&SequencerConfig> for RoutineTimings {
    fn from(config: &SequencerConfig) -> Self {
        Self {
            summon_seconds: config.summon_seconds(),
            dismiss_seconds: config.dismiss_seconds(),
            capture_seconds: config.capture_seconds(),
            resume_delay_seconds: config.resume_delay_seconds(),
            spawn_offset: config.villain_spawn_offset,
            exit_offset: config.villain_exit_offset,
        }
    }
}

/// The antagonist as far as the cutscene knows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SummonedActor {
    pub handle: ActorHandle,
    /// Last commanded position.
    pub position: Vec3,
    /// Set once the exit has claimed the actor; the entrance stops moving it.
    pub departing: bool,
}

/// World resources created by routines and shared between them.
#[derive(Debug, Default)]
pub(crate) struct SceneResources {
    pub villain: Option<SummonedActor>,
    pub weather: Option<WeatherHandle>,
    pub surface_released: bool,
    pub torn_down: bool,
}

/// Per-tick inputs every routine sees.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StageFrame {
    /// Seconds since the last tick, never negative.
    pub delta: f32,
    /// Scene time, used for oscillations.
    pub time: f32,
    pub anchor: Vec3,
}

pub(crate) struct RoutineContext<'a, H> {
    pub host: &'a mut H,
    pub resources: &'a mut SceneResources,
    pub control: &'a mut PlayerControlGate,
    pub frame: StageFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoutineStatus {
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub(crate) enum Routine {
    Rumble(RumbleRoutine),
    Summon(SummonRoutine),
    Capture(CaptureRoutine),
    Dismiss(DismissRoutine),
    Completion(CompletionRoutine),
}

impl Routine {
    pub fn for_event(kind: EventKind, timings: &RoutineTimings) -> Self {
        match kind {
            EventKind::Rumble => Routine::Rumble(RumbleRoutine::new(RUMBLE_SECONDS)),
            EventKind::Summon => Routine::Summon(SummonRoutine::new(
                timings.summon_seconds,
                timings.spawn_offset,
            )),
            EventKind::Capture => Routine::Capture(CaptureRoutine::new(timings.capture_seconds)),
            EventKind::Dismiss => Routine::Dismiss(DismissRoutine::new(
                timings.dismiss_seconds,
                timings.exit_offset,
            )),
            EventKind::Completion => {
                Routine::Completion(CompletionRoutine::new(timings.resume_delay_seconds))
            }
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Routine::Rumble(_) => EventKind::Rumble,
            Routine::Summon(_) => EventKind::Summon,
            Routine::Capture(_) => EventKind::Capture,
            Routine::Dismiss(_) => EventKind::Dismiss,
            Routine::Completion(_) => EventKind::Completion,
        }
    }

    pub fn step<H: SceneHost>(&mut self, ctx: &mut RoutineContext<'_, H>) -> RoutineStatus {
        match self {
            Routine::Rumble(routine) => routine.step(ctx),
            Routine::Summon(routine) => routine.step(ctx),
            Routine::Capture(routine) => routine.step(ctx),
            Routine::Dismiss(routine) => routine.step(ctx),
            Routine::Completion(routine) => routine.step(ctx),
        }
    }
}

/// Darkens the ambient tint from its starting value to [`STORM_TINT`].
#[derive(Debug, Clone)]
pub(crate) struct RumbleRoutine {
    duration: f32,
    elapsed: f32,
    from: Option<Color>,
}

impl RumbleRoutine {
    fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            from: None,
        }
    }

    fn step<H: SceneHost>(&mut self, ctx: &mut RoutineContext<'_, H>) -> RoutineStatus {
        if self.elapsed >= self.duration {
            return RoutineStatus::Finished;
        }

        let Some(current) = ctx.host.ambient_tint() else {
            if self.from.is_none() {
                warn!("no ambient tint target; rumble skipped");
            } else {
                debug!(elapsed = self.elapsed, "ambient tint target lost; rumble stopped");
            }
            return RoutineStatus::Finished;
        };
        let from = *self.from.get_or_insert(current);

        self.elapsed += ctx.frame.delta;
        ctx.host
            .set_ambient_tint(from.lerp(STORM_TINT, self.elapsed / self.duration));
        RoutineStatus::Running
    }
}

/// Spawns the antagonist beside the anchor and eases it into place.
#[derive(Debug, Clone)]
pub(crate) struct SummonRoutine {
    duration: f32,
    spawn_offset: Vec2,
    elapsed: f32,
    path: Option<(Vec3, Vec3)>,
}

impl SummonRoutine {
    fn new(duration: f32, spawn_offset: Vec2) -> Self {
        Self {
            duration,
            spawn_offset,
            elapsed: 0.0,
            path: None,
        }
    }

    fn step<H: SceneHost>(&mut self, ctx: &mut RoutineContext<'_, H>) -> RoutineStatus {
        let (start, target) = match self.path {
            Some(path) => path,
            None => {
                if ctx.resources.torn_down {
                    return RoutineStatus::Finished;
                }
                let anchor = ctx.frame.anchor;
                let start = (anchor.truncate() + self.spawn_offset).extend(anchor.z);
                let target = anchor + SUMMON_TARGET_OFFSET;

                let Some(handle) = ctx.host.spawn_actor(&SpawnRequest::malverik(start)) else {
                    warn!(
                        position = ?start,
                        "host could not spawn the antagonist; entrance skipped"
                    );
                    return RoutineStatus::Finished;
                };
                debug!(%handle, position = ?start, "antagonist spawned");

                ctx.resources.villain = Some(SummonedActor {
                    handle,
                    position: start,
                    departing: false,
                });
                self.path = Some((start, target));
                (start, target)
            }
        };

        let Some(actor) = ctx.resources.villain.as_mut().filter(|actor| !actor.departing) else {
            return RoutineStatus::Finished;
        };
        if !ctx.host.actor_exists(actor.handle) {
            debug!(handle = %actor.handle, "antagonist vanished during entrance");
            return RoutineStatus::Finished;
        }

        if self.elapsed < self.duration {
            self.elapsed += ctx.frame.delta;
            let position = ease_between(start, target, self.elapsed / self.duration);
            ctx.host.move_actor(actor.handle, position);
            actor.position = position;
            RoutineStatus::Running
        } else {
            ctx.host.move_actor(actor.handle, target);
            actor.position = target;
            RoutineStatus::Finished
        }
    }
}

/// Pulses the capture target's tint, then conceals it.
#[derive(Debug, Clone)]
pub(crate) struct CaptureRoutine {
    duration: f32,
    elapsed: f32,
}

impl CaptureRoutine {
    fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    fn step<H: SceneHost>(&mut self, ctx: &mut RoutineContext<'_, H>) -> RoutineStatus {
        if ctx.resources.torn_down {
            return RoutineStatus::Finished;
        }

        if self.elapsed < self.duration {
            self.elapsed += ctx.frame.delta;
            ctx.host.tint_capture_target(capture_pulse(ctx.frame.time));
            RoutineStatus::Running
        } else {
            ctx.host.conceal_capture_target();
            debug!("capture target concealed");
            RoutineStatus::Finished
        }
    }
}

/// Capture tint at scene time `time`. Driven by wall time, not tick count.
pub fn capture_pulse(time: f32) -> Color {
    let pulse = 0.5 + ping_pong(time * CAPTURE_PULSE_RATE, CAPTURE_PULSE_SPAN);
    Color::WHITE.lerp(CAPTURE_TINT, pulse)
}

#[derive(Debug, Clone, Copy)]
struct ExitPath {
    actor: ActorHandle,
    start: Vec3,
    exit: Vec3,
}

/// Eases the antagonist out, removes it and starts the rain.
#[derive(Debug, Clone)]
pub(crate) struct DismissRoutine {
    duration: f32,
    exit_offset: Vec2,
    elapsed: f32,
    path: Option<ExitPath>,
}

impl DismissRoutine {
    fn new(duration: f32, exit_offset: Vec2) -> Self {
        Self {
            duration,
            exit_offset,
            elapsed: 0.0,
            path: None,
        }
    }

    fn step<H: SceneHost>(&mut self, ctx: &mut RoutineContext<'_, H>) -> RoutineStatus {
        let path = match self.path {
            Some(path) => path,
            None => {
                let present = ctx
                    .resources
                    .villain
                    .filter(|actor| ctx.host.actor_exists(actor.handle));
                let Some(actor) = present else {
                    debug!("no summoned antagonist; exit skipped");
                    ctx.resources.villain = None;
                    start_rain(ctx);
                    return RoutineStatus::Finished;
                };

                if let Some(villain) = ctx.resources.villain.as_mut() {
                    villain.departing = true;
                }
                let exit =
                    (ctx.frame.anchor.truncate() + self.exit_offset).extend(actor.position.z);
                let path = ExitPath {
                    actor: actor.handle,
                    start: actor.position,
                    exit,
                };
                self.path = Some(path);
                path
            }
        };

        if !ctx.host.actor_exists(path.actor) {
            debug!(handle = %path.actor, "antagonist vanished during exit");
            ctx.resources.villain = None;
            start_rain(ctx);
            return RoutineStatus::Finished;
        }

        if self.elapsed < self.duration {
            self.elapsed += ctx.frame.delta;
            let position = ease_between(path.start, path.exit, self.elapsed / self.duration);
            ctx.host.move_actor(path.actor, position);
            if let Some(villain) = ctx.resources.villain.as_mut() {
                villain.position = position;
            }
            RoutineStatus::Running
        } else {
            ctx.host.remove_actor(path.actor);
            ctx.resources.villain = None;
            debug!(handle = %path.actor, "antagonist removed");
            start_rain(ctx);
            RoutineStatus::Finished
        }
    }
}

/// Start the rain unless it already exists.
fn start_rain<H: SceneHost>(ctx: &mut RoutineContext<'_, H>) {
    if ctx.resources.torn_down || ctx.resources.weather.is_some() {
        return;
    }

    let anchor = WeatherAnchor::prefer_viewpoint(
        ctx.host.viewpoint_available(),
        RAIN_VIEWPOINT_OFFSET,
        ctx.frame.anchor,
        RAIN_WORLD_OFFSET,
    );
    let handle = ctx.host.start_weather_effect(&WeatherRequest::rain(anchor));
    ctx.resources.weather = Some(handle);
    debug!(?anchor, "rain started");
}

/// Waits out the resume delay, then closes the dialogue and releases the player.
#[derive(Debug, Clone)]
pub(crate) struct CompletionRoutine {
    delay: f32,
    waited: f32,
    armed: bool,
}

impl CompletionRoutine {
    fn new(delay: f32) -> Self {
        Self {
            delay,
            waited: 0.0,
            armed: false,
        }
    }

    fn step<H: SceneHost>(&mut self, ctx: &mut RoutineContext<'_, H>) -> RoutineStatus {
        // The wait starts after the tick that showed the triggering line.
        if !self.armed {
            self.armed = true;
            return RoutineStatus::Running;
        }

        self.waited += ctx.frame.delta;
        if self.waited < self.delay {
            return RoutineStatus::Running;
        }

        if ctx.resources.torn_down {
            return RoutineStatus::Finished;
        }
        if !ctx.resources.surface_released {
            ctx.host.hide_dialogue();
        }
        ctx.control.freeze(false, &mut *ctx.host);
        info!("dialogue closed; player control restored");
        RoutineStatus::Finished
    }
}
