//! # Cutscene Core
//!
//! Sequencer for the Path of Valor introduction: a proximity prompt, a linear
//! dialogue advanced by the player, and the timed world beats that play out
//! alongside it. The host engine is reached only through the port traits in
//! `scene_rules`.
//!
//! ## Core Components
//!
//! - **script**: the immutable dialogue and its world-event markers
//! - **proximity**: whether the "press to talk" prompt shows this tick
//! - **conversation**: line index state machine driven by advance input
//! - **choreography**: at-most-once timed routines (rumble, summon, capture, dismiss, completion)
//! - **control**: freezing and releasing the player
//! - **sequencer**: the per-tick driver tying the above together
//!
//! ## Design Philosophy
//!
//! - **Tick-Driven**: every routine is a resumable state advanced once per tick; nothing blocks
//! - **Degrade, Don't Fail**: a missing collaborator skips the step that needed it
//! - **Once Only**: each world beat starts at most once per sequence

pub mod choreography;
pub mod config;
pub mod control;
pub mod conversation;
pub mod error;
pub mod events;
pub mod headless;
pub mod proximity;
pub mod script;
pub mod sequencer;

pub use choreography::*;
pub use config::*;
pub use control::*;
pub use conversation::*;
pub use error::*;
pub use events::*;
pub use headless::*;
pub use proximity::*;
pub use script::*;
pub use sequencer::*;
