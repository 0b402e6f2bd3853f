//! # Scene Rules
//!
//! World-side vocabulary for the Path of Valor cutscenes: handles for things the
//! host engine owns, easing and color math, weather anchoring, and the port traits
//! the sequencer calls into. This crate holds no sequencing logic.

pub mod actors;
pub mod environment;
pub mod motion;
pub mod ports;

pub use actors::*;
pub use environment::*;
pub use motion::*;
pub use ports::*;
