//! Script module - the immutable dialogue the sequence plays.
//!
//! - **Lines**: speaker, text and an optional world-event marker
//! - **Script**: the ordered, non-empty list of lines
//! - **Introduction**: the built-in opening scene

mod introduction;
mod line;
mod store;

pub use line::*;
pub use store::*;
