//! Error types for the fallible edges of the crate: loading configuration and scripts.
//!
//! Nothing in the per-tick path returns an error; see the module docs of
//! `sequencer` for how missing collaborators degrade.

use thiserror::Error;

/// Errors raised while reading a [`SequencerConfig`](crate::SequencerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid sequencer config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while building a [`Script`](crate::Script).
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A conversation needs at least one line to have a last line.
    #[error("dialogue script has no lines")]
    Empty,

    #[error("invalid dialogue script: {0}")]
    Parse(#[from] toml::de::Error),
}
