//! Choreography event kinds raised by dialogue lines.

use serde::{Deserialize, Serialize};

/// One kind per timed world routine. Each starts at most once per sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Sky darkens towards the storm tint.
    Rumble,
    /// Antagonist steps through the portal.
    Summon,
    /// The capture target is trapped and concealed.
    Capture,
    /// Antagonist leaves; rain begins.
    Dismiss,
    /// Dialogue closes and the player regains control.
    Completion,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Rumble,
        EventKind::Summon,
        EventKind::Capture,
        EventKind::Dismiss,
        EventKind::Completion,
    ];

    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Rumble => "rumble",
            EventKind::Summon => "summon",
            EventKind::Capture => "capture",
            EventKind::Dismiss => "dismiss",
            EventKind::Completion => "completion",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
