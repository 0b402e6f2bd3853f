//! Dialogue lines and their world-event markers.

use serde::{Deserialize, Serialize};

use crate::events::EventKind;

/// Marker on a dialogue line naming the routine it triggers, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LineMarker {
    #[default]
    None,
    Rumble,
    PortalOpen,
    TrapCast,
    PortalClose,
    FadeOut,
}

impl LineMarker {
    /// The choreography routine this marker starts.
    pub fn event_kind(self) -> Option<EventKind> {
        match self {
            LineMarker::None => None,
            LineMarker::Rumble => Some(EventKind::Rumble),
            LineMarker::PortalOpen => Some(EventKind::Summon),
            LineMarker::TrapCast => Some(EventKind::Capture),
            LineMarker::PortalClose => Some(EventKind::Dismiss),
            LineMarker::FadeOut => Some(EventKind::Completion),
        }
    }
}

/// A single line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Who speaks. `None` for narration.
    #[serde(default)]
    pub speaker: Option<String>,

    pub text: String,

    #[serde(default)]
    pub marker: LineMarker,
}

impl DialogueLine {
    /// Create a spoken line. A blank speaker becomes narration.
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: normalize_speaker(Some(speaker.into())),
            text: text.into(),
            marker: LineMarker::None,
        }
    }

    /// Create a narration line with no speaker.
    pub fn narration(text: impl Into<String>) -> Self {
        Self {
            speaker: None,
            text: text.into(),
            marker: LineMarker::None,
        }
    }

    /// Set the world-event marker.
    pub fn with_marker(mut self, marker: LineMarker) -> Self {
        self.marker = marker;
        self
    }

    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    pub fn is_narration(&self) -> bool {
        self.speaker.is_none()
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.speaker = normalize_speaker(self.speaker.take());
        self
    }
}

fn normalize_speaker(speaker: Option<String>) -> Option<String> {
    speaker.filter(|name| !name.trim().is_empty())
}
