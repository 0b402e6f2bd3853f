//! The linear conversation state machine.
//!
//! `NotStarted -> InProgress(i) -> Finished`. One call, at most one line: the
//! machine never emits two lines for a single input and never goes backwards.

use std::sync::Arc;

use scene_rules::PresentationPort;
use serde::{Deserialize, Serialize};

use crate::events::EventKind;
use crate::script::{LineMarker, Script};

/// Mutable state of one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub started: bool,
    pub finished: bool,
    /// `None` until the first line is shown.
    pub line_index: Option<usize>,
}

/// Coarse phase derived from [`ConversationState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    NotStarted,
    InProgress { line_index: usize },
    Finished,
}

/// A line that was just shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmittedLine {
    pub index: usize,
    pub marker: LineMarker,
    pub is_last: bool,
}

impl EmittedLine {
    /// Routines this line raises, in dispatch order: its own marker first,
    /// then completion if it is the final line.
    pub fn raised_events(&self) -> impl Iterator<Item = EventKind> {
        let completion = self.is_last.then_some(EventKind::Completion);
        self.marker.event_kind().into_iter().chain(completion)
    }
}

/// Owns the line index and turns advance input into shown lines.
#[derive(Debug, Clone)]
pub struct ConversationStateMachine {
    script: Arc<Script>,
    state: ConversationState,
}

impl ConversationStateMachine {
    pub fn new(script: Arc<Script>) -> Self {
        Self {
            script,
            state: ConversationState::default(),
        }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn phase(&self) -> ConversationPhase {
        match (self.state.started, self.state.finished, self.state.line_index) {
            (_, true, _) => ConversationPhase::Finished,
            (true, false, Some(line_index)) => ConversationPhase::InProgress { line_index },
            _ => ConversationPhase::NotStarted,
        }
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn line_index(&self) -> Option<usize> {
        self.state.line_index
    }

    /// Start the conversation and show line 0. Ignored once started.
    pub fn begin<P: PresentationPort + ?Sized>(
        &mut self,
        presentation: &mut P,
    ) -> Option<EmittedLine> {
        if self.state.started {
            return None;
        }
        self.state.started = true;
        self.advance(presentation)
    }

    /// Show the next line. Ignored before the start and after the last line.
    pub fn advance<P: PresentationPort + ?Sized>(
        &mut self,
        presentation: &mut P,
    ) -> Option<EmittedLine> {
        if !self.state.started || self.state.finished {
            return None;
        }

        let next = self.state.line_index.map_or(0, |index| index + 1);
        let line = self.script.get(next)?;
        let is_last = self.script.is_last(next);

        self.state.line_index = Some(next);
        presentation.show_line(line.speaker(), &line.text, is_last);
        if is_last {
            self.state.finished = true;
        }

        Some(EmittedLine {
            index: next,
            marker: line.marker,
            is_last,
        })
    }
}
