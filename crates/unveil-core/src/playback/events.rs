/// Transitions reported by the controller, in the order they happened.
///
/// `Completed` is the "done" notification: it is emitted exactly once per
/// playback, when the last stage finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started,
    StageEntered {
        stage: usize,
    },
    LineStarted {
        stage: usize,
        line: usize,
    },
    CharRevealed {
        stage: usize,
        line: usize,
        char_index: usize,
    },
    LineTyped {
        stage: usize,
        line: usize,
    },
    StageCompleted {
        stage: usize,
    },
    /// A stage was selected and shown already typed.
    Jumped {
        stage: usize,
    },
    Paused,
    Resumed,
    Completed,
    Reset,
}

impl PlaybackEvent {
    /// True for events that change what a viewer sees.
    pub fn is_visible(&self) -> bool {
        !matches!(self, PlaybackEvent::Started | PlaybackEvent::Resumed)
    }
}
