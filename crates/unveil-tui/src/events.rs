use crossterm::event::Event;
use unveil_core::clock::Millis;

/// Inputs to the reducer.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Clock reading for this loop iteration. Fires due wake-ups.
    Tick { now: Millis },
    Terminal(Event),
}
