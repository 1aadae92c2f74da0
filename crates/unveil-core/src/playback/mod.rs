//! Staged playback engine.
//!
//! [`Controller`] walks a [`Script`](crate::script::Script) line by line and
//! stage by stage, typing each line through a
//! [`Typewriter`](crate::typewriter::Typewriter). [`Autoplay`] optionally
//! moves it to the next stage on a fixed interval, and [`Session`] bundles
//! the two for front-ends.
//!
//! Each of them owns a single-slot [`Timer`](crate::timer::Timer), so
//! "cancel everything" is one call and nothing can fire after it.

mod autoplay;
mod controller;
mod events;
mod session;
mod state;

#[cfg(test)]
mod tests;

pub use autoplay::Autoplay;
pub use controller::Controller;
pub use events::PlaybackEvent;
pub use session::Session;
pub use state::{Phase, PlaybackState, StageAdvance};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("stage {} does not exist (script has {count} stages)", .index + 1)]
    StageOutOfRange { index: usize, count: usize },
}
