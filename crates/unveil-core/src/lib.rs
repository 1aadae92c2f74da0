//! Core unveil library (scripts, playback engine, config).

pub mod chat;
pub mod clock;
pub mod config;
pub mod console;
pub mod interrupt;
pub mod logging;
pub mod playback;
pub mod prefs;
pub mod render;
pub mod script;
pub mod timer;
pub mod typewriter;
