//! spell-it - spell words aloud
//!
//! Reads a short text string, sanitizes it and spells it one character at a
//! time through the platform's text-to-speech, with a chosen voice and a
//! fixed pacing. Also ships a minimal static file server for the web build.

pub mod error;
pub mod input;
pub mod locale;
pub mod playback;
pub mod server;
pub mod speech;
pub mod state;
pub mod text;
pub mod voice;

pub use error::{Result, SpellError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
