//! Audio output: a rodio thread that plays whatever the session selects.

mod clock;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;

#[cfg(test)]
mod tests;
