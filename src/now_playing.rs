//! Now-playing metadata: what the session publishes whenever the current
//! track changes, and the surfaces that display it.

mod tags;
mod types;

pub use tags::TagPublisher;
pub use types::*;

#[cfg(test)]
mod tests;
