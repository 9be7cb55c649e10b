//! Terminal front-end state: cursor, search query, grant prompt and the
//! status line. Playback state is owned by the session, not here.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
