//! Settings: what tapedeck reads from `config.toml` and `TAPEDECK__*`
//! environment variables, and where it keeps its state.

mod load;
mod schema;

pub use schema::*;
