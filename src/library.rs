//! Library: the granted directory and the MP3 tracks discovered in it.

mod catalog;
mod grant;
mod model;
mod scan;
mod sniff;

pub use catalog::{FileCatalog, PendingScan};
pub use grant::{DirectoryCapability, GrantStore, LocalDirectory};
pub use model::Track;
