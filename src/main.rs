mod app;
mod audio;
mod config;
mod error;
mod library;
mod mpris;
mod now_playing;
mod remote;
mod runtime;
mod session;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
