//! Remote-control bridge: the four transport entry points used by OS
//! command surfaces (lock screen, headset buttons, MPRIS).
//!
//! Each entry point reports whether it did anything, so the surface can
//! show the command as unavailable instead of silently ignoring it.

use log::debug;

use crate::session::{self, PlaybackSession, SharedSession};

/// Outcome of a remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    CommandFailed,
}

impl CommandStatus {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    Play,
    Pause,
    Next,
    Previous,
}

/// Which remote commands would currently succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Availability {
    pub can_play: bool,
    pub can_pause: bool,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

pub trait RemoteControl {
    /// Fails when already playing or when there is no current track.
    fn remote_play(&mut self) -> CommandStatus;
    /// Fails when not playing.
    fn remote_pause(&mut self) -> CommandStatus;
    /// Fails when there is no current track.
    fn remote_next(&mut self) -> CommandStatus;
    /// Fails when there is no current track.
    fn remote_previous(&mut self) -> CommandStatus;

    fn availability(&self) -> Availability;

    fn dispatch(&mut self, cmd: RemoteCommand) -> CommandStatus {
        let status = match cmd {
            RemoteCommand::Play => self.remote_play(),
            RemoteCommand::Pause => self.remote_pause(),
            RemoteCommand::Next => self.remote_next(),
            RemoteCommand::Previous => self.remote_previous(),
        };
        debug!("remote {cmd:?}: {status:?}");
        status
    }
}

fn status_of(ok: bool) -> CommandStatus {
    if ok {
        CommandStatus::Success
    } else {
        CommandStatus::CommandFailed
    }
}

impl RemoteControl for PlaybackSession {
    fn remote_play(&mut self) -> CommandStatus {
        status_of(!self.is_playing() && self.play().is_ok())
    }

    fn remote_pause(&mut self) -> CommandStatus {
        if !self.is_playing() {
            return CommandStatus::CommandFailed;
        }
        self.pause();
        CommandStatus::Success
    }

    fn remote_next(&mut self) -> CommandStatus {
        status_of(self.next().is_ok())
    }

    fn remote_previous(&mut self) -> CommandStatus {
        status_of(self.previous().is_ok())
    }

    fn availability(&self) -> Availability {
        let has_track = self.current_track().is_some();
        Availability {
            can_play: has_track && !self.is_playing(),
            can_pause: self.is_playing(),
            can_go_next: has_track,
            can_go_previous: has_track,
        }
    }
}

/// Run `cmd` against a shared session under its lock.
pub fn dispatch(session: &SharedSession, cmd: RemoteCommand) -> CommandStatus {
    session::lock(session).dispatch(cmd)
}
