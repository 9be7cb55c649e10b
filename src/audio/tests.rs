use std::time::{Duration, Instant};

use super::clock::PlayClock;
use super::{AudioPlayer, PlaybackInfo};

#[test]
fn clock_accumulates_only_while_running() {
    let t0 = Instant::now();
    let mut clock = PlayClock::default();
    assert_eq!(clock.elapsed_at(t0), Duration::ZERO);

    clock.resume_at(t0);
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(3)), Duration::from_secs(3));

    clock.pause_at(t0 + Duration::from_secs(3));
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(10)), Duration::from_secs(3));

    clock.resume_at(t0 + Duration::from_secs(10));
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(12)), Duration::from_secs(5));
}

#[test]
fn clock_resume_twice_keeps_first_start() {
    let t0 = Instant::now();
    let mut clock = PlayClock::default();
    clock.resume_at(t0);
    clock.resume_at(t0 + Duration::from_secs(5));
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(6)), Duration::from_secs(6));

    clock.reset();
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(6)), Duration::ZERO);
}

#[test]
fn default_playback_info_is_idle() {
    let info = PlaybackInfo::default();
    assert!(info.path.is_none());
    assert!(!info.playing);
    assert!(!info.finished);
}

#[test]
fn player_survives_missing_output_device_and_quits() {
    // Works with and without a sound card: commands to a dead thread are dropped.
    let player = AudioPlayer::new();
    assert!(player.take_finished().is_none());
    player.quit();
    assert!(!player.snapshot().playing);
}
