use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info, warn};
use rodio::{OutputStreamBuilder, Sink};

use super::clock::PlayClock;
use super::sink::open_sink;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                error!("no audio output device: {e}");
                if let Ok(mut info) = playback_info.lock() {
                    info.error = Some(format!("no audio output device: {e}"));
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the TUI.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut paused = true;
        let mut clock = PlayClock::default();

        let publish = |f: &dyn Fn(&mut PlaybackInfo)| {
            if let Ok(mut info) = playback_info.lock() {
                f(&mut info);
            }
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Load { path, autoplay }) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    clock.reset();
                    paused = true;

                    match open_sink(&stream, &path) {
                        Ok(new_sink) => {
                            info!("loaded {}", path.display());
                            if autoplay {
                                new_sink.play();
                                clock.resume();
                                paused = false;
                            }
                            sink = Some(new_sink);
                            publish(&|info| {
                                info.path = Some(path.clone());
                                info.elapsed = Duration::ZERO;
                                info.playing = autoplay;
                                info.finished = false;
                                info.error = None;
                            });
                        }
                        Err(e) => {
                            warn!("{e}");
                            publish(&|info| {
                                info.path = None;
                                info.elapsed = Duration::ZERO;
                                info.playing = false;
                                info.finished = false;
                                info.error = Some(e.clone());
                            });
                        }
                    }
                }
                Ok(AudioCmd::Resume) => {
                    if let Some(ref s) = sink {
                        s.play();
                        clock.resume();
                        paused = false;
                        publish(&|info| info.playing = true);
                    }
                }
                Ok(AudioCmd::Pause) => {
                    if let Some(ref s) = sink {
                        s.pause();
                        clock.pause();
                        paused = true;
                        publish(&|info| info.playing = false);
                    }
                }
                Ok(AudioCmd::Stop) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    clock.reset();
                    paused = true;
                    publish(&|info| *info = Default::default());
                }
                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    publish(&|info| info.playing = false);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            // End of track: drop the sink and let the runtime decide what's next.
            let ended = !paused && sink.as_ref().is_some_and(Sink::empty);
            if ended {
                sink = None;
                clock.pause();
                paused = true;
                publish(&|info| {
                    info.playing = false;
                    info.finished = true;
                });
            }

            let elapsed = clock.elapsed();
            publish(&|info| info.elapsed = elapsed);
        }
    })
}
