//! MPRIS2 service on the session bus.
//!
//! `org.mpris.MediaPlayer2.Player` is both the remote-command surface
//! (Play/Pause/Next/Previous go through [`crate::remote`]) and the OS
//! now-playing surface (metadata, status and position come from
//! [`MprisHandle`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::block_on;
use log::{debug, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, fdo, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::now_playing::{Artwork, NowPlayingInfo, NowPlayingSurface};
use crate::remote::{self, Availability, CommandStatus, RemoteCommand, RemoteControl};
use crate::session::{self, PlaybackState, SharedSession};
use crate::store;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.tapedeck";

/// Requests the runtime has to act on itself.
#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    art_url: Option<String>,
    art_source: Option<PathBuf>,
    length_micros: Option<i64>,
    position_micros: i64,
    track_id: Option<ObjectPath<'static>>,
}

fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

fn micros(d: Duration) -> i64 {
    i64::try_from(d.as_micros()).unwrap_or(i64::MAX)
}

/// Write side of the MPRIS service, held by the runtime.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
    art_dir: Option<PathBuf>,
}

impl MprisHandle {
    /// Update the reported position. MPRIS clients poll this, so no
    /// change signal is sent.
    pub fn set_position(&self, elapsed: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = micros(elapsed);
        }
    }

    fn export_artwork(&self, track: &Path, art: &Artwork) -> Option<String> {
        let dir = self.art_dir.as_ref()?;
        let path = dir.join(format!("artwork.{}", art.extension()));
        match store::write_replace(&path, &art.data) {
            Ok(()) => Some(format!("file://{}", path.display())),
            Err(e) => {
                warn!("artwork for {} not exported: {e}", track.display());
                None
            }
        }
    }
}

impl NowPlayingSurface for MprisHandle {
    fn show(&self, info: &NowPlayingInfo) {
        let same_track = self
            .state
            .lock()
            .map(|s| s.art_source.as_deref() == Some(info.track.path.as_path()))
            .unwrap_or(false);

        let art_url = if same_track {
            None
        } else {
            info.metadata
                .artwork
                .as_ref()
                .and_then(|art| self.export_artwork(&info.track.path, art))
        };

        if let Ok(mut s) = self.state.lock() {
            if !same_track {
                s.art_url = art_url;
                s.art_source = Some(info.track.path.clone());
            }
            s.playback = info.state;
            s.title = Some(info.metadata.title.clone());
            s.artist = Some(info.metadata.artist.trim())
                .filter(|a| !a.is_empty())
                .map(|a| vec![a.to_string()])
                .unwrap_or_default();
            s.url = Some(format!("file://{}", info.track.path.display()));
            s.length_micros = info.metadata.duration.map(micros);
            s.position_micros = micros(info.elapsed);
            s.track_id =
                ObjectPath::try_from(format!("{OBJECT_PATH}/track/{}", info.index)).ok();
        }
        let _ = self.notify.send(());
    }

    fn clear(&self) {
        if let Ok(mut s) = self.state.lock() {
            *s = SharedState::default();
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "tapedeck"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/mpeg".to_string()]
    }
}

struct PlayerIface {
    session: SharedSession,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn run(&self, cmd: RemoteCommand) -> fdo::Result<()> {
        match remote::dispatch(&self.session, cmd) {
            CommandStatus::Success => Ok(()),
            CommandStatus::CommandFailed => {
                Err(fdo::Error::Failed(format!("{cmd:?} is not available")))
            }
        }
    }

    fn availability(&self) -> Availability {
        session::lock(&self.session).availability()
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) -> fdo::Result<()> {
        self.run(RemoteCommand::Next)
    }

    fn previous(&self) -> fdo::Result<()> {
        self.run(RemoteCommand::Previous)
    }

    fn play(&self) -> fdo::Result<()> {
        self.run(RemoteCommand::Play)
    }

    fn pause(&self) -> fdo::Result<()> {
        self.run(RemoteCommand::Pause)
    }

    fn play_pause(&self) -> fdo::Result<()> {
        session::lock(&self.session)
            .toggle()
            .map_err(|e| fdo::Error::Failed(e.to_string()))
    }

    /// There is no separate stopped-with-track state; stop pauses.
    fn stop(&self) {
        session::lock(&self.session).pause();
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        self.availability().can_play
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        self.availability().can_pause
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        self.availability().can_go_next
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        self.availability().can_go_previous
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = &s.track_id {
            insert(&mut map, "mpris:trackid", Value::from(id.clone()));
        }
        if let Some(title) = &s.title {
            insert(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(url) = &s.url {
            insert(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(art) = &s.art_url {
            insert(&mut map, "mpris:artUrl", Value::from(art.clone()));
        }
        if let Some(len) = s.length_micros {
            insert(&mut map, "mpris:length", Value::from(len));
        }
        map
    }
}

/// Register the MPRIS service on a background thread.
///
/// Failing to reach the session bus is logged; the returned handle still
/// works, it just has no listeners.
pub fn spawn_mpris(
    session: SharedSession,
    tx: Sender<ControlCmd>,
    art_dir: Option<PathBuf>,
) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            if let Err(e) = serve(session, tx, state_for_thread, notify_rx).await {
                warn!("MPRIS unavailable: {e}");
            }
        });
    });

    MprisHandle {
        state,
        notify: notify_tx,
        art_dir,
    }
}

async fn serve(
    session: SharedSession,
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify_rx: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server.at(OBJECT_PATH, RootIface { tx }).await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { session, state })
        .await?;
    debug!("MPRIS registered as {BUS_NAME}");

    let iface_ref = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    // Each notification means the surface changed; coalesce bursts.
    while notify_rx.recv().is_ok() {
        while notify_rx.try_recv().is_ok() {}
        if let Err(e) = emit_changed(&iface_ref).await {
            debug!("MPRIS change signal not sent: {e}");
        }
    }
    Ok(())
}

async fn emit_changed(iface_ref: &InterfaceRef<PlayerIface>) -> zbus::Result<()> {
    let emitter = iface_ref.signal_emitter();
    let iface = iface_ref.get().await;
    iface.playback_status_changed(emitter).await?;
    iface.metadata_changed(emitter).await?;
    iface.can_play_changed(emitter).await?;
    iface.can_pause_changed(emitter).await?;
    iface.can_go_next_changed(emitter).await?;
    iface.can_go_previous_changed(emitter).await
}

#[cfg(test)]
mod tests;
