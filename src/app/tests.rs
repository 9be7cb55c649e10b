use super::*;
use crate::error::Error;
use crate::library::Track;
use std::path::PathBuf;

fn t(name: &str) -> Track {
    Track::from_path(PathBuf::from("/music").join(name))
}

fn refs(tracks: &[Track]) -> Vec<&Track> {
    tracks.iter().collect()
}

#[test]
fn cursor_defaults_to_first_row() {
    let tracks = vec![t("a.mp3"), t("b.mp3")];
    let app = App::new();
    assert_eq!(app.selected_index(&refs(&tracks)), Some(0));
    assert_eq!(app.selected_index(&[]), None);
}

#[test]
fn next_and_prev_wrap_around() {
    let tracks = vec![t("a.mp3"), t("b.mp3"), t("c.mp3")];
    let visible = refs(&tracks);
    let mut app = App::new();

    app.prev(&visible);
    assert_eq!(app.selected_track(&visible).map(|t| t.name.as_str()), Some("c.mp3"));
    app.next(&visible);
    assert_eq!(app.selected_track(&visible).map(|t| t.name.as_str()), Some("a.mp3"));
    app.next(&visible);
    assert_eq!(app.selected_index(&visible), Some(1));
}

#[test]
fn selection_follows_the_track_not_the_row() {
    let tracks = vec![t("a.mp3"), t("b.mp3"), t("c.mp3")];
    let mut app = App::new();
    app.select(&tracks[2]);

    // "c" moves to the front after, say, a rescan reorders things.
    let reordered = vec![tracks[2].clone(), tracks[0].clone()];
    assert_eq!(app.selected_index(&refs(&reordered)), Some(0));

    // Hidden by a search: cursor falls back to the first visible row.
    let filtered = vec![tracks[1].clone()];
    assert_eq!(
        app.selected_track(&refs(&filtered)).map(|t| t.name.as_str()),
        Some("b.mp3")
    );
}

#[test]
fn search_mode_keeps_query_until_cleared() {
    let mut app = App::new();
    app.enter_search();
    assert_eq!(app.mode, InputMode::Search);
    app.push_query_char('a');
    app.push_query_char('b');
    app.pop_query_char();
    app.exit_search();
    assert_eq!(app.mode, InputMode::Browse);
    assert_eq!(app.query, "a");

    app.clear_search();
    assert!(app.query.is_empty());
}

#[test]
fn grant_prompt_prefills_and_consumes_input() {
    let mut app = App::new();
    app.open_grant_prompt(Some(std::path::Path::new("/srv/music")));
    assert_eq!(app.mode, InputMode::Grant);
    assert_eq!(app.grant_input, "/srv/music");

    app.pop_grant_char();
    app.push_grant_char('X');
    assert_eq!(app.take_grant_input(), Some(PathBuf::from("/srv/musiX")));
    assert_eq!(app.mode, InputMode::Browse);
    assert!(app.grant_input.is_empty());
}

#[test]
fn blank_grant_input_keeps_prompt_open() {
    let mut app = App::new();
    app.open_grant_prompt(None);
    app.push_grant_char(' ');
    assert_eq!(app.take_grant_input(), None);
    assert_eq!(app.mode, InputMode::Grant);
}

#[test]
fn access_errors_point_at_the_grant_prompt() {
    let mut app = App::new();
    app.report(&Error::access("/gone", "no such directory"));
    assert!(app.message().unwrap().contains("press o"));

    app.report(&Error::NoActiveTrack);
    assert!(!app.message().unwrap().contains("press o"));

    app.clear_message();
    assert_eq!(app.message(), None);
}

#[test]
fn metadata_window_toggles() {
    let mut app = App::new();
    assert!(!app.metadata_window);
    app.toggle_metadata_window();
    assert!(app.metadata_window);
}
