use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::*;
use crate::library::Track;

#[test]
fn placeholder_uses_file_name_and_empty_fields() {
    let track = Track::from_path(PathBuf::from("/music/Intro.mp3"));
    let meta = Metadata::placeholder(&track);
    assert_eq!(meta.title, "Intro.mp3");
    assert_eq!(meta.artist, "");
    assert!(meta.artwork.is_none());
    assert!(meta.duration.is_none());
}

#[test]
fn unreadable_tags_degrade_to_placeholder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.mp3");
    fs::write(&path, b"ID3\x04\x00\x00\x00\x00\x00\x00garbage").unwrap();
    let track = Track::from_path(path);

    assert!(TagPublisher.read(&Track::from_path(dir.path().join("absent.mp3"))).is_err());
    assert_eq!(TagPublisher.publish(&track).title, "broken.mp3");
}

#[test]
fn missing_file_never_fails_publish() {
    let track = Track::from_path(PathBuf::from("/definitely/not/here.mp3"));
    let meta = TagPublisher.publish(&track);
    assert_eq!(meta, Metadata::placeholder(&track));
}

#[test]
fn artwork_extension_follows_mime() {
    let art = |mime: &str| Artwork {
        mime: mime.to_string(),
        data: vec![1, 2, 3],
    };
    assert_eq!(art("image/png").extension(), "png");
    assert_eq!(art("image/jpeg").extension(), "jpg");
    assert_eq!(art("application/octet-stream").extension(), "img");
}
