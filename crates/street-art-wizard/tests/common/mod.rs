/*
[INPUT]:  In-memory gateway, temp directories
[OUTPUT]: Session builders, image fixtures, and event pumping helpers
[POS]:    Test infrastructure - shared across wizard integration tests
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for street-art-wizard tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use street_art_adapter::InMemoryGateway;
use street_art_wizard::{Field, SessionOptions, Step, WizardSession};

pub const TABLE: &str = "street_art_submission";
pub const ARTIST_NAME: &str = "Invader";
pub const ARTIST_EMAIL: &str = "space@invader.fr";

/// Session wired to `gateway` for both persistence and blobs
pub fn session_with(gateway: &Arc<InMemoryGateway>) -> WizardSession {
    WizardSession::new(gateway.clone(), gateway.clone(), SessionOptions::default())
}

/// Write a small PNG and return its path
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::new(width, height)
        .save(&path)
        .expect("write png fixture");
    path
}

/// Row shaped like an earlier submission by the same artist
pub fn existing_artist_row() -> serde_json::Value {
    serde_json::json!({
        "id": "previous",
        "artistName": ARTIST_NAME,
        "artistEmail": ARTIST_EMAIL,
        "artworkTitle": "PA_0001",
    })
}

/// Apply session events until `done` holds, failing after a minute of
/// (virtual) time
pub async fn pump_until(
    session: &mut WizardSession,
    what: &str,
    done: impl Fn(&WizardSession) -> bool,
) {
    let wait = async {
        while !done(session) {
            assert!(session.pump().await, "session event channel closed");
        }
    };
    if tokio::time::timeout(Duration::from_secs(60), wait).await.is_err() {
        panic!("timed out waiting for {what}");
    }
}

pub fn fill_identity(session: &mut WizardSession) {
    session.set_text(Field::ArtistName, ARTIST_NAME).expect("name");
    session.set_text(Field::ArtistEmail, ARTIST_EMAIL).expect("email");
}

pub async fn fill_profile(session: &mut WizardSession, dir: &Path) {
    let photo = write_png(dir, "me.png", 4, 3);
    session.attach_path(Field::ArtistImage, &photo).await.expect("attach photo");
    session
        .set_text(Field::ArtistPortfolioLink, "https://invader.example")
        .expect("portfolio");
    session.set_text(Field::ArtistSocialLink, "@invader").expect("social");
}

pub async fn fill_artwork(session: &mut WizardSession, dir: &Path) {
    let artwork = write_png(dir, "wall.png", 8, 6);
    session.attach_path(Field::ArtworkImage, &artwork).await.expect("attach artwork");
    session.set_text(Field::ArtworkTitle, "PA_1366").expect("title");
    session.set_text(Field::ArtworkDetails, "Ceramic tiles, Paris 11e").expect("details");
}

pub fn fill_listing(session: &mut WizardSession) {
    session.set_text(Field::ArtworkCategory, "Mosaic").expect("category");
    session.set_text(Field::ArtworkPrice, "1200").expect("price");
    session.set_text(Field::ArtworkSize, "30x30cm").expect("size");
}

/// Press Next and wait until the wizard shows `expected`
pub async fn advance_to(session: &mut WizardSession, expected: Step) {
    session.next().expect("next accepted");
    pump_until(session, "step transition", |s| {
        s.controller().pending_transition().is_none() && s.controller().step() == expected
    })
    .await;
}

/// Walk a new artist through steps 1-3, leaving the wizard on step 4
pub async fn reach_listing_as_new_artist(session: &mut WizardSession, dir: &Path) {
    session.accept_terms();
    fill_identity(session);
    advance_to(session, Step::ArtistProfile).await;
    fill_profile(session, dir).await;
    advance_to(session, Step::Artwork).await;
    fill_artwork(session, dir).await;
    advance_to(session, Step::Listing).await;
}
