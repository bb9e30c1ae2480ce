/*
[INPUT]:  Mock Supabase REST and Storage endpoints
[OUTPUT]: End-to-end submission through the real HTTP client
[POS]:    Integration test layer - wizard over SupabaseClient
[UPDATE]: When request shapes sent by the wizard change
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use street_art_adapter::SupabaseClient;
use street_art_wizard::{SessionOptions, WizardSession, WizardTiming};
use tokio_test::assert_ok;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

fn fast_options() -> SessionOptions {
    SessionOptions {
        timing: WizardTiming {
            transition_delay: Duration::from_millis(5),
            reset_delay: Duration::from_millis(5),
        },
        identity_debounce: Duration::from_millis(5),
        ..SessionOptions::default()
    }
}

#[tokio::test]
async fn new_artist_submission_hits_rest_and_storage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/street_art_submission"))
        .and(query_param("select", "artistName,artistEmail"))
        .and(query_param("artistName", format!("eq.{ARTIST_NAME}")))
        .and(query_param("artistEmail", format!("eq.{ARTIST_EMAIL}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/artist-photos/\d+_me\.png$"))
        .and(header("x-upsert", "false"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Key": "artist-photos/me.png" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/artwork-images/\d+_wall\.png$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Key": "artwork-images/wall.png" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/street_art_submission"))
        .and(header("prefer", "return=minimal"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(assert_ok!(SupabaseClient::new(&server.uri(), "anon")));
    let mut session = WizardSession::new(client.clone(), client, fast_options());
    let dir = tempfile::tempdir().expect("tempdir");

    reach_listing_as_new_artist(&mut session, dir.path()).await;
    fill_listing(&mut session);
    assert_ok!(session.submit());
    pump_until(&mut session, "submission", |s| s.controller().is_submitted()).await;
    assert!(session.last_error().is_none());

    let requests = server.received_requests().await.expect("request recording");
    let insert = requests
        .iter()
        .find(|request| {
            request.method.as_str() == "POST" && request.url.path() == "/rest/v1/street_art_submission"
        })
        .expect("insert request");
    let body: serde_json::Value = serde_json::from_slice(&insert.body).expect("insert body");
    let record = &body[0];
    assert_eq!(record["artistName"], serde_json::json!(ARTIST_NAME));
    let artist_image = record["artistImage"].as_str().expect("artist image url");
    assert!(artist_image.starts_with(&format!(
        "{}/storage/v1/object/public/artist-photos/",
        server.uri()
    )));
}

#[tokio::test]
async fn storage_rejection_does_not_block_insert() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/street_art_submission"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "statusCode": "404",
            "error": "Bucket not found",
            "message": "Bucket not found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/street_art_submission"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(assert_ok!(SupabaseClient::new(&server.uri(), "anon")));
    let mut session = WizardSession::new(client.clone(), client, fast_options());
    let dir = tempfile::tempdir().expect("tempdir");

    reach_listing_as_new_artist(&mut session, dir.path()).await;
    fill_listing(&mut session);
    assert_ok!(session.submit());
    pump_until(&mut session, "submission", |s| s.controller().is_submitted()).await;

    let report = session.last_report().expect("report");
    assert!(report.artist_image.is_failed());
    assert!(report.artwork_image.is_failed());
    assert_eq!(report.record.artist_image, None);
    assert_eq!(report.record.artwork_image, None);
}
