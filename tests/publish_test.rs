//! Publishing tests against a mock Spotify API.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use sortify::{Error, spotify::SpotifyClient, types::Credential};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// Helper function to create a small PNG cover
fn png_cover() -> Vec<u8> {
    let img = RgbImage::from_pixel(64, 48, Rgb([200, 30, 30]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn sorted_uris(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("spotify:track:{:03}", i)).collect()
}

async fn mount_source(mock_server: &MockServer, with_cover: bool) {
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user1" })))
        .expect(1)
        .mount(mock_server)
        .await;

    let images = if with_cover {
        json!([{ "url": format!("{}/covers/src.png", mock_server.uri()), "height": 640, "width": 640 }])
    } else {
        json!([])
    };
    Mock::given(method("GET"))
        .and(path("/playlists/src"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Road Trip",
            "description": "Songs for the car",
            "images": images
        })))
        .expect(1)
        .mount(mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/user1/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "new1" })))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn requests_to(mock_server: &MockServer, wanted: &str) -> Vec<Request> {
    mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == wanted)
        .collect()
}

#[tokio::test]
async fn test_publish_full_flow() {
    let mock_server = MockServer::start().await;
    let client = SpotifyClient::new(mock_server.uri());
    let credential = Credential::new("token");
    mount_source(&mock_server, true).await;

    Mock::given(method("GET"))
        .and(path("/covers/src.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_cover()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/playlists/new1/images"))
        .and(header("content-type", "image/jpeg"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/new1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let uris = sorted_uris(250);
    let new_id = client.publish(&uris, "src", &credential).await.unwrap();
    assert_eq!(new_id, "new1");

    // steps happen in order, one at a time
    let paths: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/me",
            "/playlists/src",
            "/covers/src.png",
            "/users/user1/playlists",
            "/playlists/new1/images",
            "/playlists/new1/tracks",
            "/playlists/new1/tracks",
            "/playlists/new1/tracks",
        ]
    );

    // the copy is private and carries the source metadata
    let create = requests_to(&mock_server, "/users/user1/playlists").await;
    let body: Value = create[0].body_json().unwrap();
    assert_eq!(body["name"], "Road Trip (Sorted)");
    assert_eq!(body["description"], "Songs for the car");
    assert_eq!(body["public"], false);

    // cover is a base64 JPEG resized to 640x640
    let upload = requests_to(&mock_server, "/playlists/new1/images").await;
    let jpeg = STANDARD.decode(&upload[0].body).unwrap();
    let cover = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
    assert_eq!((cover.width(), cover.height()), (640, 640));

    // 250 uris go out as 100, 100, 50 and keep their order
    let batches: Vec<Vec<String>> = requests_to(&mock_server, "/playlists/new1/tracks")
        .await
        .iter()
        .map(|r| {
            let body: Value = r.body_json().unwrap();
            serde_json::from_value(body["uris"].clone()).unwrap()
        })
        .collect();
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    assert_eq!(batches.concat(), uris);
}

#[tokio::test]
async fn test_publish_without_cover_image() {
    let mock_server = MockServer::start().await;
    let client = SpotifyClient::new(mock_server.uri());
    mount_source(&mock_server, false).await;

    Mock::given(method("PUT"))
        .and(path("/playlists/new1/images"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/new1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uris = sorted_uris(100);
    let new_id = client
        .publish(&uris, "src", &Credential::new("token"))
        .await
        .unwrap();
    assert_eq!(new_id, "new1");
}

#[tokio::test]
async fn test_failed_batch_stops_publishing() {
    let mock_server = MockServer::start().await;
    let client = SpotifyClient::new(mock_server.uri());
    mount_source(&mock_server, false).await;

    Mock::given(method("POST"))
        .and(path("/playlists/new1/tracks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "status": 400, "message": "Invalid track uri" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client
        .publish(&sorted_uris(250), "src", &Credential::new("token"))
        .await;

    match result {
        Err(Error::Remote {
            status, message, ..
        }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid track uri");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_user_lookup_is_expiry() {
    let mock_server = MockServer::start().await;
    let client = SpotifyClient::new(mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client
        .publish(&sorted_uris(3), "src", &Credential::new("stale"))
        .await;
    assert!(matches!(result, Err(Error::CredentialExpired)));
}

#[tokio::test]
async fn test_create_requires_created_status() {
    let mock_server = MockServer::start().await;
    let client = SpotifyClient::new(mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/users/user1/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "new1" })))
        .mount(&mock_server)
        .await;

    let details = sortify::types::PlaylistDetails {
        name: "Road Trip".to_string(),
        description: String::new(),
        cover_image_url: None,
    };
    let result = client
        .create_playlist("user1", &details, &Credential::new("token"))
        .await;

    assert!(matches!(result, Err(Error::Remote { status: 200, .. })));
}

#[tokio::test]
async fn test_undecodable_cover_creates_nothing() {
    let mock_server = MockServer::start().await;
    let client = SpotifyClient::new(mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user1" })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlists/src"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Road Trip",
            "description": "",
            "images": [{ "url": format!("{}/covers/src.png", mock_server.uri()) }]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/covers/src.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not an image".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/user1/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "new1" })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client
        .publish(&sorted_uris(3), "src", &Credential::new("token"))
        .await;

    assert!(matches!(result, Err(Error::Image(_))));
    assert!(requests_to(&mock_server, "/users/user1/playlists").await.is_empty());
}
