//! Integration tests for repertorio-api endpoints
//!
//! Each test gets its own temporary directory holding the JSON document and the
//! landing page, and drives the router with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use repertorio_api::{build_router, AppState};
use repertorio_common::JsonFileStore;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: temp dir with the data file path and an app bound to it
struct TestApp {
    dir: TempDir,
    app: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("repertorio.json")));
        let state = AppState::new(store, dir.path().join("index.html"));
        let app = build_router(state);
        Self { dir, app }
    }

    /// Start with `songs` already on disk
    fn with_songs(songs: Value) -> Self {
        let test_app = Self::new();
        std::fs::write(test_app.data_file(), serde_json::to_string_pretty(&songs).unwrap())
            .unwrap();
        test_app
    }

    fn data_file(&self) -> PathBuf {
        self.dir.path().join("repertorio.json")
    }

    fn stored(&self) -> Value {
        serde_json::from_str(&std::fs::read_to_string(self.data_file()).unwrap()).unwrap()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn send_empty(&self, method: &str, uri: &str) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make every following save fail: a directory sits where the staging
    /// file would be written
    fn block_saves(&self) {
        std::fs::create_dir(self.dir.path().join("repertorio.json.tmp")).unwrap();
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("Should parse JSON")
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_without_data_file_is_empty_array() {
    let app = TestApp::new();

    let (status, body) = app.get("/canciones").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!([]));
}

#[tokio::test]
async fn test_list_with_corrupt_data_file_is_empty_array() {
    let app = TestApp::new();
    std::fs::write(app.data_file(), "no es json").unwrap();

    let (status, body) = app.get("/canciones").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!([]));
}

#[tokio::test]
async fn test_list_returns_file_order() {
    let songs = json!([
        {"id": 2, "titulo": "Volver a los 17", "artista": "Violeta Parra"},
        {"id": 1, "titulo": "Alfonsina y el mar", "artista": "Mercedes Sosa"}
    ]);
    let app = TestApp::with_songs(songs.clone());

    let (status, body) = app.get("/canciones").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), songs);
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = TestApp::new();
    let song = json!({"id": 4, "titulo": "La Llorona", "artista": "Chavela Vargas", "tono": "Am"});

    let (status, body) = app.send_json("POST", "/canciones", song.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), song);

    let (status, body) = app.get("/canciones/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), song);
}

#[tokio::test]
async fn test_get_unknown_id_is_404_json() {
    let app = TestApp::with_songs(json!([{"id": 1}]));

    let (status, body) = app.get("/canciones/2").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"mensaje": "Canción no encontrada"}));
}

#[tokio::test]
async fn test_get_non_numeric_id_is_404() {
    let app = TestApp::with_songs(json!([{"id": null}, {"titulo": "sin id"}, {"id": 1}]));

    let (status, _) = app.get("/canciones/abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_returns_first_duplicate() {
    let app = TestApp::with_songs(json!([
        {"id": 7, "titulo": "primera"},
        {"id": 7, "titulo": "segunda"}
    ]));

    let (_, body) = app.get("/canciones/7").await;

    assert_eq!(parse(&body)["titulo"], "primera");
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_coerces_string_id() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json("POST", "/canciones", json!({"id": "12", "titulo": "Gracias a la vida"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["id"], 12);
    assert_eq!(app.stored(), json!([{"id": 12, "titulo": "Gracias a la vida"}]));
}

#[tokio::test]
async fn test_create_with_non_numeric_id_stores_null() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json("POST", "/canciones", json!({"id": "doce", "titulo": "X"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["id"], Value::Null);
    assert_eq!(app.stored()[0]["id"], Value::Null);
}

#[tokio::test]
async fn test_create_appends_to_existing_collection() {
    let app = TestApp::with_songs(json!([{"id": 1, "titulo": "A"}]));

    app.send_json("POST", "/canciones", json!({"id": 2, "titulo": "B"}))
        .await;

    assert_eq!(
        app.stored(),
        json!([{"id": 1, "titulo": "A"}, {"id": 2, "titulo": "B"}])
    );
}

#[tokio::test]
async fn test_create_with_non_object_body_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app.send_json("POST", "/canciones", json!([1, 2])).await;

    assert!(status.is_client_error());
    assert!(!app.data_file().exists());
}

#[tokio::test]
async fn test_create_without_body_stores_null_id() {
    let app = TestApp::with_songs(json!([{"id": 1}]));

    let (status, body) = app.send_empty("POST", "/canciones").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"id": null}));
    assert_eq!(app.stored(), json!([{"id": 1}, {"id": null}]));
}

#[tokio::test]
async fn test_create_with_plain_text_body_ignores_it() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/canciones")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("id=3"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"id": null}));
}

#[tokio::test]
async fn test_create_with_malformed_json_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/canciones")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"id\": "))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!app.data_file().exists());
}

#[tokio::test]
async fn test_create_save_failure_is_500() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("falta").join("repertorio.json")));
    let app = build_router(AppState::new(store, dir.path().join("index.html")));

    let request = Request::builder()
        .method("POST")
        .uri("/canciones")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"id": 1}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_preserves_unmentioned_fields() {
    let app = TestApp::with_songs(json!([{"id": 1, "titulo": "A", "artista": "B"}]));

    let (status, body) = app
        .send_json("PUT", "/canciones/1", json!({"titulo": "C"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Canción modificada con éxito");
    assert_eq!(app.stored(), json!([{"id": 1, "titulo": "C", "artista": "B"}]));
}

#[tokio::test]
async fn test_update_path_id_wins() {
    let app = TestApp::with_songs(json!([{"id": 5, "titulo": "W"}]));

    let (status, _) = app
        .send_json("PUT", "/canciones/5", json!({"id": 999, "titulo": "X"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stored(), json!([{"id": 5, "titulo": "X"}]));
}

#[tokio::test]
async fn test_update_unknown_id_is_404_text() {
    let app = TestApp::with_songs(json!([{"id": 1}]));

    let (status, body) = app
        .send_json("PUT", "/canciones/abc", json!({"titulo": "X"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Canción no encontrada");
    assert_eq!(app.stored(), json!([{"id": 1}]));
}

#[tokio::test]
async fn test_update_without_body_keeps_record() {
    let app = TestApp::with_songs(json!([{"id": 1, "titulo": "A"}]));

    let (status, body) = app.send_empty("PUT", "/canciones/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Canción modificada con éxito");
    assert_eq!(app.stored(), json!([{"id": 1, "titulo": "A"}]));
}

#[tokio::test]
async fn test_update_without_body_on_non_numeric_id_is_404() {
    let app = TestApp::with_songs(json!([{"id": 1}]));

    let (status, body) = app.send_empty("PUT", "/canciones/abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Canción no encontrada");
}

#[tokio::test]
async fn test_update_save_failure_is_500_and_file_unchanged() {
    let app = TestApp::with_songs(json!([{"id": 1, "titulo": "A"}]));
    app.block_saves();

    let (status, body) = app
        .send_json("PUT", "/canciones/1", json!({"titulo": "B"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error al guardar el repertorio");
    assert_eq!(app.stored(), json!([{"id": 1, "titulo": "A"}]));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_save_failure_is_500_and_file_unchanged() {
    let app = TestApp::with_songs(json!([{"id": 1}, {"id": 2}]));
    app.block_saves();

    let (status, body) = app.delete("/canciones/1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error al guardar el repertorio");
    assert_eq!(app.stored(), json!([{"id": 1}, {"id": 2}]));
}

#[tokio::test]
async fn test_delete_twice_second_is_404() {
    let app = TestApp::with_songs(json!([{"id": 3, "titulo": "Duerme negrito"}]));

    let (status, body) = app.delete("/canciones/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Canción eliminada con éxito");

    let (status, body) = app.delete("/canciones/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Canción no encontrada");
}

#[tokio::test]
async fn test_delete_removes_first_duplicate_only() {
    let app = TestApp::with_songs(json!([
        {"id": 7, "titulo": "primera"},
        {"id": 8},
        {"id": 7, "titulo": "segunda"}
    ]));

    app.delete("/canciones/7").await;

    assert_eq!(
        app.stored(),
        json!([{"id": 8}, {"id": 7, "titulo": "segunda"}])
    );
}

// =============================================================================
// Landing page, health, CORS
// =============================================================================

#[tokio::test]
async fn test_index_page_served_from_disk() {
    let app = TestApp::new();
    std::fs::write(app.dir.path().join("index.html"), "<h1>Mi repertorio</h1>").unwrap();

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Mi repertorio</h1>");
}

#[tokio::test]
async fn test_index_page_bytes_served_unchanged() {
    let app = TestApp::new();
    let page: &[u8] = b"<p>Canci\xf3n</p>";
    std::fs::write(app.dir.path().join("index.html"), page).unwrap();

    let response = app
        .app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], page);
}

#[tokio::test]
async fn test_missing_index_page_is_404() {
    let app = TestApp::new();

    let (status, _) = app.get("/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "repertorio-api");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let app = TestApp::new();

    let (status, body) = app.get("/build_info").await;

    assert_eq!(status, StatusCode::OK);
    assert!(parse(&body)["git_hash"].is_string());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/canciones")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
