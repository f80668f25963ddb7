use std::io::Write;
use std::sync::Arc;

use axum_test::TestServer;
use ndarray::Array2;
use serde_json::json;

use gamerec_api::api::{create_router, AppState};
use gamerec_api::data::{ContentRecord, ContentStore, InteractionRecord};
use gamerec_api::error::{AppError, AppResult};
use gamerec_api::model::ScoringModel;

/// Model stub returning a fixed score per content index.
struct FixedScores(Vec<f32>);

impl ScoringModel for FixedScores {
    fn score(&self, input: &Array2<f32>) -> AppResult<Array2<f32>> {
        assert_eq!(input.shape(), [1, self.0.len()]);
        Array2::from_shape_vec((1, self.0.len()), self.0.clone())
            .map_err(|e| AppError::Inference(e.to_string()))
    }
}

/// Store with content ids 1, 2, 3 (indices 0, 1, 2) named A, B, C.
fn test_store() -> ContentStore {
    let interactions: Vec<InteractionRecord> = [1, 2, 3]
        .into_iter()
        .map(|content_id| InteractionRecord {
            user_id: 7,
            content_id,
            view: 1.0,
        })
        .collect();
    let content = vec![
        ContentRecord {
            content_id: 1,
            game: "A".to_string(),
        },
        ContentRecord {
            content_id: 2,
            game: "B".to_string(),
        },
        ContentRecord {
            content_id: 3,
            game: "C".to_string(),
        },
    ];
    ContentStore::from_records(&interactions, &content).unwrap()
}

fn create_test_server(scores: Vec<f32>) -> TestServer {
    let state = AppState::new(Arc::new(test_store()), Arc::new(FixedScores(scores)), 10);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(vec![0.0, 0.0, 0.0]);

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dimension"], 3);
}

#[tokio::test]
async fn test_predict_masks_and_ranks() {
    // Index 1 (content id 2) was viewed: it must never come back, even
    // though its raw score is zero anyway. The rest come back sorted.
    let server = create_test_server(vec![0.9, 0.0, 0.5]);

    let response = server.post("/predict").json(&json!([1])).await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0]["content_id"], 1);
    assert_eq!(predictions[0]["game"], "A");
    assert_eq!(predictions[1]["content_id"], 3);
    assert_eq!(predictions[1]["game"], "C");
}

#[tokio::test]
async fn test_predict_never_returns_viewed_content() {
    let server = create_test_server(vec![0.9, 0.8, 0.7]);

    let response = server.post("/predict").json(&json!([0, 2])).await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0]["content_id"], 2);
}

#[tokio::test]
async fn test_predict_empty_list_is_unmasked() {
    let server = create_test_server(vec![0.1, 0.9, 0.5]);

    let response = server.post("/predict").json(&json!([])).await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0]["content_id"], 2);
    assert_eq!(predictions[1]["content_id"], 3);
    assert_eq!(predictions[2]["content_id"], 1);
}

#[tokio::test]
async fn test_predict_rejects_out_of_range_index() {
    let server = create_test_server(vec![0.9, 0.8, 0.7]);

    let response = server.post("/predict").json(&json!([3])).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn test_predict_rejects_negative_index() {
    let server = create_test_server(vec![0.9, 0.8, 0.7]);

    let response = server.post("/predict").json(&json!([-1])).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_rejects_non_array_payload() {
    let server = create_test_server(vec![0.9, 0.8, 0.7]);

    let response = server.post("/predict").json(&json!({"viewed": [1]})).await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_predict_is_idempotent() {
    let server = create_test_server(vec![0.2, 0.9, 0.4]);

    let first = server.post("/predict").json(&json!([2])).await;
    let second = server.post("/predict").json(&json!([2])).await;
    first.assert_status_ok();
    second.assert_status_ok();

    let first: serde_json::Value = first.json();
    let second: serde_json::Value = second.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_request_id_echoed_on_response() {
    let server = create_test_server(vec![0.0, 0.0, 0.0]);

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_store_loads_from_csv_files() {
    let dir = tempfile::tempdir().unwrap();

    let interactions_path = dir.path().join("interactions.csv");
    let mut file = std::fs::File::create(&interactions_path).unwrap();
    // Denormalized game column, as in the raw dataset; the loader ignores it.
    writeln!(file, "user_id,content_id,game,view").unwrap();
    writeln!(file, "7,30,C,1.0").unwrap();
    writeln!(file, "7,10,A,1.0").unwrap();
    writeln!(file, "8,20,B,1.0").unwrap();

    let content_path = dir.path().join("articles.csv");
    let mut file = std::fs::File::create(&content_path).unwrap();
    writeln!(file, "content_id,game").unwrap();
    writeln!(file, "10,A").unwrap();
    writeln!(file, "20,B").unwrap();
    writeln!(file, "30,C").unwrap();

    let store = ContentStore::load_from_files(&interactions_path, &content_path).unwrap();
    assert_eq!(store.dimension(), 3);
    assert_eq!(store.user_count(), 2);
    assert_eq!(store.content_id(0), 10);
    assert_eq!(store.index_of(30), Some(2));
    assert_eq!(store.game_name(20), Some("B"));

    // Pivot zero-fills cells the raw records never mention.
    assert_eq!(store.interactions()[[1, 0]], 0.0);
    assert_eq!(store.interactions()[[1, 1]], 1.0);
}

#[tokio::test]
async fn test_store_load_fails_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let content_path = dir.path().join("articles.csv");
    let mut file = std::fs::File::create(&content_path).unwrap();
    writeln!(file, "content_id,game").unwrap();

    let result = ContentStore::load_from_files(dir.path().join("missing.csv"), &content_path);
    assert!(matches!(result, Err(AppError::Dataset(_))));
}
