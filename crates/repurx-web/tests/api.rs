//! End-to-end HTTP tests through the full router.

use std::path::{Path, PathBuf};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use repurx_test_utils::pretty_assertions::assert_eq;
use repurx_test_utils::seed_store;
use repurx_web::config::{Config, DataConfig};
use repurx_web::router::build_router;
use repurx_web::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

fn seed_app() -> Router {
    build_router(AppState::from_store(seed_store(), Config::default()).unwrap())
}

fn seed_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri).await
}

#[tokio::test]
async fn health_reports_counts_and_generation() {
    let (status, body) = get(&seed_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy"], true);
    assert_eq!(body["generation"], 1);
    assert_eq!(body["drugs_count"], 10);
    assert_eq!(body["diseases_count"], 7);
    assert_eq!(body["genes_count"], 13);
}

#[tokio::test]
async fn rank_by_disease_name() {
    let (status, body) = get(&seed_app(), "/rank?disease=Parkinson%27s%20disease&k=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["disease_id"], "DI001");
    assert_eq!(body["disease"], "parkinson's disease");
    assert_eq!(body["k"], 5);
    assert_eq!(body["count"], 5);

    let candidates = body["candidates"].as_array().unwrap();
    let metformin = candidates.iter().find(|c| c["drug_id"] == "D001").unwrap();
    assert!((metformin["graph_score"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(candidates[0]["normalized_score"], 1.0);
    let scores: Vec<f64> = candidates.iter().map(|c| c["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn rank_uses_default_k_and_weight_overrides() {
    let app = seed_app();
    let (status, body) = get(&app, "/rank?disease=DI001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["k"], 10);
    assert_eq!(body["count"], 10);

    let (_, body) = get(&app, "/rank?disease=DI001&k=5&w_graph=1&w_text=0").await;
    let ids: Vec<&str> = body["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["drug_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["D003", "D004", "D005", "D007", "D001"]);
    assert_eq!(body["weights"]["graph"], 1.0);
}

#[tokio::test]
async fn rank_rejects_bad_arguments() {
    let app = seed_app();
    for uri in [
        "/rank?disease=DI001&k=0",
        "/rank?disease=DI001&k=51",
        "/rank?disease=DI001&w_graph=-1",
        "/rank",
        "/rank?disease=%20",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }

    let (status, body) = get(&app, "/rank?disease=xyzzy").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown disease: xyzzy");
}

#[tokio::test]
async fn explain_metformin_for_parkinsons() {
    let app = seed_app();
    let (status, body) = get(&app, "/explain?disease=DI001&drug_id=D001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drug_name"], "metformin");
    let paths = body["graph_paths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0]["path"], serde_json::json!(["drug:D001", "gene:AMPK", "dis:DI001"]));
    assert_eq!(paths[0]["length"], 2);
    assert_eq!(
        body["text_overlaps"]["overlapping_tokens"],
        serde_json::json!(["diabetes", "insulin", "resistance"])
    );
    assert_eq!(body["known_evidence"]["has_known_evidence"], false);

    // drug names resolve too
    let (status, by_name) = get(&app, "/explain?disease=parkinson%27s%20disease&drug_id=Metformin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_name, body);
}

#[tokio::test]
async fn explain_unknown_entities() {
    let app = seed_app();
    let (status, body) = get(&app, "/explain?disease=DI001&drug_id=D999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown entity: drug:D999");

    let (status, _) = get(&app, "/explain?disease=DI001").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn entity_lookup() {
    let app = seed_app();
    let (_, drugs) = get(&app, "/drugs").await;
    assert_eq!(drugs["count"], 10);

    let (status, metformin) = get(&app, "/drugs/D001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metformin["name"], "metformin");
    let targets: Vec<&str> = metformin["targets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["gene_symbol"].as_str().unwrap())
        .collect();
    assert_eq!(targets, vec!["AMPK", "SLC22A1"]);
    assert!(metformin["graph_neighbors"]
        .as_array()
        .unwrap()
        .contains(&Value::from("gene:AMPK")));

    let (status, _) = get(&app, "/drugs/D999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, diseases) = get(&app, "/diseases").await;
    assert_eq!(diseases["count"], 7);

    let (status, parkinsons) = get(&app, "/diseases/DI001").await;
    assert_eq!(status, StatusCode::OK);
    assert!(parkinsons["known_drugs"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["drug_id"] == "D003"));
}

#[tokio::test]
async fn search_diseases_by_synonym() {
    let app = seed_app();
    let (status, body) = get(&app, "/search/diseases?q=paralysis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["disease_id"], "DI001");

    let (status, _) = get(&app, "/search/diseases").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_describe_the_graph() {
    let (status, body) = get(&seed_app(), "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 1);
    assert_eq!(body["graph"]["drug_nodes"], 10);
    assert_eq!(body["graph"]["disease_nodes"], 7);
    assert_eq!(body["graph"]["gene_nodes"], 13);
    assert_eq!(body["embedding_cache"]["entries"], 17);
}

#[tokio::test]
async fn reload_swaps_snapshot_and_survives_bad_data() {
    let dir = tempfile::tempdir().unwrap();
    for entry in std::fs::read_dir(seed_data_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "csv") {
            std::fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
        }
    }
    let config = Config { data: DataConfig { dir: dir.path().to_path_buf() }, ..Default::default() };
    let app = build_router(AppState::load(config).unwrap());

    let (status, body) = send(&app, "POST", "/admin/reload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 2);
    assert_eq!(body["drugs_count"], 10);

    std::fs::remove_file(dir.path().join("seed_drugs.csv")).unwrap();
    let (status, body) = send(&app, "POST", "/admin/reload").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (_, health) = get(&app, "/health").await;
    assert_eq!(health["generation"], 2);
    let (status, _) = get(&app, "/rank?disease=DI001&k=3").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn index_lists_endpoints() {
    let (status, body) = get(&seed_app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "repurx");
    assert!(body["endpoints"].as_array().unwrap().len() >= 10);
}
