use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use retrieval_core::persist::{load_corpus, save_corpus, KnowledgePaths};
use retrieval_core::seed::ocean_facts;
use retrieval_core::{KnowledgeBase, RetrievalConfig};
use retrieval_server::{build_app_with_state, AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn ocean_state() -> AppState {
    let kb = KnowledgeBase::with_documents(RetrievalConfig::default(), ocean_facts()).unwrap();
    AppState::new(Arc::new(kb), None, None)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn retrieve(body: &str) -> Request<Body> {
    Request::post("/retrieve")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn retrieve_returns_ranked_contexts() {
    let app = build_app_with_state(ocean_state());
    let (status, json) = call(app, retrieve(r#"{"query": "deepest point in the ocean", "top_k": 2}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let contexts = json["contexts"].as_array().unwrap();
    let scores = json["scores"].as_array().unwrap();
    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[0]["topic"], "Ocean Depth Zones");
    assert!(contexts[0]["content"].as_str().unwrap().contains("Challenger Deep"));
    assert!(scores[0].as_f64().unwrap() >= scores[1].as_f64().unwrap());
}

#[tokio::test]
async fn retrieve_without_matches_returns_empty_lists() {
    let app = build_app_with_state(ocean_state());
    let (status, json) = call(app, retrieve(r#"{"query": "quantum chromodynamics"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["contexts"], serde_json::json!([]));
    assert_eq!(json["scores"], serde_json::json!([]));
}

#[tokio::test]
async fn empty_query_is_rejected_with_kind() {
    let app = build_app_with_state(ocean_state());
    let (status, json) = call(app, retrieve(r#"{"query": ""}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "invalid_input");
}

#[tokio::test]
async fn malformed_retrieve_bodies_are_invalid_input() {
    for body in [r#"{"top_k": 2}"#, r#"{"query": "ocean", "top_k": 1.5}"#, "not json"] {
        let (status, json) = call(build_app_with_state(ocean_state()), retrieve(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(json["kind"], "invalid_input", "{body}");
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()), "{body}");
    }
}

#[tokio::test]
async fn add_without_content_is_invalid_input() {
    let state = ocean_state();
    let (status, json) = call(
        build_app_with_state(state.clone()),
        Request::post("/add_knowledge?topic=Reef").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "invalid_input");
    assert!(json["message"].as_str().unwrap().contains("content"));
    assert_eq!(state.kb.len(), 10);
}

#[tokio::test]
async fn retrieve_before_indexing_is_unavailable() {
    let state = AppState::new(Arc::new(KnowledgeBase::new(RetrievalConfig::default())), None, None);
    let (status, json) = call(build_app_with_state(state), retrieve(r#"{"query": "ocean"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["kind"], "not_ready");
}

#[tokio::test]
async fn add_then_list_appends_entry() {
    let state = ocean_state();
    let (status, json) = call(
        build_app_with_state(state.clone()),
        Request::post("/add_knowledge?topic=Test&content=Test").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_documents"], 11);
    assert_eq!(json["message"], "Knowledge added");

    let (status, json) = call(build_app_with_state(state), Request::get("/knowledge").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["documents"], 11);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries[10]["topic"], "Test");
    assert_eq!(entries[10]["content"], "Test");
}

#[tokio::test]
async fn admin_token_guards_additions() {
    let mut state = ocean_state();
    state.admin_token = Some("secret".into());
    let (status, json) = call(
        build_app_with_state(state.clone()),
        Request::post("/add_knowledge?topic=Reef&content=Coral").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["kind"], "unauthorized");
    assert_eq!(state.kb.len(), 10);

    let (status, _) = call(
        build_app_with_state(state.clone()),
        Request::post("/add_knowledge?topic=Reef&content=Coral")
            .header("X-ADMIN-TOKEN", "secret")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.kb.len(), 11);
}

#[tokio::test]
async fn additions_are_persisted_when_configured() {
    let dir = tempdir().unwrap();
    let paths = KnowledgePaths::new(dir.path());
    save_corpus(&paths, &ocean_facts()).unwrap();
    let kb = KnowledgeBase::with_documents(RetrievalConfig::default(), load_corpus(&paths).unwrap()).unwrap();
    let state = AppState::new(Arc::new(kb), Some(dir.path().to_path_buf()), None);

    let (status, _) = call(
        build_app_with_state(state),
        Request::post("/add_knowledge?topic=Kelp&content=Kelp%20forests").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let saved = load_corpus(&paths).unwrap();
    assert_eq!(saved.len(), 11);
    assert_eq!(saved[10].content, "Kelp forests");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_additions_all_reach_disk() {
    let dir = tempdir().unwrap();
    let paths = KnowledgePaths::new(dir.path());
    save_corpus(&paths, &ocean_facts()).unwrap();
    let kb = KnowledgeBase::with_documents(RetrievalConfig::default(), ocean_facts()).unwrap();
    let state = AppState::new(Arc::new(kb), Some(dir.path().to_path_buf()), None);

    let calls: Vec<_> = (0..16)
        .map(|i| {
            let app = build_app_with_state(state.clone());
            let uri = format!("/add_knowledge?topic=Current%20{i}&content=Gulf%20stream%20{i}");
            tokio::spawn(async move { call(app, Request::post(uri).body(Body::empty()).unwrap()).await })
        })
        .collect();
    for c in calls {
        let (status, _) = c.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let saved = load_corpus(&paths).unwrap();
    assert_eq!(saved.len(), 26);
    assert_eq!(saved, state.kb.documents());
}

#[tokio::test]
async fn status_reports_document_count() {
    let (status, json) = call(build_app_with_state(ocean_state()), Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
    assert_eq!(json["documents"], 10);
}
