use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use grammar_quiz_backend::{
    error::{Error, Result},
    models::{
        analysis::GrammarAnalysis,
        question::{Difficulty, Question, Quiz},
        topic::PRACTICE_TOPICS,
    },
    routes,
    services::{ai_service::QuizContentProvider, result_store::ResultStore},
    AppState,
};
use mockall::mock;
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;
use tower::ServiceExt;

mock! {
    pub Provider {}

    #[async_trait]
    impl QuizContentProvider for Provider {
        async fn generate_quiz(&self, topic: &str, difficulty: Difficulty, count: usize) -> Result<Quiz>;
        async fn generate_tutorial(&self, topic: &str, difficulty: Difficulty) -> Result<String>;
        async fn analyze_text(&self, text: &str) -> Result<GrammarAnalysis>;
    }
}

fn build_quiz(topic: &str, difficulty: Difficulty, answers: &[&str]) -> Quiz {
    let questions = answers
        .iter()
        .enumerate()
        .map(|(idx, correct)| {
            let options: BTreeMap<String, String> = ["A", "B", "C", "D"]
                .iter()
                .map(|l| (l.to_string(), format!("q{} option {}", idx + 1, l)))
                .collect();
            Question::new(
                format!("Question {}", idx + 1),
                options,
                *correct,
                format!("{} is correct", correct),
            )
        })
        .collect();
    Quiz::new(topic, difficulty, questions)
}

fn setup_app(provider: MockProvider) -> (Router, ResultStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = ResultStore::new(dir.path().join("quiz_results.csv"));
    let state = AppState::from_parts(Arc::new(provider), store.clone());
    (routes::app(state, 1000), store, dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn five_question_provider() -> MockProvider {
    let mut provider = MockProvider::new();
    provider
        .expect_generate_quiz()
        .withf(|topic, difficulty, count| {
            topic.starts_with("Noun: Definition") && *difficulty == Difficulty::Easy && *count == 5
        })
        .returning(|topic, difficulty, _| Ok(build_quiz(topic, difficulty, &["A", "B", "C", "D", "A"])));
    provider
}

#[tokio::test]
async fn quiz_flow_end_to_end() {
    let (app, store, _dir) = setup_app(five_question_provider());

    let (status, body) = send(&app, "GET", "/api/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_data"], false);
    assert_eq!(body["report"]["overall"]["mean_percentage"], JsonValue::Null);

    let (status, quiz) = send(
        &app,
        "POST",
        "/api/quizzes",
        Some(json!({ "topic": "Noun: Definition & types", "difficulty": "Easy" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 5);
    assert!(quiz["questions"][0].get("correct_label").is_none());
    let id = quiz["session_id"].as_str().unwrap().to_string();

    for (idx, label) in [(0, "A"), (1, "B"), (2, "X"), (4, "A")] {
        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/api/quizzes/{}/answers", id),
            Some(json!({ "question_index": idx, "label": label })),
        )
        .await;
        if label == "X" {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        } else {
            assert_eq!(status, StatusCode::OK);
        }
    }

    // labels outside the options are refused, so answer question 3 wrongly
    // through the submit body instead
    let (status, result) = send(
        &app,
        "POST",
        &format!("/api/quizzes/{}/submit", id),
        Some(json!({ "answers": { "2": "D" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["score"]["correct_count"], 3);
    assert_eq!(result["score"]["total"], 5);
    assert_eq!(result["score"]["percentage"], 60.0);
    assert_eq!(result["score"]["per_question"][2]["is_correct"], false);
    assert_eq!(result["score"]["per_question"][3]["is_correct"], false);
    assert_eq!(result["score"]["per_question"][3]["chosen_label"], JsonValue::Null);
    assert_eq!(result["review"][3]["correct_text"], "q4 option D");

    let records = store.load_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].topic, "Noun: Definition & types");
    assert_eq!(records[0].difficulty, "Easy");
    assert_eq!(records[0].percentage, 60.0);

    let (status, _) = send(&app, "POST", &format!("/api/quizzes/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, progress) = send(&app, "GET", "/api/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["has_data"], true);
    assert_eq!(progress["report"]["overall"]["count"], 1);
    assert_eq!(progress["report"]["by_topic"]["Noun: Definition & types"], 60.0);
    assert_eq!(progress["report"]["by_difficulty"]["Easy"], 1);
    assert_eq!(progress["report"]["weekly"].as_array().unwrap().len(), 1);

    let (status, attempts) = send(&app, "GET", "/api/progress/attempts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attempts["total"], 1);
}

#[tokio::test]
async fn empty_submit_scores_everything_wrong() {
    let (app, store, _dir) = setup_app(five_question_provider());

    let (_, quiz) = send(
        &app,
        "POST",
        "/api/quizzes",
        Some(json!({ "topic": "Noun: Definition & types", "difficulty": "Easy", "num_questions": 5 })),
    )
    .await;
    let id = quiz["session_id"].as_str().unwrap();

    let (status, view) = send(&app, "GET", &format!("/api/quizzes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["answers"], json!({}));

    let (status, result) = send(&app, "POST", &format!("/api/quizzes/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["score"]["correct_count"], 0);
    assert_eq!(result["score"]["total"], 5);
    assert_eq!(result["score"]["percentage"], 0.0);
    assert_eq!(store.load_all().unwrap()[0].percentage, 0.0);
}

#[tokio::test]
async fn question_count_is_validated() {
    let (app, _store, _dir) = setup_app(MockProvider::new());
    let (status, _) = send(
        &app,
        "POST",
        "/api/quizzes",
        Some(json!({ "topic": "Modal Auxiliaries", "difficulty": "Hard", "num_questions": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/quizzes",
        Some(json!({ "topic": "Modal Auxiliaries", "difficulty": "Expert" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn upstream_failure_is_a_retryable_gateway_error() {
    let mut provider = MockProvider::new();
    provider
        .expect_generate_quiz()
        .returning(|_, _, _| Err(Error::ContentGeneration("malformed upstream response".into())));
    let (app, _store, _dir) = setup_app(provider);

    let (status, body) = send(
        &app,
        "POST",
        "/api/quizzes",
        Some(json!({ "topic": "Past Perfect Tense", "difficulty": "Medium" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("try again"));
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn empty_quiz_from_provider_is_rejected() {
    let mut provider = MockProvider::new();
    provider
        .expect_generate_quiz()
        .returning(|topic, difficulty, _| Ok(Quiz::new(topic, difficulty, vec![])));
    let (app, _store, _dir) = setup_app(provider);

    let (status, body) = send(
        &app,
        "POST",
        "/api/quizzes",
        Some(json!({ "topic": "Past Perfect Tense", "difficulty": "Medium" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("new quiz"));
}

#[tokio::test]
async fn tutorial_and_catalog() {
    let mut provider = MockProvider::new();
    provider
        .expect_generate_tutorial()
        .withf(|topic, difficulty| topic.starts_with("Modal") && *difficulty == Difficulty::Hard)
        .times(1)
        .returning(|topic, _| Ok(format!("## {}\nCan, could, may, might.", topic)));
    let (app, _store, _dir) = setup_app(provider);

    let (status, body) = send(
        &app,
        "POST",
        "/api/tutorials",
        Some(json!({ "topic": "Modal Auxiliaries", "difficulty": "Hard" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"].as_str().unwrap().starts_with("## Modal Auxiliaries"));

    let (status, catalog) = send(&app, "GET", "/api/topics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog["categories"].as_array().unwrap().len(), 4);
    assert_eq!(catalog["difficulties"][0]["level"], "Easy");

    let (status, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (app, _store, _dir) = setup_app(MockProvider::new());
    let (status, _) = send(
        &app,
        "GET",
        "/api/quizzes/7b0a8f4e-1d52-4c1e-9a53-8d1f4f1d2c3b",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_append_keeps_session_open_for_retry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quiz_results.csv");
    // a directory where the log should be makes every append fail
    std::fs::create_dir(&path).unwrap();
    let store = ResultStore::new(path.clone());
    let state = AppState::from_parts(Arc::new(five_question_provider()), store.clone());
    let app = routes::app(state, 1000);

    let (_, quiz) = send(
        &app,
        "POST",
        "/api/quizzes",
        Some(json!({ "topic": "Noun: Definition & types", "difficulty": "Easy" })),
    )
    .await;
    let id = quiz["session_id"].as_str().unwrap().to_string();
    let (status, saved) = send(
        &app,
        "PATCH",
        &format!("/api/quizzes/{}/answers", id),
        Some(json!({ "question_index": 0, "label": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["answered"], 1);
    assert_eq!(saved["total"], 5);

    let (status, body) = send(&app, "POST", &format!("/api/quizzes/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["retryable"], true);

    let (status, view) = send(&app, "GET", &format!("/api/quizzes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["answers"], json!({ "0": "A" }));

    std::fs::remove_dir(&path).unwrap();

    let (status, result) = send(&app, "POST", &format!("/api/quizzes/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["score"]["correct_count"], 1);
    assert_eq!(result["score"]["percentage"], 20.0);
    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[tokio::test]
async fn grammar_analysis_returns_parsed_feedback() {
    let mut provider = MockProvider::new();
    provider
        .expect_analyze_text()
        .withf(|text| text.starts_with("He go to school"))
        .times(1)
        .returning(|_| {
            Ok(GrammarAnalysis::parse(
                "Grammar Analysis :\nSubject-verb agreement error.\n\n\
                 Sentence Formation :\nSimple and clear.\n\n\
                 Score : 6/10\n\n\
                 Suggestions :\n1. &emsp; Use \"goes\" after he.",
            ))
        });
    let (app, _store, _dir) = setup_app(provider);

    let (status, body) = send(
        &app,
        "POST",
        "/api/grammar-analysis",
        Some(json!({ "text": "He go to school every day." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 6.0);
    assert_eq!(body["sentence_formation"], "Simple and clear.");
    assert_eq!(body["suggestions"][0], "Use \"goes\" after he.");

    let (status, _) = send(&app, "POST", "/api/grammar-analysis", Some(json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "POST", "/api/grammar-analysis", Some(json!({ "text": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn random_practice_topic_comes_from_the_list() {
    let (app, _store, _dir) = setup_app(MockProvider::new());
    let (status, body) = send(&app, "GET", "/api/practice-topics/random", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(PRACTICE_TOPICS.contains(&body["topic"].as_str().unwrap()));
}
