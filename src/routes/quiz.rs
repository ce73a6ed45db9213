use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::quiz_dto::{
    GenerateQuizRequest, QuizSessionResponse, ReviewedQuestion, SaveAnswerRequest,
    SaveAnswerResponse, SubmitQuizRequest, SubmitQuizResponse,
};
use crate::error::Result;
use crate::models::attempt_record::AttemptRecord;
use crate::models::question::Quiz;
use crate::models::score::ScoreResult;
use crate::models::topic::is_known_topic;
use crate::services::grading_service::GradingService;
use crate::utils::time;
use crate::AppState;

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuizRequest>,
) -> Result<Response> {
    req.validate()?;
    if !is_known_topic(&req.topic) {
        tracing::debug!(topic = %req.topic, "Generating quiz for a topic outside the catalog");
    }

    let quiz = state
        .content_provider
        .generate_quiz(&req.topic, req.difficulty, req.num_questions)
        .await?;
    quiz.validate()?;

    let session = state.session_service.create(quiz).await;
    tracing::info!(
        session_id = %session.id,
        topic = %session.quiz.topic,
        difficulty = %session.quiz.difficulty,
        questions = session.quiz.len(),
        "Quiz ready"
    );

    Ok((StatusCode::CREATED, Json(QuizSessionResponse::from(&session))).into_response())
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizSessionResponse>> {
    let session = state.session_service.get(id).await?;
    Ok(Json(QuizSessionResponse::from(&session)))
}

#[axum::debug_handler]
pub async fn save_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveAnswerRequest>,
) -> Result<Json<SaveAnswerResponse>> {
    req.validate()?;
    let (answered, total) = state
        .session_service
        .save_answer(id, req.question_index, &req.label)
        .await?;

    Ok(Json(SaveAnswerResponse {
        saved: true,
        question_index: req.question_index,
        answered,
        total,
    }))
}

/// Scores the session and appends the attempt to the results log. The
/// session stays open if the log cannot be written, so the submit can be
/// retried.
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<SubmitQuizResponse>> {
    let req: SubmitQuizRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SubmitQuizRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    if let Some(answers) = req.answers {
        state.session_service.merge_answers(id, answers).await?;
    }
    let session = state
        .session_service
        .remove(id)
        .await
        .ok_or_else(|| crate::error::Error::NotFound(format!("Quiz session {} not found", id)))?;

    let score = GradingService::score(&session.quiz, &session.answers)?;
    if session.answers.len() < session.quiz.len() {
        tracing::info!(
            session_id = %id,
            answered = session.answers.len(),
            total = session.quiz.len(),
            "Submitting incomplete quiz; unanswered questions count as incorrect"
        );
    }

    let record = AttemptRecord::new(
        time::now(),
        session.quiz.topic.clone(),
        session.quiz.difficulty.to_string(),
        score.percentage,
    );
    let store = state.result_store.clone();
    let pending = record.clone();
    let appended = tokio::task::spawn_blocking(move || store.append(&pending)).await;
    if let Err(e) = appended.map_err(crate::error::Error::from).and_then(|r| r) {
        tracing::error!(session_id = %id, error = %e, "Failed to record quiz attempt");
        state.session_service.restore(session).await;
        return Err(e);
    }

    let review = review_questions(&session.quiz, &score);
    Ok(Json(SubmitQuizResponse {
        session_id: id,
        topic: session.quiz.topic,
        difficulty: session.quiz.difficulty,
        recorded_at: record.timestamp,
        score,
        review,
    }))
}

fn review_questions(quiz: &Quiz, score: &ScoreResult) -> Vec<ReviewedQuestion> {
    score
        .per_question
        .iter()
        .zip(&quiz.questions)
        .map(|(outcome, q)| ReviewedQuestion {
            question_index: outcome.question_index,
            text: q.text.clone(),
            chosen_label: outcome.chosen_label.clone(),
            chosen_text: outcome
                .chosen_label
                .as_ref()
                .and_then(|l| q.options.get(l))
                .cloned(),
            correct_label: outcome.correct_label.clone(),
            correct_text: q
                .options
                .get(&outcome.correct_label)
                .cloned()
                .unwrap_or_default(),
            is_correct: outcome.is_correct,
            explanation: outcome.explanation.clone(),
        })
        .collect()
}
