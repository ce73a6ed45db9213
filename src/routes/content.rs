use axum::{extract::State, response::Json};
use validator::Validate;

use crate::dto::content_dto::{
    DifficultyInfo, GrammarAnalysisRequest, PracticeTopicResponse, TopicCatalogResponse,
    TutorialRequest, TutorialResponse,
};
use crate::error::{Error, Result};
use crate::models::analysis::GrammarAnalysis;
use crate::models::question::Difficulty;
use crate::models::topic::{random_practice_topic, GRAMMAR_TOPICS};
use crate::AppState;

#[axum::debug_handler]
pub async fn list_topics() -> Json<TopicCatalogResponse> {
    Json(TopicCatalogResponse {
        categories: GRAMMAR_TOPICS,
        difficulties: Difficulty::ALL
            .iter()
            .map(|level| DifficultyInfo {
                level: *level,
                quiz: level.quiz_description(),
                tutorial: level.tutorial_description(),
            })
            .collect(),
    })
}

#[axum::debug_handler]
pub async fn generate_tutorial(
    State(state): State<AppState>,
    Json(req): Json<TutorialRequest>,
) -> Result<Json<TutorialResponse>> {
    req.validate()?;
    let content = state
        .content_provider
        .generate_tutorial(&req.topic, req.difficulty)
        .await?;

    Ok(Json(TutorialResponse {
        topic: req.topic,
        difficulty: req.difficulty,
        content,
    }))
}

#[axum::debug_handler]
pub async fn random_practice() -> Json<PracticeTopicResponse> {
    Json(PracticeTopicResponse {
        topic: random_practice_topic(),
    })
}

#[axum::debug_handler]
pub async fn analyze_grammar(
    State(state): State<AppState>,
    Json(req): Json<GrammarAnalysisRequest>,
) -> Result<Json<GrammarAnalysis>> {
    req.validate()?;
    if req.text.trim().is_empty() {
        return Err(Error::BadRequest("Text to analyze is blank".to_string()));
    }
    let analysis = state.content_provider.analyze_text(&req.text).await?;
    tracing::info!(score = ?analysis.score, suggestions = analysis.suggestions.len(), "Grammar analysis ready");
    Ok(Json(analysis))
}
