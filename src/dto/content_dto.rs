use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::Difficulty;
use crate::models::topic::TopicCategory;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TutorialRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorialResponse {
    pub topic: String,
    pub difficulty: Difficulty,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DifficultyInfo {
    pub level: Difficulty,
    pub quiz: &'static str,
    pub tutorial: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicCatalogResponse {
    pub categories: &'static [TopicCategory],
    pub difficulties: Vec<DifficultyInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GrammarAnalysisRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticeTopicResponse {
    pub topic: &'static str,
}
