use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_index: usize,
    pub chosen_label: Option<String>,
    pub is_correct: bool,
    pub correct_label: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub correct_count: usize,
    pub total: usize,
    /// Full precision; round only for display.
    pub percentage: f64,
    pub per_question: Vec<QuestionOutcome>,
}
