use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::AnswerSet;
use crate::models::question::{Difficulty, Question};
use crate::models::quiz_session::QuizSession;
use crate::models::score::ScoreResult;

fn default_num_questions() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(default = "default_num_questions")]
    #[validate(range(min = 3, max = 10))]
    pub num_questions: usize,
}

/// A question as shown to the learner, without the answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub index: usize,
    pub text: String,
    pub options: BTreeMap<String, String>,
}

impl PublicQuestion {
    pub fn from_question(index: usize, q: &Question) -> Self {
        Self {
            index,
            text: q.text.clone(),
            options: q.options.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSessionResponse {
    pub session_id: Uuid,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<PublicQuestion>,
    pub answers: AnswerSet,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&QuizSession> for QuizSessionResponse {
    fn from(session: &QuizSession) -> Self {
        Self {
            session_id: session.id,
            topic: session.quiz.topic.clone(),
            difficulty: session.quiz.difficulty,
            questions: session
                .quiz
                .questions
                .iter()
                .enumerate()
                .map(|(idx, q)| PublicQuestion::from_question(idx, q))
                .collect(),
            answers: session.answers.clone(),
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveAnswerRequest {
    pub question_index: usize,
    #[validate(length(min = 1, max = 8))]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAnswerResponse {
    pub saved: bool,
    pub question_index: usize,
    pub answered: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: Option<AnswerSet>,
}

/// Score details plus the question text and chosen option texts for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedQuestion {
    pub question_index: usize,
    pub text: String,
    pub chosen_label: Option<String>,
    pub chosen_text: Option<String>,
    pub correct_label: String,
    pub correct_text: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuizResponse {
    pub session_id: Uuid,
    pub topic: String,
    pub difficulty: Difficulty,
    pub recorded_at: NaiveDateTime,
    pub score: ScoreResult,
    pub review: Vec<ReviewedQuestion>,
}
