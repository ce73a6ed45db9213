use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::answer::AnswerSet;
use crate::models::question::Quiz;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub quiz: Quiz,
    pub answers: AnswerSet,
    pub created_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            id: Uuid::new_v4(),
            quiz,
            answers: AnswerSet::new(),
            created_at: Utc::now(),
        }
    }
}
