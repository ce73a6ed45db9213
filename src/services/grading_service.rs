use crate::error::{Error, Result};
use crate::models::answer::AnswerSet;
use crate::models::question::Quiz;
use crate::models::score::{QuestionOutcome, ScoreResult};

pub struct GradingService;

impl GradingService {
    /// Scores every question of `quiz`; unanswered questions count as wrong.
    pub fn score(quiz: &Quiz, answers: &AnswerSet) -> Result<ScoreResult> {
        if quiz.questions.is_empty() {
            return Err(Error::InvalidQuiz("cannot score a quiz with no questions".to_string()));
        }

        let mut correct_count = 0usize;
        let mut per_question = Vec::with_capacity(quiz.questions.len());

        for (idx, q) in quiz.questions.iter().enumerate() {
            let chosen = answers.get(idx);
            let is_correct = chosen == Some(q.correct_label.as_str());
            if is_correct {
                correct_count += 1;
            }
            per_question.push(QuestionOutcome {
                question_index: idx,
                chosen_label: chosen.map(str::to_string),
                is_correct,
                correct_label: q.correct_label.clone(),
                explanation: q.explanation.clone(),
            });
        }

        let total = quiz.questions.len();
        let percentage = 100.0 * correct_count as f64 / total as f64;

        Ok(ScoreResult {
            correct_count,
            total,
            percentage,
            per_question,
        })
    }
}
