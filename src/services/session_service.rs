use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::answer::AnswerSet;
use crate::models::question::Quiz;
use crate::models::quiz_session::QuizSession;

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

/// In-flight quizzes for the HTTP layer, keyed by session id. Sessions older
/// than the TTL are dropped whenever a new one is opened and by
/// `evict_expired`.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<Uuid, QuizSession>>>,
    ttl: Duration,
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }
}

impl SessionService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self, quiz: Quiz) -> QuizSession {
        let session = QuizSession::new(quiz);
        let mut sessions = self.sessions.write().await;
        let evicted = evict_older_than(&mut sessions, self.ttl);
        sessions.insert(session.id, session.clone());
        drop(sessions);

        tracing::info!(session_id = %session.id, evicted, "Quiz session opened");
        session
    }

    /// Drops sessions older than the TTL and returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let evicted = evict_older_than(&mut *self.sessions.write().await, self.ttl);
        if evicted > 0 {
            tracing::info!(evicted, "Expired quiz sessions removed");
        }
        evicted
    }

    pub async fn get(&self, id: Uuid) -> Result<QuizSession> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Records one answer. Returns `(answered, total)` as seen under the
    /// same lock.
    pub async fn save_answer(
        &self,
        id: Uuid,
        question_index: usize,
        label: &str,
    ) -> Result<(usize, usize)> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        check_answer(&session.quiz, question_index, label)?;
        session.answers.set(question_index, label);
        Ok((session.answers.len(), session.quiz.len()))
    }

    pub async fn merge_answers(&self, id: Uuid, answers: AnswerSet) -> Result<QuizSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        for (idx, label) in answers.iter() {
            check_answer(&session.quiz, idx, label)?;
        }
        session.answers.merge(answers);
        Ok(session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<QuizSession> {
        let removed = self.sessions.write().await.remove(&id);
        if removed.is_some() {
            tracing::info!(session_id = %id, "Quiz session closed");
        }
        removed
    }

    /// Puts back a session taken with `remove`, e.g. after a failed submit.
    pub async fn restore(&self, session: QuizSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn evict_older_than(sessions: &mut HashMap<Uuid, QuizSession>, ttl: Duration) -> usize {
    let cutoff = Utc::now() - ttl;
    let before = sessions.len();
    sessions.retain(|_, session| session.created_at > cutoff);
    before - sessions.len()
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Quiz session {} not found", id))
}

fn check_answer(quiz: &Quiz, question_index: usize, label: &str) -> Result<()> {
    let question = quiz.questions.get(question_index).ok_or_else(|| {
        Error::BadRequest(format!(
            "Question index {} is out of range for a quiz of {} questions",
            question_index,
            quiz.len()
        ))
    })?;
    if !question.has_option(label) {
        return Err(Error::BadRequest(format!(
            "'{}' is not an option of question {}",
            label,
            question_index + 1
        )));
    }
    Ok(())
}
