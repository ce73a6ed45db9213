use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Short blurb shown next to the level when picking a quiz.
    pub fn quiz_description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Basic MCQs with simple concepts",
            Difficulty::Medium => "More challenging questions with detailed concepts",
            Difficulty::Hard => "Complex questions testing advanced understanding",
        }
    }

    pub fn tutorial_description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Basic concepts and simple examples suitable for beginners",
            Difficulty::Medium => {
                "More detailed explanations with varied examples for intermediate learners"
            }
            Difficulty::Hard => {
                "Advanced concepts, complex examples, and detailed technical explanations"
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(Error::BadRequest(format!("Unknown difficulty: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    /// Option label ("A".."D") to option text.
    pub options: BTreeMap<String, String>,
    pub correct_label: String,
    pub explanation: String,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: BTreeMap<String, String>,
        correct_label: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options,
            correct_label: correct_label.into(),
            explanation: explanation.into(),
        }
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.options.contains_key(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, questions: Vec<Question>) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            questions,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.questions.is_empty() {
            return Err(Error::InvalidQuiz("quiz has no questions".to_string()));
        }
        for (idx, q) in self.questions.iter().enumerate() {
            if q.options.is_empty() {
                return Err(Error::InvalidQuiz(format!(
                    "question {} has no options",
                    idx + 1
                )));
            }
            if !q.has_option(&q.correct_label) {
                return Err(Error::InvalidQuiz(format!(
                    "question {} names answer '{}' which is not one of its options",
                    idx + 1,
                    q.correct_label
                )));
            }
        }
        Ok(())
    }
}
