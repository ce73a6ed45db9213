use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Chosen option labels keyed by zero-based question index.
///
/// Filled in one answer at a time; it does not have to cover every
/// question before scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<usize, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, question_index: usize, label: impl Into<String>) {
        self.0.insert(question_index, label.into());
    }

    pub fn get(&self, question_index: usize) -> Option<&str> {
        self.0.get(&question_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Overwrites existing entries with the ones in `other`.
    pub fn merge(&mut self, other: AnswerSet) {
        self.0.extend(other.0);
    }
}

impl<L: Into<String>> FromIterator<(usize, L)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (usize, L)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
