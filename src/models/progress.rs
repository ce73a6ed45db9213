use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverage {
    /// Monday of the calendar week.
    pub week_start: NaiveDate,
    pub average_percentage: f64,
    pub attempts: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub count: usize,
    pub mean_percentage: Option<f64>,
    pub max_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub weekly: Vec<WeeklyAverage>,
    pub by_topic: BTreeMap<String, f64>,
    pub by_difficulty: BTreeMap<String, usize>,
    pub overall: OverallStats,
}

impl ProgressReport {
    /// Topics ordered from weakest to strongest average.
    pub fn topics_by_average(&self) -> Vec<(&str, f64)> {
        let mut topics: Vec<(&str, f64)> = self
            .by_topic
            .iter()
            .map(|(topic, avg)| (topic.as_str(), *avg))
            .collect();
        topics.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        topics
    }

    pub fn is_empty(&self) -> bool {
        self.overall.count == 0
    }
}
