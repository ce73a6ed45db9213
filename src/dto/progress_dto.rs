use serde::{Deserialize, Serialize};

use crate::models::attempt_record::AttemptRecord;
use crate::models::progress::ProgressReport;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAverage {
    pub topic: String,
    pub average_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// False when no attempt has ever been recorded.
    pub has_data: bool,
    pub report: ProgressReport,
    /// Weakest topic first.
    pub topic_ranking: Vec<TopicAverage>,
}

impl ProgressResponse {
    pub fn empty() -> Self {
        Self {
            has_data: false,
            report: ProgressReport::default(),
            topic_ranking: Vec::new(),
        }
    }

    pub fn from_report(report: ProgressReport) -> Self {
        let topic_ranking = report
            .topics_by_average()
            .into_iter()
            .map(|(topic, average_percentage)| TopicAverage {
                topic: topic.to_string(),
                average_percentage,
            })
            .collect();
        Self {
            has_data: !report.is_empty(),
            report,
            topic_ranking,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptListResponse {
    pub total: usize,
    pub attempts: Vec<AttemptRecord>,
}
