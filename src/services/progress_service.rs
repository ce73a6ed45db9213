use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::attempt_record::AttemptRecord;
use crate::models::progress::{OverallStats, ProgressReport, WeeklyAverage};
use crate::utils::time::week_start;

pub struct ProgressService;

#[derive(Default)]
struct Tally {
    sum: f64,
    count: usize,
}

impl Tally {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

impl ProgressService {
    /// Groups attempts by week, topic and difficulty. Empty input yields an
    /// empty report whose overall mean/max are `None`.
    pub fn aggregate(records: &[AttemptRecord]) -> ProgressReport {
        let mut weeks: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
        let mut topics: BTreeMap<&str, Tally> = BTreeMap::new();
        let mut by_difficulty: BTreeMap<String, usize> = BTreeMap::new();
        let mut overall = Tally::default();
        let mut max_percentage: Option<f64> = None;

        for record in records {
            weeks
                .entry(week_start(record.timestamp.date()))
                .or_default()
                .add(record.percentage);
            topics
                .entry(record.topic.as_str())
                .or_default()
                .add(record.percentage);
            *by_difficulty.entry(record.difficulty.clone()).or_insert(0) += 1;

            overall.add(record.percentage);
            max_percentage = Some(match max_percentage {
                Some(max) => max.max(record.percentage),
                None => record.percentage,
            });
        }

        let weekly = weeks
            .into_iter()
            .map(|(week_start, tally)| WeeklyAverage {
                week_start,
                average_percentage: tally.mean(),
                attempts: tally.count,
            })
            .collect();

        let by_topic = topics
            .into_iter()
            .map(|(topic, tally)| (topic.to_string(), tally.mean()))
            .collect();

        ProgressReport {
            weekly,
            by_topic,
            by_difficulty,
            overall: OverallStats {
                count: records.len(),
                mean_percentage: (overall.count > 0).then(|| overall.mean()),
                max_percentage,
            },
        }
    }
}
