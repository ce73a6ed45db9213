use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One scored quiz attempt as it is kept in the results log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub timestamp: NaiveDateTime,
    pub topic: String,
    pub difficulty: String,
    pub percentage: f64,
}

impl AttemptRecord {
    /// Timestamp is truncated to whole seconds and the percentage rounded to
    /// two decimals, the precision the log stores.
    pub fn new(
        timestamp: NaiveDateTime,
        topic: impl Into<String>,
        difficulty: impl Into<String>,
        percentage: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            topic: topic.into(),
            difficulty: difficulty.into(),
            percentage: round_percentage(percentage),
        }
    }
}

pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn new_truncates_to_log_precision() {
        let ts = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_milli_opt(10, 20, 30, 750)
            .unwrap();
        let record = AttemptRecord::new(ts, "Nouns", "Easy", 100.0 / 3.0);
        assert_eq!(record.timestamp.nanosecond(), 0);
        assert_eq!(record.timestamp.second(), 30);
        assert_eq!(record.percentage, 33.33);
    }
}
