pub mod analysis;
pub mod answer;
pub mod attempt_record;
pub mod progress;
pub mod question;
pub mod quiz_session;
pub mod score;
pub mod topic;
