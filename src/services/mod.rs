pub mod ai_service;
pub mod grading_service;
pub mod progress_service;
pub mod result_store;
pub mod session_service;
