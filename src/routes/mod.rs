pub mod content;
pub mod health;
pub mod progress;
pub mod quiz;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::middleware::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::AppState;

/// All routes with state applied; `/api` routes sit behind the rate limiter.
pub fn app(state: AppState, public_rps: u32) -> Router {
    let base_routes = Router::new().route("/health", get(health::health));

    let api = Router::new()
        .route("/api/topics", get(content::list_topics))
        .route("/api/tutorials", post(content::generate_tutorial))
        .route("/api/grammar-analysis", post(content::analyze_grammar))
        .route("/api/practice-topics/random", get(content::random_practice))
        .route("/api/quizzes", post(quiz::generate_quiz))
        .route("/api/quizzes/:id", get(quiz::get_quiz))
        .route("/api/quizzes/:id/answers", patch(quiz::save_answer))
        .route("/api/quizzes/:id/submit", post(quiz::submit_quiz))
        .route("/api/progress", get(progress::get_progress))
        .route("/api/progress/attempts", get(progress::list_attempts))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::per_second(public_rps),
            rate_limit_middleware,
        ));

    base_routes.merge(api).with_state(state)
}
