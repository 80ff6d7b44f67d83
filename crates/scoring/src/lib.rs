pub mod client;
pub mod models;
pub mod questions;

pub use client::ScoringClient;
pub use models::{IdeaScore, SmartQuestion};
pub use questions::{fallback_questions, questions_or_fallback, QUESTION_COUNT};
