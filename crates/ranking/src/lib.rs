pub mod engine;
pub mod leaderboard;

pub use engine::{RankingEngine, DEFAULT_LIMIT};
pub use leaderboard::MonthlyLeaderboard;
