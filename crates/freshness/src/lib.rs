pub mod classifier;
pub mod format;

pub use classifier::{FreshnessClassifier, FreshnessResult, FreshnessTier};
pub use format::{time_ago, truncate_text};
