pub mod scheduler;

pub use scheduler::{monthly_cron, MonthlyScheduler};
