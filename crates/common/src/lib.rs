pub mod config;
pub mod error;
pub mod interactions;
pub mod models;
pub mod storage;
pub mod store;
pub mod supabase_client;

pub use config::Config;
pub use error::{IdeaDropError, IdeaDropResult};
pub use interactions::LikeToggle;
pub use models::{CalendarMonth, IdeaRecord, IdeaRow, Language, Session};
pub use storage::SupabaseStorageClient;
pub use store::{IdeaQuery, IdeaStore};
pub use supabase_client::SupabaseClient;
