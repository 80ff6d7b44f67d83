use common::{CalendarMonth, Config, IdeaDropResult, IdeaRecord, IdeaStore, SupabaseClient, SupabaseStorageClient};
use freshness::truncate_text;
use ranking::{MonthlyLeaderboard, RankingEngine};
use time::OffsetDateTime;
use tracing::info;

const IDEA_PREVIEW_CHARS: usize = 80;

/// Storage path of a month's leaderboard.
pub fn snapshot_path(month: &CalendarMonth) -> String {
    format!("{}/idea-leaderboard.md", month)
}

/// The month before the one containing `now`, in the ranking offset.
pub fn previous_month(config: &Config, now: OffsetDateTime) -> IdeaDropResult<CalendarMonth> {
    CalendarMonth::containing(now, config.ranking.utc_offset)?.previous()
}

pub fn format_leaderboard_markdown(
    month: &CalendarMonth,
    ideas: &[IdeaRecord],
    generated_at: OffsetDateTime,
) -> String {
    let mut content = String::new();
    content.push_str(&format!("# IdeaDrop Leaderboard: {}\n\n", month));
    content.push_str(&format!("*Generated on {}*\n\n", generated_at.date()));

    content.push_str("| Rank | Idea | Likes | Submitted |\n");
    content.push_str("|------|------|-------|-----------|\n");

    for (index, idea) in ideas.iter().enumerate() {
        let preview = truncate_text(&idea.text.replace(['\n', '|'], " "), IDEA_PREVIEW_CHARS);
        content.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            index + 1,
            preview,
            idea.likes_count,
            idea.created_at.date()
        ));
    }

    content
}

pub struct SnapshotPublisher<S> {
    leaderboard: MonthlyLeaderboard<S>,
    storage: SupabaseStorageClient,
    limit: usize,
}

impl SnapshotPublisher<SupabaseClient> {
    pub fn from_config(config: &Config) -> Self {
        let store = SupabaseClient::new(&config.supabase.url, config.supabase.server_key());
        let storage = SupabaseStorageClient::new(
            &config.supabase.storage_url,
            config.supabase.server_key(),
            &config.supabase.bucket,
        );
        Self::new(
            MonthlyLeaderboard::new(store, RankingEngine::new(config.ranking.utc_offset)),
            storage,
            config.ranking.limit,
        )
    }
}

impl<S: IdeaStore> SnapshotPublisher<S> {
    pub fn new(leaderboard: MonthlyLeaderboard<S>, storage: SupabaseStorageClient, limit: usize) -> Self {
        Self {
            leaderboard,
            storage,
            limit,
        }
    }

    /// Renders the month's leaderboard, or `None` when nothing qualifies.
    pub async fn render(&self, month: &CalendarMonth) -> IdeaDropResult<Option<String>> {
        let top = self.leaderboard.monthly_top(month, self.limit).await?;
        if top.is_empty() {
            info!("No ranked ideas for {}", month);
            return Ok(None);
        }
        Ok(Some(format_leaderboard_markdown(month, &top, OffsetDateTime::now_utc())))
    }

    /// Uploads the month's leaderboard and returns the stored path.
    pub async fn publish(&self, month: &CalendarMonth) -> IdeaDropResult<Option<String>> {
        let Some(markdown) = self.render(month).await? else {
            return Ok(None);
        };
        let stored = self
            .storage
            .upload_file(&snapshot_path(month), markdown, "text/markdown")
            .await?;
        info!("Published leaderboard for {} to {}", month, stored);
        Ok(Some(stored))
    }
}
