use common::{CalendarMonth, IdeaDropResult, IdeaQuery, IdeaRecord, IdeaStore};
use tracing::info;

use crate::engine::RankingEngine;

/// Fetch-then-rank over an [`IdeaStore`]. A failed fetch is returned as-is and
/// nothing is ranked.
pub struct MonthlyLeaderboard<S> {
    store: S,
    engine: RankingEngine,
}

impl<S: IdeaStore> MonthlyLeaderboard<S> {
    pub fn new(store: S, engine: RankingEngine) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &RankingEngine {
        &self.engine
    }

    async fn fetch_month(&self, month: &CalendarMonth, limit: usize) -> IdeaDropResult<Vec<IdeaRecord>> {
        let (from, to) = month.window(self.engine.offset());
        let query = IdeaQuery::ranked_between(from, to, limit);
        self.store.query_ideas(&query).await
    }

    pub async fn monthly_top(&self, month: &CalendarMonth, limit: usize) -> IdeaDropResult<Vec<IdeaRecord>> {
        let ideas = self.fetch_month(month, limit).await?;
        let top = self.engine.monthly_top(&ideas, month, limit);
        info!("Ranked {} ideas for {}", top.len(), month);
        Ok(top)
    }

    pub async fn top_idea_of_month(&self, month: &CalendarMonth) -> IdeaDropResult<Option<IdeaRecord>> {
        let ideas = self.fetch_month(month, 1).await?;
        Ok(self.engine.top_idea_of_month(&ideas, month))
    }
}
