use common::{CalendarMonth, IdeaRecord};
use time::UtcOffset;

pub const DEFAULT_LIMIT: usize = 10;

/// Orders already-fetched ideas into leaderboards. Holds no state besides the
/// offset in which month boundaries are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingEngine {
    offset: UtcOffset,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl RankingEngine {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    fn qualifies(&self, idea: &IdeaRecord, month: &CalendarMonth) -> bool {
        !idea.is_seed && month.contains(idea.created_at, self.offset)
    }

    /// Non-seed ideas created in `month`, most liked first, at most `limit`.
    /// Ties keep their input order.
    pub fn monthly_top(
        &self,
        ideas: &[IdeaRecord],
        month: &CalendarMonth,
        limit: usize,
    ) -> Vec<IdeaRecord> {
        let mut ranked: Vec<&IdeaRecord> = ideas
            .iter()
            .filter(|idea| self.qualifies(idea, month))
            .collect();
        ranked.sort_by(|a, b| b.likes_count.cmp(&a.likes_count));
        ranked.into_iter().take(limit).cloned().collect()
    }

    /// The leader of `month` without materializing the full list. On a tie
    /// the earliest idea in input order wins, matching `monthly_top(.., 1)`.
    pub fn top_idea_of_month(
        &self,
        ideas: &[IdeaRecord],
        month: &CalendarMonth,
    ) -> Option<IdeaRecord> {
        ideas
            .iter()
            .filter(|idea| self.qualifies(idea, month))
            .fold(None::<&IdeaRecord>, |best, idea| match best {
                Some(b) if b.likes_count >= idea.likes_count => Some(b),
                _ => Some(idea),
            })
            .cloned()
    }

    /// All-time popularity order over non-seed ideas.
    pub fn popular(&self, ideas: &[IdeaRecord], limit: usize) -> Vec<IdeaRecord> {
        let mut ranked: Vec<&IdeaRecord> = ideas.iter().filter(|idea| !idea.is_seed).collect();
        ranked.sort_by(|a, b| b.likes_count.cmp(&a.likes_count));
        ranked.into_iter().take(limit).cloned().collect()
    }
}
