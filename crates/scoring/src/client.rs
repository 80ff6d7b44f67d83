use common::config::FunctionsConfig;
use common::{IdeaDropError, IdeaDropResult, Language, SupabaseClient};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{IdeaScore, SmartQuestion};
use crate::questions::QUESTION_COUNT;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdeaPayload<'a> {
    idea_text: &'a str,
    language: Language,
}

#[derive(Deserialize)]
struct ScoreResponse {
    score: i64,
    #[serde(default)]
    feedback: String,
}

#[derive(Deserialize)]
struct QuestionsResponse {
    questions: Vec<SmartQuestion>,
}

/// Calls the AI scoring service through the backend's edge functions.
pub struct ScoringClient {
    supabase: SupabaseClient,
    functions: FunctionsConfig,
}

impl ScoringClient {
    pub fn new(supabase: SupabaseClient, functions: FunctionsConfig) -> Self {
        Self { supabase, functions }
    }

    pub async fn score_idea(&self, idea_text: &str, language: Language) -> IdeaDropResult<IdeaScore> {
        if idea_text.trim().is_empty() {
            return Err(IdeaDropError::GenerationFailed("idea text is empty".to_string()));
        }

        let resp: ScoreResponse = self
            .supabase
            .invoke_function(&self.functions.score_function, &IdeaPayload { idea_text, language })
            .await?;

        let score = u8::try_from(resp.score)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or_else(|| {
                IdeaDropError::GenerationFailed(format!("score {} outside 0..=100", resp.score))
            })?;

        info!("Scored idea: {}", score);
        Ok(IdeaScore {
            score,
            feedback: resp.feedback,
        })
    }

    pub async fn generate_questions(
        &self,
        idea_text: &str,
        language: Language,
    ) -> IdeaDropResult<Vec<SmartQuestion>> {
        let resp: QuestionsResponse = self
            .supabase
            .invoke_function(&self.functions.questions_function, &IdeaPayload { idea_text, language })
            .await?;

        if resp.questions.len() != QUESTION_COUNT {
            return Err(IdeaDropError::GenerationFailed(format!(
                "expected {} questions, got {}",
                QUESTION_COUNT,
                resp.questions.len()
            )));
        }
        if let Some(q) = resp.questions.iter().find(|q| q.choices.len() < 2) {
            return Err(IdeaDropError::GenerationFailed(format!(
                "question {:?} has fewer than two choices",
                q.question
            )));
        }
        Ok(resp.questions)
    }
}
