use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use time::UtcOffset;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub storage_url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
    pub bucket: String,
}

impl SupabaseConfig {
    /// Key used for server-side reads and uploads. Falls back to the anon key,
    /// in which case row-level security decides what is visible.
    pub fn server_key(&self) -> &str {
        self.service_role_key.as_deref().unwrap_or(&self.anon_key)
    }
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct RankingConfig {
    pub limit: usize,
    pub utc_offset: UtcOffset,
}

#[derive(Debug, Clone)]
pub struct FunctionsConfig {
    pub score_function: String,
    pub questions_function: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub image: ImageConfig,
    pub ranking: RankingConfig,
    pub functions: FunctionsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = lookup("SUPABASE_URL").context("SUPABASE_URL must be set")?;
        let anon_key = lookup("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY must be set")?;
        let bucket = lookup("SUPABASE_BUCKET_NAME").unwrap_or_else(|| "leaderboards".to_string());

        let url = supabase_url.trim_end_matches('/').to_string();
        let storage_url = format!("{}/storage/v1", url);

        let bind_addr = lookup("IMAGE_PROXY_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8787".to_string())
            .parse::<SocketAddr>()
            .context("IMAGE_PROXY_ADDR must be a socket address")?;

        let limit = match lookup("RANKING_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("RANKING_LIMIT must be a non-negative integer")?,
            None => 10,
        };

        let offset_hours = match lookup("RANKING_UTC_OFFSET_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i8>()
                .context("RANKING_UTC_OFFSET_HOURS must be an integer")?,
            None => 9,
        };
        let utc_offset = UtcOffset::from_hms(offset_hours, 0, 0)
            .context("RANKING_UTC_OFFSET_HOURS is out of range")?;

        Ok(Config {
            supabase: SupabaseConfig {
                url,
                storage_url,
                anon_key,
                service_role_key: lookup("SUPABASE_SERVICE_ROLE_KEY"),
                bucket,
            },
            image: ImageConfig {
                api_key: lookup("IMAGE_API_KEY"),
                api_url: lookup("IMAGE_API_URL")
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: lookup("IMAGE_MODEL").unwrap_or_else(|| "dall-e-3".to_string()),
                bind_addr,
            },
            ranking: RankingConfig { limit, utc_offset },
            functions: FunctionsConfig {
                score_function: lookup("SCORE_FUNCTION")
                    .unwrap_or_else(|| "score-idea".to_string()),
                questions_function: lookup("QUESTIONS_FUNCTION")
                    .unwrap_or_else(|| "generate-smart-questions".to_string()),
            },
        })
    }

    pub fn require_image_api_key(&self) -> Result<&String> {
        self.image
            .api_key
            .as_ref()
            .context("IMAGE_API_KEY must be set")
    }

    pub fn require_service_role_key(&self) -> Result<&String> {
        self.supabase
            .service_role_key
            .as_ref()
            .context("SUPABASE_SERVICE_ROLE_KEY must be set")
    }
}
