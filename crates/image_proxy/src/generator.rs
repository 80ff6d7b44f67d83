use async_trait::async_trait;
use common::config::ImageConfig;
use common::{IdeaDropError, IdeaDropResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// `data:image/png;base64,...`
    pub data_uri: String,
    pub prompt: String,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, idea_text: &str) -> IdeaDropResult<GeneratedImage>;
}

/// Prompt sent to the image model for an idea.
pub fn build_prompt(idea_text: &str) -> String {
    format!(
        "A clean, modern concept illustration of this startup idea: \"{}\". \
         Bright colors, simple shapes, no text or lettering.",
        idea_text.trim()
    )
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

/// Client for an OpenAI-compatible `/images/generations` endpoint.
pub struct OpenAiImageClient {
    http_client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &ImageConfig) -> IdeaDropResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("IMAGE_API_KEY must be set"))?;
        Ok(Self::new(&config.api_url, api_key, &config.model))
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, idea_text: &str) -> IdeaDropResult<GeneratedImage> {
        let url = format!("{}/images/generations", self.api_url);
        let prompt = build_prompt(idea_text);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024",
            "response_format": "b64_json"
        });

        let res = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| IdeaDropError::GenerationFailed(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(IdeaDropError::GenerationFailed(format!("{} - {}", status, text)));
        }

        let resp: ImagesResponse = res
            .json()
            .await
            .map_err(|e| IdeaDropError::GenerationFailed(format!("bad image payload: {}", e)))?;
        let b64 = resp
            .data
            .into_iter()
            .find_map(|d| d.b64_json)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| IdeaDropError::GenerationFailed("no image returned".to_string()))?;

        info!("Generated image ({} base64 bytes)", b64.len());
        Ok(GeneratedImage {
            data_uri: format!("data:image/png;base64,{}", b64),
            prompt,
        })
    }
}
