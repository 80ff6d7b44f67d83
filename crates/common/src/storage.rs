use reqwest::Client;
use tracing::info;

use crate::error::{IdeaDropError, IdeaDropResult};

#[derive(Clone)]
pub struct SupabaseStorageClient {
    client: Client,
    base_url: String,
    api_key: String,
    bucket_name: String,
}

impl SupabaseStorageClient {
    pub fn new(base_url: &str, api_key: &str, bucket_name: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bucket_name: bucket_name.to_string(),
        }
    }

    pub fn object_url(&self, path: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url,
            self.bucket_name,
            path.trim_start_matches('/')
        )
    }

    /// Uploads (or overwrites) an object and returns its bucket-relative path.
    pub async fn upload_file(
        &self,
        path: &str,
        content: String,
        content_type: &str,
    ) -> IdeaDropResult<String> {
        let url = self.object_url(path);

        info!("Uploading to Supabase Storage: {} ({} bytes)", url, content.len());

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(content)
            .send()
            .await
            .map_err(|e| IdeaDropError::StorageUpload(e.to_string()))?;

        if response.status().is_success() {
            info!("Successfully uploaded {} to Supabase Storage.", path);
            Ok(path.trim_start_matches('/').to_string())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(IdeaDropError::StorageUpload(format!(
                "{} ({}): {}",
                url, status, error_text
            )))
        }
    }
}
