use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{IdeaDropError, IdeaDropResult};
use crate::models::Session;

/// Thin client over the hosted backend's REST (PostgREST) and edge function
/// endpoints.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.trim_start_matches('/'))
    }

    pub fn functions_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, name.trim_start_matches('/'))
    }

    /// Request carrying the client key as both `apikey` and bearer token.
    pub(crate) fn request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Request on behalf of a signed-in user, so row-level security applies
    /// to that user.
    pub(crate) fn user_request(
        &self,
        method: reqwest::Method,
        url: &str,
        session: &Session,
    ) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", session.access_token))
    }

    /// Calls an edge function with a JSON body and decodes its JSON reply.
    pub async fn invoke_function<B, R>(&self, name: &str, body: &B) -> IdeaDropResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.functions_url(name);
        debug!("Invoking edge function {}", url);

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| IdeaDropError::GenerationFailed(format!("{}: {}", name, e)))?;

        let response = ensure_success(response)
            .await
            .map_err(|msg| IdeaDropError::GenerationFailed(format!("{}: {}", name, msg)))?;

        let decoded = response
            .json::<R>()
            .await
            .map_err(|e| IdeaDropError::GenerationFailed(format!("{}: bad response: {}", name, e)))?;
        info!("Edge function {} answered", name);
        Ok(decoded)
    }
}

/// Passes 2xx responses through; otherwise returns `"<status>: <body>"`.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(format!("{} - {}", status, text))
}
