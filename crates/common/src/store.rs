use async_trait::async_trait;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::{IdeaDropError, IdeaDropResult};
use crate::models::{IdeaRecord, IdeaRow};
use crate::supabase_client::{ensure_success, SupabaseClient};

const IDEA_COLUMNS: &str = "id,text,likes_count,user_id,created_at,is_seed";

/// Filter, order and limit handed to the data store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdeaQuery {
    pub created_from: Option<OffsetDateTime>,
    pub created_to: Option<OffsetDateTime>,
    pub exclude_seed: bool,
    pub order_by_likes_desc: bool,
    pub limit: Option<usize>,
}

impl IdeaQuery {
    /// Non-seed ideas created within `[from, to]`, most liked first.
    pub fn ranked_between(from: OffsetDateTime, to: OffsetDateTime, limit: usize) -> Self {
        Self {
            created_from: Some(from),
            created_to: Some(to),
            exclude_seed: true,
            order_by_likes_desc: true,
            limit: Some(limit),
        }
    }

    fn to_params(&self) -> IdeaDropResult<Vec<(&'static str, String)>> {
        let mut params = vec![("select", IDEA_COLUMNS.to_string())];
        if let Some(from) = self.created_from {
            params.push(("created_at", format!("gte.{}", format_ts(from)?)));
        }
        if let Some(to) = self.created_to {
            params.push(("created_at", format!("lte.{}", format_ts(to)?)));
        }
        if self.exclude_seed {
            params.push(("is_seed", "eq.false".to_string()));
        }
        if self.order_by_likes_desc {
            params.push(("order", "likes_count.desc".to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        Ok(params)
    }
}

fn format_ts(ts: OffsetDateTime) -> IdeaDropResult<String> {
    ts.format(&Rfc3339)
        .map_err(|e| IdeaDropError::FetchFailed(format!("cannot format timestamp: {}", e)))
}

/// The managed relational store holding idea rows.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    async fn query_ideas(&self, query: &IdeaQuery) -> IdeaDropResult<Vec<IdeaRecord>>;
}

#[async_trait]
impl IdeaStore for SupabaseClient {
    async fn query_ideas(&self, query: &IdeaQuery) -> IdeaDropResult<Vec<IdeaRecord>> {
        let url = self.rest_url("ideas");
        let params = query.to_params()?;
        debug!("Querying ideas: {:?}", params);

        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&params)
            .send()
            .await
            .map_err(|e| IdeaDropError::FetchFailed(e.to_string()))?;

        let response = ensure_success(response)
            .await
            .map_err(IdeaDropError::FetchFailed)?;

        let rows: Vec<IdeaRow> = response
            .json()
            .await
            .map_err(|e| IdeaDropError::FetchFailed(format!("bad ideas payload: {}", e)))?;

        let total = rows.len();
        let records = validate_rows(rows);
        info!("Fetched {} ideas ({} rejected)", records.len(), total - records.len());
        Ok(records)
    }
}

/// Keeps rows that convert into [`IdeaRecord`], preserving store order.
pub fn validate_rows(rows: Vec<IdeaRow>) -> Vec<IdeaRecord> {
    rows.into_iter()
        .filter_map(|row| match IdeaRecord::try_from(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping malformed idea row: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_ranked_query_params() {
        let query = IdeaQuery::ranked_between(
            datetime!(2026-09-01 00:00:00 UTC),
            datetime!(2026-09-30 23:59:59 UTC),
            10,
        );
        let params = query.to_params().unwrap();
        assert_eq!(
            params,
            vec![
                ("select", IDEA_COLUMNS.to_string()),
                ("created_at", "gte.2026-09-01T00:00:00Z".to_string()),
                ("created_at", "lte.2026-09-30T23:59:59Z".to_string()),
                ("is_seed", "eq.false".to_string()),
                ("order", "likes_count.desc".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_query_only_selects() {
        let params = IdeaQuery::default().to_params().unwrap();
        assert_eq!(params, vec![("select", IDEA_COLUMNS.to_string())]);
    }

    #[tokio::test]
    async fn test_query_ideas_drops_malformed_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/ideas"))
            .and(header("apikey", "service"))
            .and(query_param("is_seed", "eq.false"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": "a", "text": "first", "likes_count": 9, "user_id": "u1",
                  "created_at": "2026-09-02T10:00:00+00:00", "is_seed": false },
                { "id": "b", "text": "broken", "likes_count": null,
                  "created_at": "2026-09-03T10:00:00+00:00", "is_seed": false },
                { "id": "c", "text": "third", "likes_count": 4, "user_id": "u2",
                  "created_at": "2026-09-04T10:00:00+00:00", "is_seed": false }
            ])))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "service");
        let query = IdeaQuery::ranked_between(
            datetime!(2026-09-01 00:00:00 UTC),
            datetime!(2026-09-30 23:59:59 UTC),
            5,
        );
        let ideas = client.query_ideas(&query).await.unwrap();

        let ids: Vec<&str> = ideas.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_query_ideas_surfaces_fetch_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/ideas"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid JWT"))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "bad");
        let result = client.query_ideas(&IdeaQuery::default()).await;
        match result {
            Err(IdeaDropError::FetchFailed(msg)) => assert!(msg.contains("invalid JWT")),
            other => panic!("expected FetchFailed, got {:?}", other),
        }
    }
}
