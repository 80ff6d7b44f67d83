//! Mutating flows that act on behalf of a signed-in user. Every flow takes the
//! caller's [`Session`] explicitly and refuses to touch the network without one.
//! Transport, status and decode failures all surface as `Backend`.

use reqwest::{RequestBuilder, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IdeaDropError, IdeaDropResult};
use crate::models::Session;
use crate::supabase_client::{ensure_success, SupabaseClient};

/// Tables holding rows that reference an idea; cleared before the idea itself.
pub const IDEA_CHILD_TABLES: [&str; 3] = ["likes", "comments", "vc_interactions"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    pub liked: bool,
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: String,
}

fn authorized(session: Option<&Session>) -> IdeaDropResult<&Session> {
    match session {
        Some(s) if s.is_valid() => Ok(s),
        Some(_) => Err(IdeaDropError::Unauthorized("session is incomplete".to_string())),
        None => Err(IdeaDropError::Unauthorized("sign in required".to_string())),
    }
}

async fn send(request: RequestBuilder, action: &str) -> IdeaDropResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| IdeaDropError::Backend(format!("{}: {}", action, e)))?;
    ensure_success(response)
        .await
        .map_err(|msg| IdeaDropError::Backend(format!("{}: {}", action, msg)))
}

async fn fetch_rows<T: DeserializeOwned>(request: RequestBuilder, action: &str) -> IdeaDropResult<Vec<T>> {
    send(request, action)
        .await?
        .json()
        .await
        .map_err(|e| IdeaDropError::Backend(format!("{}: bad response: {}", action, e)))
}

impl SupabaseClient {
    /// Likes the idea if the caller has not liked it yet, otherwise removes the
    /// like. The stored `likes_count` is maintained by the backend; callers
    /// re-fetch after toggling.
    pub async fn toggle_like(
        &self,
        session: Option<&Session>,
        idea_id: &str,
    ) -> IdeaDropResult<LikeToggle> {
        let session = authorized(session)?;
        let url = self.rest_url("likes");
        let idea_filter = format!("eq.{}", idea_id);
        let user_filter = format!("eq.{}", session.user_id);

        let lookup = self.user_request(reqwest::Method::GET, &url, session).query(&[
            ("select", "id"),
            ("idea_id", idea_filter.as_str()),
            ("user_id", user_filter.as_str()),
        ]);
        let existing: Vec<IgnoredAny> = fetch_rows(lookup, "looking up like").await?;

        let liked = if existing.is_empty() {
            let insert = self
                .user_request(reqwest::Method::POST, &url, session)
                .header("Prefer", "return=minimal")
                .json(&serde_json::json!({ "idea_id": idea_id, "user_id": session.user_id }));
            send(insert, "adding like").await?;
            true
        } else {
            let remove = self.user_request(reqwest::Method::DELETE, &url, session).query(&[
                ("idea_id", idea_filter.as_str()),
                ("user_id", user_filter.as_str()),
            ]);
            send(remove, "removing like").await?;
            false
        };

        info!("User {} {} idea {}", session.user_id, if liked { "liked" } else { "unliked" }, idea_id);
        Ok(LikeToggle { liked })
    }

    /// Deletes an idea after removing every row that references it.
    pub async fn delete_idea(&self, session: Option<&Session>, idea_id: &str) -> IdeaDropResult<()> {
        let session = authorized(session)?;
        let idea_filter = format!("eq.{}", idea_id);

        for table in IDEA_CHILD_TABLES {
            let request = self
                .user_request(reqwest::Method::DELETE, &self.rest_url(table), session)
                .query(&[("idea_id", idea_filter.as_str())]);
            send(request, &format!("deleting {}", table)).await?;
        }

        let request = self
            .user_request(reqwest::Method::DELETE, &self.rest_url("ideas"), session)
            .query(&[("id", idea_filter.as_str())]);
        send(request, "deleting idea").await?;

        info!("User {} deleted idea {}", session.user_id, idea_id);
        Ok(())
    }

    pub async fn is_admin(&self, session: Option<&Session>) -> IdeaDropResult<bool> {
        let session = authorized(session)?;
        let user_filter = format!("eq.{}", session.user_id);

        let request = self
            .user_request(reqwest::Method::GET, &self.rest_url("user_roles"), session)
            .query(&[
                ("select", "role"),
                ("user_id", user_filter.as_str()),
                ("role", "eq.admin"),
            ]);
        let roles: Vec<RoleRow> = fetch_rows(request, "checking role").await?;

        Ok(roles.iter().any(|r| r.role == "admin"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{any, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Session {
        Session::new("user-1", "user-jwt")
    }

    #[tokio::test]
    async fn test_missing_session_makes_no_calls() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon");
        let blank = Session::new("user-1", " ");

        assert!(matches!(
            client.toggle_like(None, "idea-1").await,
            Err(IdeaDropError::Unauthorized(_))
        ));
        assert!(matches!(
            client.delete_idea(Some(&blank), "idea-1").await,
            Err(IdeaDropError::Unauthorized(_))
        ));
        assert!(matches!(
            client.is_admin(None).await,
            Err(IdeaDropError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_like_inserts_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/likes"))
            .and(query_param("idea_id", "eq.idea-1"))
            .and(query_param("user_id", "eq.user-1"))
            .and(header("authorization", "Bearer user-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/likes"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon");
        let toggle = client.toggle_like(Some(&session()), "idea-1").await.unwrap();
        assert!(toggle.liked);
    }

    #[tokio::test]
    async fn test_toggle_like_removes_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/likes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": 7 }])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/likes"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon");
        let toggle = client.toggle_like(Some(&session()), "idea-1").await.unwrap();
        assert!(!toggle.liked);
    }

    #[tokio::test]
    async fn test_delete_idea_clears_children_first() {
        let server = MockServer::start().await;
        for table in IDEA_CHILD_TABLES {
            Mock::given(method("DELETE"))
                .and(path(format!("/rest/v1/{}", table)))
                .and(query_param("idea_id", "eq.idea-1"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/ideas"))
            .and(query_param("id", "eq.idea-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon");
        client.delete_idea(Some(&session()), "idea-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_idea_stops_on_child_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/likes"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rls"))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/ideas"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon");
        let err = client.delete_idea(Some(&session()), "idea-1").await.unwrap_err();
        assert!(matches!(err, IdeaDropError::Backend(ref m) if m.contains("likes")));
    }

    #[tokio::test]
    async fn test_is_admin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/user_roles"))
            .and(query_param("user_id", "eq.user-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "role": "admin" }])))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon");
        assert!(client.is_admin(Some(&session())).await.unwrap());
    }

    #[tokio::test]
    async fn test_failures_map_to_backend_in_every_flow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/likes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/user_roles"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon");
        assert!(matches!(
            client.toggle_like(Some(&session()), "idea-1").await,
            Err(IdeaDropError::Backend(ref m)) if m.contains("looking up like")
        ));
        assert!(matches!(
            client.is_admin(Some(&session())).await,
            Err(IdeaDropError::Backend(ref m)) if m.contains("db down")
        ));

        // Nothing listens on a dropped server's port.
        let uri = server.uri();
        drop(server);
        let offline = SupabaseClient::new(&uri, "anon");
        assert!(matches!(
            offline.delete_idea(Some(&session()), "idea-1").await,
            Err(IdeaDropError::Backend(ref m)) if m.contains("deleting likes")
        ));
    }
}
