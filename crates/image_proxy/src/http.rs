//! HTTP surface of the image generation proxy.
//!
//! - `OPTIONS *`             — CORS preflight, answered before routing
//! - `POST /generate-image`  — `{ ideaText }` → `{ image, prompt }`
//! - `GET  /health`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::generator::ImageGenerator;

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, GET, OPTIONS";

pub struct ProxyState {
    pub generator: Box<dyn ImageGenerator>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub idea_text: Option<String>,
}

pub fn build_router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/generate-image", post(generate_image_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

pub async fn start_server(state: Arc<ProxyState>, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Image proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Image proxy shutting down...");
        })
        .await?;
    Ok(())
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers
}

/// Answers preflight requests outright and stamps CORS headers on everything
/// else.
async fn cors(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return (StatusCode::OK, cors_headers(), "ok").into_response();
    }
    let mut response = next.run(req).await;
    response.headers_mut().extend(cors_headers());
    response
}

fn error_body(error: &str, details: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": error, "details": details.into() })
}

/// Validates the request and runs the generator; returns status and JSON body.
pub async fn generate_inner(
    generator: &dyn ImageGenerator,
    req: GenerateImageRequest,
) -> (StatusCode, serde_json::Value) {
    let idea_text = match req.idea_text {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                error_body("ideaText is required", "Request body must include a non-empty ideaText"),
            );
        }
    };

    match generator.generate(&idea_text).await {
        Ok(image) => (
            StatusCode::OK,
            serde_json::json!({ "image": image.data_uri, "prompt": image.prompt }),
        ),
        Err(e) => {
            warn!("Image generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to generate image", e.to_string()),
            )
        }
    }
}

async fn generate_image_handler(
    State(state): State<Arc<ProxyState>>,
    body: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> impl IntoResponse {
    let (status, value) = match body {
        Ok(Json(req)) => generate_inner(state.generator.as_ref(), req).await,
        Err(rejection) => (
            StatusCode::BAD_REQUEST,
            error_body("ideaText is required", rejection.body_text()),
        ),
    };
    (status, Json(value))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
