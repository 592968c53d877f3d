//! HTTP routes for running the agent.
//!
//! - `GET /health` reports liveness.
//! - `POST /execute/` runs one query and streams every iteration record as a
//!   server-sent event.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::types::{ErrorResponse, HealthResponse, QueryRequest};
use crate::agent::{Agent, IterationRecord};
use crate::config::Config;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
}

/// Build the router around a shared agent.
pub fn router(agent: Arc<Agent>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/execute/", post(execute_query))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { agent })
}

/// Bind to the configured address and serve until shutdown.
pub async fn serve(config: &Config, agent: Arc<Agent>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, router(agent)).await?;
    Ok(())
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn execute_query(State(state): State<AppState>, Json(request): Json<QueryRequest>) -> Response {
    if request.query.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("query must not be empty")),
        )
            .into_response();
    }

    // Run on its own task so a panic inside the loop becomes an error event.
    let agent = Arc::clone(&state.agent);
    let query = request.query;
    let events: Vec<Event> = match tokio::spawn(async move { agent.execute(&query).await }).await {
        Ok(records) => records.iter().map(record_event).collect(),
        Err(e) => {
            tracing::error!("Agent run failed: {}", e);
            vec![error_event(&format!("An error occurred: {}", e))]
        }
    };

    Sse::new(stream::iter(events.into_iter().map(Ok::<_, Infallible>))).into_response()
}

fn record_event(record: &IterationRecord) -> Event {
    Event::default()
        .json_data(record)
        .unwrap_or_else(|e| error_event(&e.to_string()))
}

fn error_event(message: &str) -> Event {
    let body = serde_json::to_string(&ErrorResponse::new(message))
        .unwrap_or_else(|_| r#"{"error":"unknown error"}"#.to_string());
    Event::default().data(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use crate::agent::PromptTemplate;
    use crate::llm::testing::ScriptedLlm;
    use crate::tools::ToolRegistry;

    fn test_router(responses: Vec<&str>) -> Router {
        let llm = Arc::new(ScriptedLlm::new(responses));
        let agent = Agent::new(llm, "test-model", ToolRegistry::new(), PromptTemplate::default());
        router(Arc::new(agent))
    }

    fn execute_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/execute/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router(vec![])
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_execute_streams_records() {
        let router = test_router(vec!["garbage", r#"{"answer": "Brazil"}"#]);
        let response = router
            .oneshot(execute_request(r#"{"query": "Who won the most World Cups?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );

        let body = body_text(response).await;
        let events: Vec<serde_json::Value> = body
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["iteration_number"], 1);
        assert!(events[0]["error"].is_string());
        assert_eq!(events[1]["final_answer"], "Brazil");
        assert!(events[1]["error"].is_null());
    }

    #[tokio::test]
    async fn test_execute_rejects_blank_query() {
        let response = test_router(vec![])
            .oneshot(execute_request(r#"{"query": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["error"], "query must not be empty");
    }

    #[tokio::test]
    async fn test_execute_rejects_missing_query() {
        let response = test_router(vec![])
            .oneshot(execute_request(r#"{"question": "x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
