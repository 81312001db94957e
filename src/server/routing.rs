//! Axum router configuration for all endpoints

use crate::completion::TextCompletion;
use crate::delivery::Mailer;
use crate::server::handlers;
use crate::server::types::AppState;
use axum::routing::{get, post};
use axum::Router;

/// Create the application router over a pipeline state
pub fn create_router<C, M>(state: AppState<C, M>) -> Router
where
    C: TextCompletion + 'static,
    M: Mailer + 'static,
{
    Router::new()
        // Status and version endpoints
        .route("/status", get(handlers::status))
        .route("/version", get(handlers::version))
        // Form endpoints
        .route("/evaluate", post(handlers::evaluate::<C, M>))
        .route("/contact", post(handlers::contact::<C, M>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::renderer_from_config;
    use crate::completion::{MockCompletionClient, MockReply};
    use crate::config::ChartConfig;
    use crate::delivery::MockMailer;
    use crate::pipeline::{EvaluationPipeline, PipelineSettings};
    use crate::server::types::{ErrorResponse, SuccessResponse};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const IDEA_SENTENCE: &str = "Our target users are small bakeries that need a simple \
        subscription for ordering flour, with a monthly price, a growing market and little \
        direct competition from larger suppliers.";

    fn idea() -> String {
        std::iter::repeat(IDEA_SENTENCE).take(5).collect::<Vec<_>>().join(" ")
    }

    fn router_with(
        completion: MockCompletionClient,
        mailer: Arc<MockMailer>,
        expose: bool,
    ) -> Router {
        let pipeline = EvaluationPipeline::new(
            Arc::new(completion),
            mailer,
            renderer_from_config(&ChartConfig::default()),
            PipelineSettings::default(),
        );
        create_router(AppState::new(pipeline, expose))
    }

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_evaluate_success() {
        let mailer = Arc::new(MockMailer::new());
        let app = router_with(MockCompletionClient::sample(), mailer.clone(), false);

        let response = app
            .oneshot(post("/evaluate", json!({"email": "founder@example.com", "idea": idea()})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: SuccessResponse = read(response).await;
        assert!(body.success);
        assert_eq!(mailer.sent()[0].to, "founder@example.com");
    }

    #[tokio::test]
    async fn test_evaluate_validation_failure_is_400() {
        let app = router_with(MockCompletionClient::sample(), Arc::new(MockMailer::new()), false);

        let response = app
            .oneshot(post("/evaluate", json!({"email": "nope", "idea": "short"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read(response).await;
        assert!(!body.success);
        assert_eq!(body.kind, "validation");
        let fields = body.fields.unwrap();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("idea"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = router_with(MockCompletionClient::sample(), Arc::new(MockMailer::new()), false);
        let request = Request::builder()
            .method("POST")
            .uri("/evaluate")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generation_failure_is_500_without_details() {
        let completion = MockCompletionClient::sample()
            .with_narrative(MockReply::Fail("quota exhausted".to_string()));
        let app = router_with(completion, Arc::new(MockMailer::new()), false);

        let response = app
            .oneshot(post("/evaluate", json!({"email": "founder@example.com", "idea": idea()})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = read(response).await;
        assert_eq!(body.kind, "generation");
        assert!(body.details.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_504() {
        let completion = MockCompletionClient::sample().with_delay(Duration::from_secs(51));
        let mailer = Arc::new(MockMailer::new());
        let app = router_with(completion, mailer.clone(), false);

        let response = app
            .oneshot(post("/evaluate", json!({"email": "founder@example.com", "idea": idea()})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body: ErrorResponse = read(response).await;
        assert!(body.error.contains("took too long"));
        assert_eq!(mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_contact_success_and_failure() {
        let app = router_with(MockCompletionClient::sample(), Arc::new(MockMailer::new()), false);
        let response = app
            .oneshot(post("/contact", json!({"email": "v@example.com", "message": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let app = router_with(
            MockCompletionClient::sample(),
            Arc::new(MockMailer::failing("down")),
            true,
        );
        let response = app
            .oneshot(post("/contact", json!({"email": "v@example.com", "message": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = read(response).await;
        assert_eq!(body.kind, "delivery");
        assert!(body.details.unwrap().contains("down"));
    }

    #[tokio::test]
    async fn test_status_and_version() {
        let app = router_with(MockCompletionClient::sample(), Arc::new(MockMailer::new()), false);
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: serde_json::Value = read(response).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
