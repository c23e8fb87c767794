pub mod middleware;
mod state;
pub mod tasks;

pub use state::AppState;
pub use tasks::ApiError;

use crate::store::TaskStore;
use axum::{middleware::from_fn, Router};

/// Builds the task API over `store`, with CORS and request logging applied
/// to every route.
pub fn create_router(store: impl TaskStore + 'static) -> Router {
    router_with_state(AppState::new(store))
}

pub fn router_with_state(state: AppState) -> Router {
    Router::new()
        .merge(tasks::create_router())
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::trace_requests))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_preflight_is_answered_for_any_route() {
        let app = create_router(MemoryStore::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/tasks/abc/subtasks/def/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "GET,POST,PUT,DELETE,OPTIONS"
        );
    }

    #[tokio::test]
    async fn test_regular_responses_allow_any_origin() {
        let app = create_router(MemoryStore::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/tasks")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
