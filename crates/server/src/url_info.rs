//! `GET {prefix}<url>` lookup endpoint.
//!
//! Always answers `200 {"safe": <bool>}`. An unknown URL and an unsafe URL
//! produce the same body.

use axum::{Json, extract::State, http::Uri};
use serde::{Deserialize, Serialize};

use crate::handler::SharedState;

/// Response body for the lookup endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyResponse {
    pub safe: bool,
}

/// Strip the mount prefix from the escaped request target.
pub fn target_tail<'a>(uri: &'a Uri, prefix: &str) -> &'a str {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or_else(|| uri.path());
    target.strip_prefix(prefix).unwrap_or("")
}

pub async fn url_info(State(state): State<SharedState>, uri: Uri) -> Json<SafetyResponse> {
    let raw = target_tail(&uri, &state.prefix);
    let safe = state.lookup.check(raw).await;
    tracing::debug!(tail = raw, safe, "url_info");
    Json(SafetyResponse { safe })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;
    use urlinfo_core::{LookupService, UrlKey, UrlRecord, VerdictDb};

    const PREFIX: &str = "/urlinfo/1/";

    async fn app(records: &[UrlRecord]) -> axum::Router {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        db.put_records(records).await.unwrap();
        router(LookupService::new(Arc::new(db)), PREFIX)
    }

    async fn get_safety(app: axum::Router, uri: &str) -> (StatusCode, SafetyResponse) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_target_tail_keeps_query_and_escapes() {
        let uri: Uri = "/urlinfo/1/Example.com/a%20b?q=1&r=2".parse().unwrap();
        assert_eq!(target_tail(&uri, PREFIX), "Example.com/a%20b?q=1&r=2");
    }

    #[test]
    fn test_target_tail_without_prefix() {
        let uri: Uri = "/other/path".parse().unwrap();
        assert_eq!(target_tail(&uri, PREFIX), "");
    }

    #[test]
    fn test_response_body_shape() {
        let body = serde_json::to_string(&SafetyResponse { safe: false }).unwrap();
        assert_eq!(body, r#"{"safe":false}"#);
    }

    #[tokio::test]
    async fn test_seeded_url_is_safe() {
        let app = app(&[UrlRecord::new(UrlKey::new("www.sitea.com", "path?"), true)]).await;

        let (status, body) = get_safety(app, "/urlinfo/1/www.sitea.com/path").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, SafetyResponse { safe: true });
    }

    #[tokio::test]
    async fn test_different_query_is_unsafe() {
        let app = app(&[UrlRecord::new(UrlKey::new("www.sitea.com", "path?"), true)]).await;

        let (status, body) = get_safety(app, "/urlinfo/1/www.sitea.com/path?z=9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, SafetyResponse { safe: false });
    }

    #[tokio::test]
    async fn test_host_case_and_query_order_match() {
        let app = app(&[UrlRecord::new(UrlKey::new("www.siteb.com", "complex/path?complex=yes&query=yes"), true)]).await;

        let (_, body) = get_safety(app, "/urlinfo/1/WWW.SiteB.com/complex/path?query=yes&complex=yes").await;
        assert!(body.safe);
    }

    #[tokio::test]
    async fn test_unknown_url_is_unsafe() {
        let app = app(&[]).await;

        let (status, body) = get_safety(app, "/urlinfo/1/nosuch.com/path").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.safe);
    }

    #[tokio::test]
    async fn test_bare_prefix_is_unsafe() {
        let app = app(&[]).await;

        let (status, body) = get_safety(app, "/urlinfo/1/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.safe);
    }

    #[tokio::test]
    async fn test_outside_prefix_not_found() {
        let app = app(&[]).await;

        let response = app
            .oneshot(Request::builder().uri("/other/x").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
