mod handlers;
mod state;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use state::AppState;

/// CORS for the API. An empty allow-list or `*` means any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET]))
}

pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/news", get(handlers::news))
        .layer(cors)
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn start<F>(host: &str, port: u16, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("geonews API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Coordinate, LocationType};
    use crate::news::{builtin_fallback, NewsItem, NewsStore};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    const ORIGIN: &str = "https://takumi-egg.github.io";

    fn router(store: Arc<NewsStore>) -> Router {
        let state = Arc::new(AppState {
            store,
            fallback: builtin_fallback(),
        });
        build_router(state, cors_layer(&[ORIGIN.to_string()]).unwrap())
    }

    async fn get_news(app: Router, origin: Option<&str>) -> (StatusCode, axum::http::HeaderMap, Vec<NewsItem>) {
        let mut req = Request::builder().uri("/api/news");
        if let Some(o) = origin {
            req = req.header(header::ORIGIN, o);
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_empty_store_serves_fallback() {
        let (status, _, items) = get_news(router(Arc::new(NewsStore::new())), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(items, builtin_fallback());
    }

    #[tokio::test]
    async fn test_live_dataset_served() {
        let store = Arc::new(NewsStore::new());
        let live = vec![NewsItem {
            title: "札幌市で雪まつり".into(),
            link: "https://example.jp/1".into(),
            description: "概要なし".into(),
            coords: Coordinate::new(43.0621, 141.3544),
            location_type: LocationType::City,
        }];
        store.publish(live.clone());

        let (status, _, items) = get_news(router(store), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(items, live);
    }

    #[tokio::test]
    async fn test_wire_format() {
        let app = router(Arc::new(NewsStore::new()));
        let resp = app
            .oneshot(Request::builder().uri("/api/news").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json[0]["coords"], serde_json::json!([35.7101, 139.8107]));
        assert_eq!(json[0]["location_type"], "prefecture");
        assert_eq!(json[0]["link"], "#");
    }

    #[tokio::test]
    async fn test_cors_allowed_origin() {
        let (_, headers, _) = get_news(router(Arc::new(NewsStore::new())), Some(ORIGIN)).await;
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ORIGIN
        );
    }

    #[tokio::test]
    async fn test_cors_foreign_origin() {
        let (status, headers, _) =
            get_news(router(Arc::new(NewsStore::new())), Some("https://evil.example")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[test]
    fn test_cors_rejects_bad_origin() {
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["*".to_string()]).is_ok());
    }
}
