use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use datacat_core::{Converter, DatacatConfig, ReturnFormat, SiteVariant, both_output, fetch_url};
use serde_json::{Value, json};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::{ApiError, EXPECTED_JSON, INVALID_SCHEME, MISSING_URL};
use crate::persist::persist_raw;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub config: DatacatConfig,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let config = DatacatConfig::builder().timeout(settings.fetch_timeout).build();
        Self { settings: Arc::new(settings), config }
    }
}

/// A validated `POST /api/v1/scrape` body.
#[derive(Debug)]
struct ScrapeRequest {
    url: String,
    site_hint: Option<SiteVariant>,
    return_format: ReturnFormat,
    html: Option<String>,
}

impl ScrapeRequest {
    fn parse(headers: &HeaderMap, body: &[u8]) -> Result<Self, ApiError> {
        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let value: Option<Value> = if is_json { serde_json::from_slice(body).ok() } else { None };
        let object = value
            .as_ref()
            .and_then(Value::as_object)
            .filter(|o| !o.is_empty())
            .ok_or(ApiError::BadRequest(EXPECTED_JSON))?;

        let text = |key: &str| object.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty());

        let url = text("url").ok_or(ApiError::BadRequest(MISSING_URL))?;
        if !Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https")) {
            return Err(ApiError::BadRequest(INVALID_SCHEME));
        }

        Ok(Self {
            url: url.to_string(),
            // unrecognised hints behave like an unknown site
            site_hint: text("site_hint").map(|hint| hint.parse().unwrap_or(SiteVariant::Unknown)),
            return_format: text("return_format").and_then(|f| f.parse().ok()).unwrap_or_default(),
            html: object.get("html").and_then(Value::as_str).map(str::to_string),
        })
    }
}

/// Build the application router with its middleware stack.
pub fn router(state: AppState) -> Router {
    let request_timeout = state.settings.request_timeout();

    Router::new()
        .route("/", get(health))
        .route("/api/v1/scrape", post(scrape))
        .layer(middleware::from_fn(request_span))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Runs each request inside a span carrying a fresh request id.
async fn request_span(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path()
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

pub async fn scrape(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Result<Response, ApiError> {
    let started = Instant::now();
    let request = ScrapeRequest::parse(&headers, &body).inspect_err(|e| tracing::debug!(?e, "rejected request"))?;
    let url = request.url.as_str();

    tracing::info!(url, site_hint = ?request.site_hint, format = %request.return_format, "scrape requested");

    let html = match request.html {
        Some(html) => html,
        None => fetch_url(url, &state.config.fetch).await.map_err(|e| {
            tracing::error!(url, error = %e, "scraper failed");
            ApiError::Scraper(e.to_string())
        })?,
    };

    let converter = Converter::with_config(DatacatConfig { site_hint: request.site_hint, ..state.config.clone() });
    let page_url = request.url.clone();
    let page = tokio::task::spawn_blocking(move || converter.scrape_html(&html, &page_url))
        .await
        .map_err(ApiError::conversion)?
        .map_err(|e| {
            tracing::error!(url, error = %e, "dcat conversion failed");
            ApiError::conversion(e)
        })?;

    // the raw scrape is kept even when assembly fails
    if let Some(dir) = &state.settings.output_dir {
        persist_raw(dir, url, &page.raw).await;
    }

    let conversion = page.into_conversion().map_err(|e| {
        tracing::error!(url, error = %e, "dcat conversion failed");
        ApiError::conversion(e)
    })?;

    let record = &conversion.record;
    let response = match request.return_format {
        ReturnFormat::JsonLd => Json(record.to_value().map_err(ApiError::conversion)?).into_response(),
        ReturnFormat::Turtle => {
            let ttl = record.to_turtle().map_err(ApiError::conversion)?;
            ([(CONTENT_TYPE, "text/turtle; charset=utf-8")], ttl).into_response()
        }
        ReturnFormat::Both => {
            let envelope = both_output(record, started.elapsed().as_secs_f64()).map_err(ApiError::conversion)?;
            Json(envelope).into_response()
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const PAGE: &str = r#"
        <h1>Air Quality</h1>
        <p>Hourly "PM2.5" readings.</p>
        <a href="/files/aq.csv">Readings</a>
    "#;

    fn app() -> Router {
        router(AppState::new(Settings::default()))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/scrape")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, headers, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key(REQUEST_ID_HEADER));
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_rejects_non_json_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scrape")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from(r#"{"url": "https://x.org"}"#))
            .unwrap();
        let (status, body) = send_json(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], EXPECTED_JSON);
    }

    #[tokio::test]
    async fn test_rejects_empty_object() {
        let (status, body) = send_json(app(), post_json(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], EXPECTED_JSON);
    }

    #[tokio::test]
    async fn test_rejects_missing_url() {
        let (status, body) = send_json(app(), post_json(json!({"url": 42}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_URL);
    }

    #[tokio::test]
    async fn test_rejects_non_web_scheme() {
        for url in ["ftp://x.org/data.csv", "x.org/data"] {
            let (status, body) = send_json(app(), post_json(json!({"url": url}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], INVALID_SCHEME);
        }
    }

    #[tokio::test]
    async fn test_jsonld_from_inline_html() {
        let request = post_json(json!({"url": "https://data.example.org/aq", "html": PAGE}));
        let (status, body) = send_json(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["@context"], "https://www.w3.org/ns/dcat.jsonld");
        assert_eq!(body["dcat:Dataset"]["dct:title"], "Air Quality");
        assert_eq!(
            body["dcat:Dataset"]["dcat:distribution"][0]["dcat:accessURL"],
            "https://data.example.org/files/aq.csv"
        );
    }

    #[tokio::test]
    async fn test_unknown_format_falls_back_to_jsonld() {
        let request = post_json(json!({"url": "https://data.example.org/aq", "html": PAGE, "return_format": "xml"}));
        let (status, body) = send_json(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["dcat:Dataset"].is_object());
    }

    #[tokio::test]
    async fn test_turtle_response() {
        let request = post_json(json!({"url": "https://data.example.org/aq", "html": PAGE, "return_format": "TTL"}));
        let (status, headers, body) = send(app(), request).await;
        let ttl = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(headers[CONTENT_TYPE].to_str().unwrap().starts_with("text/turtle"));
        assert!(ttl.contains(r#"dct:description "Hourly \"PM2.5\" readings.""#));
    }

    #[tokio::test]
    async fn test_both_envelope() {
        let request = post_json(json!({"url": "https://data.example.org/aq", "html": PAGE, "return_format": "both"}));
        let (status, body) = send_json(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dcat_jsonld"]["dcat:Dataset"]["dct:title"], "Air Quality");
        assert!(body["dcat_ttl"].as_str().unwrap().starts_with("@prefix"));
        assert!(body["elapsed_seconds"].is_number());
    }

    #[tokio::test]
    async fn test_site_hint() {
        let page = r#"<h1>T</h1><div class="dataset-metadata">
            <div class="text-xs"><label>Source organisation</label><p>Ministry of Rain</p></div></div>"#;
        let request = post_json(json!({"url": "https://mirror.example.org/t", "html": page, "site_hint": "AIKOSH"}));
        let (_, body) = send_json(app(), request).await;
        assert_eq!(body["dcat:Dataset"]["dct:publisher"]["foaf:name"], "Ministry of Rain");

        let request = post_json(json!({"url": "https://mirror.example.org/t", "html": page, "site_hint": "other"}));
        let (_, body) = send_json(app(), request).await;
        assert_eq!(body["dcat:Dataset"]["dct:publisher"]["foaf:name"], "mirror.example.org");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_scraper_error() {
        let request = post_json(json!({"url": "http://127.0.0.1:9/unreachable"}));
        let (status, body) = send_json(app(), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "scraper failed");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_raw_scrape_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { output_dir: Some(dir.path().to_path_buf()), ..Settings::default() };

        let request = post_json(json!({"url": "https://data.example.org/sets/air-quality", "html": PAGE}));
        let (status, _) = send_json(router(AppState::new(settings)), request).await;
        assert_eq!(status, StatusCode::OK);

        let stored = std::fs::read_to_string(dir.path().join("air-quality.json")).unwrap();
        let raw: Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(raw["Title"], "Air Quality");
        assert_eq!(raw["URL"], "https://data.example.org/sets/air-quality");
    }
}
