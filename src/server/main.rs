//! Verification host server.
//!
//! Exposes the pincode verification handlers over HTTP so the onboarding
//! form pipeline can call them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, info_span};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pinverify::config::Config;
use pinverify::models::{VerificationContext, VerificationOutcome, VerificationRequest};
use pinverify::pincode::PincodeClient;
use pinverify::verify::{Variant, VerificationHandler};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Parser, Debug)]
#[command(name = "pinverify-server")]
#[command(about = "Pincode verification server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Log filter, e.g. "info" or "pinverify=debug" (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

/// Application state shared across handlers
struct AppState {
    center_info: VerificationHandler,
    address: VerificationHandler,
}

impl AppState {
    fn new(client: &PincodeClient) -> Self {
        Self {
            center_info: handler_for(client, Variant::CenterInfo),
            address: handler_for(client, Variant::Address),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.server.log_level);
    let filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("Invalid log filter {}", log_level))?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Pincode verification server");
    info!("Lookup service at {}", config.lookup.base_url);

    let client = PincodeClient::new(&config.lookup)?;
    let state = Arc::new(AppState::new(&client));

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listen = args.listen.unwrap_or(config.server.listen);
    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/verify/center-info", post(center_info_handler))
        .route("/v1/verify/address", post(address_handler))
        .with_state(state)
}

fn handler_for(client: &PincodeClient, variant: Variant) -> VerificationHandler {
    let span = info_span!("pincode_verification", variant = variant.name());
    VerificationHandler::new(client.clone(), variant).with_span(span)
}

fn context_from(headers: &HeaderMap) -> VerificationContext {
    VerificationContext {
        request_id: headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    }
}

/// Run one handler; an unreadable body fails like a malformed pincode
async fn run_verification(
    handler: &VerificationHandler,
    headers: &HeaderMap,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Json<VerificationOutcome> {
    let outcome = match payload {
        Ok(Json(payload)) => {
            handler
                .verify_handler(&context_from(headers), &payload)
                .await
        }
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            VerificationOutcome::failure(handler.config().format_error_message)
        }
    };
    Json(outcome)
}

/// Health check endpoint
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Partner center form verification
async fn center_info_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Json<VerificationOutcome> {
    run_verification(&state.center_info, &headers, payload).await
}

/// Address block verification
async fn address_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Json<VerificationOutcome> {
    run_verification(&state.address, &headers, payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pinverify::config::LookupConfig;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> Router {
        let client = PincodeClient::new(&LookupConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap();
        router(Arc::new(AppState::new(&client)))
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app_for(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreadable_body_is_failure_outcome() {
        let server = MockServer::start().await;

        let (status, body) =
            post_json(app_for(&server), "/v1/verify/center-info", "[1, 2]").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "FAILURE", "message": "Pincode must be a 6-digit number"})
        );

        let (status, body) =
            post_json(app_for(&server), "/v1/verify/address", "not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "FAILURE", "message": "Invalid pincode format"})
        );

        assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_failure_outcome() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .method("POST")
            .uri("/v1/verify/address")
            .body(Body::from(r#"{"pincode": "110001"}"#))
            .unwrap();

        let response = app_for(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "FAILURE");
    }

    #[tokio::test]
    async fn test_non_string_address_lines_still_verify() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pincode/110001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "Status": "Success",
                "PostOffice": [{"State": "Delhi", "District": "Central Delhi", "Division": "New Delhi"}]
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let (status, body) = post_json(
            app_for(&server),
            "/v1/verify/center-info",
            r#"{"pincode": 110001, "address_line_1": 42, "address_line_2": "Block C", "landmark": {"a": 1}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "status": "SUCCESS",
                "message": "Pincode verification successful",
                "response": {
                    "city": "New Delhi",
                    "state": "Delhi",
                    "region": "Central Delhi",
                    "pincode": 110001,
                    "address_line_1": null,
                    "address_line_2": "Block C",
                    "address_line_3": null,
                    "landmark": null
                }
            })
        );
    }
}
