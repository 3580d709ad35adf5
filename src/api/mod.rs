//! HTTP API
//!
//! Thin JSON layer over `SentinelService`. The `/api/...` paths are kept
//! for dashboards built against the first deployment of the service.

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::deployment::types::DeploymentResult;
use crate::error::SentinelError;
use crate::service::SentinelService;
use types::{DeployRequest, ErrorBody, LedgerStatus, StatusResponse, TipRequest, TipResponse};

pub fn router(service: Arc<SentinelService>) -> Router {
    Router::new()
        .route("/regions", get(list_regions))
        .route("/deploy", post(deploy))
        .route("/tip_webhook", post(tip_webhook))
        .route("/status", get(status))
        .route("/api/forests", get(list_regions))
        .route("/api/deploy_forest", post(deploy))
        .route("/api/sms_webhook", post(tip_webhook))
        .route("/api/status", get(status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the API until the listener fails
pub async fn run_server(bind: &str, service: Arc<SentinelService>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("HTTP API listening on {}", bind);
    axum::serve(listener, router(service)).await?;
    Ok(())
}

impl IntoResponse for SentinelError {
    fn into_response(self) -> Response {
        let status = match self {
            SentinelError::UnknownRegion(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

async fn list_regions(State(service): State<Arc<SentinelService>>) -> Json<Vec<String>> {
    Json(service.region_names())
}

async fn deploy(
    State(service): State<Arc<SentinelService>>,
    Json(req): Json<DeployRequest>,
) -> Result<Json<DeploymentResult>, SentinelError> {
    let result = service.deploy(&req.region_name, req.live_analysis).await?;
    Ok(Json(result))
}

async fn tip_webhook(
    State(service): State<Arc<SentinelService>>,
    Json(req): Json<TipRequest>,
) -> Json<TipResponse> {
    let receipt = service.submit_tip(&req.sender, &req.message);
    Json(TipResponse {
        status: "Logged",
        tx_hash: receipt.tx_hash,
    })
}

async fn status(State(service): State<Arc<SentinelService>>) -> Json<StatusResponse> {
    let snapshot = service.status();
    Json(StatusResponse {
        system_status: "ONLINE",
        nodes: snapshot.nodes,
        alerts: snapshot.alerts,
        sms_logs: snapshot.sms_logs,
        blockchain: LedgerStatus {
            height: snapshot.height,
        },
    })
}
