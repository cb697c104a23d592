//! HTTP + WebSocket render feed for Specter
//!
//! Endpoints:
//! - GET  /health                    - Health check
//! - GET  /instruments               - Status of every instrument
//! - GET  /instruments/:kind         - Latest frame
//! - POST /instruments/:kind/start   - Start an instrument
//! - POST /instruments/:kind/stop    - Stop an instrument
//! - PUT  /settings/sensitivity      - Set radar sensitivity
//! - POST /tab                       - Switch tab, returns audio mode
//! - WS   /ws/:kind                  - One JSON frame per tick

use axum::{
    extract::{ws::{Message, WebSocket}, Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::core::session::{InstrumentStatus, Session};
use crate::types::{AudioMode, EngineError, Frame, InstrumentKind, Tab, UserSettings};

/// App state
pub struct AppState {
    pub session: RwLock<Session>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub instruments_running: usize,
}

/// Instrument listing
#[derive(Debug, Serialize)]
pub struct InstrumentsResponse {
    pub tab: Option<Tab>,
    pub premium_locked: bool,
    pub instruments: Vec<InstrumentStatus>,
}

/// Sensitivity update request
#[derive(Debug, Deserialize)]
pub struct SensitivityRequest {
    pub value: f64,
}

/// Tab switch request
#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: String,
}

/// Tab switch response
#[derive(Debug, Serialize)]
pub struct TabResponse {
    pub tab: Tab,
    pub audio: AudioMode,
}

/// Create the API router around an existing session
pub fn create_router(session: Session) -> Router {
    let state = Arc::new(AppState {
        session: RwLock::new(session),
    });

    Router::new()
        .route("/health", get(health))
        .route("/instruments", get(list_instruments))
        .route("/instruments/:kind", get(get_frame))
        .route("/instruments/:kind/start", post(start_instrument))
        .route("/instruments/:kind/stop", post(stop_instrument))
        .route("/settings/sensitivity", put(set_sensitivity))
        .route("/tab", post(switch_tab))
        .route("/ws/:kind", get(websocket_handler))
        .with_state(state)
}

fn parse_kind(raw: &str) -> Result<InstrumentKind, StatusCode> {
    raw.parse().map_err(|_| StatusCode::NOT_FOUND)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let session = state.session.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        instruments_running: InstrumentKind::ALL
            .iter()
            .filter(|&&k| session.is_running(k))
            .count(),
    })
}

async fn list_instruments(State(state): State<Arc<AppState>>) -> Json<InstrumentsResponse> {
    let session = state.session.read().await;
    Json(InstrumentsResponse {
        tab: session.tab(),
        premium_locked: session.premium_locked(),
        instruments: session.status(),
    })
}

async fn get_frame(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<Frame>, StatusCode> {
    let kind = parse_kind(&kind)?;
    let session = state.session.read().await;
    Ok(Json(session.frame(kind)))
}

async fn start_instrument(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<Frame>, StatusCode> {
    let kind = parse_kind(&kind)?;
    let mut session = state.session.write().await;
    session.start(kind).await;
    Ok(Json(session.frame(kind)))
}

async fn stop_instrument(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<Frame>, StatusCode> {
    let kind = parse_kind(&kind)?;
    let mut session = state.session.write().await;
    session.stop(kind).await;
    Ok(Json(session.frame(kind)))
}

async fn set_sensitivity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SensitivityRequest>,
) -> Result<Json<UserSettings>, StatusCode> {
    let mut session = state.session.write().await;
    session.set_sensitivity(req.value).await.map_err(|e| match e {
        EngineError::InvalidSensitivity(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    })?;
    Ok(Json(session.settings().clone()))
}

async fn switch_tab(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TabRequest>,
) -> Result<Json<TabResponse>, StatusCode> {
    let tab: Tab = req.tab.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let mut session = state.session.write().await;
    let audio = session.switch_tab(tab).await;
    Ok(Json(TabResponse { tab, audio }))
}

/// WebSocket handler for live frames
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    ws: Option<WebSocketUpgrade>,
) -> Result<impl IntoResponse, StatusCode> {
    let kind = parse_kind(&kind)?;
    let ws = ws.ok_or(StatusCode::UPGRADE_REQUIRED)?;
    let session = state.session.read().await;
    let response = match kind {
        InstrumentKind::Emf => {
            let rx = session.emf_feed();
            ws.on_upgrade(move |socket| forward_frames(socket, rx))
        }
        InstrumentKind::Radar => {
            let rx = session.radar_feed();
            ws.on_upgrade(move |socket| forward_frames(socket, rx))
        }
        InstrumentKind::Magnetometer => {
            let rx = session.magnetometer_feed();
            ws.on_upgrade(move |socket| forward_frames(socket, rx))
        }
    };
    Ok(response)
}

/// Push every published frame until either side goes away
async fn forward_frames<F>(socket: WebSocket, mut rx: watch::Receiver<F>)
where
    F: Clone + Into<Frame> + Send + Sync + 'static,
{
    let (mut sender, mut receiver) = socket.split();
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame: Frame = rx.borrow_and_update().clone().into();
                let json = serde_json::to_string(&frame).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    debug!("websocket feed closed");
}

/// Run the API server
pub async fn run_server(addr: &str, session: Session) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(session);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "render feed listening");
    println!("👻 Specter render feed running on {}", addr);
    println!("  GET  /health                  - Health check");
    println!("  GET  /instruments             - Instrument status");
    println!("  GET  /instruments/:kind       - Latest frame");
    println!("  POST /instruments/:kind/start - Start instrument");
    println!("  POST /instruments/:kind/stop  - Stop instrument");
    println!("  PUT  /settings/sensitivity    - Radar sensitivity");
    println!("  POST /tab                     - Switch tab");
    println!("  WS   /ws/:kind                - Live frames");
    axum::serve(listener, router).await?;
    Ok(())
}
