//! HttpStorage against a mock ticket API served by axum.

#![cfg(feature = "http-storage")]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use triage_core::{
    storage::{HttpStorage, MemoryStorage},
    BoardConfig, Dashboard, DragOutcome, DropTarget, Storage, Ticket, TicketId, TicketStatus,
    TriageError,
};

type ApiResult<T> = std::result::Result<Json<T>, StatusCode>;

#[derive(Clone)]
struct MockState {
    tickets: Arc<MemoryStorage>,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: TicketStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest {
    ticket_ids: Vec<TicketId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest {
    status: TicketStatus,
    target_index: usize,
}

fn to_status(err: TriageError) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn list(State(state): State<MockState>) -> ApiResult<Vec<Ticket>> {
    state.tickets.get_tickets().await.map(Json).map_err(to_status)
}

async fn update_status(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> ApiResult<Ticket> {
    state
        .tickets
        .update_ticket_status(&TicketId::new(id), request.status)
        .await
        .map(Json)
        .map_err(to_status)
}

async fn reorder(
    State(state): State<MockState>,
    Json(request): Json<ReorderRequest>,
) -> ApiResult<Vec<Ticket>> {
    state
        .tickets
        .reorder_tickets(&request.ticket_ids)
        .await
        .map(Json)
        .map_err(to_status)
}

async fn move_ticket(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<Vec<Ticket>> {
    state
        .tickets
        .move_ticket_to_column(&TicketId::new(id), request.status, request.target_index)
        .await
        .map(Json)
        .map_err(to_status)
}

async fn refresh(State(state): State<MockState>) -> ApiResult<serde_json::Value> {
    let tickets = state.tickets.refresh_tickets().await.map_err(to_status)?;
    Ok(Json(serde_json::json!({
        "message": "Tickets refreshed",
        "tickets": tickets,
    })))
}

async fn broken() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn spawn_mock_server() -> (String, oneshot::Sender<()>) {
    let state = MockState {
        tickets: Arc::new(MemoryStorage::new()),
    };
    let app = Router::new()
        .route("/api/tickets", get(list))
        .route("/api/tickets/reorder", post(reorder))
        .route("/api/tickets/refresh", post(refresh))
        .route("/api/tickets/:id", patch(update_status))
        .route("/api/tickets/:id/move", post(move_ticket))
        .route("/broken/tickets", get(broken))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server listener");
    let address: SocketAddr = listener.local_addr().expect("mock listener local addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("run mock server");
    });
    (format!("http://{address}"), shutdown_tx)
}

fn ids(tickets: &[Ticket]) -> Vec<&str> {
    tickets.iter().map(|t| t.id.as_str()).collect()
}

#[tokio::test]
async fn test_http_storage_round_trips_every_operation() {
    let (base_url, shutdown) = spawn_mock_server().await;
    let storage = HttpStorage::new(format!("{base_url}/api/")).unwrap();

    let tickets = storage.get_tickets().await.unwrap();
    assert_eq!(tickets.len(), 8);
    assert_eq!(tickets[0].id.as_str(), "TKT-001");

    let updated = storage
        .update_ticket_status(&TicketId::new("TKT-003"), TicketStatus::AiResolved)
        .await
        .unwrap();
    assert_eq!(updated.status, TicketStatus::AiResolved);

    let reordered = storage
        .reorder_tickets(&[TicketId::new("TKT-002"), TicketId::new("TKT-001")])
        .await
        .unwrap();
    assert_eq!(ids(&reordered), vec!["TKT-002", "TKT-001"]);

    let moved = storage
        .move_ticket_to_column(&TicketId::new("TKT-001"), TicketStatus::Escalated, 0)
        .await
        .unwrap();
    let escalated: Vec<&Ticket> = moved
        .iter()
        .filter(|t| t.status == TicketStatus::Escalated)
        .collect();
    assert_eq!(escalated[0].id.as_str(), "TKT-001");

    let refreshed = storage.refresh_tickets().await.unwrap();
    assert_eq!(refreshed.len(), 8);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_http_storage_maps_errors() {
    let (base_url, shutdown) = spawn_mock_server().await;

    let storage = HttpStorage::new(format!("{base_url}/api")).unwrap();
    let err = storage
        .move_ticket_to_column(&TicketId::new("TKT-404"), TicketStatus::Escalated, 0)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let broken = HttpStorage::new(format!("{base_url}/broken")).unwrap();
    let err = broken.get_tickets().await.unwrap_err();
    assert!(matches!(err, TriageError::Http(_)));
    assert!(err.is_persistence_failure());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_dashboard_moves_ticket_over_http() {
    let (base_url, shutdown) = spawn_mock_server().await;
    let storage = Arc::new(HttpStorage::new(format!("{base_url}/api")).unwrap());
    let mut dashboard = Dashboard::new(storage.clone(), BoardConfig::default());
    dashboard.load().await.unwrap();

    let pending = dashboard
        .tickets()
        .iter()
        .find(|t| t.status == TicketStatus::PendingApproval)
        .map(|t| t.id.clone())
        .expect("demo data has a pending ticket");

    assert!(dashboard.drag_start(&pending));
    dashboard.drag_over(Some(&DropTarget::Column(TicketStatus::Escalated)));
    let outcome = dashboard
        .finish_drag(Some(&DropTarget::Column(TicketStatus::Escalated)))
        .await;
    assert_eq!(outcome, Some(DragOutcome::CommittedMove));

    let remote = storage.get_tickets().await.unwrap();
    assert_eq!(remote, dashboard.tickets());
    let moved = remote.iter().find(|t| t.id == pending).unwrap();
    assert_eq!(moved.status, TicketStatus::Escalated);

    let _ = shutdown.send(());
}
