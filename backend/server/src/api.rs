//! Axum REST API handlers.
//!
//! Every handler runs its operation inside one SQLite transaction. Handlers
//! that write additionally hold `write_lock` for the whole transaction, so
//! check-then-act sequences (assign, transfer, ...) never interleave.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use charity_boxes::{
    operations, BoxId, CollectionBox, EventId, FinancialReportEntry, FundraisingEvent,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::SqliteRepository;
use crate::errors::{Result, ServerError};

pub struct ApiState {
    pub pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl ApiState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<SqliteRepository> {
        SqliteRepository::begin(&self.pool).await
    }

    async fn write(&self) -> Result<(MutexGuard<'_, ()>, SqliteRepository)> {
        let guard = self.write_lock.lock().await;
        let repo = SqliteRepository::begin(&self.pool).await?;
        Ok((guard, repo))
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/boxes", post(create_box).get(list_boxes))
        .route("/api/boxes/:id", delete(delete_box))
        .route("/api/boxes/:id/money", patch(put_money))
        .route("/api/boxes/:id/empty", patch(empty_box))
        .route("/api/events", post(create_default_event).delete(delete_event))
        .route("/api/events/custom-event", post(create_event))
        .route("/api/events/all", get(list_events))
        .route("/api/events/financial-report", get(financial_report))
        .route("/api/events/:event_id/boxes/:box_id", patch(assign_box))
        .route("/api/events/:event_id/unregister", delete(unassign_box))
        .route("/api/events/:event_id/transfer", post(transfer))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Extractors
// ─────────────────────────────────────────────────────────

/// [`Path`] whose rejection is reported as a JSON [`ServerError`].
pub struct ApiPath<T>(pub T);

/// [`Query`] whose rejection is reported as a JSON [`ServerError`].
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Deserialize)]
pub struct MoneyParams {
    pub currency: Option<String>,
    pub amount: f64,
}

#[derive(Deserialize)]
pub struct CustomEventParams {
    pub name: String,
    pub currency: String,
}

#[derive(Deserialize)]
pub struct EventIdParams {
    pub id: EventId,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/boxes`
pub async fn create_box(State(state): State<Arc<ApiState>>) -> Result<Json<CollectionBox>> {
    let (_guard, mut repo) = state.write().await?;
    let created = operations::register_box(&mut repo).await?;
    repo.commit().await?;
    Ok(Json(created))
}

/// `GET /api/boxes`
pub async fn list_boxes(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<CollectionBox>>> {
    let mut repo = state.read().await?;
    Ok(Json(operations::list_boxes(&mut repo).await?))
}

/// `DELETE /api/boxes/:id`
pub async fn delete_box(
    State(state): State<Arc<ApiState>>,
    ApiPath(id): ApiPath<BoxId>,
) -> Result<StatusCode> {
    let (_guard, mut repo) = state.write().await?;
    operations::unregister_box(&mut repo, id).await?;
    repo.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/boxes/:id/money?currency=EUR&amount=50`
pub async fn put_money(
    State(state): State<Arc<ApiState>>,
    ApiPath(id): ApiPath<BoxId>,
    ApiQuery(params): ApiQuery<MoneyParams>,
) -> Result<Json<CollectionBox>> {
    let (_guard, mut repo) = state.write().await?;
    let updated =
        operations::deposit(&mut repo, id, params.currency.as_deref(), params.amount).await?;
    repo.commit().await?;
    Ok(Json(updated))
}

/// `PATCH /api/boxes/:id/empty`
pub async fn empty_box(
    State(state): State<Arc<ApiState>>,
    ApiPath(id): ApiPath<BoxId>,
) -> Result<Json<CollectionBox>> {
    let (_guard, mut repo) = state.write().await?;
    let emptied = operations::empty_box(&mut repo, id).await?;
    repo.commit().await?;
    Ok(Json(emptied))
}

/// `POST /api/events`
pub async fn create_default_event(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<FundraisingEvent>> {
    let (_guard, mut repo) = state.write().await?;
    let created = operations::create_default_event(&mut repo).await?;
    repo.commit().await?;
    Ok(Json(created))
}

/// `POST /api/events/custom-event?name=Gala&currency=EUR`
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    ApiQuery(params): ApiQuery<CustomEventParams>,
) -> Result<Json<FundraisingEvent>> {
    let (_guard, mut repo) = state.write().await?;
    let created = operations::create_event(&mut repo, &params.name, &params.currency).await?;
    repo.commit().await?;
    Ok(Json(created))
}

/// `GET /api/events/all`
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<FundraisingEvent>>> {
    let mut repo = state.read().await?;
    Ok(Json(operations::list_events(&mut repo).await?))
}

/// `GET /api/events/financial-report`
pub async fn financial_report(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<FinancialReportEntry>>> {
    let mut repo = state.read().await?;
    Ok(Json(operations::financial_report(&mut repo).await?))
}

/// `DELETE /api/events?id=...`
pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    ApiQuery(params): ApiQuery<EventIdParams>,
) -> Result<StatusCode> {
    let (_guard, mut repo) = state.write().await?;
    operations::delete_event(&mut repo, params.id).await?;
    repo.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/events/:event_id/boxes/:box_id`
pub async fn assign_box(
    State(state): State<Arc<ApiState>>,
    ApiPath((event_id, box_id)): ApiPath<(EventId, BoxId)>,
) -> Result<Json<FundraisingEvent>> {
    let (_guard, mut repo) = state.write().await?;
    let event = operations::assign_box(&mut repo, event_id, box_id).await?;
    repo.commit().await?;
    Ok(Json(event))
}

/// `DELETE /api/events/:event_id/unregister`
pub async fn unassign_box(
    State(state): State<Arc<ApiState>>,
    ApiPath(event_id): ApiPath<EventId>,
) -> Result<Json<FundraisingEvent>> {
    let (_guard, mut repo) = state.write().await?;
    let event = operations::unassign_box(&mut repo, event_id).await?;
    repo.commit().await?;
    Ok(Json(event))
}

/// `POST /api/events/:event_id/transfer`
pub async fn transfer(
    State(state): State<Arc<ApiState>>,
    ApiPath(event_id): ApiPath<EventId>,
) -> Result<Json<FundraisingEvent>> {
    let (_guard, mut repo) = state.write().await?;
    let event = operations::transfer(&mut repo, event_id).await?;
    repo.commit().await?;
    Ok(Json(event))
}
