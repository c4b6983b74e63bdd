//! Handlers for `/rfis` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/rfis` | Actor params required; optional filter/sort params |
//! | `POST`   | `/rfis` | Body: [`CreateBody`]; returns 201 + stored RFI |
//! | `GET`    | `/rfis/:id` | Visibility-checked; 404 when invisible or absent |
//! | `PATCH`  | `/rfis/:id` | Body: `RfiPatch` |
//! | `POST`   | `/rfis/:id/assign` | Body: `{"assigned_to":"..."}` |
//! | `POST`   | `/rfis/:id/respond` | Body: [`RespondBody`] |
//! | `POST`   | `/rfis/:id/close` | No body |
//! | `POST`   | `/rfis/:id/comments` | Body: [`CommentBody`] |
//! | `POST`   | `/rfis/:id/attachments` | Body: `NewAttachment` |
//! | `DELETE` | `/rfis/:id` | Removes the durable copy only |
//!
//! Authentication happens upstream; the already-authenticated actor arrives
//! as explicit parameters. Filter and sort tokens parse permissively —
//! unknown values are dropped, matching the engine's role as a UI
//! convenience layer.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use siteline_core::{
  actor::{Actor, Role},
  lifecycle::ResponseOutcome,
  query::{RfiFilter, RfiSort, SortDirection, SortField},
  rfi::{Discipline, NewAttachment, NewRfi, Priority, Rfi, RfiPatch, Status},
  service::RfiService,
  store::RfiStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Actor params ────────────────────────────────────────────────────────────

/// The already-authenticated caller, passed explicitly on every request.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorParams {
  pub actor_id:   String,
  pub actor_name: String,
  pub role:       Role,
  pub department: String,
}

impl ActorParams {
  fn into_actor(self) -> Actor {
    Actor {
      id:           self.actor_id,
      display_name: self.actor_name,
      role:         self.role,
      department:   self.department,
    }
  }
}

// ─── List / query ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  // Actor.
  pub actor_id:   String,
  pub actor_name: String,
  pub role:       Role,
  pub department: String,

  // Filter: comma-separated allowed-value sets; unknown tokens dropped.
  pub status:      Option<String>,
  pub priority:    Option<String>,
  pub discipline:  Option<String>,
  pub assigned_to: Option<String>,
  /// Case-insensitive substring over title, rfi_number, description.
  pub text: Option<String>,
  /// Whole days before now bounding `created_at` (e.g. 7, 30, 90).
  pub within_days: Option<String>,

  // Sort.
  pub sort: Option<String>,
  pub dir:  Option<String>,
}

fn csv<T>(raw: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
  raw
    .map(|s| s.split(',').filter_map(|t| parse(t)).collect())
    .unwrap_or_default()
}

impl ListParams {
  fn actor(&self) -> Actor {
    Actor {
      id:           self.actor_id.clone(),
      display_name: self.actor_name.clone(),
      role:         self.role,
      department:   self.department.clone(),
    }
  }

  fn filter(&self) -> RfiFilter {
    RfiFilter {
      statuses:    csv(self.status.as_deref(), Status::parse),
      priorities:  csv(self.priority.as_deref(), Priority::parse),
      disciplines: csv(self.discipline.as_deref(), Discipline::parse),
      assigned_to: csv(self.assigned_to.as_deref(), |t| {
        let t = t.trim();
        (!t.is_empty()).then(|| t.to_owned())
      }),
      text:                self.text.clone(),
      created_within_days: self
        .within_days
        .as_deref()
        .and_then(|d| d.trim().parse().ok()),
    }
  }

  /// An unknown sort field yields no sort at all; the collection stays in
  /// filter-step order.
  fn sort(&self) -> Option<RfiSort> {
    let field = SortField::parse(self.sort.as_deref()?)?;
    let direction = self
      .dir
      .as_deref()
      .and_then(SortDirection::parse)
      .unwrap_or_default();
    Some(RfiSort { field, direction })
  }
}

/// `GET /rfis?actor_id=...&actor_name=...&role=...&department=...[&status=...][&sort=...]`
pub async fn list<S>(
  State(service): State<Arc<RfiService<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Rfi>>, ApiError>
where
  S: RfiStore,
{
  let rows = service
    .query(&params.actor(), &params.filter(), params.sort())
    .await?;
  Ok(Json(rows))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /rfis`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub actor: ActorParams,
  pub rfi:   NewRfi,
}

/// `POST /rfis` — returns 201 + the stored RFI.
pub async fn create<S>(
  State(service): State<Arc<RfiService<S>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RfiStore,
{
  let actor = body.actor.into_actor();
  let rfi = service.create(&actor, body.rfi).await?;
  tracing::info!(rfi_number = %rfi.rfi_number, "created rfi");
  Ok((StatusCode::CREATED, Json(rfi)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /rfis/:id` — an RFI the actor may not see is a plain 404.
pub async fn get_one<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
  Query(actor): Query<ActorParams>,
) -> Result<Json<Rfi>, ApiError>
where
  S: RfiStore,
{
  let rfi = service
    .get(&actor.into_actor(), id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("rfi {id} not found")))?;
  Ok(Json(rfi))
}

// ─── Edit ────────────────────────────────────────────────────────────────────

/// `PATCH /rfis/:id` — body is an `RfiPatch`; absent fields stay untouched.
pub async fn edit<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<RfiPatch>,
) -> Result<Json<Rfi>, ApiError>
where
  S: RfiStore,
{
  let rfi = service.edit(id, patch).await?;
  Ok(Json(rfi))
}

// ─── Assign ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub assigned_to: String,
}

/// `POST /rfis/:id/assign` — idempotent when the assignee is unchanged.
pub async fn assign<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AssignBody>,
) -> Result<Json<Rfi>, ApiError>
where
  S: RfiStore,
{
  let rfi = service.assign(id, &body.assigned_to).await?;
  Ok(Json(rfi))
}

// ─── Respond ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /rfis/:id/respond`.
#[derive(Debug, Deserialize)]
pub struct RespondBody {
  pub actor:    ActorParams,
  pub response: String,
  pub outcome:  ResponseOutcome,
}

/// `POST /rfis/:id/respond` — overwrites any earlier response triple.
pub async fn respond<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RespondBody>,
) -> Result<Json<Rfi>, ApiError>
where
  S: RfiStore,
{
  let actor = body.actor.into_actor();
  let rfi = service
    .respond(id, &actor, &body.response, body.outcome)
    .await?;
  tracing::info!(rfi_number = %rfi.rfi_number, status = %rfi.status, "responded");
  Ok(Json(rfi))
}

// ─── Close ───────────────────────────────────────────────────────────────────

/// `POST /rfis/:id/close` — administrative shortcut, no response recorded.
pub async fn close<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Rfi>, ApiError>
where
  S: RfiStore,
{
  let rfi = service.close(id).await?;
  Ok(Json(rfi))
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub actor: ActorParams,
  pub body:  String,
}

/// `POST /rfis/:id/comments`
pub async fn comment<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<Json<Rfi>, ApiError>
where
  S: RfiStore,
{
  let actor = body.actor.into_actor();
  let rfi = service.comment(id, &actor, &body.body).await?;
  Ok(Json(rfi))
}

// ─── Attachments ─────────────────────────────────────────────────────────────

/// `POST /rfis/:id/attachments` — metadata only, no binary handling.
pub async fn attach<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewAttachment>,
) -> Result<Json<Rfi>, ApiError>
where
  S: RfiStore,
{
  let rfi = service.attach(id, body).await?;
  Ok(Json(rfi))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /rfis/:id` — removes the durable copy; seed entries stay.
pub async fn remove<S>(
  State(service): State<Arc<RfiService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RfiStore,
{
  service.remove(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
