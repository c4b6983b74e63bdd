//! JSON REST API for Siteline.
//!
//! Exposes an axum [`Router`] backed by an
//! [`RfiService`](siteline_core::service::RfiService) over any
//! [`RfiStore`](siteline_core::store::RfiStore). Auth, TLS, and transport
//! concerns are the caller's responsibility.

pub mod error;
pub mod rfis;

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use siteline_core::{
  actor::CompanyDirectory, service::RfiService, store::RfiStore,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SITELINE_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Optional JSON file holding the fixed seed/reference collection.
  #[serde(default)]
  pub seed_path: Option<PathBuf>,
  /// Department → canonical company name.
  #[serde(default)]
  pub companies: HashMap<String, String>,
  /// Fallback company for admin actors with an unlisted department.
  #[serde(default)]
  pub admin_company: Option<String>,
}

impl ServerConfig {
  pub fn directory(&self) -> CompanyDirectory {
    CompanyDirectory::new(self.companies.clone(), self.admin_company.clone())
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<RfiService<S>>) -> Router<()>
where
  S: RfiStore + 'static,
{
  Router::new()
    .route("/rfis", get(rfis::list::<S>).post(rfis::create::<S>))
    .route(
      "/rfis/{id}",
      get(rfis::get_one::<S>)
        .patch(rfis::edit::<S>)
        .delete(rfis::remove::<S>),
    )
    .route("/rfis/{id}/assign", post(rfis::assign::<S>))
    .route("/rfis/{id}/respond", post(rfis::respond::<S>))
    .route("/rfis/{id}/close", post(rfis::close::<S>))
    .route("/rfis/{id}/comments", post(rfis::comment::<S>))
    .route("/rfis/{id}/attachments", post(rfis::attach::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(service)
}
