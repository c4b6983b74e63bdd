//! The `RfiStore` trait — the repository-adapter boundary.
//!
//! Implemented by storage backends (e.g. `siteline-store-sqlite`). Higher
//! layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::rfi::Rfi;

/// Abstraction over the backing collection of RFIs.
///
/// Implementations merge a durable collection with a fixed seed/reference
/// collection: [`RfiStore::load_all`] returns the union deduplicated by id
/// with the durable copy winning, and [`RfiStore::delete`] removes only the
/// durable copy — a seeded RFI stays visible until the seed set itself
/// changes.
///
/// The core treats every read as a snapshot of the whole collection and
/// every write as a whole-value upsert. There is no per-entity versioning,
/// so concurrent read-modify-write cycles are last-writer-wins.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RfiStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Snapshot the whole merged collection.
  fn load_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Rfi>, Self::Error>> + Send + '_;

  /// Fetch one RFI by id, durable copy first, seed as fallback.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Rfi>, Self::Error>> + Send + '_;

  /// Upsert by id into the durable collection.
  fn save<'a>(
    &'a self,
    rfi: &'a Rfi,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove from the durable collection. Removing an id that only exists in
  /// the seed collection is a no-op.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
