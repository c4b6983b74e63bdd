//! Orchestration layer tying the pure engines to a repository adapter.
//!
//! Every mutating call loads its target, applies a lifecycle operation on
//! the copy, and writes the whole replacement back. If two callers
//! read-modify-write concurrently the last writer wins and earlier changes
//! are lost — an accepted limitation of the snapshot model, documented on
//! [`crate::store::RfiStore`], not something this layer arbitrates.

use chrono::Datelike;
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::{Actor, CompanyDirectory},
  clock::{Clock, IdSource, RfiNumberSequence, SystemClock, UuidSource},
  lifecycle::{self, ResponseOutcome},
  query::{self, RfiFilter, RfiSort},
  rfi::{NewAttachment, NewRfi, Rfi, RfiPatch},
  store::RfiStore,
  visibility,
};

pub struct RfiService<S> {
  store:     S,
  directory: CompanyDirectory,
  clock:     Box<dyn Clock>,
  ids:       Box<dyn IdSource>,
  numbers:   RfiNumberSequence,
}

impl<S: RfiStore> RfiService<S> {
  /// Build a service with the production clock and ID source.
  pub fn new(store: S, directory: CompanyDirectory) -> Self {
    Self {
      store,
      directory,
      clock: Box::new(SystemClock),
      ids: Box::new(UuidSource),
      numbers: RfiNumberSequence::new(),
    }
  }

  /// Replace the clock — fixed clocks make every derived timestamp and due
  /// date deterministic.
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Box::new(clock);
    self
  }

  /// Replace the ID source.
  pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
    self.ids = Box::new(ids);
    self
  }

  pub fn directory(&self) -> &CompanyDirectory {
    &self.directory
  }

  fn store_err(e: S::Error) -> Error {
    Error::Store(Box::new(e))
  }

  async fn fetch(&self, id: Uuid) -> Result<Rfi> {
    self
      .store
      .get(id)
      .await
      .map_err(Self::store_err)?
      .ok_or(Error::NotFound(id))
  }

  async fn persist(&self, rfi: Rfi) -> Result<Rfi> {
    self.store.save(&rfi).await.map_err(Self::store_err)?;
    Ok(rfi)
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Create an RFI owned by `actor`'s resolved company.
  ///
  /// Fails with a validation error before anything is persisted: an
  /// unresolvable department, or an invalid input, leaves the store
  /// untouched.
  pub async fn create(&self, actor: &Actor, input: NewRfi) -> Result<Rfi> {
    let company = self
      .directory
      .company_of(actor)
      .ok_or_else(|| Error::UnknownDepartment(actor.department.clone()))?
      .to_owned();

    // Feed existing numbers into the sequence so a fresh process never
    // reuses one already persisted.
    for existing in self.store.load_all().await.map_err(Self::store_err)? {
      self.numbers.observe(&existing.rfi_number);
    }

    let now = self.clock.now();
    let number = self.numbers.next(now.year());
    let rfi = lifecycle::create(
      input,
      actor,
      company,
      self.ids.next_id(),
      number,
      now,
    )?;
    self.persist(rfi).await
  }

  pub async fn edit(&self, id: Uuid, patch: RfiPatch) -> Result<Rfi> {
    let rfi = self.fetch(id).await?;
    let next = lifecycle::edit(&rfi, patch, self.clock.now())?;
    self.persist(next).await
  }

  pub async fn assign(&self, id: Uuid, assignee: &str) -> Result<Rfi> {
    let rfi = self.fetch(id).await?;
    let next = lifecycle::assign(&rfi, assignee, self.clock.now())?;
    self.persist(next).await
  }

  pub async fn respond(
    &self,
    id: Uuid,
    responder: &Actor,
    text: &str,
    outcome: ResponseOutcome,
  ) -> Result<Rfi> {
    let rfi = self.fetch(id).await?;
    let next =
      lifecycle::respond(&rfi, text, responder, outcome, self.clock.now())?;
    self.persist(next).await
  }

  pub async fn close(&self, id: Uuid) -> Result<Rfi> {
    let rfi = self.fetch(id).await?;
    let next = lifecycle::close(&rfi, self.clock.now())?;
    self.persist(next).await
  }

  pub async fn comment(
    &self,
    id: Uuid,
    author: &Actor,
    body: &str,
  ) -> Result<Rfi> {
    let rfi = self.fetch(id).await?;
    let next = lifecycle::comment(&rfi, author, body, self.clock.now())?;
    self.persist(next).await
  }

  pub async fn attach(&self, id: Uuid, input: NewAttachment) -> Result<Rfi> {
    let rfi = self.fetch(id).await?;
    let next = lifecycle::attach(&rfi, input, self.clock.now())?;
    self.persist(next).await
  }

  /// Remove the durable copy. Deletion is a repository concern, never a
  /// status.
  pub async fn remove(&self, id: Uuid) -> Result<()> {
    self.store.delete(id).await.map_err(Self::store_err)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// List the RFIs `actor` may see, filtered and sorted.
  pub async fn query(
    &self,
    actor: &Actor,
    filter: &RfiFilter,
    sort: Option<RfiSort>,
  ) -> Result<Vec<Rfi>> {
    let all = self.store.load_all().await.map_err(Self::store_err)?;
    Ok(query::query(
      actor,
      &self.directory,
      all,
      filter,
      sort,
      self.clock.now(),
    ))
  }

  /// Visibility-checked fetch. An RFI the actor may not see is
  /// indistinguishable from a missing one.
  pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Option<Rfi>> {
    let found = self.store.get(id).await.map_err(Self::store_err)?;
    Ok(found.filter(|r| visibility::is_visible(actor, &self.directory, r)))
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
