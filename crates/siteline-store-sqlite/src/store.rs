//! [`SqliteStore`] — the SQLite implementation of [`RfiStore`].

use std::{collections::HashSet, path::Path, sync::Arc};

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use siteline_core::{rfi::Rfi, store::RfiStore};

use crate::{
  Error, Result,
  encode::{decode_body, encode_body, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An RFI store backed by a single SQLite file plus a fixed in-memory seed
/// collection.
///
/// Reads return the union of the durable table and the seed, deduplicated
/// by id with the durable copy winning. Writes touch only the durable
/// table; deleting an id that exists only in the seed is a no-op and the
/// seeded entry stays visible — the accepted quirk of the merge contract.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
  seed: Arc<Vec<Rfi>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with the given seed collection and
  /// run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, seed: Vec<Rfi>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, seed: Arc::new(seed) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(seed: Vec<Rfi>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, seed: Arc::new(seed) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn durable_bodies(&self) -> Result<Vec<String>> {
    let bodies: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT body_json FROM rfis")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(bodies)
  }
}

// ─── RfiStore impl ───────────────────────────────────────────────────────────

impl RfiStore for SqliteStore {
  type Error = Error;

  async fn load_all(&self) -> Result<Vec<Rfi>> {
    let mut out: Vec<Rfi> = self
      .durable_bodies()
      .await?
      .iter()
      .map(|b| decode_body(b))
      .collect::<Result<_>>()?;

    let durable_ids: HashSet<Uuid> = out.iter().map(|r| r.id).collect();
    for seeded in self.seed.iter() {
      if !durable_ids.contains(&seeded.id) {
        out.push(seeded.clone());
      }
    }

    Ok(out)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Rfi>> {
    let id_str = encode_uuid(id);

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body_json FROM rfis WHERE rfi_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    match body {
      Some(b) => Ok(Some(decode_body(&b)?)),
      None => Ok(self.seed.iter().find(|r| r.id == id).cloned()),
    }
  }

  async fn save(&self, rfi: &Rfi) -> Result<()> {
    let id_str = encode_uuid(rfi.id);
    let number = rfi.rfi_number.clone();
    let body = encode_body(rfi)?;
    let updated_at = rfi.updated_at.to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rfis (rfi_id, rfi_number, body_json, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(rfi_id) DO UPDATE SET
             rfi_number = excluded.rfi_number,
             body_json  = excluded.body_json,
             updated_at = excluded.updated_at",
          rusqlite::params![id_str, number, body, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM rfis WHERE rfi_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
