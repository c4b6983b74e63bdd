//! Injectable clock and identifier sources.
//!
//! The lifecycle engine never reads ambient time or randomness; callers
//! thread these in so every operation runs deterministically under test.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

// ─── Clock ───────────────────────────────────────────────────────────────────

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// A clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.0
  }
}

// ─── Id source ───────────────────────────────────────────────────────────────

pub trait IdSource: Send + Sync {
  fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
  fn next_id(&self) -> Uuid {
    Uuid::new_v4()
  }
}

/// Deterministic sequential UUIDs (1, 2, 3, …).
#[derive(Debug, Default)]
pub struct SequenceIds {
  counter: AtomicU64,
}

impl IdSource for SequenceIds {
  fn next_id(&self) -> Uuid {
    let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
    Uuid::from_u128(u128::from(n))
  }
}

// ─── RFI numbers ─────────────────────────────────────────────────────────────

/// Monotonic allocator for `RFI-<year>-<sequence>` numbers.
///
/// The system this replaces drew the sequence at random, which can collide.
/// A process-wide monotonic counter never hands out the same sequence twice
/// within a process lifetime; [`RfiNumberSequence::observe`] feeds in
/// numbers already present in the store so new allocations always land above
/// everything persisted.
#[derive(Debug, Default)]
pub struct RfiNumberSequence {
  floor: AtomicU32,
}

impl RfiNumberSequence {
  pub fn new() -> Self {
    Self::default()
  }

  /// Raise the floor to cover an existing RFI number. Unparseable numbers
  /// are ignored.
  pub fn observe(&self, number: &str) {
    if let Some(seq) = parse_sequence(number) {
      self.floor.fetch_max(seq, Ordering::Relaxed);
    }
  }

  /// Allocate the next number for `year`, zero-padded to three digits.
  pub fn next(&self, year: i32) -> String {
    let seq = self.floor.fetch_add(1, Ordering::Relaxed) + 1;
    format!("RFI-{year}-{seq:03}")
  }
}

fn parse_sequence(number: &str) -> Option<u32> {
  number.rsplit('-').next()?.parse().ok()
}
