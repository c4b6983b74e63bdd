//! The RFI entity — the central record of the tracker.
//!
//! An RFI is a whole value: mutations go through the lifecycle operations in
//! [`crate::lifecycle`], which produce a new value rather than editing in
//! place. `id`, `rfi_number`, `created_at`, `created_by`, and `requested_by`
//! are never reassigned after creation; `status` moves only along the edges
//! the state machine permits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Workflow status. `Draft` and `Cancelled` are reachable in the model even
/// though the usual flow only exercises open → in_review → responded →
/// closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  Draft,
  Open,
  InReview,
  Responded,
  Closed,
  Cancelled,
}

impl Status {
  pub const ALL: [Self; 6] = [
    Self::Draft,
    Self::Open,
    Self::InReview,
    Self::Responded,
    Self::Closed,
    Self::Cancelled,
  ];

  /// Terminal statuses admit no further status transitions. Edits to
  /// non-status fields remain allowed.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Closed | Self::Cancelled)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Draft => "draft",
      Self::Open => "open",
      Self::InReview => "in_review",
      Self::Responded => "responded",
      Self::Closed => "closed",
      Self::Cancelled => "cancelled",
    }
  }

  /// Permissive parse; unknown tokens yield `None`, never an error.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "draft" => Some(Self::Draft),
      "open" => Some(Self::Open),
      "in_review" | "in-review" => Some(Self::InReview),
      "responded" => Some(Self::Responded),
      "closed" => Some(Self::Closed),
      "cancelled" | "canceled" => Some(Self::Cancelled),
      _ => None,
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Priority ────────────────────────────────────────────────────────────────

/// Urgency of a request. Drives the due-date policy and the sort rank table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  Medium,
  High,
  Urgent,
}

impl Priority {
  /// Fixed rank for sorting: urgent = 4 down to low = 1. Anything that fails
  /// to parse ranks 0 at the caller's boundary.
  pub fn rank(self) -> u8 {
    match self {
      Self::Urgent => 4,
      Self::High => 3,
      Self::Medium => 2,
      Self::Low => 1,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
      Self::Urgent => "urgent",
    }
  }

  /// Permissive parse. Accepts the Spanish labels used by upstream project
  /// data (`baja`, `media`, `alta`, `urgente`) and `critical` as a synonym
  /// of urgent.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "low" | "baja" => Some(Self::Low),
      "medium" | "media" => Some(Self::Medium),
      "high" | "alta" => Some(Self::High),
      "urgent" | "urgente" | "critical" => Some(Self::Urgent),
      _ => None,
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Privacy ─────────────────────────────────────────────────────────────────

/// Advisory visibility marker surfaced in the UI.
///
/// Private restricts cross-company visibility in principle, but the engine
/// grants a company full access to its own RFIs regardless of this flag;
/// see [`crate::visibility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
  #[default]
  Public,
  Private,
}

impl Privacy {
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "public" => Some(Self::Public),
      "private" => Some(Self::Private),
      _ => None,
    }
  }
}

// ─── Discipline / Category ───────────────────────────────────────────────────

/// Trade discipline the request concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
  Architectural,
  Structural,
  Mechanical,
  Electrical,
  Plumbing,
  FireProtection,
  Civil,
  General,
}

impl Discipline {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Architectural => "architectural",
      Self::Structural => "structural",
      Self::Mechanical => "mechanical",
      Self::Electrical => "electrical",
      Self::Plumbing => "plumbing",
      Self::FireProtection => "fire_protection",
      Self::Civil => "civil",
      Self::General => "general",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "architectural" => Some(Self::Architectural),
      "structural" => Some(Self::Structural),
      "mechanical" => Some(Self::Mechanical),
      "electrical" => Some(Self::Electrical),
      "plumbing" => Some(Self::Plumbing),
      "fire_protection" | "fire-protection" => Some(Self::FireProtection),
      "civil" => Some(Self::Civil),
      "general" => Some(Self::General),
      _ => None,
    }
  }
}

/// What kind of clarification the request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Design,
  Specification,
  Schedule,
  SiteCondition,
  Material,
  Coordination,
  Other,
}

impl Category {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Design => "design",
      Self::Specification => "specification",
      Self::Schedule => "schedule",
      Self::SiteCondition => "site_condition",
      Self::Material => "material",
      Self::Coordination => "coordination",
      Self::Other => "other",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "design" => Some(Self::Design),
      "specification" => Some(Self::Specification),
      "schedule" => Some(Self::Schedule),
      "site_condition" | "site-condition" => Some(Self::SiteCondition),
      "material" => Some(Self::Material),
      "coordination" => Some(Self::Coordination),
      "other" => Some(Self::Other),
      _ => None,
    }
  }
}

// ─── Collections ─────────────────────────────────────────────────────────────

/// File metadata only — binary handling happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
  pub name:        String,
  pub size_bytes:  u64,
  pub media_type:  String,
  pub uploaded_by: String,
  pub uploaded_at: DateTime<Utc>,
}

/// Input to [`crate::lifecycle::attach`]; the timestamp is assigned by the
/// operation, not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAttachment {
  pub name:        String,
  pub size_bytes:  u64,
  pub media_type:  String,
  pub uploaded_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub author:     String,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

// ─── Rfi ─────────────────────────────────────────────────────────────────────

/// A formal request for information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rfi {
  // Identity — assigned at creation, immutable.
  pub id:         Uuid,
  /// Human-readable number, `RFI-<year>-<3-digit-sequence>`.
  pub rfi_number: String,

  // Descriptive.
  pub title:             String,
  pub description:       String,
  pub discipline:        Discipline,
  pub category:          Category,
  pub location:          Option<String>,
  pub drawing_reference: Option<String>,

  // Workflow.
  pub status:      Status,
  pub priority:    Priority,
  pub privacy:     Privacy,
  pub assigned_to: String,
  /// Display name of the actor who raised the request; immutable.
  pub requested_by: String,
  /// Derived from priority unless a manual date was supplied; see
  /// [`crate::duedate`].
  pub due_date: Option<NaiveDate>,

  // The response triple is always set (and overwritten) together, only by
  // the respond operation.
  pub response:      Option<String>,
  pub response_by:   Option<String>,
  pub response_date: Option<DateTime<Utc>>,

  // Ownership metadata.
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  /// Id of the creating actor; immutable.
  pub created_by: String,
  /// The owning company of the request; the visibility scoping key.
  pub company: String,

  // Collections.
  #[serde(default)]
  pub attachments: Vec<Attachment>,
  #[serde(default)]
  pub comments: Vec<Comment>,
  /// Derived at creation from discipline/priority/category; a free list
  /// thereafter.
  #[serde(default)]
  pub tags: Vec<String>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::lifecycle::create`]. Identity, ownership metadata, and
/// timestamps are assigned by the operation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRfi {
  pub title:       String,
  pub description: String,
  pub discipline:  Discipline,
  pub category:    Category,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub drawing_reference: Option<String>,
  pub priority:    Priority,
  #[serde(default)]
  pub privacy: Privacy,
  pub assigned_to: String,
  /// Manual override; when absent the due date is derived from priority.
  #[serde(default)]
  pub due_date: Option<NaiveDate>,
}

/// A partial update applied by [`crate::lifecycle::edit`]. Only mutable
/// fields appear here; identity, status, and ownership metadata have no
/// patch path at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RfiPatch {
  pub title:             Option<String>,
  pub description:       Option<String>,
  pub discipline:        Option<Discipline>,
  pub category:          Option<Category>,
  pub location:          Option<String>,
  pub drawing_reference: Option<String>,
  pub priority:          Option<Priority>,
  pub due_date:          Option<NaiveDate>,
  pub privacy:           Option<Privacy>,
  pub tags:              Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_parse_roundtrips_all_variants() {
    for status in Status::ALL {
      assert_eq!(Status::parse(status.as_str()), Some(status));
    }
  }

  #[test]
  fn status_parse_is_case_insensitive_and_permissive() {
    assert_eq!(Status::parse(" In_Review "), Some(Status::InReview));
    assert_eq!(Status::parse("canceled"), Some(Status::Cancelled));
    assert_eq!(Status::parse("archived"), None);
  }

  #[test]
  fn priority_parse_accepts_spanish_aliases() {
    assert_eq!(Priority::parse("baja"), Some(Priority::Low));
    assert_eq!(Priority::parse("media"), Some(Priority::Medium));
    assert_eq!(Priority::parse("alta"), Some(Priority::High));
    assert_eq!(Priority::parse("URGENTE"), Some(Priority::Urgent));
    assert_eq!(Priority::parse("critical"), Some(Priority::Urgent));
    assert_eq!(Priority::parse("whenever"), None);
  }

  #[test]
  fn priority_rank_table() {
    assert_eq!(Priority::Urgent.rank(), 4);
    assert_eq!(Priority::High.rank(), 3);
    assert_eq!(Priority::Medium.rank(), 2);
    assert_eq!(Priority::Low.rank(), 1);
  }

  #[test]
  fn discipline_parse_accepts_hyphen_variant() {
    assert_eq!(
      Discipline::parse("fire-protection"),
      Some(Discipline::FireProtection)
    );
    assert_eq!(Discipline::parse("interpretive dance"), None);
  }

  #[test]
  fn privacy_defaults_to_public() {
    assert_eq!(Privacy::default(), Privacy::Public);
  }
}
