//! Lifecycle operations — the only mutation paths for an RFI.
//!
//! Every operation is a pure function from an RFI value (plus inputs and an
//! injected `now`) to a new RFI value. Invalid operations reject before any
//! field changes; the original value is untouched. Timestamps and identities
//! are parameters, never ambient reads, so everything here runs under a
//! fixed clock in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  duedate::compute_due_date,
  rfi::{Attachment, Comment, NewAttachment, NewRfi, Rfi, RfiPatch, Status},
};

/// Enforced business rule, not cosmetic: responses shorter than this are
/// rejected even when the caller already validated.
pub const MIN_RESPONSE_CHARS: usize = 10;

// ─── Respond outcome ─────────────────────────────────────────────────────────

/// The statuses a response may land an RFI in. The informal "needs
/// clarification" outcome maps to `in_review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOutcome {
  Responded,
  NeedsClarification,
  Closed,
}

impl ResponseOutcome {
  pub fn status(self) -> Status {
    match self {
      Self::Responded => Status::Responded,
      Self::NeedsClarification => Status::InReview,
      Self::Closed => Status::Closed,
    }
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Create a new RFI in `open` status.
///
/// `id` and `rfi_number` come from the caller's injected sources; `company`
/// is the creating actor's resolved company. The due date is derived from
/// priority unless the input supplies its own. Initial tags are derived from
/// discipline, priority, and category.
pub fn create(
  input: NewRfi,
  requested_by: &Actor,
  company: String,
  id: Uuid,
  rfi_number: String,
  now: DateTime<Utc>,
) -> Result<Rfi> {
  let title = non_empty(input.title, "title")?;
  let description = non_empty(input.description, "description")?;
  let assigned_to = non_empty(input.assigned_to, "assigned_to")?;

  let due_date = input
    .due_date
    .or_else(|| compute_due_date(Some(input.priority), now.date_naive()));

  let tags = vec![
    input.discipline.as_str().to_owned(),
    input.priority.as_str().to_owned(),
    input.category.as_str().to_owned(),
  ];

  Ok(Rfi {
    id,
    rfi_number,
    title,
    description,
    discipline: input.discipline,
    category: input.category,
    location: input.location,
    drawing_reference: input.drawing_reference,
    status: Status::Open,
    priority: input.priority,
    privacy: input.privacy,
    assigned_to,
    requested_by: requested_by.display_name.clone(),
    due_date,
    response: None,
    response_by: None,
    response_date: None,
    created_at: now,
    updated_at: now,
    created_by: requested_by.id.clone(),
    company,
    attachments: Vec::new(),
    comments: Vec::new(),
    tags,
  })
}

/// Apply a patch to mutable fields. Allowed on any status, terminal
/// included.
///
/// When the patch changes the priority and carries no due date of its own,
/// the due date is recomputed from the RFI's creation date. A manual due
/// date in the patch always wins and is not overwritten until priority
/// changes again.
pub fn edit(rfi: &Rfi, patch: RfiPatch, now: DateTime<Utc>) -> Result<Rfi> {
  let mut next = rfi.clone();

  if let Some(title) = patch.title {
    next.title = non_empty(title, "title")?;
  }
  if let Some(description) = patch.description {
    next.description = non_empty(description, "description")?;
  }
  if let Some(discipline) = patch.discipline {
    next.discipline = discipline;
  }
  if let Some(category) = patch.category {
    next.category = category;
  }
  if let Some(location) = patch.location {
    next.location = Some(location);
  }
  if let Some(drawing_reference) = patch.drawing_reference {
    next.drawing_reference = Some(drawing_reference);
  }
  if let Some(privacy) = patch.privacy {
    next.privacy = privacy;
  }
  if let Some(tags) = patch.tags {
    next.tags = tags;
  }

  let priority_changed =
    patch.priority.is_some_and(|p| p != rfi.priority);
  if let Some(priority) = patch.priority {
    next.priority = priority;
  }

  match patch.due_date {
    Some(manual) => next.due_date = Some(manual),
    None if priority_changed => {
      next.due_date =
        compute_due_date(Some(next.priority), rfi.created_at.date_naive());
    }
    None => {}
  }

  next.updated_at = now;
  Ok(next)
}

/// Reassign the RFI. Does not touch status. Assigning to the current
/// assignee is a valid idempotent no-op and does not bump `updated_at`.
pub fn assign(rfi: &Rfi, assignee: &str, now: DateTime<Utc>) -> Result<Rfi> {
  let assignee = assignee.trim();
  if assignee.is_empty() {
    return Err(Error::MissingField("assigned_to"));
  }
  if rfi.assigned_to == assignee {
    return Ok(rfi.clone());
  }

  let mut next = rfi.clone();
  next.assigned_to = assignee.to_owned();
  next.updated_at = now;
  Ok(next)
}

/// Record a response and move to `outcome`'s status.
///
/// The response/response_by/response_date triple is set together, and a
/// re-response overwrites all three atomically — one triple per RFI, never
/// an accumulated list. Terminal RFIs reject: status may not move away from
/// closed/cancelled, and a same-status re-response would be a no-op.
pub fn respond(
  rfi: &Rfi,
  text: &str,
  responder: &Actor,
  outcome: ResponseOutcome,
  now: DateTime<Utc>,
) -> Result<Rfi> {
  let text = text.trim();
  let got = text.chars().count();
  if got < MIN_RESPONSE_CHARS {
    return Err(Error::ResponseTooShort { min: MIN_RESPONSE_CHARS, got });
  }

  let to = outcome.status();
  if rfi.status.is_terminal() {
    return Err(Error::InvalidTransition { from: rfi.status, to });
  }

  let mut next = rfi.clone();
  next.response = Some(text.to_owned());
  next.response_by = Some(responder.display_name.clone());
  next.response_date = Some(now);
  next.status = to;
  next.updated_at = now;
  Ok(next)
}

/// Administrative shortcut: close without a response. Permitted from any
/// non-terminal status.
pub fn close(rfi: &Rfi, now: DateTime<Utc>) -> Result<Rfi> {
  if rfi.status.is_terminal() {
    return Err(Error::InvalidTransition {
      from: rfi.status,
      to:   Status::Closed,
    });
  }

  let mut next = rfi.clone();
  next.status = Status::Closed;
  next.updated_at = now;
  Ok(next)
}

/// Append to the append-only comment list. Allowed on any status.
pub fn comment(
  rfi: &Rfi,
  author: &Actor,
  body: &str,
  now: DateTime<Utc>,
) -> Result<Rfi> {
  let body = body.trim();
  if body.is_empty() {
    return Err(Error::MissingField("body"));
  }

  let mut next = rfi.clone();
  next.comments.push(Comment {
    author:     author.display_name.clone(),
    body:       body.to_owned(),
    created_at: now,
  });
  next.updated_at = now;
  Ok(next)
}

/// Append a file metadata record. Allowed on any status.
pub fn attach(
  rfi: &Rfi,
  input: NewAttachment,
  now: DateTime<Utc>,
) -> Result<Rfi> {
  let name = non_empty(input.name, "name")?;

  let mut next = rfi.clone();
  next.attachments.push(Attachment {
    name,
    size_bytes:  input.size_bytes,
    media_type:  input.media_type,
    uploaded_by: input.uploaded_by,
    uploaded_at: now,
  });
  next.updated_at = now;
  Ok(next)
}

fn non_empty(value: String, field: &'static str) -> Result<String> {
  if value.trim().is_empty() {
    Err(Error::MissingField(field))
  } else {
    Ok(value)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
