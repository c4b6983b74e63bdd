//! Filter + sort over a collection of RFIs, scoped by visibility.
//!
//! The visibility pass is mandatory and runs before anything else; no filter
//! combination can see through it. Filters and sorts are permissive by
//! design — this engine backs a UI list, so unknown tokens are dropped at
//! the parsing boundary and absence of a match is an empty result, never an
//! error.

use std::cmp::Ordering as CmpOrdering;

use chrono::{DateTime, Utc};

use crate::{
  actor::{Actor, CompanyDirectory},
  rfi::{Discipline, Priority, Rfi, Status},
  visibility::is_visible,
};

// ─── Sort spec ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
  RfiNumber,
  Title,
  Status,
  Priority,
  Discipline,
  AssignedTo,
  CreatedAt,
  UpdatedAt,
  DueDate,
}

impl SortField {
  /// Permissive parse; an unknown field yields `None` and the caller keeps
  /// filter-step order.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "rfi_number" | "number" => Some(Self::RfiNumber),
      "title" => Some(Self::Title),
      "status" => Some(Self::Status),
      "priority" => Some(Self::Priority),
      "discipline" => Some(Self::Discipline),
      "assigned_to" | "assignee" => Some(Self::AssignedTo),
      "created_at" | "created" => Some(Self::CreatedAt),
      "updated_at" | "updated" => Some(Self::UpdatedAt),
      "due_date" | "due" => Some(Self::DueDate),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
  #[default]
  Ascending,
  Descending,
}

impl SortDirection {
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "asc" | "ascending" => Some(Self::Ascending),
      "desc" | "descending" => Some(Self::Descending),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct RfiSort {
  pub field:     SortField,
  pub direction: SortDirection,
}

// ─── Filter spec ─────────────────────────────────────────────────────────────

/// A conjunction of per-field disjunctions. An empty allowed-set means "no
/// restriction on that field", not "exclude everything".
#[derive(Debug, Clone, Default)]
pub struct RfiFilter {
  pub statuses:    Vec<Status>,
  pub priorities:  Vec<Priority>,
  pub disciplines: Vec<Discipline>,
  pub assigned_to: Vec<String>,
  /// Case-insensitive substring over title, rfi_number, and description.
  pub text: Option<String>,
  /// Whole days before "now" that `created_at` must fall within.
  pub created_within_days: Option<i64>,
}

impl RfiFilter {
  fn matches(&self, rfi: &Rfi, now: DateTime<Utc>) -> bool {
    if !self.statuses.is_empty() && !self.statuses.contains(&rfi.status) {
      return false;
    }
    if !self.priorities.is_empty() && !self.priorities.contains(&rfi.priority)
    {
      return false;
    }
    if !self.disciplines.is_empty()
      && !self.disciplines.contains(&rfi.discipline)
    {
      return false;
    }
    if !self.assigned_to.is_empty()
      && !self
        .assigned_to
        .iter()
        .any(|a| a.eq_ignore_ascii_case(&rfi.assigned_to))
    {
      return false;
    }
    if let Some(text) = &self.text {
      let needle = text.to_lowercase();
      let hit = rfi.title.to_lowercase().contains(&needle)
        || rfi.rfi_number.to_lowercase().contains(&needle)
        || rfi.description.to_lowercase().contains(&needle);
      if !hit {
        return false;
      }
    }
    if let Some(days) = self.created_within_days
      && now.signed_duration_since(rfi.created_at).num_days() > days
    {
      return false;
    }
    true
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Visibility, then filter, then stable sort.
///
/// `now` anchors the created-within-days window and is injected for
/// deterministic tests. With no sort the result keeps filter-step order;
/// equal sort keys retain their relative input order.
pub fn query(
  actor: &Actor,
  directory: &CompanyDirectory,
  rfis: Vec<Rfi>,
  filter: &RfiFilter,
  sort: Option<RfiSort>,
  now: DateTime<Utc>,
) -> Vec<Rfi> {
  let mut rows: Vec<Rfi> = rfis
    .into_iter()
    .filter(|r| is_visible(actor, directory, r))
    .filter(|r| filter.matches(r, now))
    .collect();

  if let Some(sort) = sort {
    // sort_by is stable; reversing the comparator preserves that.
    rows.sort_by(|a, b| {
      let ord = compare(sort.field, a, b);
      match sort.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
      }
    });
  }

  rows
}

/// Priority sorts by the fixed rank table, not lexicographically. Missing
/// values sort as the lowest value.
fn compare(field: SortField, a: &Rfi, b: &Rfi) -> CmpOrdering {
  match field {
    SortField::RfiNumber => a.rfi_number.cmp(&b.rfi_number),
    SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    SortField::Status => a.status.as_str().cmp(b.status.as_str()),
    SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
    SortField::Discipline => a.discipline.as_str().cmp(b.discipline.as_str()),
    SortField::AssignedTo => a.assigned_to.cmp(&b.assigned_to),
    SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    SortField::DueDate => a.due_date.cmp(&b.due_date),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use chrono::TimeZone;
  use uuid::Uuid;

  use super::*;
  use crate::{
    actor::Role,
    lifecycle,
    rfi::{Category, NewRfi, Privacy},
  };

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
  }

  fn directory() -> CompanyDirectory {
    CompanyDirectory::new(
      HashMap::from([
        ("electrical".to_owned(), "Volta Electric".to_owned()),
        ("plumbing".to_owned(), "PipeWorks".to_owned()),
      ]),
      Some("Meridian GC".to_owned()),
    )
  }

  fn actor(role: Role, department: &str) -> Actor {
    Actor {
      id:           "u-1".into(),
      display_name: "Test User".into(),
      role,
      department:   department.into(),
    }
  }

  fn rfi(
    n: u128,
    title: &str,
    company: &str,
    priority: Priority,
    created: DateTime<Utc>,
  ) -> Rfi {
    lifecycle::create(
      NewRfi {
        title:             title.into(),
        description:       "Needs an answer from the design team.".into(),
        discipline:        Discipline::Electrical,
        category:          Category::Design,
        location:          None,
        drawing_reference: None,
        priority,
        privacy:           Privacy::Public,
        assigned_to:       "GC Office".into(),
        due_date:          None,
      },
      &actor(Role::Subcontractor, "electrical"),
      company.to_owned(),
      Uuid::from_u128(n),
      format!("RFI-2025-{n:03}"),
      created,
    )
    .unwrap()
  }

  fn fleet() -> Vec<Rfi> {
    vec![
      rfi(1, "Feeder sizing", "Volta Electric", Priority::Low, now()),
      rfi(2, "Riser clash", "PipeWorks", Priority::Urgent, now()),
      rfi(3, "Panel schedule", "Volta Electric", Priority::Urgent, now()),
      rfi(4, "Grounding detail", "Volta Electric", Priority::Medium, now()),
    ]
  }

  #[test]
  fn query_never_leaks_invisible_rows() {
    let sparky = actor(Role::Subcontractor, "electrical");
    // A text filter matching only the invisible row must not reveal it.
    let filter = RfiFilter { text: Some("riser".into()), ..Default::default() };
    let rows = query(&sparky, &directory(), fleet(), &filter, None, now());
    assert!(rows.is_empty());
  }

  #[test]
  fn admin_queries_everything() {
    let admin = actor(Role::Admin, "front office");
    let rows =
      query(&admin, &directory(), fleet(), &RfiFilter::default(), None, now());
    assert_eq!(rows.len(), 4);
  }

  #[test]
  fn empty_allowed_set_means_no_restriction() {
    let admin = actor(Role::Admin, "front office");
    let filter = RfiFilter { statuses: Vec::new(), ..Default::default() };
    let rows = query(&admin, &directory(), fleet(), &filter, None, now());
    assert_eq!(rows.len(), 4);
  }

  #[test]
  fn status_and_priority_sets_are_disjunctions() {
    let admin = actor(Role::Admin, "front office");
    let filter = RfiFilter {
      priorities: vec![Priority::Urgent, Priority::Low],
      ..Default::default()
    };
    let rows = query(&admin, &directory(), fleet(), &filter, None, now());
    assert_eq!(rows.len(), 3);
  }

  #[test]
  fn text_filter_is_case_insensitive_and_spans_fields() {
    let admin = actor(Role::Admin, "front office");
    let filter = RfiFilter { text: Some("PANEL".into()), ..Default::default() };
    let rows = query(&admin, &directory(), fleet(), &filter, None, now());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Panel schedule");

    // rfi_number matches too
    let filter = RfiFilter {
      text: Some("rfi-2025-002".into()),
      ..Default::default()
    };
    let rows = query(&admin, &directory(), fleet(), &filter, None, now());
    assert_eq!(rows.len(), 1);
  }

  #[test]
  fn created_within_days_window() {
    let admin = actor(Role::Admin, "front office");
    let mut rows = fleet();
    rows.push(rfi(
      5,
      "Old business",
      "Volta Electric",
      Priority::Low,
      now() - chrono::Duration::days(45),
    ));

    let filter =
      RfiFilter { created_within_days: Some(30), ..Default::default() };
    let recent = query(&admin, &directory(), rows.clone(), &filter, None, now());
    assert_eq!(recent.len(), 4);

    let filter =
      RfiFilter { created_within_days: Some(90), ..Default::default() };
    let all = query(&admin, &directory(), rows, &filter, None, now());
    assert_eq!(all.len(), 5);
  }

  #[test]
  fn priority_sort_uses_rank_table() {
    let admin = actor(Role::Admin, "front office");
    let input = vec![
      rfi(1, "a", "Volta Electric", Priority::Low, now()),
      rfi(2, "b", "Volta Electric", Priority::Urgent, now()),
      rfi(3, "c", "Volta Electric", Priority::Medium, now()),
    ];
    let sort = RfiSort {
      field:     SortField::Priority,
      direction: SortDirection::Descending,
    };
    let rows = query(
      &admin,
      &directory(),
      input,
      &RfiFilter::default(),
      Some(sort),
      now(),
    );
    let order: Vec<Priority> = rows.iter().map(|r| r.priority).collect();
    assert_eq!(order, [Priority::Urgent, Priority::Medium, Priority::Low]);
  }

  #[test]
  fn sort_is_stable_on_equal_keys() {
    let admin = actor(Role::Admin, "front office");
    let input = vec![
      rfi(1, "first", "Volta Electric", Priority::High, now()),
      rfi(2, "second", "Volta Electric", Priority::High, now()),
      rfi(3, "third", "Volta Electric", Priority::High, now()),
    ];
    let sort = RfiSort {
      field:     SortField::Priority,
      direction: SortDirection::Descending,
    };
    let rows = query(
      &admin,
      &directory(),
      input,
      &RfiFilter::default(),
      Some(sort),
      now(),
    );
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["first", "second", "third"]);
  }

  #[test]
  fn missing_due_dates_sort_lowest() {
    let admin = actor(Role::Admin, "front office");
    let mut with_date = rfi(1, "dated", "Volta Electric", Priority::Low, now());
    with_date.due_date = Some("2025-07-01".parse().unwrap());
    let mut without = rfi(2, "undated", "Volta Electric", Priority::Low, now());
    without.due_date = None;

    let sort = RfiSort {
      field:     SortField::DueDate,
      direction: SortDirection::Ascending,
    };
    let rows = query(
      &admin,
      &directory(),
      vec![with_date, without],
      &RfiFilter::default(),
      Some(sort),
      now(),
    );
    assert_eq!(rows[0].title, "undated");
  }

  #[test]
  fn no_sort_keeps_filter_order() {
    let admin = actor(Role::Admin, "front office");
    let rows = query(
      &admin,
      &directory(),
      fleet(),
      &RfiFilter::default(),
      None,
      now(),
    );
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
      titles,
      ["Feeder sizing", "Riser clash", "Panel schedule", "Grounding detail"]
    );
  }

  #[test]
  fn unknown_tokens_parse_to_none() {
    assert_eq!(SortField::parse("favourite_colour"), None);
    assert_eq!(SortDirection::parse("sideways"), None);
  }
}
