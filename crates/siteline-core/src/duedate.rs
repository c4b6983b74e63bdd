//! Due-date derivation policy.

use chrono::{Duration, NaiveDate};

use crate::rfi::Priority;

/// Days until an RFI falls due, by priority.
pub fn offset_days(priority: Priority) -> i64 {
  match priority {
    Priority::Urgent => 1,
    Priority::High => 3,
    Priority::Medium => 5,
    Priority::Low => 7,
  }
}

/// Map `(priority, reference date)` to a due date.
///
/// An absent priority yields no date; callers treat that as "unset", never
/// as an error. The policy never inspects status. Recomputation is driven by
/// the lifecycle operations, which skip it when an edit supplies its own
/// due date.
pub fn compute_due_date(
  priority: Option<Priority>,
  reference: NaiveDate,
) -> Option<NaiveDate> {
  priority.map(|p| reference + Duration::days(offset_days(p)))
}
