//! Actors and the department→company directory.
//!
//! Authentication happens upstream; an [`Actor`] arrives here already
//! verified, and its role and department are fixed for the session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The authorisation role of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// General-contractor/owner role; sees every RFI, public or private.
  Admin,
  /// Company-scoped role; sees only its own company's RFIs.
  Subcontractor,
}

/// An already-authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
  pub id:           String,
  pub display_name: String,
  pub role:         Role,
  pub department:   String,
}

// ─── Directory ───────────────────────────────────────────────────────────────

/// Fixed lookup table from department strings to canonical company names.
///
/// Built from configuration, never hard-coded inside the visibility engine.
/// The fallback company applies only to admin actors whose department is not
/// in the table; a subcontractor with an unknown department resolves to
/// nothing, and absence of a company means absence of visibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyDirectory {
  companies:      HashMap<String, String>,
  admin_fallback: Option<String>,
}

impl CompanyDirectory {
  pub fn new(
    companies: HashMap<String, String>,
    admin_fallback: Option<String>,
  ) -> Self {
    Self { companies, admin_fallback }
  }

  /// Resolve an actor's company. Returns `None` rather than erroring when
  /// the department is unknown.
  pub fn company_of(&self, actor: &Actor) -> Option<&str> {
    match self.companies.get(&actor.department) {
      Some(company) => Some(company.as_str()),
      None if actor.role == Role::Admin => self.admin_fallback.as_deref(),
      None => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

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

  #[test]
  fn known_department_resolves() {
    let d = directory();
    let a = actor(Role::Subcontractor, "electrical");
    assert_eq!(d.company_of(&a), Some("Volta Electric"));
  }

  #[test]
  fn unknown_department_resolves_to_nothing_for_subcontractor() {
    let d = directory();
    let a = actor(Role::Subcontractor, "landscaping");
    assert_eq!(d.company_of(&a), None);
  }

  #[test]
  fn unknown_department_falls_back_for_admin() {
    let d = directory();
    let a = actor(Role::Admin, "front office");
    assert_eq!(d.company_of(&a), Some("Meridian GC"));
  }
}
