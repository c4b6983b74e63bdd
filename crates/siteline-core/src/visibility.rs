//! Row-level visibility rules.
//!
//! The single place role-conditional access lives; callers must route
//! through [`is_visible`] rather than re-deriving role checks ad hoc.

use crate::{
  actor::{Actor, CompanyDirectory, Role},
  rfi::Rfi,
};

/// Whether `actor` may see `rfi`. Pure and total; never errors.
///
/// Rules, first match wins:
/// 1. Admins see everything, public or private, any company.
/// 2. A subcontractor sees an RFI iff the directory resolves its department
///    to the RFI's owning company — all of that company's RFIs, public or
///    private.
/// 3. Otherwise nothing, including when the department resolves to no
///    company at all.
///
/// `privacy` is advisory metadata surfaced in the UI, not a barrier within
/// the owning company. Whether private should additionally restrict
/// visibility inside the company is an open product question; the observed
/// permissive behaviour is preserved here deliberately.
pub fn is_visible(
  actor: &Actor,
  directory: &CompanyDirectory,
  rfi: &Rfi,
) -> bool {
  if actor.role == Role::Admin {
    return true;
  }
  match directory.company_of(actor) {
    Some(company) => rfi.company == company,
    None => false,
  }
}
