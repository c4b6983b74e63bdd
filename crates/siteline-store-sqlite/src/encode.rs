//! Encoding helpers between the domain entity and the stored row.
//!
//! UUIDs are stored as hyphenated lowercase strings; the entity itself is a
//! compact JSON body.

use siteline_core::rfi::Rfi;
use uuid::Uuid;

use crate::Result;

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn encode_body(rfi: &Rfi) -> Result<String> {
  Ok(serde_json::to_string(rfi)?)
}

pub fn decode_body(s: &str) -> Result<Rfi> {
  Ok(serde_json::from_str(s)?)
}
