//! Record identifier assignment.

use uuid::Uuid;

/// Generates a fresh record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Assigns an id when `slot` is absent or blank.
///
/// Returns `true` when a new id was written. Existing ids are never replaced.
pub fn ensure_id(slot: &mut Option<String>) -> bool {
    match slot {
        Some(existing) if !existing.trim().is_empty() => false,
        _ => {
            *slot = Some(new_record_id());
            true
        }
    }
}
