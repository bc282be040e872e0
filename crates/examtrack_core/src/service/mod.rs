//! Use-case services over persisted collections.
//!
//! # Responsibility
//! - Own the in-memory collections and run read-modify-persist per command.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - A rejected command mutates neither memory nor storage.
//! - A failed write never rolls back the in-memory change; it is reported in
//!   a `PersistReport`.

use crate::repo::json::PersistReport;

pub mod exam_service;
pub mod goal_service;
pub mod preference_service;
pub mod task_service;
pub mod tracker;

/// Command result paired with its write outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    pub value: T,
    pub persist: PersistReport,
}

impl<T> Saved<T> {
    pub fn new(value: T, persist: PersistReport) -> Self {
        Self { value, persist }
    }
}
