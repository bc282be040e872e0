//! Persistent store adapter for named JSON collections.
//!
//! # Responsibility
//! - Define the key-value storage contract used by services.
//! - Keep SQL details inside the persistence boundary.
//! - Translate between JSON documents and typed collections.
//!
//! # Invariants
//! - Reads never fail towards callers: missing or corrupt documents yield the
//!   caller's default.
//! - Writes report failures; callers decide whether they are fatal.

pub mod json;
pub mod kv_repo;
