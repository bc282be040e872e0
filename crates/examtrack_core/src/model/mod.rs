//! Persisted domain records for exams, tasks, the goal and preferences.
//!
//! # Responsibility
//! - Define the JSON document shapes stored under each collection key.
//! - Validate user-supplied fields before they reach a collection.
//!
//! # Invariants
//! - Every exam record carries an id once it has been loaded or created.
//! - A `Grade` value is always inside `[0, 100]`.

pub mod exam;
pub mod goal;
pub mod preference;
pub mod task;
