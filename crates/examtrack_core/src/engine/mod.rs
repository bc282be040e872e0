//! Pure state-transition logic over explicit collections.
//!
//! Nothing here touches storage or the wall clock; `today` is always a
//! parameter. Services layer persistence and logging on top.

pub mod crud;
pub mod migration;
pub mod progress;
pub mod stats;
