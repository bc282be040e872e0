//! Small leaf helpers shared by models, engines and services.

pub mod date;
pub mod id;
