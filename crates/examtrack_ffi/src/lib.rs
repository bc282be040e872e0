//! FFI surface for the exam tracker UI.

pub mod api;
