//! Engine modules: the part that turns a package list into package manager calls.
//!
//! `operation` models what a package list asks for; `dispatch` decides how
//! those operations are batched against a package manager.

pub mod dispatch;
pub mod operation;
