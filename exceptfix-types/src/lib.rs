//! Shared data model for the exceptfix workspace.
//!
//! # Design constraints
//! - These types cross two boundaries: parsed syntax comes in, fix records go out.
//! - They are intended to be serialized to disk.
//! - Prefer adding optional fields over changing semantics.

pub mod apply;
pub mod ast;
pub mod diagnostic;
pub mod span;
