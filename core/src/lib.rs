//! This crate implements the core data model for a strand repository:
//! content-addressed objects, commits, repo paths, the object-store and
//! remote capabilities, and the line diff engine.

pub mod diff;
pub mod object;
pub mod path;
pub mod remote;
pub mod repo;
