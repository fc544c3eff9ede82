//! Prime Trust Commands
//!
//! Operations exposed to callers (the CLI, or an embedding application).

pub mod trust;

pub use trust::*;
