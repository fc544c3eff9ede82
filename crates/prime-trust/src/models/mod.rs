//! Prime Trust Data Models
//!
//! Data structures shared by the store, the sources and the service.

pub mod member;
pub mod record;
pub mod trust;

pub use member::*;
pub use record::*;
pub use trust::*;
