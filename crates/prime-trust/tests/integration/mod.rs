//! Integration Tests Module
//!
//! Test categories:
//! - `storage_flow`: member CRUD, metric rows, snapshots
//! - `scoring_flow`: scoring stored members through the commands
//! - `record_flow`: backend records versus the store's own projection

mod record_flow;
mod scoring_flow;
mod storage_flow;
