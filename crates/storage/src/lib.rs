#![forbid(unsafe_code)]

//! Persistence for the course navigator: the `ProgressRepository` contract,
//! an in-memory backend for tests, a SQLite backend, and the versioned
//! snapshot codec shared by both.

pub mod repository;
pub mod snapshot;
pub mod sqlite;
