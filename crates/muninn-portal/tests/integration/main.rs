//! DB-backed integration tests for the Muninn portal.
//!
//! These require a running PostgreSQL instance; set DATABASE_URL (or rely on
//! the default local development database).

mod fixtures;

mod dal;
mod sync;
