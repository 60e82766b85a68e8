/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! The reconciliation engine.
//!
//! One sync pass per cluster per scheduled tick: fetch, build bulk maps,
//! upsert hosts, instances (through the host map), volumes (through the
//! instance map) and services, then record cluster health and an audit
//! entry. Each cluster's pass is fully isolated; a failure anywhere inside
//! one pass marks that cluster offline and never blocks the others.

pub mod extract;
pub mod flavors;
pub mod inventory;
pub mod maps;

use thiserror::Error;

use crate::connector::ConnectorError;

/// A failure that aborts one cluster's pass (and only that cluster's).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("connector failure: {0}")]
    Connector(#[from] ConnectorError),
    #[error("database failure: {0}")]
    Database(#[from] diesel::result::Error),
}
