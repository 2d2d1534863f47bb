//! Opsdesk: the operations console for a services and goods marketplace.
//!
//! Admins browse six collections (appointments, service listings, products,
//! orders, drones, payments) through one list query engine, and move
//! workflow records through per-entity status machines. Every accepted
//! change is appended to an immutable admin log.
//!
//! ```text
//! cli        → argument parsing and table output
//! console    → service layer: list, transition, create, seed
//!   ├─ query      search, facets, pagination (pure)
//!   ├─ lifecycle  status machines and audited transitions
//!   ├─ audit      admin log recorder seam
//!   └─ storage    SQLite records and admin log
//! model      → entities, status enums, value types
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod console;
pub mod fixtures;
pub mod identity;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod query;
pub mod source;
pub mod storage;
