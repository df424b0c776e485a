//! # league-db
//!
//! Database layer for League RS.
//!
//! This crate provides storage for players and teams, including:
//!
//! - Connection pool management
//! - Repository traits for single-entity CRUD and specification execution
//! - SQL rendering of specifications
//! - PostgreSQL repositories
//! - An in-memory store evaluating specifications in process
//!
//! ## Example
//!
//! ```ignore
//! use league_db::{Database, PlayerRepository, SpecificationExecutor};
//! use league_queries::{Criteria, IntoSpecification, PlayerCriteria};
//!
//! let db = Database::connect(&url, &config.database).await?;
//! let repo = PlayerRepository::new(db.pool().clone());
//!
//! let criteria = PlayerCriteria::from_query_pairs([("teamId.equals", "5")])?;
//! let players = repo.find_all(&criteria.to_specification()).await?;
//! ```

pub mod memory;
pub mod players;
pub mod pool;
pub mod repository;
pub mod sql;
pub mod teams;

// Re-exports
pub use memory::{MemoryStore, PlayerRow, TeamRow};
pub use players::{PlayerRecord, PlayerRepository};
pub use pool::{Database, PoolStats};
pub use repository::{
    resolve_sort, Repository, RepositoryError, RepositoryResult, SortKey, SpecificationExecutor,
    Store,
};
pub use teams::{TeamRecord, TeamRepository};
