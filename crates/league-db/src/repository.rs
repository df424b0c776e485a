//! Repository traits
//!
//! [`Repository`] covers single-entity reads and writes by id;
//! [`SpecificationExecutor`] runs a [`Specification`] as a list, a page or a
//! count. Both are implemented for PostgreSQL and for the in-memory store.

use async_trait::async_trait;
use league_core::traits::{Entity, Id};
use league_core::{LeagueError, Page, PageRequest, SortDirection};
use league_queries::{Column, Specification};
use tracing::warn;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write would break a reference between rows
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepositoryError {
    /// Classify an error raised by an INSERT, UPDATE or DELETE
    pub fn from_write(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_foreign_key_violation() => {
                RepositoryError::Constraint(db.message().to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

impl From<RepositoryError> for LeagueError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => LeagueError::not_found(entity, id),
            RepositoryError::Database(e) => LeagueError::Database(e.to_string()),
            RepositoryError::Constraint(message) => LeagueError::BadRequest(message),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Single-entity persistence
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    async fn exists(&self, id: Id) -> RepositoryResult<bool>;

    /// Insert when the entity has no id, update otherwise
    async fn save(&self, entity: T) -> RepositoryResult<T>;

    /// Delete by id; deleting a missing id is not an error
    async fn delete(&self, id: Id) -> RepositoryResult<()>;
}

/// Execution of specifications
///
/// All three modes apply the same predicate, so `count(spec)` always equals
/// `find_all(spec).len()`.
#[async_trait]
pub trait SpecificationExecutor<T>: Send + Sync {
    /// Every match, ordered by id
    async fn find_all(&self, spec: &Specification) -> RepositoryResult<Vec<T>>;

    async fn find_page(&self, spec: &Specification, page: &PageRequest)
        -> RepositoryResult<Page<T>>;

    async fn count(&self, spec: &Specification) -> RepositoryResult<i64>;
}

/// Everything the services need from storage for one entity type
pub trait Store<T: Entity>: Repository<T> + SpecificationExecutor<T> {}

impl<T: Entity, S> Store<T> for S where S: Repository<T> + SpecificationExecutor<T> {}

/// A resolved `ORDER BY` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub direction: SortDirection,
}

/// Resolve API sort properties to columns; unknown properties are skipped.
pub fn resolve_sort(page: &PageRequest, resolve: fn(&str) -> Option<Column>) -> Vec<SortKey> {
    page.sort
        .iter()
        .filter_map(|order| match resolve(&order.property) {
            Some(column) => Some(SortKey {
                column,
                direction: order.direction,
            }),
            None => {
                warn!(property = %order.property, "Ignoring unknown sort property");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::SortOrder;
    use league_queries::schema::player;

    #[test]
    fn test_resolve_sort_skips_unknown_properties() {
        let page = PageRequest::new(0, 10)
            .with_sort(SortOrder::desc("baskets"))
            .with_sort(SortOrder::asc("shoeSize"))
            .with_sort(SortOrder::asc("name"));

        assert_eq!(
            resolve_sort(&page, player::sort_column),
            vec![
                SortKey {
                    column: player::BASKETS,
                    direction: SortDirection::Desc,
                },
                SortKey {
                    column: player::NAME,
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn test_repository_errors_map_to_league_errors() {
        let not_found: LeagueError = RepositoryError::NotFound {
            entity: "player",
            id: 7,
        }
        .into();
        assert_eq!(not_found.status_code(), 404);

        let constraint: LeagueError = RepositoryError::Constraint("team in use".into()).into();
        assert_eq!(constraint.status_code(), 400);

        let database: LeagueError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(database.status_code(), 500);
    }
}
