//! # league-queries
//!
//! Dynamic filtering for League RS.
//!
//! Criteria are bound from query parameters, then translated into a
//! [`Specification`]: an AND of atomic predicates over columns of the root
//! table and of LEFT-joined related tables, plus a `distinct` flag.
//!
//! ## Structure
//!
//! - `filters` - typed per-field filters and their query-string binding
//! - `predicate` - backend-neutral predicate algebra
//! - `schema` - tables, columns and joins of the filterable entities
//! - `specification` - predicate building from filters
//! - `criteria` - `PlayerCriteria` and `TeamCriteria`
//!
//! ## Example
//!
//! ```
//! use league_queries::{Criteria, IntoSpecification, PlayerCriteria};
//!
//! let criteria = PlayerCriteria::from_query_pairs([
//!     ("name.contains", "Jo"),
//!     ("teamId.equals", "5"),
//! ])
//! .unwrap();
//!
//! let spec = criteria.to_specification();
//! assert_eq!(spec.joins().len(), 1);
//! ```

pub mod criteria;
pub mod filters;
pub mod predicate;
pub mod schema;
pub mod specification;

pub use criteria::{Criteria, CriteriaError, PlayerCriteria, TeamCriteria};
pub use filters::{
    BindFilter, DoubleFilter, Filter, FilterBuilder, IntegerFilter, LocalDateFilter, LongFilter,
    ParseValueError, RangeFilter, StringFilter,
};
pub use predicate::{Column, CompareOp, Join, Predicate, Source, Table, Value};
pub use specification::{create_specification, IntoSpecification, Specification};
