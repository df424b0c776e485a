//! # league-api
//!
//! REST handlers for League RS.
//!
//! Players and teams are exposed under `/api` with create, update, partial
//! update, criteria-filtered listing, counting, lookup and delete.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
