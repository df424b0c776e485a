//! # league-services
//!
//! Business logic services for League RS.
//!
//! - `query` - filtered reads driven by criteria
//! - `entity` - single-entity writes with the identifier guards

pub mod entity;
pub mod query;

pub use entity::{error_keys, EntityService};
pub use query::QueryService;

use league_models::{Player, Team};
use league_queries::{PlayerCriteria, TeamCriteria};

pub type PlayerQueryService = QueryService<Player, PlayerCriteria>;
pub type TeamQueryService = QueryService<Team, TeamCriteria>;
pub type PlayerService = EntityService<Player>;
pub type TeamService = EntityService<Team>;
