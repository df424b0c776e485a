//! Player model
//!
//! Table: player (`team_id` references `team.id`)

use chrono::NaiveDate;
use league_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::team::Team;

/// A player, optionally belonging to one team
///
/// On reads `team` carries the full team; on writes only its `id` is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Option<Id>,

    #[validate(length(max = 255))]
    pub name: Option<String>,

    /// Serialized as `YYYY-MM-DD`
    pub birth_date: Option<NaiveDate>,

    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub baskets: Option<i32>,
    pub assists: Option<i32>,

    pub team: Option<Team>,
}

impl Identifiable for Player {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for Player {
    const ENTITY_NAME: &'static str = "player";

    fn merge(&mut self, patch: Self) {
        if patch.name.is_some() {
            self.name = patch.name;
        }
        if patch.birth_date.is_some() {
            self.birth_date = patch.birth_date;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }
        if patch.weight.is_some() {
            self.weight = patch.weight;
        }
        if patch.baskets.is_some() {
            self.baskets = patch.baskets;
        }
        if patch.assists.is_some() {
            self.assists = patch.assists;
        }
        if patch.team.is_some() {
            self.team = patch.team;
        }
    }
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_team(mut self, team_id: Id) -> Self {
        self.team = Some(Team::reference(team_id));
        self
    }

    /// Id of the referenced team, if any
    pub fn team_id(&self) -> Option<Id> {
        self.team.as_ref().and_then(|team| team.id)
    }
}
