//! Team model
//!
//! Table: team

use league_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A team; players reference it through `player.team_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Option<Id>,

    #[validate(length(max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 255))]
    pub city: Option<String>,
}

impl Identifiable for Team {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for Team {
    const ENTITY_NAME: &'static str = "team";

    fn merge(&mut self, patch: Self) {
        if patch.name.is_some() {
            self.name = patch.name;
        }
        if patch.city.is_some() {
            self.city = patch.city;
        }
    }
}

impl Team {
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            city: Some(city.into()),
        }
    }

    /// A reference to an existing team, as sent in player bodies
    pub fn reference(id: Id) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}
