use crate::filters::{LongFilter, ParseValueError, StringFilter};
use crate::predicate::Table;
use crate::schema::team;
use crate::specification::{
    build_range_specification, build_string_specification, IntoSpecification, Specification,
};

use super::{bind_into, Criteria};

/// Filters over teams, bound from `GET /api/teams` parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamCriteria {
    pub id: Option<LongFilter>,
    pub name: Option<StringFilter>,
    pub city: Option<StringFilter>,
    /// Filter on the ids of the team's players; joins one row per player
    pub player_id: Option<LongFilter>,
    pub distinct: Option<bool>,
}

impl TeamCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_mut(&mut self) -> &mut LongFilter {
        self.id.get_or_insert_with(LongFilter::default)
    }

    pub fn name_mut(&mut self) -> &mut StringFilter {
        self.name.get_or_insert_with(StringFilter::default)
    }

    pub fn city_mut(&mut self) -> &mut StringFilter {
        self.city.get_or_insert_with(StringFilter::default)
    }

    pub fn player_id_mut(&mut self) -> &mut LongFilter {
        self.player_id.get_or_insert_with(LongFilter::default)
    }
}

impl IntoSpecification for TeamCriteria {
    fn root() -> Table {
        team::TABLE
    }

    fn to_specification(&self) -> Specification {
        let mut spec = Specification::new(team::TABLE).distinct(self.distinct.unwrap_or(false));

        if let Some(filter) = &self.id {
            spec = spec.and(build_range_specification(filter, team::ID));
        }
        if let Some(filter) = &self.name {
            spec = spec.and(build_string_specification(filter, team::NAME));
        }
        if let Some(filter) = &self.city {
            spec = spec.and(build_string_specification(filter, team::CITY));
        }
        if let Some(filter) = &self.player_id {
            spec = spec.and(build_range_specification(filter, team::JOINED_PLAYER_ID));
        }

        spec
    }
}

impl Criteria for TeamCriteria {
    fn distinct(&self) -> Option<bool> {
        self.distinct
    }

    fn set_distinct(&mut self, distinct: Option<bool>) {
        self.distinct = distinct;
    }

    fn bind_filter(
        &mut self,
        field: &str,
        operator: &str,
        value: &str,
    ) -> Result<bool, ParseValueError> {
        match field {
            "id" => bind_into(&mut self.id, operator, value),
            "name" => bind_into(&mut self.name, operator, value),
            "city" => bind_into(&mut self.city, operator, value),
            "playerId" => bind_into(&mut self.player_id, operator, value),
            _ => Ok(false),
        }
    }
}
