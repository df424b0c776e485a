use crate::filters::{
    DoubleFilter, IntegerFilter, LocalDateFilter, LongFilter, ParseValueError, StringFilter,
};
use crate::predicate::Table;
use crate::schema::player;
use crate::specification::{
    build_range_specification, build_string_specification, IntoSpecification, Specification,
};

use super::{bind_into, Criteria};

/// Filters over players, bound from `GET /api/players` parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerCriteria {
    pub id: Option<LongFilter>,
    pub name: Option<StringFilter>,
    pub birth_date: Option<LocalDateFilter>,
    pub height: Option<DoubleFilter>,
    pub weight: Option<DoubleFilter>,
    pub baskets: Option<IntegerFilter>,
    pub assists: Option<IntegerFilter>,
    /// Filter on the id of the player's team
    pub team_id: Option<LongFilter>,
    pub distinct: Option<bool>,
}

impl PlayerCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_mut(&mut self) -> &mut LongFilter {
        self.id.get_or_insert_with(LongFilter::default)
    }

    pub fn name_mut(&mut self) -> &mut StringFilter {
        self.name.get_or_insert_with(StringFilter::default)
    }

    pub fn birth_date_mut(&mut self) -> &mut LocalDateFilter {
        self.birth_date.get_or_insert_with(LocalDateFilter::default)
    }

    pub fn height_mut(&mut self) -> &mut DoubleFilter {
        self.height.get_or_insert_with(DoubleFilter::default)
    }

    pub fn weight_mut(&mut self) -> &mut DoubleFilter {
        self.weight.get_or_insert_with(DoubleFilter::default)
    }

    pub fn baskets_mut(&mut self) -> &mut IntegerFilter {
        self.baskets.get_or_insert_with(IntegerFilter::default)
    }

    pub fn assists_mut(&mut self) -> &mut IntegerFilter {
        self.assists.get_or_insert_with(IntegerFilter::default)
    }

    pub fn team_id_mut(&mut self) -> &mut LongFilter {
        self.team_id.get_or_insert_with(LongFilter::default)
    }
}

impl IntoSpecification for PlayerCriteria {
    fn root() -> Table {
        player::TABLE
    }

    fn to_specification(&self) -> Specification {
        let mut spec = Specification::new(player::TABLE).distinct(self.distinct.unwrap_or(false));

        if let Some(filter) = &self.id {
            spec = spec.and(build_range_specification(filter, player::ID));
        }
        if let Some(filter) = &self.name {
            spec = spec.and(build_string_specification(filter, player::NAME));
        }
        if let Some(filter) = &self.birth_date {
            spec = spec.and(build_range_specification(filter, player::BIRTH_DATE));
        }
        if let Some(filter) = &self.height {
            spec = spec.and(build_range_specification(filter, player::HEIGHT));
        }
        if let Some(filter) = &self.weight {
            spec = spec.and(build_range_specification(filter, player::WEIGHT));
        }
        if let Some(filter) = &self.baskets {
            spec = spec.and(build_range_specification(filter, player::BASKETS));
        }
        if let Some(filter) = &self.assists {
            spec = spec.and(build_range_specification(filter, player::ASSISTS));
        }
        if let Some(filter) = &self.team_id {
            spec = spec.and(build_range_specification(filter, player::JOINED_TEAM_ID));
        }

        spec
    }
}

impl Criteria for PlayerCriteria {
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
            "birthDate" => bind_into(&mut self.birth_date, operator, value),
            "height" => bind_into(&mut self.height, operator, value),
            "weight" => bind_into(&mut self.weight, operator, value),
            "baskets" => bind_into(&mut self.baskets, operator, value),
            "assists" => bind_into(&mut self.assists, operator, value),
            "teamId" => bind_into(&mut self.team_id, operator, value),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterBuilder;
    use crate::predicate::{CompareOp, Predicate, Value};
    use crate::specification::create_specification;
    use chrono::NaiveDate;

    #[test]
    fn test_absent_criteria_match_everything() {
        let spec = create_specification::<PlayerCriteria>(None);
        assert!(spec.is_unrestricted());
        assert!(!spec.distinct);

        let empty = PlayerCriteria::new().to_specification();
        assert_eq!(empty, spec);
    }

    #[test]
    fn test_distinct_only() {
        let criteria = PlayerCriteria {
            distinct: Some(true),
            ..Default::default()
        };
        let spec = criteria.to_specification();
        assert!(spec.distinct);
        assert!(spec.is_unrestricted());
    }

    #[test]
    fn test_fields_are_anded_in_declaration_order() {
        let mut criteria = PlayerCriteria::new();
        *criteria.team_id_mut() = LongFilter::new().equals(5);
        *criteria.name_mut() = StringFilter::new().contains("Jo");

        let spec = criteria.to_specification();
        assert_eq!(
            spec.predicate,
            Predicate::And(vec![
                Predicate::contains(player::NAME, "Jo"),
                Predicate::compare(player::JOINED_TEAM_ID, CompareOp::Eq, 5i64),
            ])
        );
        assert_eq!(spec.joins(), vec![player::TEAM_JOIN]);
    }

    #[test]
    fn test_bind_from_query_pairs() {
        let criteria = PlayerCriteria::from_query_pairs([
            ("id.in", "1,2"),
            ("id.in", "3"),
            ("birthDate.greaterThanOrEqual", "1990-01-01"),
            ("height.lessThan", "2.1"),
            ("teamId.specified", "false"),
            ("distinct", "true"),
            ("page", "0"),
            ("name.unknownOp", "x"),
        ])
        .unwrap();

        assert_eq!(
            criteria.id.as_ref().and_then(|f| f.filter.in_list.clone()),
            Some(vec![1, 2, 3])
        );
        assert_eq!(
            criteria
                .birth_date
                .as_ref()
                .and_then(|f| f.greater_than_or_equal),
            NaiveDate::from_ymd_opt(1990, 1, 1)
        );
        assert_eq!(criteria.height.as_ref().and_then(|f| f.less_than), Some(2.1));
        assert_eq!(
            criteria.team_id.as_ref().and_then(|f| f.filter.specified),
            Some(false)
        );
        assert!(criteria.name.is_none());
        assert_eq!(criteria.distinct, Some(true));
    }

    #[test]
    fn test_repeated_scalar_keeps_last_value() {
        let criteria =
            PlayerCriteria::from_query_pairs([("baskets.equals", "3"), ("baskets.equals", "7")])
                .unwrap();
        assert_eq!(criteria.baskets.and_then(|f| f.filter.equals), Some(7));
    }

    #[test]
    fn test_copy_is_independent_and_equal() {
        let mut original = PlayerCriteria::new();
        *original.assists_mut() = IntegerFilter::new().in_list(vec![1, 2]);

        let mut copy = original.copy();
        assert_eq!(copy, original);

        copy.assists_mut().less_than = Some(10);
        assert_ne!(copy, original);
        assert_eq!(original.assists.as_ref().and_then(|f| f.less_than), None);
    }

    #[test]
    fn test_range_bounds_on_one_field() {
        let mut criteria = PlayerCriteria::new();
        *criteria.weight_mut() = DoubleFilter::new()
            .greater_than_or_equal(10.0)
            .less_than_or_equal(20.0);

        assert_eq!(
            criteria.to_specification().predicate,
            Predicate::And(vec![
                Predicate::compare(player::WEIGHT, CompareOp::Ge, Value::Float(10.0)),
                Predicate::compare(player::WEIGHT, CompareOp::Le, Value::Float(20.0)),
            ])
        );
    }
}
