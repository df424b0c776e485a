//! Specification building
//!
//! Turns filters into predicates on a column and collects them, together
//! with the `distinct` flag, into a [`Specification`] that a repository can
//! execute as a list, a page, or a count.

use crate::filters::{Filter, FilterValue, RangeFilter, StringFilter};
use crate::predicate::{Column, CompareOp, Join, Predicate, Table, Value};

/// An executable query condition over one root table
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    pub root: Table,
    pub predicate: Predicate,
    /// Collapse duplicate root rows produced by one-to-many joins
    pub distinct: bool,
}

impl Specification {
    /// The unrestricted specification: every row of `root` matches
    pub fn new(root: Table) -> Self {
        Self {
            root,
            predicate: Predicate::True,
            distinct: false,
        }
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicate = self.predicate.and(predicate);
        self
    }

    /// Joins required by the predicate, in first-use order, without repeats
    pub fn joins(&self) -> Vec<Join> {
        let mut joins: Vec<Join> = Vec::new();
        for column in self.predicate.columns() {
            if let Some(join) = column.join() {
                if !joins.contains(join) {
                    joins.push(*join);
                }
            }
        }
        joins
    }

    pub fn is_unrestricted(&self) -> bool {
        self.predicate.is_true()
    }
}

/// Criteria that know how to describe themselves as a [`Specification`]
pub trait IntoSpecification {
    /// Root table the criteria filter
    fn root() -> Table;

    /// Build the specification. `distinct` is applied before any filter.
    fn to_specification(&self) -> Specification;
}

/// Build the specification for optional criteria; `None` matches everything.
pub fn create_specification<C: IntoSpecification>(criteria: Option<&C>) -> Specification {
    match criteria {
        Some(criteria) => criteria.to_specification(),
        None => Specification::new(C::root()),
    }
}

/// Predicate for the attributes shared by every filter
pub fn build_specification<T: FilterValue>(filter: &Filter<T>, column: Column) -> Predicate {
    let mut predicate = Predicate::True;

    if let Some(value) = &filter.equals {
        predicate = predicate.and(Predicate::compare(column, CompareOp::Eq, value.clone()));
    }
    if let Some(value) = &filter.not_equals {
        predicate = predicate.and(Predicate::compare(column, CompareOp::Ne, value.clone()));
    }
    if let Some(values) = &filter.in_list {
        let values = values.iter().cloned().map(Into::into).collect::<Vec<Value>>();
        predicate = predicate.and(Predicate::is_in(column, values));
    }
    if let Some(values) = &filter.not_in_list {
        let values = values.iter().cloned().map(Into::into).collect::<Vec<Value>>();
        predicate = predicate.and(Predicate::not_in(column, values));
    }
    if let Some(specified) = filter.specified {
        predicate = predicate.and(if specified {
            Predicate::is_not_null(column)
        } else {
            Predicate::is_null(column)
        });
    }

    predicate
}

/// Predicate for an ordinal filter: shared attributes plus range bounds
pub fn build_range_specification<T: FilterValue>(filter: &RangeFilter<T>, column: Column) -> Predicate {
    let bounds = [
        (CompareOp::Gt, &filter.greater_than),
        (CompareOp::Lt, &filter.less_than),
        (CompareOp::Ge, &filter.greater_than_or_equal),
        (CompareOp::Le, &filter.less_than_or_equal),
    ];

    bounds
        .into_iter()
        .filter_map(|(op, bound)| {
            bound
                .as_ref()
                .map(|value| Predicate::compare(column, op, value.clone()))
        })
        .fold(build_specification(&filter.filter, column), Predicate::and)
}

/// Predicate for a text filter: shared attributes plus substring matching
pub fn build_string_specification(filter: &StringFilter, column: Column) -> Predicate {
    let mut predicate = build_specification(&filter.filter, column);

    if let Some(needle) = &filter.contains {
        predicate = predicate.and(Predicate::contains(column, needle.clone()));
    }
    if let Some(needle) = &filter.does_not_contain {
        predicate = predicate.and(Predicate::does_not_contain(column, needle.clone()));
    }

    predicate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterBuilder, LongFilter};
    use crate::schema::{player, team};

    #[test]
    fn test_empty_filter_is_identity() {
        assert!(build_range_specification(&LongFilter::new(), player::ID).is_true());
        assert!(build_string_specification(&StringFilter::new(), player::NAME).is_true());
    }

    #[test]
    fn test_every_populated_attribute_is_anded() {
        let filter = LongFilter::new()
            .in_list(vec![1, 2, 3])
            .specified(true)
            .greater_than_or_equal(2);

        assert_eq!(
            build_range_specification(&filter, player::ID),
            Predicate::And(vec![
                Predicate::is_in(player::ID, vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
                Predicate::is_not_null(player::ID),
                Predicate::compare(player::ID, CompareOp::Ge, 2i64),
            ])
        );
    }

    #[test]
    fn test_specified_false_is_null_check() {
        let filter = Filter::<i64>::new().specified(false);
        assert_eq!(
            build_specification(&filter, player::JOINED_TEAM_ID),
            Predicate::is_null(player::JOINED_TEAM_ID)
        );
    }

    #[test]
    fn test_string_contains() {
        let filter = StringFilter::new().contains("Jo");
        assert_eq!(
            build_string_specification(&filter, player::NAME),
            Predicate::contains(player::NAME, "Jo")
        );
    }

    #[test]
    fn test_joins_are_deduplicated() {
        let spec = Specification::new(team::TABLE)
            .and(Predicate::is_not_null(team::JOINED_PLAYER_ID))
            .and(Predicate::compare(team::JOINED_PLAYER_ID, CompareOp::Gt, 3i64))
            .and(Predicate::is_not_null(team::NAME));

        assert_eq!(spec.joins(), vec![team::PLAYERS_JOIN]);
        assert!(Specification::new(team::TABLE).joins().is_empty());
    }
}
