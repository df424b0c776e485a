//! Criteria: per-entity collections of optional filters
//!
//! A criteria value is bound from query parameters named
//! `<field>.<operator>` plus `distinct`, then turned into a
//! [`Specification`](crate::specification::Specification).

mod player;
mod team;

pub use player::PlayerCriteria;
pub use team::TeamCriteria;

use std::fmt::Debug;

use league_core::LeagueError;
use thiserror::Error;
use tracing::debug;

use crate::filters::{BindFilter, ParseValueError};
use crate::specification::IntoSpecification;

/// Name of the duplicate-collapse parameter
pub const DISTINCT_PARAM: &str = "distinct";

/// A query parameter whose value does not fit its filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("Invalid value for parameter '{parameter}': {source}")]
    InvalidValue {
        parameter: String,
        source: ParseValueError,
    },
}

impl From<CriteriaError> for LeagueError {
    fn from(err: CriteriaError) -> Self {
        LeagueError::BadRequest(err.to_string())
    }
}

/// Common behaviour of every criteria type
pub trait Criteria: IntoSpecification + Clone + Default + PartialEq + Debug + Send + Sync {
    fn distinct(&self) -> Option<bool>;

    fn set_distinct(&mut self, distinct: Option<bool>);

    /// Deep copy; filters are owned so this is a clone
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Apply `<field>.<operator>=<value>`.
    ///
    /// Returns `Ok(false)` when the field or the operator is unknown.
    fn bind_filter(
        &mut self,
        field: &str,
        operator: &str,
        value: &str,
    ) -> Result<bool, ParseValueError>;

    /// Bind criteria from raw query pairs, in order.
    ///
    /// Unknown parameters are skipped; values that fail to parse are errors.
    fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            let invalid = |source| CriteriaError::InvalidValue {
                parameter: key.to_string(),
                source,
            };

            if key == DISTINCT_PARAM {
                let distinct = value.trim().parse::<bool>().map_err(|_| {
                    invalid(ParseValueError {
                        value: value.to_string(),
                        expected: "bool",
                    })
                })?;
                criteria.set_distinct(Some(distinct));
                continue;
            }

            let bound = match key.split_once('.') {
                Some((field, operator)) => criteria
                    .bind_filter(field, operator, value)
                    .map_err(invalid)?,
                None => false,
            };
            if !bound {
                debug!(parameter = key, "Ignoring unknown criteria parameter");
            }
        }

        Ok(criteria)
    }
}

/// Bind onto an optional filter, creating it on demand.
///
/// The slot is left empty when nothing was bound.
pub(crate) fn bind_into<F: BindFilter>(
    slot: &mut Option<F>,
    operator: &str,
    value: &str,
) -> Result<bool, ParseValueError> {
    let filter = slot.get_or_insert_with(F::default);
    let bound = filter.bind(operator, value);
    let empty = filter.is_empty();
    if empty {
        *slot = None;
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::LongFilter;

    #[test]
    fn test_bind_into_leaves_slot_empty_on_unknown_operator() {
        let mut slot: Option<LongFilter> = None;
        assert_eq!(bind_into(&mut slot, "contains", "x"), Ok(false));
        assert!(slot.is_none());

        assert_eq!(bind_into(&mut slot, "equals", "4"), Ok(true));
        assert_eq!(slot.map(|f| f.filter.equals), Some(Some(4)));
    }

    #[test]
    fn test_bind_into_error_does_not_leave_empty_filter() {
        let mut slot: Option<LongFilter> = None;
        assert!(bind_into(&mut slot, "equals", "four").is_err());
        assert!(slot.is_none());
    }

    #[test]
    fn test_criteria_error_is_bad_request() {
        let err = PlayerCriteria::from_query_pairs([("id.equals", "abc")]).unwrap_err();
        assert!(err.to_string().contains("id.equals"));

        let league: LeagueError = err.into();
        assert_eq!(league.status_code(), 400);
    }

    #[test]
    fn test_invalid_distinct_is_rejected() {
        let err = TeamCriteria::from_query_pairs([("distinct", "maybe")]).unwrap_err();
        assert_eq!(
            err,
            CriteriaError::InvalidValue {
                parameter: "distinct".to_string(),
                source: ParseValueError {
                    value: "maybe".to_string(),
                    expected: "bool",
                },
            }
        );
    }
}
