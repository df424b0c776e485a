//! Query Filters
//!
//! Typed, optional constraints on a single field. Every populated attribute
//! of a filter is a separate condition; a filter matches when all of them do.
//!
//! Filters are bound from `<field>.<operator>=<value>` query parameters via
//! [`BindFilter`] and built fluently via [`FilterBuilder`].

use std::fmt::Debug;
use std::str::FromStr;

use chrono::NaiveDate;
use league_core::traits::Id;
use thiserror::Error;

use crate::predicate::Value;

/// Types a filter can constrain
pub trait FilterValue: Clone + PartialEq + Debug + FromStr + Into<Value> + Send + Sync {
    /// Whether a parsed query parameter may be used in a filter
    fn is_admissible(&self) -> bool {
        true
    }
}

impl FilterValue for i32 {}
impl FilterValue for i64 {}
impl FilterValue for bool {}
impl FilterValue for String {}
impl FilterValue for NaiveDate {}

/// NaN and the infinities compare differently in SQL and in memory.
impl FilterValue for f64 {
    fn is_admissible(&self) -> bool {
        self.is_finite()
    }
}

/// A raw parameter value that could not be parsed into the filter's type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {expected}")]
pub struct ParseValueError {
    pub value: String,
    pub expected: &'static str,
}

/// Filter operators recognised in query parameters
pub mod operators {
    pub const EQUALS: &str = "equals";
    pub const NOT_EQUALS: &str = "notEquals";
    pub const IN: &str = "in";
    pub const NOT_IN: &str = "notIn";
    pub const SPECIFIED: &str = "specified";
    pub const GREATER_THAN: &str = "greaterThan";
    pub const LESS_THAN: &str = "lessThan";
    pub const GREATER_THAN_OR_EQUAL: &str = "greaterThanOrEqual";
    pub const LESS_THAN_OR_EQUAL: &str = "lessThanOrEqual";
    pub const CONTAINS: &str = "contains";
    pub const DOES_NOT_CONTAIN: &str = "doesNotContain";
}

/// Equality, membership and null-check constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub in_list: Option<Vec<T>>,
    pub not_in_list: Option<Vec<T>>,
    /// `true`: the field must be non-null; `false`: it must be null
    pub specified: Option<bool>,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_list: None,
            not_in_list: None,
            specified: None,
        }
    }
}

impl<T> Filter<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

/// [`Filter`] plus ordering comparisons, for numbers and dates
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    pub filter: Filter<T>,
    pub greater_than: Option<T>,
    pub less_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            greater_than: None,
            less_than: None,
            greater_than_or_equal: None,
            less_than_or_equal: None,
        }
    }
}

impl<T> RangeFilter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    pub fn less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    pub fn greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    pub fn less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }
}

/// [`Filter`] plus substring matching, for text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    pub filter: Filter<String>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    pub fn does_not_contain(mut self, value: impl Into<String>) -> Self {
        self.does_not_contain = Some(value.into());
        self
    }
}

pub type LongFilter = RangeFilter<Id>;
pub type IntegerFilter = RangeFilter<i32>;
pub type DoubleFilter = RangeFilter<f64>;
pub type LocalDateFilter = RangeFilter<NaiveDate>;

/// Fluent setters for the attributes every filter shares
pub trait FilterBuilder<T>: Sized {
    fn base_mut(&mut self) -> &mut Filter<T>;

    fn equals(mut self, value: T) -> Self {
        self.base_mut().equals = Some(value);
        self
    }

    fn not_equals(mut self, value: T) -> Self {
        self.base_mut().not_equals = Some(value);
        self
    }

    fn in_list(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.base_mut().in_list = Some(values.into_iter().collect());
        self
    }

    fn not_in_list(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.base_mut().not_in_list = Some(values.into_iter().collect());
        self
    }

    fn specified(mut self, specified: bool) -> Self {
        self.base_mut().specified = Some(specified);
        self
    }
}

impl<T> FilterBuilder<T> for Filter<T> {
    fn base_mut(&mut self) -> &mut Filter<T> {
        self
    }
}

impl<T> FilterBuilder<T> for RangeFilter<T> {
    fn base_mut(&mut self) -> &mut Filter<T> {
        &mut self.filter
    }
}

impl FilterBuilder<String> for StringFilter {
    fn base_mut(&mut self) -> &mut Filter<String> {
        &mut self.filter
    }
}

/// Binding of one `<operator>=<value>` query parameter onto a filter
pub trait BindFilter: Default {
    /// Apply `operator` with the raw `value`.
    ///
    /// Returns `Ok(false)` when the operator does not exist for this filter
    /// type; such parameters are ignored by the caller.
    fn bind(&mut self, operator: &str, value: &str) -> Result<bool, ParseValueError>;

    /// True when no attribute is set
    fn is_empty(&self) -> bool;
}

impl<T: FilterValue> BindFilter for Filter<T> {
    fn bind(&mut self, operator: &str, value: &str) -> Result<bool, ParseValueError> {
        match operator {
            operators::EQUALS => self.equals = Some(parse_value(value)?),
            operators::NOT_EQUALS => self.not_equals = Some(parse_value(value)?),
            operators::IN => append_values(&mut self.in_list, value)?,
            operators::NOT_IN => append_values(&mut self.not_in_list, value)?,
            operators::SPECIFIED => self.specified = Some(parse_value(value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not_equals.is_none()
            && self.in_list.is_none()
            && self.not_in_list.is_none()
            && self.specified.is_none()
    }
}

impl<T: FilterValue> BindFilter for RangeFilter<T> {
    fn bind(&mut self, operator: &str, value: &str) -> Result<bool, ParseValueError> {
        match operator {
            operators::GREATER_THAN => self.greater_than = Some(parse_value(value)?),
            operators::LESS_THAN => self.less_than = Some(parse_value(value)?),
            operators::GREATER_THAN_OR_EQUAL => {
                self.greater_than_or_equal = Some(parse_value(value)?)
            }
            operators::LESS_THAN_OR_EQUAL => self.less_than_or_equal = Some(parse_value(value)?),
            _ => return self.filter.bind(operator, value),
        }
        Ok(true)
    }

    fn is_empty(&self) -> bool {
        self.filter.is_empty()
            && self.greater_than.is_none()
            && self.less_than.is_none()
            && self.greater_than_or_equal.is_none()
            && self.less_than_or_equal.is_none()
    }
}

impl BindFilter for StringFilter {
    fn bind(&mut self, operator: &str, value: &str) -> Result<bool, ParseValueError> {
        match operator {
            operators::CONTAINS => self.contains = Some(value.to_string()),
            operators::DOES_NOT_CONTAIN => self.does_not_contain = Some(value.to_string()),
            _ => return self.filter.bind(operator, value),
        }
        Ok(true)
    }

    fn is_empty(&self) -> bool {
        self.filter.is_empty() && self.contains.is_none() && self.does_not_contain.is_none()
    }
}

fn parse_value<T: FilterValue>(raw: &str) -> Result<T, ParseValueError> {
    raw.parse::<T>()
        .ok()
        .filter(T::is_admissible)
        .ok_or_else(|| ParseValueError {
            value: raw.to_string(),
            expected: std::any::type_name::<T>()
                .rsplit("::")
                .next()
                .unwrap_or("value"),
        })
}

/// `in`/`notIn` accept comma-separated lists; repeated parameters append.
fn append_values<T: FilterValue>(slot: &mut Option<Vec<T>>, raw: &str) -> Result<(), ParseValueError> {
    let parsed = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_value)
        .collect::<Result<Vec<T>, _>>()?;
    slot.get_or_insert_with(Vec::new).extend(parsed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_base_and_range_attributes() {
        let filter = LongFilter::new()
            .greater_than_or_equal(10)
            .less_than_or_equal(20)
            .not_equals(15);

        assert_eq!(filter.greater_than_or_equal, Some(10));
        assert_eq!(filter.less_than_or_equal, Some(20));
        assert_eq!(filter.filter.not_equals, Some(15));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_default_filter_is_empty() {
        assert!(Filter::<i64>::new().is_empty());
        assert!(DoubleFilter::new().is_empty());
        assert!(StringFilter::new().is_empty());
    }

    #[test]
    fn test_bind_range_operators() {
        let mut filter = IntegerFilter::new();
        assert_eq!(filter.bind("greaterThan", "5"), Ok(true));
        assert_eq!(filter.bind("lessThanOrEqual", "9"), Ok(true));
        assert_eq!(filter.bind("equals", "7"), Ok(true));

        assert_eq!(filter.greater_than, Some(5));
        assert_eq!(filter.less_than_or_equal, Some(9));
        assert_eq!(filter.filter.equals, Some(7));
    }

    #[test]
    fn test_bind_in_accepts_commas_and_repeats() {
        let mut filter = LongFilter::new();
        filter.bind("in", "1, 2").unwrap();
        filter.bind("in", "3").unwrap();
        assert_eq!(filter.filter.in_list, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_bind_unknown_operator_is_ignored() {
        let mut filter = StringFilter::new();
        assert_eq!(filter.bind("greaterThan", "a"), Ok(false));
        assert!(filter.is_empty());

        let mut range = LongFilter::new();
        assert_eq!(range.bind("contains", "1"), Ok(false));
    }

    #[test]
    fn test_bind_invalid_value() {
        let mut filter = LongFilter::new();
        let err = filter.bind("equals", "abc").unwrap_err();
        assert_eq!(err.value, "abc");
        assert_eq!(err.expected, "i64");

        let mut dates = LocalDateFilter::new();
        let err = dates.bind("lessThan", "2022-13-01").unwrap_err();
        assert_eq!(err.expected, "NaiveDate");
    }

    #[test]
    fn test_bind_rejects_non_finite_doubles() {
        let mut filter = DoubleFilter::new();
        for raw in ["NaN", "inf", "-infinity"] {
            let err = filter.bind("equals", raw).unwrap_err();
            assert_eq!(err.value, raw);
            assert_eq!(err.expected, "f64");
        }
        assert!(filter.bind("in", "1.5,NaN").is_err());
        assert!(filter.is_empty());

        assert_eq!(filter.bind("greaterThan", "1.95"), Ok(true));
        assert_eq!(filter.greater_than, Some(1.95));
    }

    #[test]
    fn test_bind_specified_and_strings() {
        let mut filter = StringFilter::new();
        filter.bind("specified", "false").unwrap();
        filter.bind("contains", "Jo").unwrap();
        filter.bind("doesNotContain", "hn").unwrap();

        assert_eq!(filter.filter.specified, Some(false));
        assert_eq!(filter.contains.as_deref(), Some("Jo"));
        assert_eq!(filter.does_not_contain.as_deref(), Some("hn"));
    }

    #[test]
    fn test_clone_is_deep() {
        let original = StringFilter::new().in_list(vec!["a".to_string()]);
        let mut copy = original.clone();
        copy.filter.in_list.as_mut().unwrap().push("b".to_string());

        assert_eq!(original.filter.in_list, Some(vec!["a".to_string()]));
        assert_ne!(original, copy);
    }
}
