//! Predicate algebra
//!
//! A small, backend-neutral representation of query conditions: atomic
//! comparisons on columns, AND composition, and LEFT joins addressed through
//! the columns that use them. `league-db` renders it to SQL or evaluates it
//! against rows held in memory; both follow [`Predicate::evaluate`].

use std::cmp::Ordering;

use chrono::NaiveDate;

/// A scalar value compared against a column
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Ordering between two values of compatible kinds.
    ///
    /// Returns `None` when either side is NULL or the kinds cannot be
    /// compared, which callers treat as "does not match".
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A table and the alias it is queried under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table {
    pub name: &'static str,
    pub alias: &'static str,
}

/// LEFT OUTER join from the query root to a related table.
///
/// The joined table is aliased by `relation`:
/// `LEFT JOIN {target.name} {relation} ON {root}.{source_column} = {relation}.{target_column}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Join {
    pub relation: &'static str,
    pub target: Table,
    pub source_column: &'static str,
    pub target_column: &'static str,
}

/// Where a column lives relative to the query root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Root,
    Joined(Join),
}

/// A column reference, resolved at compile time from the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub source: Source,
    pub name: &'static str,
}

impl Column {
    pub const fn root(name: &'static str) -> Self {
        Self {
            source: Source::Root,
            name,
        }
    }

    pub const fn joined(join: Join, name: &'static str) -> Self {
        Self {
            source: Source::Joined(join),
            name,
        }
    }

    /// The join this column requires, if any
    pub fn join(&self) -> Option<&Join> {
        match &self.source {
            Source::Root => None,
            Source::Joined(join) => Some(join),
        }
    }
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// A composable boolean condition over the rows of a query
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row
    True,
    And(Vec<Predicate>),
    Compare {
        column: Column,
        op: CompareOp,
        value: Value,
    },
    In {
        column: Column,
        values: Vec<Value>,
        negated: bool,
    },
    IsNull {
        column: Column,
        negated: bool,
    },
    /// Case-sensitive substring match; `needle` is the raw, unescaped text
    Like {
        column: Column,
        needle: String,
        negated: bool,
    },
}

impl Predicate {
    pub fn compare(column: Column, op: CompareOp, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn is_in(column: Column, values: Vec<Value>) -> Self {
        Predicate::In {
            column,
            values,
            negated: false,
        }
    }

    pub fn not_in(column: Column, values: Vec<Value>) -> Self {
        Predicate::In {
            column,
            values,
            negated: true,
        }
    }

    pub fn is_null(column: Column) -> Self {
        Predicate::IsNull {
            column,
            negated: false,
        }
    }

    pub fn is_not_null(column: Column) -> Self {
        Predicate::IsNull {
            column,
            negated: true,
        }
    }

    pub fn contains(column: Column, needle: impl Into<String>) -> Self {
        Predicate::Like {
            column,
            needle: needle.into(),
            negated: false,
        }
    }

    pub fn does_not_contain(column: Column, needle: impl Into<String>) -> Self {
        Predicate::Like {
            column,
            needle: needle.into(),
            negated: true,
        }
    }

    /// AND two predicates, flattening nested conjunctions.
    ///
    /// `True` is the identity element.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(right)) => {
                let mut all = Vec::with_capacity(right.len() + 1);
                all.push(p);
                all.extend(right);
                Predicate::And(all)
            }
            (left, right) => Predicate::And(vec![left, right]),
        }
    }

    /// Conjunction of every predicate yielded by `predicates`
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        predicates
            .into_iter()
            .fold(Predicate::True, Predicate::and)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Every column referenced, in left-to-right order
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, out: &mut Vec<Column>) {
        match self {
            Predicate::True => {}
            Predicate::And(parts) => parts.iter().for_each(|p| p.collect_columns(out)),
            Predicate::Compare { column, .. }
            | Predicate::In { column, .. }
            | Predicate::IsNull { column, .. }
            | Predicate::Like { column, .. } => out.push(*column),
        }
    }

    /// Evaluate against one (possibly joined) row.
    ///
    /// Follows SQL three-valued logic collapsed to a filter decision: any
    /// comparison, membership or substring test on a NULL column is not a
    /// match, whether or not the test is negated.
    pub fn evaluate<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&Column) -> Value,
    {
        match self {
            Predicate::True => true,
            Predicate::And(parts) => parts.iter().all(|p| p.evaluate(lookup)),
            Predicate::Compare { column, op, value } => {
                let actual = lookup(column);
                actual
                    .compare(value)
                    .map(|ordering| op.accepts(ordering))
                    .unwrap_or(false)
            }
            Predicate::In {
                column,
                values,
                negated,
            } => {
                let actual = lookup(column);
                if actual.is_null() {
                    return false;
                }
                let found = values
                    .iter()
                    .any(|v| actual.compare(v) == Some(Ordering::Equal));
                found != *negated
            }
            Predicate::IsNull { column, negated } => lookup(column).is_null() != *negated,
            Predicate::Like {
                column,
                needle,
                negated,
            } => match lookup(column) {
                Value::Text(text) => text.contains(needle.as_str()) != *negated,
                _ => false,
            },
        }
    }
}
