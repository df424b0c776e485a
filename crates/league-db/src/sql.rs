//! SQL rendering of specifications
//!
//! Translates a [`Specification`] into PostgreSQL with positional `$n`
//! parameters. Joins are rendered as `LEFT JOIN {table} {relation}`, so a
//! joined column is addressed as `{relation}.{column}`.

use league_core::{PageRequest, SortDirection};
use league_queries::{Column, Predicate, Source, Specification, Value};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

use crate::repository::SortKey;

/// Rendered SQL text and its parameters, in `$n` order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Columns selected for one entity, plus any joins needed only to load them
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub columns: &'static str,
    /// Rendered after the specification's joins; aliases must not clash with
    /// relation names
    pub fetch_joins: &'static str,
}

/// `SELECT` for a list or a page of root rows
pub fn select_statement(
    spec: &Specification,
    projection: &Projection,
    sort: &[SortKey],
    window: Option<&PageRequest>,
) -> SqlStatement {
    let mut renderer = Renderer::new(spec);

    let mut sql = format!(
        "SELECT {}{} {}",
        if spec.distinct { "DISTINCT " } else { "" },
        projection.columns,
        renderer.from_clause(),
    );
    if !projection.fetch_joins.is_empty() {
        sql.push(' ');
        sql.push_str(projection.fetch_joins);
    }
    sql.push_str(&renderer.where_clause());
    sql.push_str(&renderer.order_clause(sort));

    if let Some(page) = window {
        let limit = renderer.push(Value::Int(page.limit()));
        let offset = renderer.push(Value::Int(page.offset()));
        sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
    }

    SqlStatement {
        sql,
        params: renderer.params,
    }
}

/// `SELECT COUNT` using the same joins and predicate as [`select_statement`]
pub fn count_statement(spec: &Specification) -> SqlStatement {
    let mut renderer = Renderer::new(spec);

    let counted = if spec.distinct {
        format!("COUNT(DISTINCT {}.id)", spec.root.alias)
    } else {
        "COUNT(*)".to_string()
    };
    let from = renderer.from_clause();
    let filter = renderer.where_clause();
    let sql = format!("SELECT {} {}{}", counted, from, filter);

    SqlStatement {
        sql,
        params: renderer.params,
    }
}

/// Bind every parameter of a statement onto a prepared query
pub fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[Value],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in params {
        query = match value.clone() {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
            Value::Float(v) => query.bind(v),
            Value::Text(v) => query.bind(v),
            Value::Date(v) => query.bind(v),
        };
    }
    query
}

/// Escape LIKE wildcards so the needle matches literally
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

struct Renderer<'a> {
    spec: &'a Specification,
    params: Vec<Value>,
}

impl<'a> Renderer<'a> {
    fn new(spec: &'a Specification) -> Self {
        Self {
            spec,
            params: Vec::new(),
        }
    }

    fn push(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn column(&self, column: &Column) -> String {
        match &column.source {
            Source::Root => format!("{}.{}", self.spec.root.alias, column.name),
            Source::Joined(join) => format!("{}.{}", join.relation, column.name),
        }
    }

    fn from_clause(&self) -> String {
        let root = &self.spec.root;
        let mut sql = if root.alias == root.name {
            format!("FROM {}", root.name)
        } else {
            format!("FROM {} {}", root.name, root.alias)
        };

        for join in self.spec.joins() {
            sql.push_str(&format!(
                " LEFT JOIN {} {} ON {}.{} = {}.{}",
                join.target.name,
                join.relation,
                root.alias,
                join.source_column,
                join.relation,
                join.target_column
            ));
        }
        sql
    }

    fn where_clause(&mut self) -> String {
        if self.spec.predicate.is_true() {
            return String::new();
        }
        let spec = self.spec;
        format!(" WHERE {}", self.predicate(&spec.predicate))
    }

    fn order_clause(&self, sort: &[SortKey]) -> String {
        let id = Column::root("id");
        let mut parts: Vec<String> = sort
            .iter()
            .map(|key| {
                let direction = match key.direction {
                    SortDirection::Asc => "ASC",
                    SortDirection::Desc => "DESC",
                };
                format!("{} {}", self.column(&key.column), direction)
            })
            .collect();

        if !sort.iter().any(|key| key.column == id) {
            parts.push(format!("{} ASC", self.column(&id)));
        }
        format!(" ORDER BY {}", parts.join(", "))
    }

    fn predicate(&mut self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::True => "TRUE".to_string(),
            Predicate::And(parts) => {
                let rendered: Vec<String> = parts
                    .iter()
                    .map(|part| match part {
                        Predicate::And(_) => format!("({})", self.predicate(part)),
                        _ => self.predicate(part),
                    })
                    .collect();
                rendered.join(" AND ")
            }
            Predicate::Compare { column, op, value } => {
                let column = self.column(column);
                let param = self.push(value.clone());
                format!("{} {} {}", column, op.as_sql(), param)
            }
            Predicate::In {
                column,
                values,
                negated,
            } => {
                let column = self.column(column);
                match (values.is_empty(), *negated) {
                    (true, false) => "FALSE".to_string(),
                    (true, true) => format!("{} IS NOT NULL", column),
                    (false, _) => {
                        let params: Vec<String> =
                            values.iter().map(|v| self.push(v.clone())).collect();
                        format!(
                            "{} {}IN ({})",
                            column,
                            if *negated { "NOT " } else { "" },
                            params.join(", ")
                        )
                    }
                }
            }
            Predicate::IsNull { column, negated } => format!(
                "{} IS {}NULL",
                self.column(column),
                if *negated { "NOT " } else { "" }
            ),
            Predicate::Like {
                column,
                needle,
                negated,
            } => {
                let column = self.column(column);
                let param = self.push(Value::Text(format!("%{}%", escape_like(needle))));
                format!(
                    "{} {}LIKE {} ESCAPE '\\'",
                    column,
                    if *negated { "NOT " } else { "" },
                    param
                )
            }
        }
    }
}
