//! Structured query descriptions and their rendering to SQLite SQL.
//!
//! A `SelectQuery` is plain data: projection, joins, equality filters,
//! grouping, ordering and limit. Rendering is the only place SQL text is
//! produced; every value is bound as a positional parameter.

use rusqlite::{params_from_iter, Connection, Row};
use std::fmt;

///
/// Table
///
/// The five entity tables, each with a fixed alias used in rendered SQL.
///

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Teachers,
    Groups,
    Subjects,
    Students,
    Grades,
}

impl Table {
    pub const fn name(self) -> &'static str {
        match self {
            Table::Teachers => "teachers",
            Table::Groups => "groups",
            Table::Subjects => "subjects",
            Table::Students => "students",
            Table::Grades => "grades",
        }
    }

    pub const fn alias(self) -> &'static str {
        match self {
            Table::Teachers => "t",
            Table::Groups => "gp",
            Table::Subjects => "sb",
            Table::Students => "st",
            Table::Grades => "gr",
        }
    }

    pub const fn col(self, name: &'static str) -> Column {
        Column { table: self, name }
    }
}

/// A column qualified by its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub table: Table,
    pub name: &'static str,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table.alias(), self.name)
    }
}

/// Projected expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(Column),
    /// `ROUND(AVG(col), places)`; rounding happens at aggregation
    RoundedAvg { column: Column, places: u32 },
    Max(Column),
}

impl Expr {
    fn column(&self) -> Column {
        match self {
            Expr::Column(c) | Expr::Max(c) => *c,
            Expr::RoundedAvg { column, .. } => *column,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(c) => write!(f, "{}", c),
            Expr::RoundedAvg { column, places } => write!(f, "ROUND(AVG({}), {})", column, places),
            Expr::Max(c) => write!(f, "MAX({})", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub expr: Expr,
    pub alias: &'static str,
}

/// Inner join on `left = right`, where `right` belongs to `table`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: Table,
    pub left: Column,
    pub right: Column,
}

/// Right-hand side of an equality filter
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Param(i64),
    /// Uncorrelated subquery yielding one scalar
    Scalar(Box<SelectQuery>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: Column,
    pub operand: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// A projection alias, e.g. an aggregate
    Alias(&'static str),
    Column(Column),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub key: SortKey,
    pub direction: Direction,
}

///
/// SelectQuery
///
/// Read-only query description. Built with the chained methods below and
/// rendered with `render`.
///

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub projection: Vec<Projection>,
    pub from: Table,
    pub joins: Vec<Join>,
    pub filters: Vec<Filter>,
    pub group_by: Vec<Column>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u32>,
}

impl SelectQuery {
    pub fn new(from: Table) -> Self {
        Self {
            projection: Vec::new(),
            from,
            joins: Vec::new(),
            filters: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn select(mut self, column: Column, alias: &'static str) -> Self {
        self.projection.push(Projection {
            expr: Expr::Column(column),
            alias,
        });
        self
    }

    pub fn select_avg(mut self, column: Column, alias: &'static str) -> Self {
        self.projection.push(Projection {
            expr: Expr::RoundedAvg { column, places: 2 },
            alias,
        });
        self
    }

    pub fn select_max(mut self, column: Column, alias: &'static str) -> Self {
        self.projection.push(Projection {
            expr: Expr::Max(column),
            alias,
        });
        self
    }

    pub fn join(mut self, table: Table, left: Column, right: Column) -> Self {
        self.joins.push(Join { table, left, right });
        self
    }

    pub fn filter_eq(mut self, column: Column, value: i64) -> Self {
        self.filters.push(Filter {
            column,
            operand: Operand::Param(value),
        });
        self
    }

    pub fn filter_eq_scalar(mut self, column: Column, subquery: SelectQuery) -> Self {
        self.filters.push(Filter {
            column,
            operand: Operand::Scalar(Box::new(subquery)),
        });
        self
    }

    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn order_by(mut self, key: SortKey, direction: Direction) -> Self {
        self.order_by.push(OrderBy { key, direction });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Tables in scope: the base table plus every join
    pub fn tables(&self) -> Vec<Table> {
        std::iter::once(self.from)
            .chain(self.joins.iter().map(|j| j.table))
            .collect()
    }

    /// Check that every referenced column belongs to a table in scope
    /// and every alias sort key names a projection
    pub fn validate(&self) -> Result<(), String> {
        let tables = self.tables();
        let in_scope = |c: &Column| tables.contains(&c.table);

        let referenced = self
            .projection
            .iter()
            .map(|p| p.expr.column())
            .chain(self.joins.iter().flat_map(|j| [j.left, j.right]))
            .chain(self.filters.iter().map(|f| f.column))
            .chain(self.group_by.iter().copied())
            .chain(self.order_by.iter().filter_map(|o| match o.key {
                SortKey::Column(c) => Some(c),
                SortKey::Alias(_) => None,
            }));

        for column in referenced {
            if !in_scope(&column) {
                return Err(format!("column {} is not in scope", column));
            }
        }

        for order in &self.order_by {
            if let SortKey::Alias(alias) = order.key {
                if !self.projection.iter().any(|p| p.alias == alias) {
                    return Err(format!("unknown sort alias {}", alias));
                }
            }
        }

        for filter in &self.filters {
            if let Operand::Scalar(subquery) = &filter.operand {
                if subquery.projection.len() != 1 {
                    return Err("scalar subquery must project exactly one column".to_string());
                }
                subquery.validate()?;
            }
        }

        Ok(())
    }

    /// Render to SQL text plus positional parameters
    pub fn render(&self) -> RenderedQuery {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.write_sql(&mut sql, &mut params);
        RenderedQuery { sql, params }
    }

    fn write_sql(&self, sql: &mut String, params: &mut Vec<i64>) {
        sql.push_str("SELECT ");
        let projection: Vec<String> = self
            .projection
            .iter()
            .map(|p| format!("{} AS {}", p.expr, p.alias))
            .collect();
        sql.push_str(&projection.join(", "));

        sql.push_str(&format!(
            " FROM \"{}\" AS {}",
            self.from.name(),
            self.from.alias()
        ));

        for join in &self.joins {
            sql.push_str(&format!(
                " JOIN \"{}\" AS {} ON {} = {}",
                join.table.name(),
                join.table.alias(),
                join.right,
                join.left
            ));
        }

        for (i, filter) in self.filters.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            match &filter.operand {
                Operand::Param(value) => {
                    sql.push_str(&format!("{} = ?", filter.column));
                    params.push(*value);
                }
                Operand::Scalar(subquery) => {
                    sql.push_str(&format!("{} = (", filter.column));
                    subquery.write_sql(sql, params);
                    sql.push(')');
                }
            }
        }

        if !self.group_by.is_empty() {
            let columns: Vec<String> = self.group_by.iter().map(|c| c.to_string()).collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&columns.join(", "));
        }

        if !self.order_by.is_empty() {
            let keys: Vec<String> = self
                .order_by
                .iter()
                .map(|o| {
                    let key = match o.key {
                        SortKey::Alias(alias) => alias.to_string(),
                        SortKey::Column(c) => c.to_string(),
                    };
                    match o.direction {
                        Direction::Asc => format!("{} ASC", key),
                        Direction::Desc => format!("{} DESC", key),
                    }
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
    }
}

/// SQL text with its bound parameters, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<i64>,
}

impl RenderedQuery {
    /// Run the query and map every row
    pub fn query_map<T, F>(&self, conn: &Connection, mut f: F) -> rusqlite::Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        log::debug!("Executing: {} {:?}", self.sql, self.params);
        let mut stmt = conn.prepare_cached(&self.sql)?;
        let rows = stmt.query_map(params_from_iter(self.params.iter()), |row| f(row))?;
        let collected = rows.collect::<rusqlite::Result<Vec<T>>>();
        collected
    }
}

impl fmt::Display for RenderedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)?;
        if !self.params.is_empty() {
            write!(f, " -- params: {:?}", self.params)?;
        }
        Ok(())
    }
}
