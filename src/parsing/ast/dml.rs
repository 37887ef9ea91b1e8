//! DML parse nodes: SELECT, INSERT, UPDATE, DELETE

use super::expressions::Expr;
use std::fmt;

/// A FROM-clause table reference with an optional range variable.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
    pub range_var: Option<String>,
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(range_var) = &self.range_var {
            write!(f, " {}", range_var)?;
        }
        Ok(())
    }
}

/// A select-list item with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectEntry {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl fmt::Display for SelectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

/// The body of a SELECT without ORDER BY/LIMIT. `select == None` is the
/// `SELECT *` form.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub distinct: bool,
    pub select: Option<Vec<SelectEntry>>,
    pub from: Vec<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Option<Vec<Expr>>,
    pub having: Option<Expr>,
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        match &self.select {
            None => write!(f, "* ")?,
            Some(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", entry)?;
                }
                write!(f, " ")?;
            }
        }
        write!(f, "FROM ")?;
        for (i, table) in self.from.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", table)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if let Some(group_by) = &self.group_by {
            write!(f, " GROUP BY ")?;
            for (i, expr) in group_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", expr)?;
            }
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {}", having)?;
        }
        write!(f, ";")
    }
}

/// A query expression: a single QuerySpec or a UNION chain.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    Spec(QuerySpec),
    Union {
        left: Box<QueryExpr>,
        right: Box<QueryExpr>,
        all: bool,
    },
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryExpr::Spec(spec) => write!(f, "{}", spec),
            QueryExpr::Union { left, right, all } => {
                let token = if *all { " UNION ALL " } else { " UNION " };
                write!(f, "{}{}{}", left, token, right)
            }
        }
    }
}

/// What an ORDER BY entry points at: a 1-based select-list position or a
/// result column name.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderTarget {
    Position(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub target: OrderTarget,
    pub desc: bool,
    pub nulls_first: bool,
}

/// SELECT with the outer ORDER BY / LIMIT / OFFSET clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub query: QueryExpr,
    pub order_by: Option<Vec<OrderSpec>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            OrderTarget::Position(n) => write!(f, "{}", n)?,
            OrderTarget::Name(name) => write!(f, "{}", name)?,
        }
        if self.desc {
            write!(f, " DESC")?;
        }
        if self.nulls_first {
            write!(f, " NULLS FIRST")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query)?;
        if let Some(order_by) = &self.order_by {
            write!(f, " ORDER BY ")?;
            for (i, spec) in order_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", spec)?;
            }
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}

/// Source of rows for an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Vec<Expr>),
    Select(Box<QueryExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Option<Vec<String>>,
    pub source: InsertSource,
}

/// Parsed but not analyzable in this subset.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub assignments: Vec<(String, Expr)>,
    pub where_clause: Option<Expr>,
}

/// Parsed but not analyzable in this subset.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub where_clause: Option<Expr>,
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {}", self.table)?;
        if let Some(columns) = &self.columns {
            write!(f, " ({})", columns.join(", "))?;
        }
        match &self.source {
            InsertSource::Values(values) => {
                write!(f, " VALUES (")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
            InsertSource::Select(query) => write!(f, " {}", query),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DmlStatement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl fmt::Display for DmlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DmlStatement::Select(stmt) => write!(f, "{}", stmt),
            DmlStatement::Insert(stmt) => write!(f, "{}", stmt),
            DmlStatement::Update(stmt) => {
                write!(f, "UPDATE {} SET ", stmt.table)?;
                for (i, (column, value)) in stmt.assignments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", column, value)?;
                }
                if let Some(where_clause) = &stmt.where_clause {
                    write!(f, " WHERE {}", where_clause)?;
                }
                Ok(())
            }
            DmlStatement::Delete(stmt) => {
                write!(f, "DELETE FROM {}", stmt.table)?;
                if let Some(where_clause) = &stmt.where_clause {
                    write!(f, " WHERE {}", where_clause)?;
                }
                Ok(())
            }
        }
    }
}
