//! Parse-level SQL expressions and their rendering back to SQL text

use super::dml::QuerySpec;
use crate::types::data_type::{BinaryOperator, CompQualifier, TypeSpec, UnaryOperator};
use std::fmt;

/// Literal values as produced by the lexer. Fixed-point literals keep the
/// raw digit string so analysis can derive precision and scale from it.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Int(i64),
    FixedPoint(String),
    Float(f32),
    Double(f64),
    String(String),
    /// The USER keyword used as a value. Parsed but not analyzable.
    User,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Int(v) => write!(f, "{}", v),
            Literal::FixedPoint(s) => write!(f, "{}", s),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Double(v) => write!(f, "{}", v),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::User => write!(f, "USER"),
        }
    }
}

/// SQL expressions as a tagged tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A column reference. `column == None` is the `t.*` form, which is
    /// only legal in a select list.
    Column {
        table: Option<String>,
        column: Option<String>,
    },
    Unary {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    InSubquery {
        expr: Box<Expr>,
        query: Box<QuerySpec>,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
    },
    Exists {
        query: Box<QuerySpec>,
    },
    /// A parenthesized subquery operand, optionally quantified with ANY or
    /// ALL on the comparison path.
    Subquery {
        qualifier: CompQualifier,
        query: Box<QuerySpec>,
    },
    /// A function call; only aggregates are recognized. `arg == None` is
    /// the `COUNT(*)` form.
    Function {
        name: String,
        distinct: bool,
        arg: Option<Box<Expr>>,
    },
    Cast {
        expr: Box<Expr>,
        target: TypeSpec,
    },
    Case {
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Box<Expr>>,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Column { table, column } => match (table, column) {
                (None, Some(column)) => write!(f, "{}", column),
                (Some(table), None) => write!(f, "{}.*", table),
                (Some(table), Some(column)) => write!(f, "{}.{}", table, column),
                (None, None) => write!(f, "*"),
            },
            Expr::Unary { op, expr } => match op {
                UnaryOperator::Not => write!(f, "NOT ({})", expr),
                UnaryOperator::Negate => write!(f, "-({})", expr),
                // IsNull and Cast wrappers never appear in a parse tree.
                UnaryOperator::IsNull => write!(f, "({}) IS NULL", expr),
                UnaryOperator::Cast => write!(f, "({})", expr),
            },
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::IsNull { expr, negated } => {
                if *negated {
                    write!(f, "{} IS NOT NULL", expr)
                } else {
                    write!(f, "{} IS NULL", expr)
                }
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                write!(f, "{}{}(", expr, in_token(*negated))?;
                for (i, value) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
            Expr::InSubquery {
                expr,
                query,
                negated,
            } => write!(f, "{}{}({})", expr, in_token(*negated), query),
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let token = if *negated { " NOT BETWEEN " } else { " BETWEEN " };
                write!(f, "{}{}{} AND {}", expr, token, low, high)
            }
            Expr::Like {
                expr,
                pattern,
                escape,
                negated,
            } => {
                let token = if *negated { " NOT LIKE " } else { " LIKE " };
                write!(f, "{}{}{}", expr, token, pattern)?;
                if let Some(escape) = escape {
                    write!(f, " ESCAPE {}", escape)?;
                }
                Ok(())
            }
            Expr::Exists { query } => write!(f, "EXISTS ({})", query),
            Expr::Subquery { qualifier, query } => {
                match qualifier {
                    CompQualifier::Any => write!(f, "ANY (")?,
                    CompQualifier::All => write!(f, "ALL (")?,
                    CompQualifier::One => write!(f, "(")?,
                }
                write!(f, "{})", query)
            }
            Expr::Function {
                name,
                distinct,
                arg,
            } => {
                write!(f, "{}(", name)?;
                if *distinct {
                    write!(f, "DISTINCT ")?;
                }
                match arg {
                    Some(arg) => write!(f, "{})", arg),
                    None => write!(f, "*)"),
                }
            }
            Expr::Cast { expr, target } => write!(f, "CAST({} AS {})", expr, target),
            Expr::Case {
                when_then,
                else_expr,
            } => {
                write!(f, "CASE ")?;
                for (when, then) in when_then {
                    write!(f, "WHEN {} THEN {} ", when, then)?;
                }
                if let Some(else_expr) = else_expr {
                    write!(f, "ELSE {}", else_expr)?;
                }
                write!(f, " END")
            }
        }
    }
}

fn in_token(negated: bool) -> &'static str {
    if negated {
        " NOT IN "
    } else {
        " IN "
    }
}
