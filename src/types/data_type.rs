//! SQL type tags, semantic type descriptors and literal payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL type tags. `Null` is the type of a bare NULL literal before any
/// context forces a concrete type onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Boolean,
    Char,
    Varchar,
    Text,
    Numeric,
    Decimal,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Time,
    Timestamp,
    Null,
}

impl SqlType {
    /// Whether the tag is one of the character types.
    pub fn is_string(&self) -> bool {
        matches!(self, SqlType::Char | SqlType::Varchar | SqlType::Text)
    }

    /// Whether the tag is one of the numeric types (integer, float or
    /// fixed-point).
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            SqlType::SmallInt
                | SqlType::Int
                | SqlType::BigInt
                | SqlType::Float
                | SqlType::Double
                | SqlType::Numeric
                | SqlType::Decimal
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, SqlType::SmallInt | SqlType::Int | SqlType::BigInt)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Boolean => write!(f, "BOOLEAN"),
            SqlType::Char => write!(f, "CHAR"),
            SqlType::Varchar => write!(f, "VARCHAR"),
            SqlType::Text => write!(f, "TEXT"),
            SqlType::Numeric => write!(f, "NUMERIC"),
            SqlType::Decimal => write!(f, "DECIMAL"),
            SqlType::SmallInt => write!(f, "SMALLINT"),
            SqlType::Int => write!(f, "INT"),
            SqlType::BigInt => write!(f, "BIGINT"),
            SqlType::Float => write!(f, "FLOAT"),
            SqlType::Double => write!(f, "DOUBLE"),
            SqlType::Time => write!(f, "TIME"),
            SqlType::Timestamp => write!(f, "TIMESTAMP"),
            SqlType::Null => write!(f, "NULL"),
        }
    }
}

/// A type as written in the SQL text, before analysis. `param1` is the
/// length or precision, `param2` the scale; both are 0 when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub data_type: SqlType,
    pub param1: i32,
    pub param2: i32,
}

impl TypeSpec {
    pub fn new(data_type: SqlType, param1: i32, param2: i32) -> Self {
        Self {
            data_type,
            param1,
            param2,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data_type {
            SqlType::Char | SqlType::Varchar => write!(f, "{}({})", self.data_type, self.param1),
            SqlType::Numeric | SqlType::Decimal => {
                write!(f, "{}({}", self.data_type, self.param1)?;
                if self.param2 > 0 {
                    write!(f, ", {}", self.param2)?;
                }
                write!(f, ")")
            }
            _ => write!(f, "{}", self.data_type),
        }
    }
}

/// The resolved type of an analyzed expression or a stored column.
///
/// `dimension` is the string length or numeric precision, `scale` the
/// fixed-point scale. Two `TypeInfo` are equal only when every field
/// matches, including nullability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub data_type: SqlType,
    pub dimension: i32,
    pub scale: i32,
    pub nullable: bool,
}

impl TypeInfo {
    pub fn new(data_type: SqlType, dimension: i32, scale: i32, nullable: bool) -> Self {
        Self {
            data_type,
            dimension,
            scale,
            nullable,
        }
    }

    /// The type of a bare NULL literal.
    pub fn null() -> Self {
        Self::new(SqlType::Null, 0, 0, true)
    }

    pub fn boolean(nullable: bool) -> Self {
        Self::new(SqlType::Boolean, 0, 0, nullable)
    }

    pub fn is_string(&self) -> bool {
        self.data_type.is_string()
    }

    pub fn is_number(&self) -> bool {
        self.data_type.is_number()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data_type {
            SqlType::Char | SqlType::Varchar => write!(f, "{}({})", self.data_type, self.dimension),
            SqlType::Numeric | SqlType::Decimal => {
                write!(f, "{}({}", self.data_type, self.dimension)?;
                if self.scale > 0 {
                    write!(f, ", {}", self.scale)?;
                }
                write!(f, ")")
            }
            _ => write!(f, "{}", self.data_type),
        }
    }
}

/// The payload of a constant expression. Fixed-point values are stored as
/// the scaled integer, i.e. `12.50` at scale 2 is `Numeric(1250)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Numeric(i64),
    Float(f32),
    Double(f64),
    String(String),
}

/// Per-column physical compression scheme chosen at CREATE TABLE time.
/// The bit width for `Fixed` and `Sparse` travels separately as the
/// compression parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    None,
    Fixed,
    RunLength,
    Differential,
    Dictionary,
    Sparse,
}

/// Binary operators shared by the parse tree and the analyzed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Eq | Ne | Lt | Gt | Le | Ge)
    }

    pub fn is_logic(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    pub fn is_arithmetic(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Plus | Minus | Multiply | Divide)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Le => "<=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        };
        write!(f, "{}", token)
    }
}

/// Unary operators on analyzed expressions. The parser only produces
/// `Not` and `Negate`; `IsNull` and `Cast` wrappers are introduced during
/// analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    IsNull,
    Negate,
    Cast,
}

/// Comparison qualifier: plain comparison, or the quantified ANY/ALL forms
/// attached to a subquery operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompQualifier {
    One,
    Any,
    All,
}

/// The recognized aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Count,
    Min,
    Max,
    Avg,
    Sum,
}

impl fmt::Display for AggKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggKind::Count => "COUNT",
            AggKind::Min => "MIN",
            AggKind::Max => "MAX",
            AggKind::Avg => "AVG",
            AggKind::Sum => "SUM",
        };
        write!(f, "{}", name)
    }
}
