//! Analyzed expression trees
//!
//! Produced by the analyzer from parse expressions. Every node carries a
//! resolved `TypeInfo` and exclusively owns its children; `clone` therefore
//! yields a fully independent subtree.

use crate::error::{Error, Result};
use crate::types::data_type::{
    AggKind, BinaryOperator, CompQualifier, Datum, Encoding, SqlType, TypeInfo, UnaryOperator,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant {
        type_info: TypeInfo,
        is_null: bool,
        value: Datum,
    },
    /// A resolved column reference. `rte_idx` indexes the analyzed query's
    /// range table.
    ColumnVar {
        type_info: TypeInfo,
        table_id: i32,
        column_id: i32,
        rte_idx: usize,
        compression: Encoding,
        comp_param: i32,
    },
    UOper {
        type_info: TypeInfo,
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    BinOper {
        type_info: TypeInfo,
        op: BinaryOperator,
        qualifier: CompQualifier,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `arg IN (v1, v2, ...)` with every value cast to `arg`'s type.
    InValues {
        arg: Box<Expr>,
        values: Vec<Expr>,
    },
    Like {
        arg: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
    },
    Agg {
        type_info: TypeInfo,
        agg: AggKind,
        /// None for `COUNT(*)`.
        arg: Option<Box<Expr>>,
        distinct: bool,
    },
    Case {
        type_info: TypeInfo,
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Box<Expr>>,
    },
}

impl Expr {
    /// The resolved type of this expression. Predicate nodes without a
    /// stored type (IN, LIKE) are boolean.
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Expr::Constant { type_info, .. }
            | Expr::ColumnVar { type_info, .. }
            | Expr::UOper { type_info, .. }
            | Expr::BinOper { type_info, .. }
            | Expr::Agg { type_info, .. }
            | Expr::Case { type_info, .. } => type_info.clone(),
            Expr::InValues { arg, .. } => TypeInfo::boolean(arg.type_info().nullable),
            Expr::Like { arg, .. } => TypeInfo::boolean(arg.type_info().nullable),
        }
    }

    /// Coerces the expression to `target`.
    ///
    /// A no-op when the type already matches. Constants are retyped in
    /// place where the literal is representable in the target type; all
    /// other expressions are wrapped in a CAST node. Idempotent.
    pub fn add_cast(self, target: &TypeInfo) -> Expr {
        if self.type_info() == *target {
            return self;
        }
        match self {
            Expr::Constant {
                type_info,
                is_null,
                value,
            } => match retype_datum(&value, &type_info, target) {
                Some(value) => Expr::Constant {
                    type_info: target.clone(),
                    is_null,
                    value,
                },
                None => wrap_cast(
                    Expr::Constant {
                        type_info,
                        is_null,
                        value,
                    },
                    target,
                ),
            },
            other => wrap_cast(other, target),
        }
    }

    /// Verifies that this expression is covered by the GROUP BY list:
    /// either structurally equal to one of its entries, or built only from
    /// constants, aggregates and columns that appear in such entries.
    pub fn check_group_by(&self, group_by: &[Expr]) -> Result<()> {
        if group_by.iter().any(|g| g == self) {
            return Ok(());
        }
        match self {
            Expr::ColumnVar { .. } => Err(Error::TypeMismatch(
                "expression must appear in the GROUP BY clause or be used in an aggregate function"
                    .into(),
            )),
            Expr::Constant { .. } | Expr::Agg { .. } => Ok(()),
            Expr::UOper { operand, .. } => operand.check_group_by(group_by),
            Expr::BinOper { left, right, .. } => {
                left.check_group_by(group_by)?;
                right.check_group_by(group_by)
            }
            Expr::InValues { arg, values } => {
                arg.check_group_by(group_by)?;
                for value in values {
                    value.check_group_by(group_by)?;
                }
                Ok(())
            }
            Expr::Like {
                arg,
                pattern,
                escape,
            } => {
                arg.check_group_by(group_by)?;
                pattern.check_group_by(group_by)?;
                if let Some(escape) = escape {
                    escape.check_group_by(group_by)?;
                }
                Ok(())
            }
            Expr::Case {
                when_then,
                else_expr,
                ..
            } => {
                for (when, then) in when_then {
                    when.check_group_by(group_by)?;
                    then.check_group_by(group_by)?;
                }
                if let Some(else_expr) = else_expr {
                    else_expr.check_group_by(group_by)?;
                }
                Ok(())
            }
        }
    }
}

fn wrap_cast(expr: Expr, target: &TypeInfo) -> Expr {
    Expr::UOper {
        type_info: target.clone(),
        op: UnaryOperator::Cast,
        operand: Box::new(expr),
    }
}

/// Converts a literal payload to the target type, if the value is
/// representable there. `None` means the conversion must go through a
/// runtime CAST node instead.
fn retype_datum(value: &Datum, from: &TypeInfo, to: &TypeInfo) -> Option<Datum> {
    if let Datum::Null = value {
        return Some(Datum::Null);
    }
    // Rescaling has to happen before the same-tag shortcut below.
    if let Datum::Numeric(v) = value {
        return match to.data_type {
            SqlType::Numeric | SqlType::Decimal => {
                if to.scale == from.scale {
                    Some(Datum::Numeric(*v))
                } else if to.scale > from.scale {
                    let factor = 10i64.checked_pow((to.scale - from.scale) as u32)?;
                    v.checked_mul(factor).map(Datum::Numeric)
                } else {
                    None
                }
            }
            SqlType::Float => Some(Datum::Float(descale(*v, from.scale) as f32)),
            SqlType::Double => Some(Datum::Double(descale(*v, from.scale))),
            _ => None,
        };
    }
    if from.data_type == to.data_type {
        return Some(value.clone());
    }
    let int_value = match value {
        Datum::SmallInt(v) => Some(*v as i64),
        Datum::Int(v) => Some(*v as i64),
        Datum::BigInt(v) => Some(*v),
        _ => None,
    };
    if let Some(v) = int_value {
        return match to.data_type {
            SqlType::SmallInt => i16::try_from(v).ok().map(Datum::SmallInt),
            SqlType::Int => i32::try_from(v).ok().map(Datum::Int),
            SqlType::BigInt => Some(Datum::BigInt(v)),
            SqlType::Numeric | SqlType::Decimal => {
                let factor = 10i64.checked_pow(to.scale as u32)?;
                v.checked_mul(factor).map(Datum::Numeric)
            }
            SqlType::Float => Some(Datum::Float(v as f32)),
            SqlType::Double => Some(Datum::Double(v as f64)),
            _ => None,
        };
    }
    match (value, to.data_type) {
        (Datum::Float(v), SqlType::Double) => Some(Datum::Double(*v as f64)),
        (Datum::Double(v), SqlType::Float) => Some(Datum::Float(*v as f32)),
        (Datum::String(s), SqlType::Char | SqlType::Varchar | SqlType::Text) => {
            Some(Datum::String(s.clone()))
        }
        _ => None,
    }
}

fn descale(value: i64, scale: i32) -> f64 {
    value as f64 / 10f64.powi(scale)
}
