//! Implicit coercion and common-type rules for binary operators

use crate::error::{Error, Result};
use crate::types::data_type::{BinaryOperator, SqlType, TypeInfo};

/// Decimal digits needed to hold any value of an integer type.
fn integer_digits(t: SqlType) -> i32 {
    match t {
        SqlType::SmallInt => 5,
        SqlType::Int => 10,
        _ => 19,
    }
}

fn integer_rank(t: SqlType) -> u8 {
    match t {
        SqlType::SmallInt => 0,
        SqlType::Int => 1,
        _ => 2,
    }
}

fn is_float(t: SqlType) -> bool {
    matches!(t, SqlType::Float | SqlType::Double)
}

fn is_decimal(t: SqlType) -> bool {
    matches!(t, SqlType::Numeric | SqlType::Decimal)
}

/// The common type of two string operands: TEXT dominates VARCHAR, which
/// dominates CHAR; the dimension covers both inputs.
pub fn common_string_type(a: &TypeInfo, b: &TypeInfo) -> TypeInfo {
    let data_type = if a.data_type == SqlType::Text || b.data_type == SqlType::Text {
        SqlType::Text
    } else if a.data_type == SqlType::Varchar || b.data_type == SqlType::Varchar {
        SqlType::Varchar
    } else {
        SqlType::Char
    };
    TypeInfo::new(
        data_type,
        a.dimension.max(b.dimension),
        0,
        a.nullable || b.nullable,
    )
}

/// The common type of two numeric operands. Floating point dominates
/// fixed point, which dominates integers; integer pairs widen to the wider
/// of the two.
pub fn common_numeric_type(a: &TypeInfo, b: &TypeInfo) -> TypeInfo {
    let nullable = a.nullable || b.nullable;
    if a.data_type == b.data_type && a.dimension == b.dimension && a.scale == b.scale {
        return TypeInfo::new(a.data_type, a.dimension, a.scale, nullable);
    }
    if is_float(a.data_type) || is_float(b.data_type) {
        let data_type = if a.data_type == SqlType::Double || b.data_type == SqlType::Double {
            SqlType::Double
        } else {
            SqlType::Float
        };
        return TypeInfo::new(data_type, 0, 0, nullable);
    }
    if is_decimal(a.data_type) || is_decimal(b.data_type) {
        let (da, sa) = decimal_shape(a);
        let (db, sb) = decimal_shape(b);
        let scale = sa.max(sb);
        let int_digits = (da - sa).max(db - sb);
        return TypeInfo::new(SqlType::Numeric, int_digits + scale, scale, nullable);
    }
    let data_type = if integer_rank(a.data_type) >= integer_rank(b.data_type) {
        a.data_type
    } else {
        b.data_type
    };
    TypeInfo::new(data_type, 0, 0, nullable)
}

/// Precision and scale of a numeric operand, widening integers to the
/// digit count of their type.
fn decimal_shape(t: &TypeInfo) -> (i32, i32) {
    if is_decimal(t.data_type) {
        (t.dimension, t.scale)
    } else {
        (integer_digits(t.data_type), 0)
    }
}

/// Types a binary operator application: returns the result type and the
/// types both operands must be coerced to.
pub fn analyze_binary_op(
    op: BinaryOperator,
    left: &TypeInfo,
    right: &TypeInfo,
) -> Result<(TypeInfo, TypeInfo, TypeInfo)> {
    let nullable = left.nullable || right.nullable;
    if op.is_logic() {
        if left.data_type != SqlType::Boolean || right.data_type != SqlType::Boolean {
            return Err(Error::TypeMismatch(format!(
                "operands of {} must be boolean, not {} and {}",
                op, left, right
            )));
        }
        return Ok((TypeInfo::boolean(nullable), left.clone(), right.clone()));
    }
    if op.is_comparison() {
        let (new_left, new_right) = if left.is_number() && right.is_number() {
            let common = common_numeric_type(left, right);
            (common.clone(), common)
        } else if left.is_string() && right.is_string() {
            let common = common_string_type(left, right);
            (common.clone(), common)
        } else if left.data_type == right.data_type {
            (left.clone(), right.clone())
        } else {
            return Err(Error::TypeMismatch(format!(
                "cannot compare {} with {}",
                left, right
            )));
        };
        return Ok((TypeInfo::boolean(nullable), new_left, new_right));
    }
    // arithmetic
    if !left.is_number() || !right.is_number() {
        return Err(Error::TypeMismatch(format!(
            "operands of {} must be numeric, not {} and {}",
            op, left, right
        )));
    }
    let common = common_numeric_type(left, right);
    Ok((common.clone(), common.clone(), common))
}
