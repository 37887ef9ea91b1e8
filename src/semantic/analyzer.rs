//! Semantic analysis: turns parse trees into typed, resolved analyzed
//! queries.
//!
//! Clause analysis order within a QuerySpec is fixed: FROM, SELECT, WHERE,
//! GROUP BY, HAVING. FROM order defines the range table indices recorded
//! on column variables.

use super::coercion::{analyze_binary_op, common_numeric_type, common_string_type};
use super::expr::Expr;
use super::query::{AnalyzedQuery, OrderEntry, RangeTblEntry, StmtType, TargetEntry};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::parsing::ast::dml::{
    DmlStatement, InsertSource, InsertStatement, OrderTarget, QueryExpr, QuerySpec,
    SelectStatement,
};
use crate::parsing::ast::expressions::{Expr as ParseExpr, Literal};
use crate::types::data_type::{
    AggKind, CompQualifier, Datum, SqlType, TypeInfo, UnaryOperator,
};

pub struct Analyzer<'a> {
    catalog: &'a Catalog,
}

impl<'a> Analyzer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Analyzes a DML statement into a fresh analyzed query.
    pub fn analyze(&self, stmt: &DmlStatement) -> Result<AnalyzedQuery> {
        let mut query = AnalyzedQuery::new();
        match stmt {
            DmlStatement::Select(select) => self.analyze_select(select, &mut query)?,
            DmlStatement::Insert(insert) => self.analyze_insert(insert, &mut query)?,
            DmlStatement::Update(_) => {
                return Err(Error::NotSupported("UPDATE statement".into()))
            }
            DmlStatement::Delete(_) => {
                return Err(Error::NotSupported("DELETE statement".into()))
            }
        }
        Ok(query)
    }

    /// Analyzes a bare query body (no ORDER BY/LIMIT), as used by view
    /// definitions.
    pub fn analyze_query(&self, spec: &QuerySpec) -> Result<AnalyzedQuery> {
        let mut query = AnalyzedQuery::new();
        self.analyze_query_spec(spec, &mut query)?;
        Ok(query)
    }

    fn analyze_select(&self, stmt: &SelectStatement, query: &mut AnalyzedQuery) -> Result<()> {
        query.stmt_type = StmtType::Select;
        query.limit = stmt.limit;
        query.offset = stmt.offset;
        self.analyze_query_expr(&stmt.query, query)?;
        let Some(order_by) = &stmt.order_by else {
            return Ok(());
        };
        for spec in order_by {
            let tle_index = match &spec.target {
                OrderTarget::Position(n) => {
                    if *n < 1 || *n > query.targetlist.len() {
                        return Err(Error::InvalidArgument(format!(
                            "ORDER BY position {} is not in the select list",
                            n
                        )));
                    }
                    *n
                }
                OrderTarget::Name(name) => {
                    query
                        .targetlist
                        .iter()
                        .position(|tle| tle.resname == *name)
                        .map(|i| i + 1)
                        .ok_or_else(|| Error::ColumnNotFound(name.clone()))?
                }
            };
            query.order_by.push(OrderEntry {
                tle_index,
                desc: spec.desc,
                nulls_first: spec.nulls_first,
            });
        }
        Ok(())
    }

    fn analyze_query_expr(&self, qe: &QueryExpr, query: &mut AnalyzedQuery) -> Result<()> {
        match qe {
            QueryExpr::Spec(spec) => self.analyze_query_spec(spec, query),
            QueryExpr::Union { left, right, all } => {
                self.analyze_query_expr(left, query)?;
                let mut right_query = AnalyzedQuery::new();
                self.analyze_query_expr(right, &mut right_query)?;
                query.next_query = Some(Box::new(right_query));
                query.is_unionall = *all;
                Ok(())
            }
        }
    }

    fn analyze_query_spec(&self, spec: &QuerySpec, query: &mut AnalyzedQuery) -> Result<()> {
        query.is_distinct = spec.distinct;
        self.analyze_from_clause(spec, query)?;
        self.analyze_select_clause(spec, query)?;
        self.analyze_where_clause(spec, query)?;
        self.analyze_group_by(spec, query)?;
        self.analyze_having_clause(spec, query)
    }

    fn analyze_from_clause(&self, spec: &QuerySpec, query: &mut AnalyzedQuery) -> Result<()> {
        for table_ref in &spec.from {
            let td = self
                .catalog
                .table_metadata(&table_ref.name)
                .ok_or_else(|| Error::TableNotFound(table_ref.name.clone()))?;
            if td.is_view && !td.is_materialized {
                return Err(Error::NotSupported(format!(
                    "non-materialized view {}",
                    table_ref.name
                )));
            }
            let range_var = table_ref
                .range_var
                .clone()
                .unwrap_or_else(|| table_ref.name.clone());
            query.rangetable.push(RangeTblEntry {
                range_var,
                table: td.clone(),
            });
        }
        Ok(())
    }

    fn analyze_select_clause(&self, spec: &QuerySpec, query: &mut AnalyzedQuery) -> Result<()> {
        let Some(entries) = &spec.select else {
            // SELECT *: one target per column of every range table entry
            for rte_idx in 0..query.rangetable.len() {
                self.expand_star(query, rte_idx);
            }
            return Ok(());
        };
        for entry in entries {
            // the range_var.* form expands a single range table entry
            if let ParseExpr::Column {
                table: Some(range_var),
                column: None,
            } = &entry.expr
            {
                let rte_idx = query
                    .rte_idx(range_var)
                    .ok_or_else(|| Error::RangeVariableNotFound(range_var.clone()))?;
                self.expand_star(query, rte_idx);
                continue;
            }
            let expr = self.analyze_expr(&entry.expr, query)?;
            let resname = match &entry.alias {
                Some(alias) => alias.clone(),
                None => match &expr {
                    Expr::ColumnVar {
                        table_id,
                        column_id,
                        ..
                    } => self
                        .catalog
                        .column_by_id(*table_id, *column_id)
                        .map(|cd| cd.column_name.clone())
                        .unwrap_or_default(),
                    _ => String::new(),
                },
            };
            query.targetlist.push(TargetEntry { resname, expr });
        }
        Ok(())
    }

    fn expand_star(&self, query: &mut AnalyzedQuery, rte_idx: usize) {
        let table_id = query.rangetable[rte_idx].table_id();
        for cd in self.catalog.table_columns(table_id) {
            query.targetlist.push(TargetEntry {
                resname: cd.column_name.clone(),
                expr: Expr::ColumnVar {
                    type_info: cd.column_type.clone(),
                    table_id,
                    column_id: cd.column_id,
                    rte_idx,
                    compression: cd.compression,
                    comp_param: cd.comp_param,
                },
            });
        }
    }

    fn analyze_where_clause(&self, spec: &QuerySpec, query: &mut AnalyzedQuery) -> Result<()> {
        let Some(where_clause) = &spec.where_clause else {
            return Ok(());
        };
        let predicate = self.analyze_expr(where_clause, query)?;
        if predicate.type_info().data_type != SqlType::Boolean {
            return Err(Error::TypeMismatch(
                "only boolean expressions can be in the WHERE clause".into(),
            ));
        }
        query.where_predicate = Some(predicate);
        Ok(())
    }

    fn analyze_group_by(&self, spec: &QuerySpec, query: &mut AnalyzedQuery) -> Result<()> {
        if let Some(group_by) = &spec.group_by {
            let mut analyzed = Vec::with_capacity(group_by.len());
            for expr in group_by {
                analyzed.push(self.analyze_expr(expr, query)?);
            }
            query.group_by = analyzed;
        }
        if query.num_aggs > 0 || !query.group_by.is_empty() {
            for tle in &query.targetlist {
                if !matches!(tle.expr, Expr::Agg { .. }) {
                    tle.expr.check_group_by(&query.group_by)?;
                }
            }
        }
        Ok(())
    }

    fn analyze_having_clause(&self, spec: &QuerySpec, query: &mut AnalyzedQuery) -> Result<()> {
        let Some(having) = &spec.having else {
            return Ok(());
        };
        let predicate = self.analyze_expr(having, query)?;
        if predicate.type_info().data_type != SqlType::Boolean {
            return Err(Error::TypeMismatch(
                "only boolean expressions can be in the HAVING clause".into(),
            ));
        }
        predicate.check_group_by(&query.group_by)?;
        query.having_predicate = Some(predicate);
        Ok(())
    }

    fn analyze_insert(&self, stmt: &InsertStatement, query: &mut AnalyzedQuery) -> Result<()> {
        query.stmt_type = StmtType::Insert;
        let td = self
            .catalog
            .table_metadata(&stmt.table)
            .ok_or_else(|| Error::TableNotFound(stmt.table.clone()))?;
        if td.is_view && !td.is_materialized {
            return Err(Error::NotSupported(format!(
                "insert into non-materialized view {}",
                stmt.table
            )));
        }
        let table_id = td.table_id;
        query.result_table_id = Some(table_id);
        query.result_col_list = match &stmt.columns {
            None => self
                .catalog
                .table_columns(table_id)
                .iter()
                .map(|cd| cd.column_id)
                .collect(),
            Some(columns) => {
                let mut ids = Vec::with_capacity(columns.len());
                for name in columns {
                    let cd = self
                        .catalog
                        .column_metadata(table_id, name)
                        .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
                    ids.push(cd.column_id);
                }
                ids
            }
        };
        match &stmt.source {
            InsertSource::Values(values) => {
                if values.len() != query.result_col_list.len() {
                    return Err(Error::InvalidArgument(format!(
                        "INSERT has {} values but {} target columns",
                        values.len(),
                        query.result_col_list.len()
                    )));
                }
                let col_list = query.result_col_list.clone();
                for (value, column_id) in values.iter().zip(col_list) {
                    let expr = self.analyze_expr(value, query)?;
                    let cd = self
                        .catalog
                        .column_by_id(table_id, column_id)
                        .ok_or_else(|| {
                            Error::Internal(format!(
                                "column id {} missing from table {}",
                                column_id, table_id
                            ))
                        })?;
                    query.targetlist.push(TargetEntry {
                        resname: String::new(),
                        expr: expr.add_cast(&cd.column_type),
                    });
                }
                Ok(())
            }
            InsertSource::Select(qe) => self.analyze_query_expr(qe, query),
        }
    }

    /// Analyzes one parse expression, resolving names against the query's
    /// range table and inserting casts where operand types differ from the
    /// operator's computed types.
    pub fn analyze_expr(&self, expr: &ParseExpr, query: &mut AnalyzedQuery) -> Result<Expr> {
        match expr {
            ParseExpr::Literal(lit) => self.analyze_literal(lit),
            ParseExpr::Column { table, column } => {
                self.analyze_column_ref(table.as_deref(), column.as_deref(), query)
            }
            ParseExpr::Unary { op, expr } => {
                let operand = self.analyze_expr(expr, query)?;
                Ok(Expr::UOper {
                    type_info: operand.type_info(),
                    op: *op,
                    operand: Box::new(operand),
                })
            }
            ParseExpr::Binary { op, left, right } => {
                let left_expr = self.analyze_expr(left, query)?;
                let qualifier = match right.as_ref() {
                    ParseExpr::Subquery { qualifier, .. } => *qualifier,
                    _ => CompQualifier::One,
                };
                let right_expr = self.analyze_expr(right, query)?;
                let left_type = left_expr.type_info();
                let right_type = right_expr.type_info();
                let (result_type, new_left, new_right) =
                    analyze_binary_op(*op, &left_type, &right_type)?;
                Ok(Expr::BinOper {
                    type_info: result_type,
                    op: *op,
                    qualifier,
                    left: Box::new(left_expr.add_cast(&new_left)),
                    right: Box::new(right_expr.add_cast(&new_right)),
                })
            }
            ParseExpr::IsNull { expr, negated } => {
                let arg = self.analyze_expr(expr, query)?;
                let result = Expr::UOper {
                    type_info: TypeInfo::boolean(false),
                    op: UnaryOperator::IsNull,
                    operand: Box::new(arg),
                };
                Ok(negate_if(result, *negated))
            }
            ParseExpr::InList {
                expr,
                list,
                negated,
            } => {
                let arg = self.analyze_expr(expr, query)?;
                let arg_type = arg.type_info();
                let mut values = Vec::with_capacity(list.len());
                for value in list {
                    let value = self.analyze_expr(value, query)?;
                    values.push(value.add_cast(&arg_type));
                }
                let result = Expr::InValues {
                    arg: Box::new(arg),
                    values,
                };
                Ok(negate_if(result, *negated))
            }
            ParseExpr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let arg = self.analyze_expr(expr, query)?;
                let lower = self.analyze_expr(low, query)?;
                let upper = self.analyze_expr(high, query)?;
                // the two predicates must not share nodes, so the argument
                // is deep-copied for the upper bound
                let arg_copy = arg.clone();
                let arg_type = arg.type_info();
                let (lower_result, new_left, new_right) = analyze_binary_op(
                    crate::types::BinaryOperator::Ge,
                    &arg_type,
                    &lower.type_info(),
                )?;
                let lower_pred = Expr::BinOper {
                    type_info: lower_result,
                    op: crate::types::BinaryOperator::Ge,
                    qualifier: CompQualifier::One,
                    left: Box::new(arg.add_cast(&new_left)),
                    right: Box::new(lower.add_cast(&new_right)),
                };
                let (upper_result, new_left, new_right) = analyze_binary_op(
                    crate::types::BinaryOperator::Le,
                    &arg_type,
                    &upper.type_info(),
                )?;
                let upper_pred = Expr::BinOper {
                    type_info: upper_result,
                    op: crate::types::BinaryOperator::Le,
                    qualifier: CompQualifier::One,
                    left: Box::new(arg_copy.add_cast(&new_left)),
                    right: Box::new(upper.add_cast(&new_right)),
                };
                let nullable =
                    lower_pred.type_info().nullable || upper_pred.type_info().nullable;
                let result = Expr::BinOper {
                    type_info: TypeInfo::boolean(nullable),
                    op: crate::types::BinaryOperator::And,
                    qualifier: CompQualifier::One,
                    left: Box::new(lower_pred),
                    right: Box::new(upper_pred),
                };
                Ok(negate_if(result, *negated))
            }
            ParseExpr::Like {
                expr,
                pattern,
                escape,
                negated,
            } => {
                let arg = self.analyze_expr(expr, query)?;
                let pattern = self.analyze_expr(pattern, query)?;
                let escape = match escape {
                    Some(escape) => Some(self.analyze_expr(escape, query)?),
                    None => None,
                };
                if !arg.type_info().is_string() {
                    return Err(Error::TypeMismatch(
                        "expression before LIKE must be of a string type".into(),
                    ));
                }
                if !pattern.type_info().is_string() {
                    return Err(Error::TypeMismatch(
                        "expression after LIKE must be of a string type".into(),
                    ));
                }
                if let Some(escape) = &escape {
                    if !escape.type_info().is_string() {
                        return Err(Error::TypeMismatch(
                            "expression after ESCAPE must be of a string type".into(),
                        ));
                    }
                }
                let result = Expr::Like {
                    arg: Box::new(arg),
                    pattern: Box::new(pattern),
                    escape: escape.map(Box::new),
                };
                Ok(negate_if(result, *negated))
            }
            ParseExpr::InSubquery { .. }
            | ParseExpr::Exists { .. }
            | ParseExpr::Subquery { .. } => Err(Error::NotSupported("subqueries".into())),
            ParseExpr::Function {
                name,
                distinct,
                arg,
            } => self.analyze_function(name, *distinct, arg.as_deref(), query),
            ParseExpr::Cast { expr, target } => {
                let arg = self.analyze_expr(expr, query)?;
                let type_info = TypeInfo::new(
                    target.data_type,
                    target.param1,
                    target.param2,
                    arg.type_info().nullable,
                );
                Ok(arg.add_cast(&type_info))
            }
            ParseExpr::Case {
                when_then,
                else_expr,
            } => self.analyze_case(when_then, else_expr.as_deref(), query),
        }
    }

    fn analyze_literal(&self, lit: &Literal) -> Result<Expr> {
        match lit {
            Literal::Null => Ok(Expr::Constant {
                type_info: TypeInfo::null(),
                is_null: true,
                value: Datum::Null,
            }),
            Literal::Int(v) => {
                let (type_info, value) = if let Ok(v) = i16::try_from(*v) {
                    (
                        TypeInfo::new(SqlType::SmallInt, 0, 0, false),
                        Datum::SmallInt(v),
                    )
                } else if let Ok(v) = i32::try_from(*v) {
                    (TypeInfo::new(SqlType::Int, 0, 0, false), Datum::Int(v))
                } else {
                    (TypeInfo::new(SqlType::BigInt, 0, 0, false), Datum::BigInt(*v))
                };
                Ok(Expr::Constant {
                    type_info,
                    is_null: false,
                    value,
                })
            }
            Literal::FixedPoint(s) => analyze_fixed_point(s),
            Literal::Float(v) => Ok(Expr::Constant {
                type_info: TypeInfo::new(SqlType::Float, 0, 0, false),
                is_null: false,
                value: Datum::Float(*v),
            }),
            Literal::Double(v) => Ok(Expr::Constant {
                type_info: TypeInfo::new(SqlType::Double, 0, 0, false),
                is_null: false,
                value: Datum::Double(*v),
            }),
            Literal::String(s) => Ok(Expr::Constant {
                type_info: TypeInfo::new(SqlType::Varchar, s.len() as i32, 0, false),
                is_null: false,
                value: Datum::String(s.clone()),
            }),
            Literal::User => Err(Error::NotSupported("USER literal".into())),
        }
    }

    fn analyze_column_ref(
        &self,
        table: Option<&str>,
        column: Option<&str>,
        query: &AnalyzedQuery,
    ) -> Result<Expr> {
        let Some(column) = column else {
            return Err(Error::InvalidArgument("invalid column name *".into()));
        };
        let (cd, table_id, rte_idx) = if let Some(table) = table {
            let rte_idx = query
                .rte_idx(table)
                .ok_or_else(|| Error::RangeVariableNotFound(table.to_string()))?;
            let rte = &query.rangetable[rte_idx];
            let cd = rte
                .column_desc(self.catalog, column)
                .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
            (cd, rte.table_id(), rte_idx)
        } else {
            let mut found: Option<(&crate::types::ColumnDescriptor, i32, usize)> = None;
            for (i, rte) in query.rangetable.iter().enumerate() {
                if let Some(cd) = rte.column_desc(self.catalog, column) {
                    if found.is_some() {
                        return Err(Error::AmbiguousColumn(column.to_string()));
                    }
                    found = Some((cd, rte.table_id(), i));
                }
            }
            found.ok_or_else(|| Error::ColumnNotFound(column.to_string()))?
        };
        Ok(Expr::ColumnVar {
            type_info: cd.column_type.clone(),
            table_id,
            column_id: cd.column_id,
            rte_idx,
            compression: cd.compression,
            comp_param: cd.comp_param,
        })
    }

    fn analyze_function(
        &self,
        name: &str,
        distinct: bool,
        arg: Option<&ParseExpr>,
        query: &mut AnalyzedQuery,
    ) -> Result<Expr> {
        let (agg, type_info, arg_expr, is_distinct) = if name.eq_ignore_ascii_case("count") {
            let arg_expr = match arg {
                Some(arg) => Some(self.analyze_expr(arg, query)?),
                None => None,
            };
            (
                AggKind::Count,
                TypeInfo::new(SqlType::BigInt, 0, 0, false),
                arg_expr,
                distinct,
            )
        } else {
            let agg = if name.eq_ignore_ascii_case("min") {
                AggKind::Min
            } else if name.eq_ignore_ascii_case("max") {
                AggKind::Max
            } else if name.eq_ignore_ascii_case("avg") {
                AggKind::Avg
            } else if name.eq_ignore_ascii_case("sum") {
                AggKind::Sum
            } else {
                return Err(Error::NotSupported(format!("function {}", name)));
            };
            let arg = arg.ok_or_else(|| {
                Error::InvalidArgument(format!("{} requires an argument", agg))
            })?;
            let arg_expr = self.analyze_expr(arg, query)?;
            let type_info = arg_expr.type_info();
            // DISTINCT is only tracked on COUNT
            (agg, type_info, Some(arg_expr), false)
        };
        query.num_aggs += 1;
        Ok(Expr::Agg {
            type_info,
            agg,
            arg: arg_expr.map(Box::new),
            distinct: is_distinct,
        })
    }

    fn analyze_case(
        &self,
        when_then: &[(ParseExpr, ParseExpr)],
        else_expr: Option<&ParseExpr>,
        query: &mut AnalyzedQuery,
    ) -> Result<Expr> {
        let mut type_info = TypeInfo::null();
        let mut pairs = Vec::with_capacity(when_then.len());
        for (when, then) in when_then {
            let when = self.analyze_expr(when, query)?;
            if when.type_info().data_type != SqlType::Boolean {
                return Err(Error::TypeMismatch(
                    "only boolean expressions can be used after WHEN".into(),
                ));
            }
            let then = self.analyze_expr(then, query)?;
            type_info = reconcile_case_type(
                type_info,
                &then.type_info(),
                "expressions in THEN clauses must be of the same or compatible types",
            )?;
            pairs.push((when, then));
        }
        let else_expr = match else_expr {
            Some(else_expr) => {
                let else_expr = self.analyze_expr(else_expr, query)?;
                type_info = reconcile_case_type(
                    type_info,
                    &else_expr.type_info(),
                    "expressions in the ELSE clause must be of the same or compatible types \
                     as those in the THEN clauses",
                )?;
                Some(else_expr)
            }
            None => None,
        };
        let pairs = pairs
            .into_iter()
            .map(|(when, then)| (when, then.add_cast(&type_info)))
            .collect();
        let else_expr = else_expr.map(|e| Box::new(e.add_cast(&type_info)));
        Ok(Expr::Case {
            type_info,
            when_then: pairs,
            else_expr,
        })
    }
}

fn negate_if(expr: Expr, negated: bool) -> Expr {
    if negated {
        Expr::UOper {
            type_info: expr.type_info(),
            op: UnaryOperator::Not,
            operand: Box::new(expr),
        }
    } else {
        expr
    }
}

/// Folds one THEN/ELSE result type into the running CASE result type.
/// NULL results adopt the running type (via the final cast pass); any
/// other divergence resolves through the common string/numeric rules.
fn reconcile_case_type(
    running: TypeInfo,
    candidate: &TypeInfo,
    error_message: &str,
) -> Result<TypeInfo> {
    if running.data_type == SqlType::Null {
        return Ok(candidate.clone());
    }
    if candidate.data_type == SqlType::Null || running == *candidate {
        return Ok(running);
    }
    if running.is_string() && candidate.is_string() {
        Ok(common_string_type(&running, candidate))
    } else if running.is_number() && candidate.is_number() {
        Ok(common_numeric_type(&running, candidate))
    } else {
        Err(Error::TypeMismatch(error_message.into()))
    }
}

/// Analyzes a fixed-point literal: the precision is the total digit count,
/// the scale the digits after the dot, and the stored value is the scaled
/// integer.
fn analyze_fixed_point(s: &str) -> Result<Expr> {
    let bad = || Error::InvalidArgument(format!("invalid numeric literal {}", s));
    let (before, after) = match s.find('.') {
        Some(dot) => (&s[..dot], &s[dot + 1..]),
        None => (s, ""),
    };
    let scale = after.len() as i32;
    let dimension = before.len() as i32 + scale;
    let int_part: i64 = if before.is_empty() {
        0
    } else {
        before.parse().map_err(|_| bad())?
    };
    let fraction: i64 = if after.is_empty() {
        0
    } else {
        after.parse().map_err(|_| bad())?
    };
    let value = 10i64
        .checked_pow(scale as u32)
        .and_then(|factor| int_part.checked_mul(factor))
        .and_then(|v| v.checked_add(fraction))
        .ok_or_else(bad)?;
    Ok(Expr::Constant {
        type_info: TypeInfo::new(SqlType::Numeric, dimension, scale, false),
        is_null: false,
        value: Datum::Numeric(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_literal_scaling() {
        let e = analyze_fixed_point("12.50").unwrap();
        match e {
            Expr::Constant {
                type_info, value, ..
            } => {
                assert_eq!(type_info.data_type, SqlType::Numeric);
                assert_eq!(type_info.dimension, 4);
                assert_eq!(type_info.scale, 2);
                assert_eq!(value, Datum::Numeric(1250));
            }
            other => panic!("expected constant, got {:?}", other),
        }
    }

    #[test]
    fn fixed_point_literal_without_fraction() {
        let e = analyze_fixed_point("7.").unwrap();
        match e {
            Expr::Constant {
                type_info, value, ..
            } => {
                assert_eq!(type_info.scale, 0);
                assert_eq!(value, Datum::Numeric(7));
            }
            other => panic!("expected constant, got {:?}", other),
        }
    }

    #[test]
    fn case_type_reconciliation_prefers_common_numeric() {
        let small = TypeInfo::new(SqlType::SmallInt, 0, 0, false);
        let double = TypeInfo::new(SqlType::Double, 0, 0, false);
        let ti = reconcile_case_type(TypeInfo::null(), &small, "x").unwrap();
        assert_eq!(ti.data_type, SqlType::SmallInt);
        let ti = reconcile_case_type(ti, &double, "x").unwrap();
        assert_eq!(ti.data_type, SqlType::Double);
        // NULL arms keep the running type
        let ti = reconcile_case_type(ti, &TypeInfo::null(), "x").unwrap();
        assert_eq!(ti.data_type, SqlType::Double);
    }

    #[test]
    fn case_type_reconciliation_rejects_mixed_kinds() {
        let int = TypeInfo::new(SqlType::Int, 0, 0, false);
        let text = TypeInfo::new(SqlType::Text, 0, 0, false);
        assert!(reconcile_case_type(int, &text, "boom").is_err());
    }
}
