//! The analyzed query: the typed, resolved representation handed to the
//! planner.

use super::expr::Expr;
use crate::catalog::Catalog;
use crate::types::schema::{ColumnDescriptor, TableDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtType {
    Select,
    Insert,
    Update,
    Delete,
}

/// One entry per FROM-clause table, in source order. The position of an
/// entry in the range table is the `rte_idx` recorded on column variables.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTblEntry {
    pub range_var: String,
    pub table: TableDescriptor,
}

impl RangeTblEntry {
    pub fn table_id(&self) -> i32 {
        self.table.table_id
    }

    pub fn column_desc<'a>(&self, catalog: &'a Catalog, name: &str) -> Option<&'a ColumnDescriptor> {
        catalog.column_metadata(self.table.table_id, name)
    }
}

/// An element of the projection list: a result name plus an analyzed
/// expression. The name is empty for unnamed expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEntry {
    pub resname: String,
    pub expr: Expr,
}

/// A resolved ORDER BY entry pointing at a target-list position (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntry {
    pub tle_index: usize,
    pub desc: bool,
    pub nulls_first: bool,
}

/// The analyzed query. Owned by the caller during analysis and mutated
/// only by the analyzer pass; the planner takes it by value afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedQuery {
    pub stmt_type: StmtType,
    pub is_distinct: bool,
    pub rangetable: Vec<RangeTblEntry>,
    pub targetlist: Vec<TargetEntry>,
    pub where_predicate: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having_predicate: Option<Expr>,
    pub order_by: Vec<OrderEntry>,
    /// Number of aggregate calls seen anywhere in the query; bumped by the
    /// expression analyzer as it recurses.
    pub num_aggs: usize,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// The right-hand side of a UNION, if any.
    pub next_query: Option<Box<AnalyzedQuery>>,
    pub is_unionall: bool,
    /// INSERT only: the target table and its column ids in insertion order.
    pub result_table_id: Option<i32>,
    pub result_col_list: Vec<i32>,
}

impl AnalyzedQuery {
    pub fn new() -> Self {
        Self {
            stmt_type: StmtType::Select,
            is_distinct: false,
            rangetable: Vec::new(),
            targetlist: Vec::new(),
            where_predicate: None,
            group_by: Vec::new(),
            having_predicate: None,
            order_by: Vec::new(),
            num_aggs: 0,
            limit: None,
            offset: None,
            next_query: None,
            is_unionall: false,
            result_table_id: None,
            result_col_list: Vec::new(),
        }
    }

    /// Finds the range table entry with the given range variable name.
    pub fn rte_idx(&self, range_var: &str) -> Option<usize> {
        self.rangetable
            .iter()
            .position(|rte| rte.range_var == range_var)
    }
}

impl Default for AnalyzedQuery {
    fn default() -> Self {
        Self::new()
    }
}
