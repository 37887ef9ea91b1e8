//! Parse tree for the supported SQL surface
//!
//! Built by the external parser and consumed by the semantic analyzer
//! (DML) or the DDL executor. Every node renders back to SQL text via
//! `Display`.

pub mod ddl;
pub mod dml;
pub mod expressions;

pub use ddl::{
    ColumnDef, CompressSpec, CreateTableStmt, CreateViewStmt, DdlStatement, NameValue,
    TableElement,
};
pub use dml::{
    DeleteStatement, DmlStatement, InsertSource, InsertStatement, OrderSpec, OrderTarget,
    QueryExpr, QuerySpec, SelectEntry, SelectStatement, TableRef, UpdateStatement,
};
pub use expressions::{Expr, Literal};

/// The root of a parse tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Dml(DmlStatement),
    Ddl(DdlStatement),
}
