//! DDL parse nodes: CREATE/DROP TABLE, views, users and databases

use super::dml::QuerySpec;
use super::expressions::Literal;
use crate::types::data_type::TypeSpec;

/// A `name = value` option as written in WITH (...) lists and user/database
/// statements.
#[derive(Debug, Clone, PartialEq)]
pub struct NameValue {
    pub name: String,
    pub value: Literal,
}

/// An ENCODING clause on a column definition, e.g. `ENCODING FIXED(16)`.
/// The scheme name is validated during execution, not parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressSpec {
    pub name: String,
    pub param: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub type_spec: TypeSpec,
    pub not_null: bool,
    pub encoding: Option<CompressSpec>,
}

/// One element of a CREATE TABLE body. Only plain columns are executable;
/// table-level constraints are parsed and rejected downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum TableElement {
    Column(ColumnDef),
    Unique {
        columns: Vec<String>,
    },
    ForeignKey {
        columns: Vec<String>,
        references: String,
        ref_columns: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStmt {
    pub name: String,
    pub if_not_exists: bool,
    pub elements: Vec<TableElement>,
    pub storage_options: Vec<NameValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewStmt {
    pub name: String,
    pub materialized: bool,
    pub if_not_exists: bool,
    /// Explicit result column names; renames the query's target entries by
    /// position.
    pub columns: Option<Vec<String>>,
    pub query: QuerySpec,
    pub check_option: bool,
    pub options: Vec<NameValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    CreateTable(CreateTableStmt),
    DropTable {
        name: String,
        if_exists: bool,
    },
    CreateView(CreateViewStmt),
    DropView {
        name: String,
        if_exists: bool,
    },
    RefreshView {
        name: String,
    },
    CreateUser {
        name: String,
        options: Vec<NameValue>,
    },
    AlterUser {
        name: String,
        options: Vec<NameValue>,
    },
    DropUser {
        name: String,
    },
    CreateDatabase {
        name: String,
        options: Vec<NameValue>,
    },
    DropDatabase {
        name: String,
    },
}
