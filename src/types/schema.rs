//! Catalog metadata descriptors for tables and columns

use super::data_type::{Encoding, TypeInfo};
use serde::{Deserialize, Serialize};

/// Default number of rows per fragment for newly created tables.
pub const DEFAULT_FRAGMENT_SIZE: i64 = 8_000_000;

/// Default page size in bytes for newly created tables.
pub const DEFAULT_PAGE_SIZE: i64 = 1_048_576;

/// Where a materialized view's rows are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageOption {
    Gpu,
    Cpu,
    Disk,
}

/// When a materialized view's rows are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshOption {
    Auto,
    Manual,
    Immediate,
}

/// How rows are assigned to fragments. Only insert-order fragmentation is
/// implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmenterType {
    InsertOrder,
}

/// Catalog metadata for a table or view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub table_id: i32,
    pub table_name: String,
    pub n_columns: usize,
    pub is_view: bool,
    pub is_materialized: bool,
    /// The pretty-printed defining query; empty for plain tables.
    pub view_sql: String,
    pub check_option: bool,
    /// Whether the object can be read. Tables are ready at creation;
    /// materialized views only after their first refresh.
    pub is_ready: bool,
    pub fragmenter: FragmenterType,
    pub max_fragment_rows: i64,
    pub fragment_page_size: i64,
    pub storage: StorageOption,
    pub refresh: RefreshOption,
}

impl TableDescriptor {
    /// A descriptor for a plain table with the storage defaults filled in.
    /// The table id is assigned by the catalog at creation time.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table_id: 0,
            table_name: name.into(),
            n_columns: 0,
            is_view: false,
            is_materialized: false,
            view_sql: String::new(),
            check_option: false,
            is_ready: true,
            fragmenter: FragmenterType::InsertOrder,
            max_fragment_rows: DEFAULT_FRAGMENT_SIZE,
            fragment_page_size: DEFAULT_PAGE_SIZE,
            storage: StorageOption::Disk,
            refresh: RefreshOption::Manual,
        }
    }
}

/// Catalog metadata for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub table_id: i32,
    pub column_id: i32,
    pub column_name: String,
    pub column_type: TypeInfo,
    pub compression: Encoding,
    pub comp_param: i32,
}

impl ColumnDescriptor {
    /// A descriptor with no compression. Table and column ids are assigned
    /// by the catalog at creation time.
    pub fn new(name: impl Into<String>, column_type: TypeInfo) -> Self {
        Self {
            table_id: 0,
            column_id: 0,
            column_name: name.into(),
            column_type,
            compression: Encoding::None,
            comp_param: 0,
        }
    }

    pub fn with_compression(mut self, compression: Encoding, comp_param: i32) -> Self {
        self.compression = compression;
        self.comp_param = comp_param;
        self
    }
}
