//! Shared SQL types: type tags, descriptors and catalog metadata

pub mod data_type;
pub mod schema;

pub use data_type::{
    AggKind, BinaryOperator, CompQualifier, Datum, Encoding, SqlType, TypeInfo, TypeSpec,
    UnaryOperator,
};
pub use schema::{
    ColumnDescriptor, FragmenterType, RefreshOption, StorageOption, TableDescriptor,
    DEFAULT_FRAGMENT_SIZE, DEFAULT_PAGE_SIZE,
};
