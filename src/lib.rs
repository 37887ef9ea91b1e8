//! SQL frontend for the Granite columnar engine
//!
//! Takes parse trees produced by the external parser and turns DML into a
//! typed, resolved [`AnalyzedQuery`] for the planner, or executes DDL
//! directly against the catalog. The analyzer owns the type system
//! (implicit coercion, common-type computation, promotion), name
//! resolution over range tables, aggregate and GROUP BY validation, and
//! the translation of surface constructs (BETWEEN, IN, CASE, LIKE,
//! IS NULL) into canonical expression trees.

pub mod catalog;
pub mod error;
pub mod execution;
pub mod parsing;
pub mod semantic;
pub mod types;

pub use catalog::{Catalog, DatabaseMetadata, SysCatalog, UserMetadata, SYSTEM_DB};
pub use error::{Error, Result};
pub use execution::{execute, ViewQueryParser};
pub use semantic::{AnalyzedQuery, Analyzer};
