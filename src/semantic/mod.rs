//! Semantic analysis: typed expression trees, analyzed queries, coercion
//! rules and the analyzer pass itself.

pub mod analyzer;
pub mod coercion;
pub mod expr;
pub mod query;

pub use analyzer::Analyzer;
pub use expr::Expr;
pub use query::{AnalyzedQuery, OrderEntry, RangeTblEntry, StmtType, TargetEntry};
