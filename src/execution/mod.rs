//! Statement execution. Only DDL executes here; DML hands off to the
//! planner after analysis.

pub mod ddl;

pub use ddl::{execute, ViewQueryParser};
