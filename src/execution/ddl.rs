//! DDL execution: option validation, catalog invariants and catalog
//! mutation. DDL bypasses the planner entirely.

use crate::catalog::{Catalog, SysCatalog, SYSTEM_DB};
use crate::error::{Error, Result};
use crate::parsing::ast::ddl::{
    CreateTableStmt, CreateViewStmt, DdlStatement, NameValue, TableElement,
};
use crate::parsing::ast::expressions::Literal;
use crate::parsing::ast::Statement;
use crate::semantic::Analyzer;
use crate::types::data_type::{Encoding, TypeInfo};
use crate::types::schema::{ColumnDescriptor, RefreshOption, StorageOption, TableDescriptor};

/// Seam to the external SQL parser, needed by REFRESH to re-analyze the
/// stored view query.
pub trait ViewQueryParser {
    fn parse_statement(&self, sql: &str) -> Result<Statement>;
}

/// Executes one DDL statement against the catalogs.
pub fn execute(
    stmt: &DdlStatement,
    catalog: &mut Catalog,
    syscat: &mut SysCatalog,
    parser: &dyn ViewQueryParser,
) -> Result<()> {
    match stmt {
        DdlStatement::CreateTable(stmt) => create_table(stmt, catalog),
        DdlStatement::DropTable { name, if_exists } => drop_table(name, *if_exists, catalog),
        DdlStatement::CreateView(stmt) => create_view(stmt, catalog),
        DdlStatement::DropView { name, if_exists } => drop_view(name, *if_exists, catalog),
        DdlStatement::RefreshView { name } => refresh_view(name, catalog, parser),
        DdlStatement::CreateUser { name, options } => create_user(name, options, catalog, syscat),
        DdlStatement::AlterUser { name, options } => alter_user(name, options, catalog, syscat),
        DdlStatement::DropUser { name } => {
            require_system_db(catalog, "drop users")?;
            syscat.drop_user(name)
        }
        DdlStatement::CreateDatabase { name, options } => {
            create_database(name, options, catalog, syscat)
        }
        DdlStatement::DropDatabase { name } => {
            require_system_db(catalog, "drop databases")?;
            syscat.drop_database(name)
        }
    }
}

fn create_table(stmt: &CreateTableStmt, catalog: &mut Catalog) -> Result<()> {
    if catalog.table_metadata(&stmt.name).is_some() {
        if stmt.if_not_exists {
            return Ok(());
        }
        return Err(Error::AlreadyExists(format!("Table {}", stmt.name)));
    }
    let mut columns = Vec::with_capacity(stmt.elements.len());
    for element in &stmt.elements {
        let coldef = match element {
            TableElement::Column(coldef) => coldef,
            TableElement::Unique { .. } | TableElement::ForeignKey { .. } => {
                return Err(Error::NotSupported("table constraints".into()))
            }
        };
        let column_type = TypeInfo::new(
            coldef.type_spec.data_type,
            coldef.type_spec.param1,
            coldef.type_spec.param2,
            !coldef.not_null,
        );
        let (compression, comp_param) = match &coldef.encoding {
            None => (Encoding::None, 0),
            Some(spec) => {
                if spec.name.eq_ignore_ascii_case("fixed") {
                    check_encoding_bits(spec.param)?;
                    (Encoding::Fixed, spec.param)
                } else if spec.name.eq_ignore_ascii_case("rl") {
                    (Encoding::RunLength, 0)
                } else if spec.name.eq_ignore_ascii_case("diff") {
                    (Encoding::Differential, 0)
                } else if spec.name.eq_ignore_ascii_case("dict") {
                    (Encoding::Dictionary, 0)
                } else if spec.name.eq_ignore_ascii_case("sparse") {
                    if coldef.not_null {
                        return Err(Error::InvalidArgument(
                            "cannot use sparse encoding on a NOT NULL column".into(),
                        ));
                    }
                    check_encoding_bits(spec.param)?;
                    (Encoding::Sparse, spec.param)
                } else {
                    return Err(Error::InvalidArgument(format!(
                        "invalid column encoding {}",
                        spec.name
                    )));
                }
            }
        };
        columns.push(
            ColumnDescriptor::new(coldef.name.clone(), column_type)
                .with_compression(compression, comp_param),
        );
    }
    let mut td = TableDescriptor::table(stmt.name.clone());
    for option in &stmt.storage_options {
        if option.name.eq_ignore_ascii_case("fragment_size") {
            td.max_fragment_rows = positive_int_option(option, "FRAGMENT_SIZE")?;
        } else if option.name.eq_ignore_ascii_case("page_size") {
            td.fragment_page_size = positive_int_option(option, "PAGE_SIZE")?;
        } else {
            return Err(Error::InvalidArgument(format!(
                "invalid CREATE TABLE option {}; expected FRAGMENT_SIZE or PAGE_SIZE",
                option.name
            )));
        }
    }
    tracing::debug!(table = %stmt.name, columns = columns.len(), "creating table");
    catalog.create_table(td, columns)
}

/// Fixed-width encodings accept 8, 16, 24, 32, 40 or 48 bits.
fn check_encoding_bits(bits: i32) -> Result<()> {
    if bits == 0 || bits % 8 != 0 || bits > 48 {
        return Err(Error::InvalidArgument(
            "encoding parameter must be 8, 16, 24, 32, 40 or 48 bits".into(),
        ));
    }
    Ok(())
}

fn positive_int_option(option: &NameValue, what: &str) -> Result<i64> {
    let Literal::Int(value) = option.value else {
        return Err(Error::InvalidArgument(format!(
            "{} must be an integer literal",
            what
        )));
    };
    if value <= 0 {
        return Err(Error::InvalidArgument(format!(
            "{} must be a positive number",
            what
        )));
    }
    Ok(value)
}

fn drop_table(name: &str, if_exists: bool, catalog: &mut Catalog) -> Result<()> {
    let Some(td) = catalog.table_metadata(name) else {
        if if_exists {
            return Ok(());
        }
        return Err(Error::TableNotFound(name.to_string()));
    };
    if td.is_view {
        return Err(Error::InvalidArgument(format!(
            "{} is a view; use DROP VIEW",
            name
        )));
    }
    let td = td.clone();
    tracing::debug!(table = %name, "dropping table");
    catalog.drop_table(&td)
}

fn create_view(stmt: &CreateViewStmt, catalog: &mut Catalog) -> Result<()> {
    if catalog.table_metadata(&stmt.name).is_some() {
        if stmt.if_not_exists {
            return Ok(());
        }
        return Err(Error::AlreadyExists(format!("Table or view {}", stmt.name)));
    }
    let mut storage = StorageOption::Disk;
    let mut refresh = RefreshOption::Manual;
    for option in &stmt.options {
        if option.name.eq_ignore_ascii_case("storage") {
            let value = string_option(option, "storage option")?;
            // MIC is a legacy alias for GPU storage
            storage = if value.eq_ignore_ascii_case("gpu") || value.eq_ignore_ascii_case("mic") {
                StorageOption::Gpu
            } else if value.eq_ignore_ascii_case("cpu") {
                StorageOption::Cpu
            } else if value.eq_ignore_ascii_case("disk") {
                StorageOption::Disk
            } else {
                return Err(Error::InvalidArgument(format!(
                    "invalid storage option {}; expected GPU, MIC, CPU or DISK",
                    value
                )));
            };
        } else if option.name.eq_ignore_ascii_case("refresh") {
            let value = string_option(option, "refresh option")?;
            refresh = if value.eq_ignore_ascii_case("auto") {
                RefreshOption::Auto
            } else if value.eq_ignore_ascii_case("manual") {
                RefreshOption::Manual
            } else if value.eq_ignore_ascii_case("immediate") {
                RefreshOption::Immediate
            } else {
                return Err(Error::InvalidArgument(format!(
                    "invalid refresh option {}; expected AUTO, MANUAL or IMMEDIATE",
                    value
                )));
            };
        } else {
            return Err(Error::InvalidArgument(format!(
                "invalid CREATE MATERIALIZED VIEW option {}; expected STORAGE or REFRESH",
                option.name
            )));
        }
    }
    let mut analyzed = Analyzer::new(catalog).analyze_query(&stmt.query)?;
    if let Some(columns) = &stmt.columns {
        if columns.len() != analyzed.targetlist.len() {
            return Err(Error::InvalidArgument(
                "number of column names does not match the number of expressions \
                 in the SELECT clause"
                    .into(),
            ));
        }
        for (tle, name) in analyzed.targetlist.iter_mut().zip(columns) {
            tle.resname = name.clone();
        }
    }
    let mut columns = Vec::with_capacity(analyzed.targetlist.len());
    for tle in &analyzed.targetlist {
        if tle.resname.is_empty() {
            return Err(Error::InvalidArgument(
                "must specify a column name for expression".into(),
            ));
        }
        columns.push(ColumnDescriptor::new(
            tle.resname.clone(),
            tle.expr.type_info(),
        ));
    }
    let mut td = TableDescriptor::table(stmt.name.clone());
    td.is_view = true;
    td.is_materialized = stmt.materialized;
    td.view_sql = stmt.query.to_string();
    td.check_option = stmt.check_option;
    td.storage = storage;
    td.refresh = refresh;
    // materialized views only become readable once refreshed
    td.is_ready = !stmt.materialized;
    tracing::debug!(view = %stmt.name, materialized = stmt.materialized, "creating view");
    catalog.create_table(td, columns)
}

fn drop_view(name: &str, if_exists: bool, catalog: &mut Catalog) -> Result<()> {
    let Some(td) = catalog.table_metadata(name) else {
        if if_exists {
            return Ok(());
        }
        return Err(Error::TableNotFound(name.to_string()));
    };
    if !td.is_view {
        return Err(Error::InvalidArgument(format!(
            "{} is a table; use DROP TABLE",
            name
        )));
    }
    let td = td.clone();
    tracing::debug!(view = %name, "dropping view");
    catalog.drop_table(&td)
}

/// Re-parses the stored view query as an INSERT and analyzes it. Plan
/// construction and execution are the planner's concern; a refresh that
/// reaches a second non-ready view does not recurse.
fn refresh_view(name: &str, catalog: &Catalog, parser: &dyn ViewQueryParser) -> Result<()> {
    let td = catalog
        .table_metadata(name)
        .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
    if !td.is_view {
        return Err(Error::InvalidArgument(format!(
            "{} is a table, not a materialized view",
            name
        )));
    }
    if !td.is_materialized {
        return Err(Error::InvalidArgument(format!(
            "{} is not a materialized view",
            name
        )));
    }
    let sql = format!("INSERT INTO {} {}", name, td.view_sql);
    let stmt = parser
        .parse_statement(&sql)
        .map_err(|e| Error::Internal(format!("failed to re-parse view query: {}", e)))?;
    let Statement::Dml(dml) = stmt else {
        return Err(Error::Internal(
            "view query did not parse to a DML statement".into(),
        ));
    };
    tracing::debug!(view = %name, "refreshing materialized view");
    Analyzer::new(catalog).analyze(&dml)?;
    Ok(())
}

fn create_user(
    name: &str,
    options: &[NameValue],
    catalog: &Catalog,
    syscat: &mut SysCatalog,
) -> Result<()> {
    let mut password = None;
    let mut is_super = false;
    for option in options {
        if option.name.eq_ignore_ascii_case("password") {
            password = Some(string_option(option, "password")?);
        } else if option.name.eq_ignore_ascii_case("is_super") {
            is_super = super_option(option)?;
        } else {
            return Err(Error::InvalidArgument(format!(
                "invalid CREATE USER option {}; expected PASSWORD or IS_SUPER",
                option.name
            )));
        }
    }
    let Some(password) = password else {
        return Err(Error::PermissionDenied(
            "CREATE USER requires a PASSWORD option".into(),
        ));
    };
    require_system_db(catalog, "create users")?;
    tracing::debug!(user = %name, "creating user");
    syscat.create_user(name, password, is_super)
}

fn alter_user(
    name: &str,
    options: &[NameValue],
    catalog: &Catalog,
    syscat: &mut SysCatalog,
) -> Result<()> {
    let mut password = None;
    let mut is_super = None;
    for option in options {
        if option.name.eq_ignore_ascii_case("password") {
            password = Some(string_option(option, "password")?);
        } else if option.name.eq_ignore_ascii_case("is_super") {
            is_super = Some(super_option(option)?);
        } else {
            return Err(Error::InvalidArgument(format!(
                "invalid ALTER USER option {}; expected PASSWORD or IS_SUPER",
                option.name
            )));
        }
    }
    require_system_db(catalog, "alter users")?;
    syscat.alter_user(name, password, is_super)
}

fn create_database(
    name: &str,
    options: &[NameValue],
    catalog: &Catalog,
    syscat: &mut SysCatalog,
) -> Result<()> {
    require_system_db(catalog, "create databases")?;
    let mut owner_id = catalog.current_user().user_id;
    for option in options {
        if option.name.eq_ignore_ascii_case("owner") {
            let owner = string_option(option, "owner name")?;
            owner_id = syscat
                .user_metadata(owner)
                .map(|user| user.user_id)
                .ok_or_else(|| Error::UserNotFound(owner.to_string()))?;
        } else {
            return Err(Error::InvalidArgument(format!(
                "invalid CREATE DATABASE option {}; only OWNER is supported",
                option.name
            )));
        }
    }
    tracing::debug!(database = %name, owner_id, "creating database");
    syscat.create_database(name, owner_id)
}

fn require_system_db(catalog: &Catalog, action: &str) -> Result<()> {
    if catalog.current_db().db_name != SYSTEM_DB {
        return Err(Error::PermissionDenied(format!(
            "must be in the system database to {}",
            action
        )));
    }
    Ok(())
}

fn string_option<'a>(option: &'a NameValue, what: &str) -> Result<&'a str> {
    match &option.value {
        Literal::String(s) => Ok(s),
        _ => Err(Error::InvalidArgument(format!(
            "{} must be a string literal",
            what
        ))),
    }
}

/// IS_SUPER takes the string literal 'true' or 'false'.
fn super_option(option: &NameValue) -> Result<bool> {
    let value = string_option(option, "IS_SUPER option")?;
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::InvalidArgument(
            "value of IS_SUPER must be TRUE or FALSE".into(),
        ))
    }
}
