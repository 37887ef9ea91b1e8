//! In-memory catalog: name-to-descriptor maps for tables and columns,
//! plus the system catalog holding users and databases.
//!
//! Table and column identifiers compare exactly (the catalog's policy);
//! SQL keywords and option names are compared case-insensitively at their
//! call sites.

use crate::error::{Error, Result};
use crate::types::schema::{ColumnDescriptor, TableDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The privileged database. User and database DDL is only allowed while
/// connected to it.
pub const SYSTEM_DB: &str = "granite_system";

/// Metadata for a database user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub user_id: i32,
    pub user_name: String,
    pub password: String,
    pub is_super: bool,
}

/// Metadata for a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    pub db_id: i32,
    pub db_name: String,
    pub owner_id: i32,
}

/// Per-database catalog with the current session context attached.
#[derive(Debug, Clone)]
pub struct Catalog {
    current_db: DatabaseMetadata,
    current_user: UserMetadata,
    tables: HashMap<String, TableDescriptor>,
    /// Columns per table id, in catalog (definition) order.
    columns: HashMap<i32, Vec<ColumnDescriptor>>,
    next_table_id: i32,
}

impl Catalog {
    pub fn new(current_db: DatabaseMetadata, current_user: UserMetadata) -> Self {
        Self {
            current_db,
            current_user,
            tables: HashMap::new(),
            columns: HashMap::new(),
            next_table_id: 1,
        }
    }

    pub fn current_db(&self) -> &DatabaseMetadata {
        &self.current_db
    }

    pub fn current_user(&self) -> &UserMetadata {
        &self.current_user
    }

    /// Looks up a table or view descriptor by name.
    pub fn table_metadata(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.get(name)
    }

    /// Looks up a column descriptor by table id and column name.
    pub fn column_metadata(&self, table_id: i32, name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .get(&table_id)?
            .iter()
            .find(|cd| cd.column_name == name)
    }

    /// Looks up a column descriptor by table id and column id.
    pub fn column_by_id(&self, table_id: i32, column_id: i32) -> Option<&ColumnDescriptor> {
        self.columns
            .get(&table_id)?
            .iter()
            .find(|cd| cd.column_id == column_id)
    }

    /// All column descriptors of a table, in definition order.
    pub fn table_columns(&self, table_id: i32) -> &[ColumnDescriptor] {
        self.columns.get(&table_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registers a table with its columns, assigning the table id and
    /// 1-based column ids.
    pub fn create_table(
        &mut self,
        mut td: TableDescriptor,
        mut columns: Vec<ColumnDescriptor>,
    ) -> Result<()> {
        if self.tables.contains_key(&td.table_name) {
            return Err(Error::AlreadyExists(format!("Table {}", td.table_name)));
        }
        td.table_id = self.next_table_id;
        self.next_table_id += 1;
        td.n_columns = columns.len();
        for (i, cd) in columns.iter_mut().enumerate() {
            cd.table_id = td.table_id;
            cd.column_id = i as i32 + 1;
        }
        self.columns.insert(td.table_id, columns);
        self.tables.insert(td.table_name.clone(), td);
        Ok(())
    }

    /// Removes a table and its columns.
    pub fn drop_table(&mut self, td: &TableDescriptor) -> Result<()> {
        self.tables
            .remove(&td.table_name)
            .ok_or_else(|| Error::TableNotFound(td.table_name.clone()))?;
        self.columns.remove(&td.table_id);
        Ok(())
    }
}

/// System-wide catalog of users and databases. Mutations are only reachable
/// through DDL executed in the system database.
#[derive(Debug, Clone, Default)]
pub struct SysCatalog {
    users: HashMap<String, UserMetadata>,
    databases: HashMap<String, DatabaseMetadata>,
    next_user_id: i32,
    next_db_id: i32,
}

impl SysCatalog {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            databases: HashMap::new(),
            next_user_id: 1,
            next_db_id: 1,
        }
    }

    pub fn user_metadata(&self, name: &str) -> Option<&UserMetadata> {
        self.users.get(name)
    }

    pub fn database_metadata(&self, name: &str) -> Option<&DatabaseMetadata> {
        self.databases.get(name)
    }

    pub fn create_user(&mut self, name: &str, password: &str, is_super: bool) -> Result<()> {
        if self.users.contains_key(name) {
            return Err(Error::AlreadyExists(format!("User {}", name)));
        }
        let user = UserMetadata {
            user_id: self.next_user_id,
            user_name: name.to_string(),
            password: password.to_string(),
            is_super,
        };
        self.next_user_id += 1;
        self.users.insert(name.to_string(), user);
        Ok(())
    }

    /// Updates password and/or superuser flag; `None` leaves the field
    /// unchanged.
    pub fn alter_user(
        &mut self,
        name: &str,
        password: Option<&str>,
        is_super: Option<bool>,
    ) -> Result<()> {
        let user = self
            .users
            .get_mut(name)
            .ok_or_else(|| Error::UserNotFound(name.to_string()))?;
        if let Some(password) = password {
            user.password = password.to_string();
        }
        if let Some(is_super) = is_super {
            user.is_super = is_super;
        }
        Ok(())
    }

    pub fn drop_user(&mut self, name: &str) -> Result<()> {
        self.users
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::UserNotFound(name.to_string()))
    }

    pub fn create_database(&mut self, name: &str, owner_id: i32) -> Result<()> {
        if self.databases.contains_key(name) {
            return Err(Error::AlreadyExists(format!("Database {}", name)));
        }
        let db = DatabaseMetadata {
            db_id: self.next_db_id,
            db_name: name.to_string(),
            owner_id,
        };
        self.next_db_id += 1;
        self.databases.insert(name.to_string(), db);
        Ok(())
    }

    pub fn drop_database(&mut self, name: &str) -> Result<()> {
        self.databases
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::DatabaseNotFound(name.to_string()))
    }
}
