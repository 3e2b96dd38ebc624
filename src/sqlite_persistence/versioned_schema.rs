use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::info;

pub const DEFAULT_TIMESTAMP: &str = "(cast(strftime('%s','now') as int))";

/// Offset added to the schema version stored in `PRAGMA user_version`, so
/// that a database created by some other tool (version 0) is never mistaken
/// for one of ours.
pub const BASE_DB_VERSION: usize = 47000;

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                is_unique: false,
                default_value: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }

    fn from_sql(s: &str) -> Option<Self> {
        match s {
            "TEXT" => Some(SqlType::Text),
            "INTEGER" => Some(SqlType::Integer),
            "REAL" => Some(SqlType::Real),
            _ => None,
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
    pub cascade_on_delete: bool,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub is_unique: bool,
    pub default_value: Option<&'static str>,
    pub foreign_key: Option<&'static ForeignKey>,
}

impl Column {
    fn definition(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.as_sql());
        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.non_null {
            sql.push_str(" NOT NULL");
        }
        if self.is_unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default_value) = self.default_value {
            sql.push_str(&format!(" DEFAULT {}", default_value));
        }
        if let Some(fk) = self.foreign_key {
            sql.push_str(&format!(
                " REFERENCES {}({}) ON DELETE {}",
                fk.foreign_table,
                fk.foreign_column,
                if fk.cascade_on_delete {
                    "CASCADE"
                } else {
                    "NO ACTION"
                }
            ));
        }
        sql
    }
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indices: &'static [(&'static str, &'static str)],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let columns = self
            .columns
            .iter()
            .map(Column::definition)
            .collect::<Vec<_>>()
            .join(", ");
        conn.execute(&format!("CREATE TABLE {} ({});", self.name, columns), [])
            .with_context(|| format!("Failed to create table {}", self.name))?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                [],
            )?;
        }
        Ok(())
    }

    /// Compares the live table against this definition: column names, order,
    /// types, nullability, primary keys and named indices.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let actual: Vec<(String, String, bool, bool)> = stmt
            .query_map(params![], |row| {
                Ok((
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i32>(3)? == 1,
                    row.get::<_, i32>(5)? > 0,
                ))
            })?
            .collect::<std::result::Result<_, _>>()?;

        if actual.len() != self.columns.len() {
            bail!(
                "Table {} has {} columns, expected {} ({})",
                self.name,
                actual.len(),
                self.columns.len(),
                self.columns
                    .iter()
                    .map(|c| c.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        for ((name, sql_type, non_null, is_pk), expected) in actual.iter().zip(self.columns) {
            if name != expected.name {
                bail!(
                    "Table {} column name mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    name
                );
            }
            if SqlType::from_sql(sql_type).as_ref() != Some(expected.sql_type) {
                bail!(
                    "Table {} column {} type mismatch: expected {:?}, got {}",
                    self.name,
                    name,
                    expected.sql_type,
                    sql_type
                );
            }
            if *non_null != expected.non_null {
                bail!(
                    "Table {} column {} non-null mismatch: expected {}, got {}",
                    self.name,
                    name,
                    expected.non_null,
                    non_null
                );
            }
            if *is_pk != expected.is_primary_key {
                bail!(
                    "Table {} column {} primary key mismatch: expected {}, got {}",
                    self.name,
                    name,
                    expected.is_primary_key,
                    is_pk
                );
            }
        }

        for (index_name, _) in self.indices {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1 AND tbl_name=?2",
                    params![index_name, self.name],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if !exists {
                bail!("Table {} is missing index '{}'", self.name, index_name);
            }
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    /// Brings a database at `version - 1` up to this version.
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        for table in self.tables {
            table.create(conn)?;
        }
        set_version(conn, self.version)
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.validate(conn)?;
        }
        Ok(())
    }
}

fn set_version(conn: &Connection, version: usize) -> Result<()> {
    conn.execute(
        &format!("PRAGMA user_version = {}", BASE_DB_VERSION + version),
        [],
    )?;
    Ok(())
}

fn read_version(conn: &Connection) -> Result<usize> {
    let raw = conn
        .query_row("PRAGMA user_version;", [], |row| row.get::<usize, i64>(0))
        .context("Failed to read database version")?;
    let version = raw - BASE_DB_VERSION as i64;
    if version < 0 {
        bail!(
            "Database version {} does not contain base db version {}",
            raw,
            BASE_DB_VERSION
        );
    }
    Ok(version as usize)
}

/// Opens (or creates) a SQLite database whose layout is described by
/// `schemas`, validating the on-disk version and running any pending
/// migrations. Schemas must be ordered, with `schemas[i].version == i`.
pub fn open_versioned<P: AsRef<Path>>(
    db_path: P,
    schemas: &'static [VersionedSchema],
) -> Result<Connection> {
    let latest = schemas.last().context("No schema versions defined")?;
    let conn = if db_path.as_ref().exists() {
        Connection::open_with_flags(
            db_path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?
    } else {
        info!("Creating new database at {:?}", db_path.as_ref());
        let conn = Connection::open(db_path.as_ref())?;
        latest.create(&conn)?;
        conn
    };
    conn.execute("PRAGMA foreign_keys = ON;", [])?;
    migrate(&conn, schemas)?;
    Ok(conn)
}

/// Same as [`open_versioned`] for a throwaway in-memory database.
pub fn open_in_memory(schemas: &'static [VersionedSchema]) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    schemas
        .last()
        .context("No schema versions defined")?
        .create(&conn)?;
    Ok(conn)
}

fn migrate(conn: &Connection, schemas: &'static [VersionedSchema]) -> Result<()> {
    let version = read_version(conn)?;
    let current = schemas
        .get(version)
        .with_context(|| format!("Database version {} is too new", version))?;
    current.validate(conn)?;

    for schema in schemas.iter().skip(version + 1) {
        info!("Migrating database to version {}", schema.version);
        if let Some(migration) = schema.migration {
            migration(conn)?;
        }
        set_version(conn, schema.version)?;
        schema.validate(conn)?;
    }
    Ok(())
}
