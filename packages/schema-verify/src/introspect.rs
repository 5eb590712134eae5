//! Catalog and row-count queries.
//!
//! `information_schema` exposes its columns as domain types
//! (`sql_identifier`, `yes_or_no`, ...), so every text column is cast to
//! `text` and every integer to `bigint` before decoding.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, QueryResult, Statement, Value};

/// One row of `information_schema.columns`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub is_identity: bool,
}

impl ColumnInfo {
    fn from_row(row: &QueryResult) -> Result<Self, DbErr> {
        Ok(Self {
            name: row.try_get("", "column_name")?,
            data_type: row.try_get("", "data_type")?,
            nullable: row.try_get::<String>("", "is_nullable")? == "YES",
            default: row.try_get("", "column_default")?,
            is_identity: row
                .try_get::<Option<String>>("", "is_identity")?
                .is_some_and(|v| v == "YES"),
        })
    }
}

pub(crate) fn pg(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values)
}

/// Whether the server's catalog lists a database called `name`.
pub async fn database_exists<C: ConnectionTrait>(conn: &C, name: &str) -> Result<bool, DbErr> {
    let row = conn
        .query_one(pg(
            "SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1) AS present",
            vec![name.into()],
        ))
        .await?;
    match row {
        Some(row) => row.try_get("", "present"),
        None => Ok(false),
    }
}

/// Names of all base tables and views in `schema`.
pub async fn schema_tables<C: ConnectionTrait>(
    conn: &C,
    schema: &str,
) -> Result<BTreeSet<String>, DbErr> {
    let rows = conn
        .query_all(pg(
            "SELECT table_name::text AS table_name \
             FROM information_schema.tables \
             WHERE table_schema = $1",
            vec![schema.into()],
        ))
        .await?;
    rows.iter().map(|row| row.try_get("", "table_name")).collect()
}

/// Column metadata of `schema.table`, keyed by column name.
///
/// A missing table yields an empty map rather than an error.
pub async fn table_columns<C: ConnectionTrait>(
    conn: &C,
    schema: &str,
    table: &str,
) -> Result<HashMap<String, ColumnInfo>, DbErr> {
    let rows = conn
        .query_all(pg(
            "SELECT column_name::text AS column_name, \
                    data_type::text AS data_type, \
                    is_nullable::text AS is_nullable, \
                    column_default::text AS column_default, \
                    is_identity::text AS is_identity \
             FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = $2 \
             ORDER BY ordinal_position",
            vec![schema.into(), table.into()],
        ))
        .await?;

    rows.iter()
        .map(|row| ColumnInfo::from_row(row).map(|col| (col.name.clone(), col)))
        .collect()
}

/// `SELECT COUNT(*)` over one table.
pub async fn count_rows<C: ConnectionTrait>(conn: &C, table: &str) -> Result<i64, DbErr> {
    let sql = format!("SELECT COUNT(*) AS cnt FROM {}", quote_ident(table));
    let row = conn
        .query_one(Statement::from_string(DatabaseBackend::Postgres, sql))
        .await?;
    match row {
        Some(row) => row.try_get("", "cnt"),
        None => Err(DbErr::RecordNotFound(format!("no count returned for {table}"))),
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn column_row(
        name: &str,
        data_type: &str,
        nullable: &str,
        default: Option<&str>,
    ) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("column_name", Value::from(name)),
            ("data_type", Value::from(data_type)),
            ("is_nullable", Value::from(nullable)),
            ("column_default", Value::from(default.map(str::to_string))),
            ("is_identity", Value::from("NO")),
        ])
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("students"), "\"students\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[tokio::test]
    async fn test_database_exists_reads_flag() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("present", Value::from(true))])]])
            .append_query_results([[BTreeMap::from([("present", Value::from(false))])]])
            .into_connection();

        assert!(database_exists(&conn, "university").await.unwrap());
        assert!(!database_exists(&conn, "university").await.unwrap());
    }

    #[tokio::test]
    async fn test_table_columns_maps_metadata() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                column_row(
                    "id",
                    "integer",
                    "NO",
                    Some("nextval('students_id_seq'::regclass)"),
                ),
                column_row("age", "integer", "YES", None),
            ]])
            .into_connection();

        let columns = table_columns(&conn, "public", "students").await.unwrap();
        assert_eq!(columns.len(), 2);

        let id = &columns["id"];
        assert!(!id.nullable);
        assert!(id.default.as_deref().unwrap().starts_with("nextval("));
        assert!(!id.is_identity);

        let age = &columns["age"];
        assert!(age.nullable);
        assert_eq!(age.default, None);
    }

    #[tokio::test]
    async fn test_count_rows() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("cnt", Value::from(5i64))])]])
            .into_connection();

        assert_eq!(count_rows(&conn, "students").await.unwrap(), 5);

        let log = conn.into_transaction_log();
        assert_eq!(
            log[0],
            sea_orm::Transaction::one(Statement::from_string(
                DatabaseBackend::Postgres,
                "SELECT COUNT(*) AS cnt FROM \"students\"",
            ))
        );
    }
}
