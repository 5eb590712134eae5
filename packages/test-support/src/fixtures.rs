//! University database fixtures for live-server tests
//!
//! The tables carry the column shapes the verifier expects but deliberately
//! omit UNIQUE and CHECK constraints, so tests can plant rows that violate the
//! business rules and watch the constraint check catch them.

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, Statement, Value};

use crate::unique_email;

const RESET_DDL: &[&str] = &[
    "DROP TABLE IF EXISTS enrollments, courses, students CASCADE",
    "CREATE TABLE students (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        age INTEGER
    )",
    "CREATE TABLE courses (
        id INTEGER PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        credits INTEGER
    )",
    "CREATE TABLE enrollments (
        student_id INTEGER NOT NULL REFERENCES students(id),
        course_id INTEGER NOT NULL REFERENCES courses(id),
        grade CHAR(1),
        PRIMARY KEY (student_id, course_id)
    )",
];

const SEED_COURSES: &str =
    "INSERT INTO courses (id, title, credits) VALUES (101, 'Databases', 4), (102, 'Compilers', 3)";

const SEED_ENROLLMENTS: &str =
    "INSERT INTO enrollments (student_id, course_id, grade) VALUES (1, 101, 'A'), (2, 102, 'B'), (3, 101, NULL)";

/// Run a single statement without parameters
pub async fn execute_sql<C: ConnectionTrait>(conn: &C, sql: &str) -> Result<(), DbErr> {
    conn.execute(Statement::from_string(DatabaseBackend::Postgres, sql))
        .await?;
    Ok(())
}

/// Create database `name` on the server behind `admin` unless it already exists
pub async fn ensure_database<C: ConnectionTrait>(admin: &C, name: &str) -> Result<(), DbErr> {
    let row = admin
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1) AS present",
            [Value::from(name)],
        ))
        .await?;
    let present = match row {
        Some(row) => row.try_get::<bool>("", "present")?,
        None => false,
    };

    if !present {
        let quoted = name.replace('"', "\"\"");
        execute_sql(admin, &format!("CREATE DATABASE \"{quoted}\"")).await?;
    }
    Ok(())
}

/// Drop database `name`, disconnecting any sessions still attached to it
pub async fn drop_database<C: ConnectionTrait>(admin: &C, name: &str) -> Result<(), DbErr> {
    let quoted = name.replace('"', "\"\"");
    execute_sql(
        admin,
        &format!("DROP DATABASE IF EXISTS \"{quoted}\" WITH (FORCE)"),
    )
    .await
}

/// Drop and recreate the three university tables, then seed them with
/// three students, two courses and three enrollments that satisfy every rule.
pub async fn provision_university<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    for sql in RESET_DDL {
        execute_sql(conn, sql).await?;
    }

    for (name, age) in [("Ada", Some(21)), ("Grace", Some(34)), ("Linus", None)] {
        insert_student(conn, name, &unique_email(&name.to_lowercase()), age).await?;
    }

    execute_sql(conn, SEED_COURSES).await?;
    execute_sql(conn, SEED_ENROLLMENTS).await?;
    Ok(())
}

pub async fn insert_student<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    email: &str,
    age: Option<i32>,
) -> Result<(), DbErr> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "INSERT INTO students (name, email, age) VALUES ($1, $2, $3)",
        [Value::from(name), Value::from(email), Value::from(age)],
    ))
    .await?;
    Ok(())
}

pub async fn drop_table<C: ConnectionTrait>(conn: &C, table: &str) -> Result<(), DbErr> {
    execute_sql(conn, &format!("DROP TABLE IF EXISTS {table} CASCADE")).await
}
