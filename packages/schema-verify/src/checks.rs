use std::collections::HashMap;

use db_infra::db::UNIVERSITY_DB;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;

use crate::error::{CheckError, DuplicateEmail, InvalidCredits, InvalidGrade, UnderageStudent};
use crate::expected::{
    TableExpectation, COURSES, ENROLLMENTS, MIN_STUDENT_AGE, PUBLIC_SCHEMA, SEED_MINIMUMS,
    STUDENTS, UNIVERSITY_TABLES, VALID_GRADES,
};
use crate::introspect::{
    count_rows, database_exists, pg, schema_tables, table_columns, ColumnInfo,
};

/// The fixed sequence of checks, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    DatabaseExists,
    TablesExist,
    StudentsStructure,
    CoursesStructure,
    EnrollmentsStructure,
    SeedData,
    Constraints,
}

impl Check {
    pub const ALL: [Check; 7] = [
        Check::DatabaseExists,
        Check::TablesExist,
        Check::StudentsStructure,
        Check::CoursesStructure,
        Check::EnrollmentsStructure,
        Check::SeedData,
        Check::Constraints,
    ];

    /// Checks run on the initial connection.
    pub const CATALOG: [Check; 2] = [Check::DatabaseExists, Check::TablesExist];

    /// Checks run on the connection to the database under test.
    pub const TARGET: [Check; 5] = [
        Check::StudentsStructure,
        Check::CoursesStructure,
        Check::EnrollmentsStructure,
        Check::SeedData,
        Check::Constraints,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Check::DatabaseExists => "Database 'university' exists",
            Check::TablesExist => "Required tables exist",
            Check::StudentsStructure => "Students table structure correct",
            Check::CoursesStructure => "Courses table structure correct",
            Check::EnrollmentsStructure => "Enrollments table structure correct",
            Check::SeedData => "Test data exists",
            Check::Constraints => "Constraints work correctly",
        }
    }

    pub async fn run<C: ConnectionTrait>(self, conn: &C) -> Result<(), CheckError> {
        match self {
            Check::DatabaseExists => check_database_exists(conn).await,
            Check::TablesExist => check_tables_exist(conn).await,
            Check::StudentsStructure => check_table_structure(conn, &STUDENTS).await,
            Check::CoursesStructure => check_table_structure(conn, &COURSES).await,
            Check::EnrollmentsStructure => check_table_structure(conn, &ENROLLMENTS).await,
            Check::SeedData => check_seed_data(conn).await,
            Check::Constraints => check_constraints(conn).await,
        }
    }
}

pub async fn check_database_exists<C: ConnectionTrait>(conn: &C) -> Result<(), CheckError> {
    if database_exists(conn, UNIVERSITY_DB).await? {
        Ok(())
    } else {
        Err(CheckError::DatabaseMissing {
            name: UNIVERSITY_DB.to_string(),
        })
    }
}

pub async fn check_tables_exist<C: ConnectionTrait>(conn: &C) -> Result<(), CheckError> {
    let present = schema_tables(conn, PUBLIC_SCHEMA).await?;
    let mut missing: Vec<String> = UNIVERSITY_TABLES
        .iter()
        .filter(|t| !present.contains(**t))
        .map(|t| t.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(CheckError::MissingTables { tables: missing })
}

pub async fn check_table_structure<C: ConnectionTrait>(
    conn: &C,
    expectation: &TableExpectation,
) -> Result<(), CheckError> {
    let columns = table_columns(conn, PUBLIC_SCHEMA, expectation.table).await?;
    compare_columns(expectation, &columns)
}

/// Compare introspected columns against one table's expectation.
///
/// Expected columns are walked in declaration order and the first mismatch
/// wins. Columns the expectation does not mention are ignored.
pub fn compare_columns(
    expectation: &TableExpectation,
    columns: &HashMap<String, ColumnInfo>,
) -> Result<(), CheckError> {
    for expected in expectation.columns {
        let Some(actual) = columns.get(expected.name) else {
            return Err(CheckError::MissingColumn {
                table: expectation.table.to_string(),
                column: expected.name.to_string(),
            });
        };

        if actual.data_type != expected.data_type {
            return Err(CheckError::WrongType {
                column: expected.name.to_string(),
                actual: actual.data_type.clone(),
                expected: expected.data_type.to_string(),
            });
        }

        if actual.nullable != expected.nullable {
            return Err(CheckError::NullableMismatch {
                column: expected.name.to_string(),
                actual: actual.nullable,
                expected: expected.nullable,
            });
        }

        if !expected.default.accepts(actual) {
            return Err(CheckError::DefaultMismatch {
                column: expected.name.to_string(),
                actual: actual.default.clone(),
            });
        }
    }
    Ok(())
}

pub async fn check_seed_data<C: ConnectionTrait>(conn: &C) -> Result<(), CheckError> {
    for seed in SEED_MINIMUMS {
        let actual = count_rows(conn, seed.table).await?;
        if actual < seed.min {
            return Err(CheckError::InsufficientRows {
                label: seed.label,
                min: seed.min,
                actual,
            });
        }
    }
    Ok(())
}

/// Business rules the engine is not trusted to enforce. Stops at the first
/// rule with offending rows.
pub async fn check_constraints<C: ConnectionTrait>(conn: &C) -> Result<(), CheckError> {
    let duplicates = duplicate_emails(conn).await?;
    if !duplicates.is_empty() {
        return Err(CheckError::DuplicateEmails(duplicates));
    }

    let underage = underage_students(conn).await?;
    if !underage.is_empty() {
        return Err(CheckError::UnderageStudents(underage));
    }

    let credits = invalid_credits(conn).await?;
    if !credits.is_empty() {
        return Err(CheckError::InvalidCredits(credits));
    }

    let grades = invalid_grades(conn).await?;
    if !grades.is_empty() {
        return Err(CheckError::InvalidGrades(grades));
    }

    Ok(())
}

async fn duplicate_emails<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<DuplicateEmail>, CheckError> {
    let rows = conn
        .query_all(pg(
            "SELECT email::text AS email, COUNT(*) AS cnt \
             FROM students \
             GROUP BY email \
             HAVING COUNT(*) > 1 \
             ORDER BY email",
            vec![],
        ))
        .await?;

    let mut found = Vec::with_capacity(rows.len());
    for row in rows {
        found.push(DuplicateEmail {
            email: row.try_get("", "email")?,
            count: row.try_get("", "cnt")?,
        });
    }
    Ok(found)
}

async fn underage_students<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<UnderageStudent>, CheckError> {
    let rows = conn
        .query_all(pg(
            "SELECT id::bigint AS id, name::text AS name, age::bigint AS age \
             FROM students \
             WHERE age < $1 \
             ORDER BY id",
            vec![MIN_STUDENT_AGE.into()],
        ))
        .await?;

    let mut found = Vec::with_capacity(rows.len());
    for row in rows {
        found.push(UnderageStudent {
            id: row.try_get("", "id")?,
            name: row.try_get("", "name")?,
            age: row.try_get("", "age")?,
        });
    }
    Ok(found)
}

async fn invalid_credits<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<InvalidCredits>, CheckError> {
    let rows = conn
        .query_all(pg(
            "SELECT id::bigint AS id, title::text AS title, credits::bigint AS credits \
             FROM courses \
             WHERE credits <= 0 \
             ORDER BY id",
            vec![],
        ))
        .await?;

    let mut found = Vec::with_capacity(rows.len());
    for row in rows {
        found.push(InvalidCredits {
            id: row.try_get("", "id")?,
            title: row.try_get("", "title")?,
            credits: row.try_get("", "credits")?,
        });
    }
    Ok(found)
}

async fn invalid_grades<C: ConnectionTrait>(conn: &C) -> Result<Vec<InvalidGrade>, CheckError> {
    let allowed = VALID_GRADES
        .iter()
        .map(|g| format!("'{g}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT student_id::bigint AS student_id, course_id::bigint AS course_id, grade::text AS grade \
         FROM enrollments \
         WHERE grade IS NOT NULL AND grade NOT IN ({allowed}) \
         ORDER BY student_id, course_id"
    );
    let rows = conn
        .query_all(Statement::from_string(conn.get_database_backend(), sql))
        .await?;

    let mut found = Vec::with_capacity(rows.len());
    for row in rows {
        found.push(InvalidGrade {
            student_id: row.try_get("", "student_id")?,
            course_id: row.try_get("", "course_id")?,
            grade: row.try_get("", "grade")?,
        });
    }
    Ok(found)
}
