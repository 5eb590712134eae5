use std::fmt;

use db_infra::DbInfraError;
use thiserror::Error;

/// Fatal failure: nothing was checked.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[from] DbInfraError),
}

/// Why a single check failed. The run records it and moves on.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Database '{name}' does not exist")]
    DatabaseMissing { name: String },
    #[error("Missing tables: {}", .tables.join(", "))]
    MissingTables { tables: Vec<String> },
    #[error("Column '{column}' missing in {table} table")]
    MissingColumn { table: String, column: String },
    #[error("Column '{column}' has wrong type: {actual} != {expected}")]
    WrongType {
        column: String,
        actual: String,
        expected: String,
    },
    #[error("Column '{column}' nullable mismatch: {actual} != {expected}")]
    NullableMismatch {
        column: String,
        actual: bool,
        expected: bool,
    },
    #[error("Column '{column}' default mismatch")]
    DefaultMismatch {
        column: String,
        actual: Option<String>,
    },
    #[error("Expected at least {min} {label}, got {actual}")]
    InsufficientRows {
        label: &'static str,
        min: i64,
        actual: i64,
    },
    #[error("Duplicate emails found: {}", join(.0))]
    DuplicateEmails(Vec<DuplicateEmail>),
    #[error("Underage students found: {}", join(.0))]
    UnderageStudents(Vec<UnderageStudent>),
    #[error("Invalid credits found: {}", join(.0))]
    InvalidCredits(Vec<InvalidCredits>),
    #[error("Invalid grades found: {}", join(.0))]
    InvalidGrades(Vec<InvalidGrade>),
    #[error("Query failed: {0}")]
    Query(#[from] sea_orm::DbErr),
    #[error("Database under test is unreachable: {message}")]
    Unreachable { message: String },
}

fn join<T: fmt::Display>(rows: &[T]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Quoted text value, or a bare `NULL` when the row has none.
struct Quoted<'a>(&'a Option<String>);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "'{v}'"),
            None => f.write_str("NULL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEmail {
    pub email: Option<String>,
    pub count: i64,
}

impl fmt::Display for DuplicateEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{email} ({} rows)", self.count),
            None => write!(f, "NULL ({} rows)", self.count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderageStudent {
    pub id: i64,
    pub name: Option<String>,
    pub age: i64,
}

impl fmt::Display for UnderageStudent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "student {} {} age {}",
            self.id,
            Quoted(&self.name),
            self.age
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCredits {
    pub id: i64,
    pub title: Option<String>,
    pub credits: i64,
}

impl fmt::Display for InvalidCredits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "course {} {} credits {}",
            self.id,
            Quoted(&self.title),
            self.credits
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGrade {
    pub student_id: i64,
    pub course_id: i64,
    pub grade: String,
}

impl fmt::Display for InvalidGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enrollment ({}, {}) grade '{}'",
            self.student_id, self.course_id, self.grade
        )
    }
}
