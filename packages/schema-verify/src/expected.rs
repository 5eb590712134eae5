//! The fixed shape of the `university` database.

use crate::introspect::ColumnInfo;

pub const PUBLIC_SCHEMA: &str = "public";

// `information_schema.columns.data_type` spellings
pub const INTEGER: &str = "integer";
pub const VARCHAR: &str = "character varying";
pub const CHARACTER: &str = "character";

/// Tables that must exist in [`PUBLIC_SCHEMA`].
pub const UNIVERSITY_TABLES: [&str; 3] = ["students", "courses", "enrollments"];

pub const MIN_STUDENT_AGE: i64 = 18;
pub const VALID_GRADES: [&str; 5] = ["A", "B", "C", "D", "F"];

/// How a column's default expression is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRule {
    /// Not checked.
    Any,
    /// The column must be auto-generated: a `nextval(...)` default (serial)
    /// or an identity column.
    AutoIncrement,
}

impl DefaultRule {
    pub fn accepts(self, column: &ColumnInfo) -> bool {
        match self {
            DefaultRule::Any => true,
            DefaultRule::AutoIncrement => {
                column.is_identity
                    || column
                        .default
                        .as_deref()
                        .is_some_and(|d| d.contains("nextval("))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedColumn {
    pub name: &'static str,
    pub data_type: &'static str,
    pub nullable: bool,
    pub default: DefaultRule,
}

impl ExpectedColumn {
    const fn new(name: &'static str, data_type: &'static str, nullable: bool) -> Self {
        Self {
            name,
            data_type,
            nullable,
            default: DefaultRule::Any,
        }
    }

    const fn auto_increment(mut self) -> Self {
        self.default = DefaultRule::AutoIncrement;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableExpectation {
    pub table: &'static str,
    pub columns: &'static [ExpectedColumn],
}

pub const STUDENTS: TableExpectation = TableExpectation {
    table: "students",
    columns: &[
        ExpectedColumn::new("id", INTEGER, false).auto_increment(),
        ExpectedColumn::new("name", VARCHAR, false),
        ExpectedColumn::new("email", VARCHAR, false),
        ExpectedColumn::new("age", INTEGER, true),
    ],
};

pub const COURSES: TableExpectation = TableExpectation {
    table: "courses",
    columns: &[
        ExpectedColumn::new("id", INTEGER, false),
        ExpectedColumn::new("title", VARCHAR, false),
        ExpectedColumn::new("credits", INTEGER, true),
    ],
};

pub const ENROLLMENTS: TableExpectation = TableExpectation {
    table: "enrollments",
    columns: &[
        ExpectedColumn::new("student_id", INTEGER, false),
        ExpectedColumn::new("course_id", INTEGER, false),
        ExpectedColumn::new("grade", CHARACTER, true),
    ],
};

/// Lower bound on the seed rows of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedMinimum {
    pub table: &'static str,
    /// Plural noun used in failure messages
    pub label: &'static str,
    pub min: i64,
}

pub const SEED_MINIMUMS: [SeedMinimum; 3] = [
    SeedMinimum {
        table: "students",
        label: "students",
        min: 3,
    },
    SeedMinimum {
        table: "courses",
        label: "courses",
        min: 2,
    },
    SeedMinimum {
        table: "enrollments",
        label: "enrollments",
        min: 2,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn column(default: Option<&str>, is_identity: bool) -> ColumnInfo {
        ColumnInfo {
            name: "id".into(),
            data_type: INTEGER.into(),
            nullable: false,
            default: default.map(str::to_string),
            is_identity,
        }
    }

    #[test]
    fn test_auto_increment_accepts_serial_default() {
        let col = column(Some("nextval('students_id_seq'::regclass)"), false);
        assert!(DefaultRule::AutoIncrement.accepts(&col));
    }

    #[test]
    fn test_auto_increment_accepts_identity_column() {
        assert!(DefaultRule::AutoIncrement.accepts(&column(None, true)));
    }

    #[test]
    fn test_auto_increment_rejects_plain_columns() {
        assert!(!DefaultRule::AutoIncrement.accepts(&column(None, false)));
        assert!(!DefaultRule::AutoIncrement.accepts(&column(Some("0"), false)));
    }

    #[test]
    fn test_any_accepts_everything() {
        assert!(DefaultRule::Any.accepts(&column(None, false)));
        assert!(DefaultRule::Any.accepts(&column(Some("42"), false)));
    }

    #[test]
    fn test_only_students_id_is_auto_increment() {
        let auto: Vec<_> = [STUDENTS, COURSES, ENROLLMENTS]
            .iter()
            .flat_map(|t| t.columns.iter().map(move |c| (t.table, c)))
            .filter(|(_, c)| c.default == DefaultRule::AutoIncrement)
            .map(|(t, c)| format!("{t}.{}", c.name))
            .collect();
        assert_eq!(auto, vec!["students.id"]);
    }

    #[test]
    fn test_expectation_tables_match_required_tables() {
        let tables: Vec<_> = [STUDENTS, COURSES, ENROLLMENTS]
            .iter()
            .map(|t| t.table)
            .collect();
        assert_eq!(tables, UNIVERSITY_TABLES);
        let seeded: Vec<_> = SEED_MINIMUMS.iter().map(|s| s.table).collect();
        assert_eq!(seeded, UNIVERSITY_TABLES);
    }
}
