//! Failure taxonomy shared by all five components.
//!
//! Every failure is recoverable and local: an operation that returns `Err`
//! has left its container exactly as it found it.

use std::fmt;

use thiserror::Error;

use crate::core_types::{CourseId, Isbn, StudentId};

pub type AdminResult<T> = std::result::Result<T, AdminError>;

/// What kind of record a key failed to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Student,
    PaymentRecord,
    Book,
    Course,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Student => "student",
            Entity::PaymentRecord => "payment record",
            Entity::Book => "book",
            Entity::Course => "course",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdminError {
    #[error("{entity} {key} already exists")]
    AlreadyExists { entity: Entity, key: String },

    #[error("{entity} {key} not found")]
    NotFound { entity: Entity, key: String },

    #[error("book {isbn} has no copies available")]
    Unavailable { isbn: Isbn },

    #[error("student {student_id} has not borrowed book {isbn}")]
    NotBorrowed { isbn: Isbn, student_id: StudentId },

    #[error("course {course_id} is full")]
    CourseFull { course_id: CourseId },

    #[error("no scores given for student {student_id}")]
    EmptyScores { student_id: StudentId },

    #[error("fee amounts for student {student_id} are out of range")]
    AmountOutOfRange { student_id: StudentId },
}

impl AdminError {
    pub fn already_exists(entity: Entity, key: impl Into<String>) -> Self {
        AdminError::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        AdminError::NotFound {
            entity,
            key: key.into(),
        }
    }
}
