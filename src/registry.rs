//! Student Registry - hash-map keyed student profiles
//!
//! Lookups, updates and deletes are O(1) average. Listing returns
//! records in the order they were registered.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::core_types::{CourseId, StudentId};
use crate::error::{AdminError, AdminResult, Entity};

/// A registered student's profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub course_id: CourseId,
}

/// Fields to merge into an existing record. `None` keeps the prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub course_id: Option<CourseId>,
}

#[derive(Debug, Default)]
pub struct StudentRegistry {
    /// StudentId -> (registration sequence, record)
    students: FxHashMap<StudentId, (u64, StudentRecord)>,
    next_seq: u64,
}

impl StudentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new student. Never overwrites an existing id.
    pub fn register(
        &mut self,
        id: impl Into<StudentId>,
        name: impl Into<String>,
        course_id: impl Into<CourseId>,
    ) -> AdminResult<()> {
        let id = id.into();
        if self.students.contains_key(&id) {
            warn!(student_id = %id, "Registration rejected: id already exists");
            return Err(AdminError::already_exists(Entity::Student, id));
        }

        let record = StudentRecord {
            id: id.clone(),
            name: name.into(),
            course_id: course_id.into(),
        };
        info!(student_id = %id, name = %record.name, course_id = %record.course_id, "Student registered");

        let seq = self.next_seq;
        self.next_seq += 1;
        self.students.insert(id, (seq, record));
        Ok(())
    }

    pub fn find(&self, id: &str) -> AdminResult<&StudentRecord> {
        debug!(student_id = id, "Registry lookup");
        self.students
            .get(id)
            .map(|(_, record)| record)
            .ok_or_else(|| AdminError::not_found(Entity::Student, id))
    }

    /// Merge `update` into the record in place.
    pub fn update(&mut self, id: &str, update: StudentUpdate) -> AdminResult<()> {
        let Some((_, record)) = self.students.get_mut(id) else {
            warn!(student_id = id, "Update rejected: student not found");
            return Err(AdminError::not_found(Entity::Student, id));
        };

        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(course_id) = update.course_id {
            record.course_id = course_id;
        }
        info!(student_id = id, "Student updated");
        Ok(())
    }

    /// Remove the student entirely. Fee, library and ranking records
    /// for the same id are left untouched.
    pub fn delete(&mut self, id: &str) -> AdminResult<StudentRecord> {
        match self.students.remove(id) {
            Some((_, record)) => {
                info!(student_id = id, "Student deleted");
                Ok(record)
            }
            None => {
                warn!(student_id = id, "Delete rejected: student not found");
                Err(AdminError::not_found(Entity::Student, id))
            }
        }
    }

    /// All records in registration order
    pub fn list_all(&self) -> Vec<&StudentRecord> {
        let mut entries: Vec<&(u64, StudentRecord)> = self.students.values().collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, record)| record).collect()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.students.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
