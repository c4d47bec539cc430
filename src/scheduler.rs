//! Course Scheduler - FIFO enrollment queue with per-course capacity
//!
//! Requests are accepted without validation at submit time and judged only
//! when the queue is drained. Arrival order alone decides who gets the last
//! seat in a course: there is no waitlist and no priority.

use std::collections::{BTreeMap, VecDeque};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::core_types::{CourseId, StudentId};
use crate::error::{AdminError, Entity};

/// A queued enrollment request. Lives only between submit and drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

/// What happened to one request during [`CourseScheduler::process_all`]
#[derive(Debug, Clone, PartialEq)]
pub enum EnrollmentOutcome {
    Accepted(EnrollmentRequest),
    /// `NotFound { entity: Course, .. }` or `CourseFull`
    Rejected(EnrollmentRequest, AdminError),
}

impl EnrollmentOutcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, EnrollmentOutcome::Accepted(_))
    }
}

/// Course allocation table: course -> enrolled students in acceptance order
pub type Allocations = BTreeMap<CourseId, Vec<StudentId>>;

#[derive(Debug)]
pub struct CourseScheduler {
    /// Known courses and their seat limits
    capacities: FxHashMap<CourseId, usize>,
    queue: VecDeque<EnrollmentRequest>,
    allocations: Allocations,
}

impl CourseScheduler {
    pub fn new<I, C>(capacities: I) -> Self
    where
        I: IntoIterator<Item = (C, usize)>,
        C: Into<CourseId>,
    {
        Self {
            capacities: capacities
                .into_iter()
                .map(|(course, cap)| (course.into(), cap))
                .collect(),
            queue: VecDeque::new(),
            allocations: Allocations::new(),
        }
    }

    /// Append a request to the tail of the queue. Unknown courses are
    /// accepted here and rejected at processing time.
    pub fn submit_request(
        &mut self,
        student_id: impl Into<StudentId>,
        course_id: impl Into<CourseId>,
    ) {
        let request = EnrollmentRequest {
            student_id: student_id.into(),
            course_id: course_id.into(),
        };
        info!(
            student_id = %request.student_id,
            course_id = %request.course_id,
            queued = self.queue.len() + 1,
            "Enrollment request queued"
        );
        self.queue.push_back(request);
    }

    /// Drain the whole queue head to tail.
    ///
    /// Every dequeued request is consumed whether it is accepted or
    /// rejected. Draining an empty queue is a no-op.
    pub fn process_all(&mut self) -> Vec<EnrollmentOutcome> {
        if self.queue.is_empty() {
            debug!("No pending enrollment requests");
            return Vec::new();
        }

        let mut outcomes = Vec::with_capacity(self.queue.len());
        while let Some(request) = self.queue.pop_front() {
            outcomes.push(self.process_one(request));
        }
        outcomes
    }

    fn process_one(&mut self, request: EnrollmentRequest) -> EnrollmentOutcome {
        let Some(&capacity) = self.capacities.get(&request.course_id) else {
            warn!(
                student_id = %request.student_id,
                course_id = %request.course_id,
                "Enrollment rejected: unknown course"
            );
            let err = AdminError::not_found(Entity::Course, request.course_id.clone());
            return EnrollmentOutcome::Rejected(request, err);
        };

        let enrolled = self
            .allocations
            .entry(request.course_id.clone())
            .or_default();

        if enrolled.len() < capacity {
            enrolled.push(request.student_id.clone());
            info!(
                student_id = %request.student_id,
                course_id = %request.course_id,
                seats_left = capacity - enrolled.len(),
                "Enrollment accepted"
            );
            EnrollmentOutcome::Accepted(request)
        } else {
            warn!(
                student_id = %request.student_id,
                course_id = %request.course_id,
                capacity,
                "Enrollment rejected: course full"
            );
            let err = AdminError::CourseFull {
                course_id: request.course_id.clone(),
            };
            EnrollmentOutcome::Rejected(request, err)
        }
    }

    /// Current allocations, sorted by course id
    #[inline]
    pub fn get_allocations(&self) -> &Allocations {
        &self.allocations
    }

    /// Number of requests waiting to be processed
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn capacity(&self, course_id: &str) -> Option<usize> {
        self.capacities.get(course_id).copied()
    }
}
