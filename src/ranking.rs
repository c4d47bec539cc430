//! Performance Ranking - max-heap over average score
//!
//! The detail map is the source of truth. The heap is a derived index that
//! is only ever pushed to: re-adding a student overwrites the detail record
//! but leaves the earlier heap entry in place. Readers resolve every heap
//! entry through the detail map.
//!
//! Ties on average pop in ascending student ID order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::core_types::{Score, StudentId};
use crate::error::{AdminError, AdminResult};

/// Authoritative per-student record
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub student_id: StudentId,
    pub scores: Vec<Score>,
    pub average: Score,
}

/// One row of a ranking, resolved through the detail map
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStudent {
    pub student_id: StudentId,
    pub average: Score,
    pub scores: Vec<Score>,
}

#[derive(Debug, Clone)]
struct RankEntry {
    average: Score,
    student_id: StudentId,
}

impl Ord for RankEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.average
            .total_cmp(&other.average)
            .then_with(|| other.student_id.cmp(&self.student_id))
    }
}

impl PartialOrd for RankEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankEntry {}

#[derive(Debug, Default)]
pub struct PerformanceRanking {
    heap: BinaryHeap<RankEntry>,
    details: FxHashMap<StudentId, PerformanceRecord>,
}

impl PerformanceRanking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a student's scores and return their average.
    ///
    /// # Errors
    /// `EmptyScores` when `scores` is empty (the mean is undefined).
    pub fn add_record(
        &mut self,
        student_id: impl Into<StudentId>,
        scores: Vec<Score>,
    ) -> AdminResult<Score> {
        let student_id = student_id.into();
        if scores.is_empty() {
            warn!(student_id = %student_id, "Performance record rejected: no scores");
            return Err(AdminError::EmptyScores { student_id });
        }

        let average = scores.iter().sum::<Score>() / scores.len() as Score;
        if self.details.contains_key(&student_id) {
            debug!(student_id = %student_id, "Overwriting performance record");
        }

        self.heap.push(RankEntry {
            average,
            student_id: student_id.clone(),
        });
        self.details.insert(
            student_id.clone(),
            PerformanceRecord {
                student_id: student_id.clone(),
                scores,
                average,
            },
        );
        info!(student_id = %student_id, average, "Performance record added");
        Ok(average)
    }

    /// The `k` best heap entries, highest average first.
    ///
    /// Non-destructive: drains a clone of the heap. A student re-added
    /// after their first record may appear more than once.
    pub fn top_k(&self, k: usize) -> Vec<RankedStudent> {
        let mut heap = self.heap.clone();
        let mut ranked = Vec::with_capacity(k.min(heap.len()));
        while ranked.len() < k {
            let Some(entry) = heap.pop() else { break };
            if let Some(row) = self.resolve(&entry) {
                ranked.push(row);
            }
        }
        ranked
    }

    /// Every heap entry, highest average first
    pub fn rankings(&self) -> Vec<RankedStudent> {
        self.top_k(self.heap.len())
    }

    /// One row per student, ranked by their current record.
    ///
    /// Heap entries that no longer match the detail map are skipped.
    pub fn latest_rankings(&self) -> Vec<RankedStudent> {
        let mut heap = self.heap.clone();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut ranked = Vec::with_capacity(self.details.len());

        while let Some(entry) = heap.pop() {
            let Some(record) = self.details.get(&entry.student_id) else {
                continue;
            };
            if record.average.total_cmp(&entry.average) != Ordering::Equal {
                continue; // stale
            }
            if seen.insert(record.student_id.as_str()) {
                ranked.push(RankedStudent {
                    student_id: record.student_id.clone(),
                    average: record.average,
                    scores: record.scores.clone(),
                });
            }
        }
        ranked
    }

    pub fn get(&self, student_id: &str) -> Option<&PerformanceRecord> {
        self.details.get(student_id)
    }

    /// Number of heap entries, duplicates included
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn resolve(&self, entry: &RankEntry) -> Option<RankedStudent> {
        let record = self.details.get(&entry.student_id)?;
        Some(RankedStudent {
            student_id: record.student_id.clone(),
            average: record.average,
            scores: record.scores.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rows: &[RankedStudent]) -> Vec<&str> {
        rows.iter().map(|r| r.student_id.as_str()).collect()
    }

    #[test]
    fn test_top_k_descending() {
        let mut r = PerformanceRanking::new();
        assert_eq!(r.add_record("A", vec![90.0, 80.0]).unwrap(), 85.0);
        assert_eq!(r.add_record("B", vec![100.0, 100.0]).unwrap(), 100.0);
        assert_eq!(r.add_record("C", vec![10.0, 10.0]).unwrap(), 10.0);

        let top = r.top_k(2);
        assert_eq!(ids(&top), vec!["B", "A"]);
        assert_eq!(top[0].average, 100.0);
        assert_eq!(top[1].average, 85.0);
        assert_eq!(top[1].scores, vec![90.0, 80.0]);

        assert_eq!(r.rankings().len(), 3);
        assert_eq!(r.top_k(10).len(), 3);
        assert!(r.top_k(0).is_empty());
    }

    #[test]
    fn test_top_k_is_non_destructive() {
        let mut r = PerformanceRanking::new();
        r.add_record("S001", vec![85.0, 90.0, 78.0, 92.0]).unwrap();
        r.add_record("S002", vec![95.0, 88.0, 92.0, 96.0]).unwrap();

        assert_eq!(ids(&r.top_k(1)), vec!["S002"]);
        assert_eq!(ids(&r.top_k(1)), vec!["S002"]);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_ties_break_by_student_id() {
        let mut r = PerformanceRanking::new();
        r.add_record("S3", vec![70.0]).unwrap();
        r.add_record("S1", vec![70.0]).unwrap();
        r.add_record("S2", vec![70.0]).unwrap();
        assert_eq!(ids(&r.rankings()), vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_re_add_keeps_stale_heap_entry() {
        let mut r = PerformanceRanking::new();
        r.add_record("A", vec![90.0]).unwrap();
        r.add_record("B", vec![80.0]).unwrap();
        r.add_record("A", vec![50.0]).unwrap();

        // heap holds A@90 (stale), B@80, A@50
        let all = r.rankings();
        assert_eq!(all.len(), 3);
        assert_eq!(ids(&all), vec!["A", "B", "A"]);
        // rows resolve through the detail map
        assert!(all.iter().filter(|row| row.student_id == "A").all(|row| row.average == 50.0));

        let latest = r.latest_rankings();
        assert_eq!(ids(&latest), vec!["B", "A"]);
        assert_eq!(latest[1].average, 50.0);
        assert_eq!(r.get("A").unwrap().scores, vec![50.0]);
    }

    #[test]
    fn test_empty_scores_rejected() {
        let mut r = PerformanceRanking::new();
        assert_eq!(
            r.add_record("S1", Vec::new()).unwrap_err(),
            AdminError::EmptyScores {
                student_id: "S1".into()
            }
        );
        assert!(r.is_empty());
        assert!(r.get("S1").is_none());
    }
}
