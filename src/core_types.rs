//! Core types used throughout the system
//!
//! Every component keys its container by one of these identifiers.
//! They are plain strings: the school issues them, we never parse them.

/// Student ID - unique key in the registry, the fee ledger and the ranking.
///
/// # Ordering:
/// The fee ledger orders records by byte-wise string comparison,
/// so "S010" sorts before "S2".
pub type StudentId = String;

/// Course ID - key of the capacity table and the allocation table
pub type CourseId = String;

/// ISBN - key of the library catalog
pub type Isbn = String;

/// A single assessment score
pub type Score = f64;
