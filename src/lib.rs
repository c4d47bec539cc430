//! School Admin - in-memory administrative toolkit for a school
//!
//! Five independent components, each owning one container:
//!
//! # Modules
//!
//! - [`registry`] - Student records in a hash map
//! - [`scheduler`] - FIFO enrollment queue with per-course capacity
//! - [`fee_ledger`] - Payment records in an (unbalanced) binary search tree
//! - [`library`] - Book inventory and borrower lists
//! - [`ranking`] - Max-heap ranking of average scores
//! - [`school`] - Owns one of each component
//! - [`command`] - Text command parser and dispatcher
//! - [`demo`] - Scripted walkthrough
//! - [`config`] / [`logging`] - Ambient setup for the binary

// Core types - must be first!
pub mod core_types;
pub mod error;

// Components
pub mod fee_ledger;
pub mod library;
pub mod ranking;
pub mod registry;
pub mod scheduler;

// Orchestration
pub mod command;
pub mod config;
pub mod demo;
pub mod logging;
pub mod school;

// Convenient re-exports at crate root
pub use command::{Command, CommandOutput, DemoStep, ParseError, StepError};
pub use config::{AppConfig, SchoolConfig};
pub use core_types::{CourseId, Isbn, Score, StudentId};
pub use error::{AdminError, AdminResult, Entity};
pub use fee_ledger::{FeeLedger, FeeRecord, FeeStatus};
pub use library::{Availability, BookRecord, LibraryCatalog};
pub use ranking::{PerformanceRanking, PerformanceRecord, RankedStudent};
pub use registry::{StudentRecord, StudentRegistry, StudentUpdate};
pub use scheduler::{Allocations, CourseScheduler, EnrollmentOutcome, EnrollmentRequest};
pub use school::School;
