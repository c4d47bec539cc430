//! School - owns one instance of each component
//!
//! The components never call each other. Anything that spans modules
//! (e.g. registering a student and opening their fee record) is sequenced
//! by the caller. Deleting a student does not touch the other four.

use tracing::info;

use crate::config::SchoolConfig;
use crate::fee_ledger::FeeLedger;
use crate::library::LibraryCatalog;
use crate::ranking::PerformanceRanking;
use crate::registry::StudentRegistry;
use crate::scheduler::CourseScheduler;

#[derive(Debug)]
pub struct School {
    pub registry: StudentRegistry,
    pub scheduler: CourseScheduler,
    pub fees: FeeLedger,
    pub library: LibraryCatalog,
    pub ranking: PerformanceRanking,
}

impl School {
    pub fn new(config: &SchoolConfig) -> Self {
        info!(courses = config.capacities.len(), "School components initialised");
        Self {
            registry: StudentRegistry::new(),
            scheduler: CourseScheduler::new(
                config
                    .capacities
                    .iter()
                    .map(|(course, &cap)| (course.clone(), cap)),
            ),
            fees: FeeLedger::new(),
            library: LibraryCatalog::new(),
            ranking: PerformanceRanking::new(),
        }
    }
}

impl Default for School {
    fn default() -> Self {
        Self::new(&SchoolConfig::default())
    }
}
