//! Scripted walkthrough of all five components
//!
//! Runs through the same command path as interactive input, so the demo
//! doubles as an end-to-end smoke test of the parser and dispatcher.

use tracing::{error, info};

use crate::command::{Command, CommandOutput, DemoStep, StepError};
use crate::school::School;

pub const DEMO_SCRIPT: &[&str] = &[
    // Student records
    "register S001 CS101 Alice Johnson",
    "register S002 MATH201 Bob Smith",
    "register S003 PHY301 Carol Davis",
    "students",
    "find S002",
    // Course registration: the third CS101 request does not fit
    "enroll S001 CS101",
    "enroll S002 CS101",
    "enroll S003 CS101",
    "enroll S001 MATH201",
    "process",
    "allocations",
    // Fees
    "fee-add S001 500 1000",
    "fee-add S002 1200 1200",
    "fee-add S003 300 1500",
    "fee S002",
    "fee-report",
    // Library: the third borrow finds no copy left
    "book-add ISBN001 2 Introduction to Python",
    "book-add ISBN002 1 Advanced Algorithms",
    "borrow ISBN001 S001",
    "borrow ISBN001 S002",
    "borrow ISBN001 S003",
    "available ISBN001",
    // Performance
    "scores S001 85,90,78,92",
    "scores S002 95,88,92,96",
    "scores S003 75,82,79,88",
    "top 1",
    "rankings",
];

/// Execute [`DEMO_SCRIPT`] against `school`, one step per line
pub fn run(school: &mut School) -> Vec<DemoStep> {
    info!(steps = DEMO_SCRIPT.len(), "Running demo sequence");
    DEMO_SCRIPT
        .iter()
        .map(|&line| DemoStep {
            line,
            result: run_line(school, line),
        })
        .collect()
}

fn run_line(school: &mut School, line: &str) -> Result<CommandOutput, StepError> {
    let command = Command::parse(line).inspect_err(|err| {
        error!(line, %err, "Demo script line failed to parse");
    })?;
    Ok(school.execute(command)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ParseError;
    use crate::error::AdminError;

    #[test]
    fn test_every_script_line_parses() {
        for line in DEMO_SCRIPT {
            assert!(Command::parse(line).is_ok(), "bad demo line: {}", line);
        }
    }

    #[test]
    fn test_demo_outcomes() {
        let mut school = School::default();
        let steps = run(&mut school);
        assert_eq!(steps.len(), DEMO_SCRIPT.len());

        let failures: Vec<&DemoStep> = steps.iter().filter(|s| s.result.is_err()).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].line, "borrow ISBN001 S003");
        assert_eq!(
            failures[0].result,
            Err(StepError::Admin(AdminError::Unavailable {
                isbn: "ISBN001".into()
            }))
        );

        assert_eq!(
            school.scheduler.get_allocations()["CS101"],
            vec!["S001", "S002"]
        );
        assert_eq!(school.fees.len(), 3);
        assert_eq!(school.ranking.top_k(1)[0].student_id, "S002");
    }

    #[test]
    fn test_unparseable_line_is_a_failed_step() {
        let mut school = School::default();
        let result = run_line(&mut school, "enrol S001 CS101");
        assert_eq!(
            result,
            Err(StepError::Parse(ParseError::UnknownCommand("enrol".into())))
        );
        assert_eq!(school.scheduler.pending(), 0);

        let result = run_line(&mut school, "fee-add S001 lots 1000");
        assert!(matches!(
            result,
            Err(StepError::Parse(ParseError::InvalidValue { arg: "paid", .. }))
        ));
        assert!(school.fees.is_empty());
    }
}
