//! Command - text command set for the interactive menu
//!
//! One line of input parses into one [`Command`]. [`School::execute`]
//! maps each command onto exactly one component operation and wraps the
//! result in a [`CommandOutput`] for display. No business logic lives here.
//!
//! ```text
//! register S001 CS101 Alice Johnson      find S001
//! update S001 course=MATH201 name=Ali    delete S001        students
//! enroll S001 CS101                      process            allocations
//! fee-add S001 500 1000                  fee S001           fee-pay S001 750
//! fee-report
//! book-add ISBN001 2 Intro to Python     borrow ISBN001 S001
//! return ISBN001 S001                    available ISBN001
//! scores S001 85,90,78,92                top 3              rankings   latest
//! demo   help   quit
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core_types::{CourseId, Isbn, Score, StudentId};
use crate::error::{AdminError, AdminResult};
use crate::fee_ledger::FeeRecord;
use crate::library::Availability;
use crate::ranking::RankedStudent;
use crate::registry::{StudentRecord, StudentUpdate};
use crate::scheduler::{Allocations, EnrollmentOutcome};
use crate::school::School;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("{command}: missing <{arg}>")]
    MissingArgument { command: String, arg: &'static str },

    #[error("{command}: invalid <{arg}>: '{value}'")]
    InvalidValue {
        command: String,
        arg: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Register {
        id: StudentId,
        course_id: CourseId,
        name: String,
    },
    Find {
        id: StudentId,
    },
    Update {
        id: StudentId,
        update: StudentUpdate,
    },
    Delete {
        id: StudentId,
    },
    ListStudents,

    Enroll {
        student_id: StudentId,
        course_id: CourseId,
    },
    ProcessQueue,
    ShowAllocations,

    AddFee {
        student_id: StudentId,
        amount_paid: Decimal,
        total_fee: Decimal,
    },
    FindFee {
        student_id: StudentId,
    },
    UpdateFee {
        student_id: StudentId,
        amount_paid: Decimal,
    },
    FeeReport,

    AddBook {
        isbn: Isbn,
        copies: u32,
        title: String,
    },
    Borrow {
        isbn: Isbn,
        student_id: StudentId,
    },
    Return {
        isbn: Isbn,
        student_id: StudentId,
    },
    Availability {
        isbn: Isbn,
    },

    AddScores {
        student_id: StudentId,
        scores: Vec<Score>,
    },
    Top {
        k: usize,
    },
    Rankings,
    LatestRankings,

    Demo,
    Help,
    Quit,
}

/// Positional argument reader over one input line
struct Args<'a> {
    command: &'a str,
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn next(&mut self, arg: &'static str) -> Result<&'a str, ParseError> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            return Err(ParseError::MissingArgument {
                command: self.command.to_string(),
                arg,
            });
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        self.rest = tail;
        Ok(token)
    }

    fn string(&mut self, arg: &'static str) -> Result<String, ParseError> {
        self.next(arg).map(str::to_string)
    }

    fn parse<T: FromStr>(&mut self, arg: &'static str) -> Result<T, ParseError> {
        let token = self.next(arg)?;
        self.value(arg, token)
    }

    fn value<T: FromStr>(&self, arg: &'static str, token: &str) -> Result<T, ParseError> {
        token.parse().map_err(|_| ParseError::InvalidValue {
            command: self.command.to_string(),
            arg,
            value: token.to_string(),
        })
    }

    /// Everything left on the line, trimmed. Must be non-empty.
    fn remainder(&mut self, arg: &'static str) -> Result<String, ParseError> {
        let rest = self.rest.trim();
        self.rest = "";
        if rest.is_empty() {
            return Err(ParseError::MissingArgument {
                command: self.command.to_string(),
                arg,
            });
        }
        Ok(rest.to_string())
    }

    fn is_empty(&self) -> bool {
        self.rest.trim().is_empty()
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        if verb.is_empty() {
            return Err(ParseError::Empty);
        }

        let verb = verb.to_ascii_lowercase();
        let mut args = Args {
            command: &verb,
            rest,
        };

        let cmd = match verb.as_str() {
            "register" => Command::Register {
                id: args.string("id")?,
                course_id: args.string("course")?,
                name: args.remainder("name")?,
            },
            "find" => Command::Find {
                id: args.string("id")?,
            },
            "update" => {
                let id = args.string("id")?;
                let update = parse_update(&mut args)?;
                Command::Update { id, update }
            }
            "delete" => Command::Delete {
                id: args.string("id")?,
            },
            "students" => Command::ListStudents,

            "enroll" => Command::Enroll {
                student_id: args.string("student")?,
                course_id: args.string("course")?,
            },
            "process" => Command::ProcessQueue,
            "allocations" => Command::ShowAllocations,

            "fee-add" => Command::AddFee {
                student_id: args.string("student")?,
                amount_paid: args.parse("paid")?,
                total_fee: args.parse("total")?,
            },
            "fee" => Command::FindFee {
                student_id: args.string("student")?,
            },
            "fee-pay" => Command::UpdateFee {
                student_id: args.string("student")?,
                amount_paid: args.parse("paid")?,
            },
            "fee-report" => Command::FeeReport,

            "book-add" => Command::AddBook {
                isbn: args.string("isbn")?,
                copies: args.parse("copies")?,
                title: args.remainder("title")?,
            },
            "borrow" => Command::Borrow {
                isbn: args.string("isbn")?,
                student_id: args.string("student")?,
            },
            "return" => Command::Return {
                isbn: args.string("isbn")?,
                student_id: args.string("student")?,
            },
            "available" => Command::Availability {
                isbn: args.string("isbn")?,
            },

            "scores" => {
                let student_id = args.string("student")?;
                let raw = args.remainder("scores")?;
                let scores = raw
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(|s| args.value("scores", s))
                    .collect::<Result<Vec<Score>, _>>()?;
                Command::AddScores { student_id, scores }
            }
            "top" => {
                let k = if args.is_empty() { 1 } else { args.parse("k")? };
                Command::Top { k }
            }
            "rankings" => Command::Rankings,
            "latest" => Command::LatestRankings,

            "demo" => Command::Demo,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(ParseError::UnknownCommand(verb.clone())),
        };
        Ok(cmd)
    }
}

/// `[course=<id>] [name=<rest of line>]`
fn parse_update(args: &mut Args<'_>) -> Result<StudentUpdate, ParseError> {
    let mut update = StudentUpdate::default();
    while !args.is_empty() {
        let rest = args.rest.trim_start();
        if let Some(name) = rest.strip_prefix("name=") {
            let name = name.trim();
            if name.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: args.command.to_string(),
                    arg: "name",
                });
            }
            update.name = Some(name.to_string());
            args.rest = "";
        } else {
            let token = args.next("field")?;
            match token.strip_prefix("course=") {
                Some(course) if !course.is_empty() => update.course_id = Some(course.to_string()),
                _ => {
                    return Err(ParseError::InvalidValue {
                        command: args.command.to_string(),
                        arg: "field",
                        value: token.to_string(),
                    });
                }
            }
        }
    }
    Ok(update)
}

// ============================================================
// OUTPUT
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Message(String),
    Student(StudentRecord),
    Students(Vec<StudentRecord>),
    Enrollment(Vec<EnrollmentOutcome>),
    Allocations(Allocations),
    Fee(FeeRecord),
    FeeReport(Vec<FeeRecord>),
    Availability {
        isbn: Isbn,
        title: String,
        availability: Availability,
    },
    Average {
        student_id: StudentId,
        average: Score,
    },
    Rankings {
        title: String,
        rows: Vec<RankedStudent>,
    },
    Demo(Vec<DemoStep>),
    Help,
    Quit,
}

/// Failure of one line run end to end: parse, then execute
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Admin(#[from] AdminError),
}

/// One executed line of the demonstration script
#[derive(Debug, Clone, PartialEq)]
pub struct DemoStep {
    pub line: &'static str,
    pub result: Result<CommandOutput, StepError>,
}

impl School {
    /// Run one command against the matching component
    pub fn execute(&mut self, command: Command) -> AdminResult<CommandOutput> {
        use CommandOutput as Out;

        let out = match command {
            Command::Register {
                id,
                course_id,
                name,
            } => {
                let msg = format!("Student {} (ID: {}) registered", name, id);
                self.registry.register(id, name, course_id)?;
                Out::Message(msg)
            }
            Command::Find { id } => Out::Student(self.registry.find(&id)?.clone()),
            Command::Update { id, update } => {
                self.registry.update(&id, update)?;
                Out::Message(format!("Student {} updated", id))
            }
            Command::Delete { id } => {
                self.registry.delete(&id)?;
                Out::Message(format!("Student {} deleted", id))
            }
            Command::ListStudents => {
                Out::Students(self.registry.list_all().into_iter().cloned().collect())
            }

            Command::Enroll {
                student_id,
                course_id,
            } => {
                let msg = format!(
                    "Registration request queued: Student {} for {}",
                    student_id, course_id
                );
                self.scheduler.submit_request(student_id, course_id);
                Out::Message(msg)
            }
            Command::ProcessQueue => Out::Enrollment(self.scheduler.process_all()),
            Command::ShowAllocations => Out::Allocations(self.scheduler.get_allocations().clone()),

            Command::AddFee {
                student_id,
                amount_paid,
                total_fee,
            } => {
                let msg = format!("Payment record added for student {}", student_id);
                self.fees.add_record(student_id, amount_paid, total_fee)?;
                Out::Message(msg)
            }
            Command::FindFee { student_id } => Out::Fee(self.fees.find(&student_id)?),
            Command::UpdateFee {
                student_id,
                amount_paid,
            } => {
                self.fees.update_amount(&student_id, amount_paid)?;
                Out::Fee(self.fees.find(&student_id)?)
            }
            Command::FeeReport => Out::FeeReport(self.fees.generate_report()),

            Command::AddBook {
                isbn,
                copies,
                title,
            } => {
                let msg = format!("Book '{}' (ISBN: {}) added with {} copies", title, isbn, copies);
                self.library.add_book(isbn, title, copies);
                Out::Message(msg)
            }
            Command::Borrow { isbn, student_id } => {
                self.library.borrow(&isbn, student_id.clone())?;
                let title = &self.library.get(&isbn)?.title;
                Out::Message(format!("Student {} borrowed '{}'", student_id, title))
            }
            Command::Return { isbn, student_id } => {
                self.library.return_book(&isbn, &student_id)?;
                let title = &self.library.get(&isbn)?.title;
                Out::Message(format!("Student {} returned '{}'", student_id, title))
            }
            Command::Availability { isbn } => {
                let availability = self.library.check_availability(&isbn)?;
                let title = self.library.get(&isbn)?.title.clone();
                Out::Availability {
                    isbn,
                    title,
                    availability,
                }
            }

            Command::AddScores { student_id, scores } => {
                let average = self.ranking.add_record(student_id.clone(), scores)?;
                Out::Average {
                    student_id,
                    average,
                }
            }
            Command::Top { k } => Out::Rankings {
                title: format!("TOP {} PERFORMER(S)", k),
                rows: self.ranking.top_k(k),
            },
            Command::Rankings => Out::Rankings {
                title: "ALL RANKINGS (Highest to Lowest)".to_string(),
                rows: self.ranking.rankings(),
            },
            Command::LatestRankings => Out::Rankings {
                title: "CURRENT RANKINGS (one row per student)".to_string(),
                rows: self.ranking.latest_rankings(),
            },

            Command::Demo => Out::Demo(crate::demo::run(self)),
            Command::Help => Out::Help,
            Command::Quit => Out::Quit,
        };
        Ok(out)
    }
}

fn fmt_scores(f: &mut fmt::Formatter<'_>, scores: &[Score]) -> fmt::Result {
    f.write_str("[")?;
    for (i, score) in scores.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", score)?;
    }
    f.write_str("]")
}

fn fmt_fee(f: &mut fmt::Formatter<'_>, r: &FeeRecord) -> fmt::Result {
    write!(
        f,
        "ID: {}, Paid: ${}, Total: ${}, Balance: ${}, Status: {:?}",
        r.student_id, r.amount_paid, r.total_fee, r.balance, r.status
    )
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Message(msg) => f.write_str(msg),
            CommandOutput::Student(s) => {
                write!(f, "ID: {}, Name: {}, Course: {}", s.id, s.name, s.course_id)
            }
            CommandOutput::Students(list) => {
                if list.is_empty() {
                    return f.write_str("No students registered.");
                }
                f.write_str("=== ALL STUDENTS ===")?;
                for s in list {
                    write!(f, "\nID: {}, Name: {}, Course: {}", s.id, s.name, s.course_id)?;
                }
                Ok(())
            }
            CommandOutput::Enrollment(outcomes) => {
                if outcomes.is_empty() {
                    return f.write_str("No pending registration requests.");
                }
                f.write_str("=== PROCESSING REGISTRATION QUEUE ===")?;
                for outcome in outcomes {
                    match outcome {
                        EnrollmentOutcome::Accepted(req) => write!(
                            f,
                            "\n+ Student {} enrolled in {}",
                            req.student_id, req.course_id
                        )?,
                        EnrollmentOutcome::Rejected(req, err) => {
                            write!(f, "\n- Student {}: {}", req.student_id, err)?
                        }
                    }
                }
                Ok(())
            }
            CommandOutput::Allocations(alloc) => {
                if alloc.is_empty() {
                    return f.write_str("No course allocations yet.");
                }
                f.write_str("=== COURSE ALLOCATIONS ===")?;
                for (course, students) in alloc {
                    write!(f, "\n{}: {}", course, students.join(", "))?;
                }
                Ok(())
            }
            CommandOutput::Fee(record) => fmt_fee(f, record),
            CommandOutput::FeeReport(report) => {
                if report.is_empty() {
                    return f.write_str("No payment records available.");
                }
                f.write_str("=== FEE CLEARANCE REPORT ===")?;
                for record in report {
                    f.write_str("\n")?;
                    fmt_fee(f, record)?;
                }
                Ok(())
            }
            CommandOutput::Availability {
                isbn,
                title,
                availability,
            } => write!(
                f,
                "Book '{}' ({}): {} copies available out of {} total.",
                title, isbn, availability.available, availability.total
            ),
            CommandOutput::Average {
                student_id,
                average,
            } => write!(
                f,
                "Performance record added for student {} with average {:.2}",
                student_id, average
            ),
            CommandOutput::Rankings { title, rows } => {
                if rows.is_empty() {
                    return f.write_str("No performance records available.");
                }
                write!(f, "=== {} ===", title)?;
                for (i, row) in rows.iter().enumerate() {
                    write!(
                        f,
                        "\n{}. Student {}: Average = {:.2}, Scores = ",
                        i + 1,
                        row.student_id,
                        row.average
                    )?;
                    fmt_scores(f, &row.scores)?;
                }
                Ok(())
            }
            CommandOutput::Demo(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    writeln!(f, "> {}", step.line)?;
                    match &step.result {
                        Ok(out) => write!(f, "{}", out)?,
                        Err(err) => write!(f, "Error: {}", err)?,
                    }
                }
                Ok(())
            }
            CommandOutput::Help => f.write_str(HELP),
            CommandOutput::Quit => f.write_str("Goodbye."),
        }
    }
}

const HELP: &str = "\
Students:    register <id> <course> <name>   find <id>   delete <id>   students
             update <id> [course=<course>] [name=<name>]
Courses:     enroll <student> <course>   process   allocations
Fees:        fee-add <student> <paid> <total>   fee <student>
             fee-pay <student> <paid>   fee-report
Library:     book-add <isbn> <copies> <title>   borrow <isbn> <student>
             return <isbn> <student>   available <isbn>
Performance: scores <student> <s1,s2,...>   top [k]   rankings   latest
Other:       demo   help   quit";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AdminError, Entity};

    #[test]
    fn test_parse_register_takes_rest_as_name() {
        let cmd = Command::parse("register S001 CS101 Alice  Johnson ").unwrap();
        assert_eq!(
            cmd,
            Command::Register {
                id: "S001".into(),
                course_id: "CS101".into(),
                name: "Alice  Johnson".into(),
            }
        );
    }

    #[test]
    fn test_parse_update_fields() {
        let cmd = Command::parse("update S001 course=MATH201 name=Bob Smith").unwrap();
        assert_eq!(
            cmd,
            Command::Update {
                id: "S001".into(),
                update: StudentUpdate {
                    name: Some("Bob Smith".into()),
                    course_id: Some("MATH201".into()),
                },
            }
        );

        assert!(matches!(
            Command::parse("update S001 year=2"),
            Err(ParseError::InvalidValue { arg: "field", .. })
        ));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(
            Command::parse("fee-add S001 500.25 1000").unwrap(),
            Command::AddFee {
                student_id: "S001".into(),
                amount_paid: Decimal::new(50025, 2),
                total_fee: Decimal::from(1000),
            }
        );
        assert_eq!(
            Command::parse("scores S001 85, 90 78").unwrap(),
            Command::AddScores {
                student_id: "S001".into(),
                scores: vec![85.0, 90.0, 78.0],
            }
        );
        assert_eq!(Command::parse("top").unwrap(), Command::Top { k: 1 });
        assert_eq!(Command::parse("TOP 3").unwrap(), Command::Top { k: 3 });
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            Command::parse("fly S001"),
            Err(ParseError::UnknownCommand("fly".into()))
        );
        assert_eq!(
            Command::parse("borrow ISBN001"),
            Err(ParseError::MissingArgument {
                command: "borrow".into(),
                arg: "student"
            })
        );
        assert_eq!(
            Command::parse("book-add ISBN001 two Title"),
            Err(ParseError::InvalidValue {
                command: "book-add".into(),
                arg: "copies",
                value: "two".into()
            })
        );
        assert!(Command::parse("scores S001").is_err());
    }

    #[test]
    fn test_execute_round_trip() {
        let mut school = School::default();
        let mut run = |line: &str| school.execute(Command::parse(line).unwrap());

        run("register S001 CS101 Alice Johnson").unwrap();
        assert_eq!(
            run("register S001 CS101 Someone").unwrap_err(),
            AdminError::already_exists(Entity::Student, "S001")
        );
        let out = run("find S001").unwrap();
        assert_eq!(out.to_string(), "ID: S001, Name: Alice Johnson, Course: CS101");

        run("book-add B1 1 T").unwrap();
        assert_eq!(
            run("borrow B1 X").unwrap().to_string(),
            "Student X borrowed 'T'"
        );
        assert_eq!(
            run("borrow B1 Y").unwrap_err(),
            AdminError::Unavailable { isbn: "B1".into() }
        );

        run("fee-add S1 500 1000").unwrap();
        let out = run("fee-pay S1 1000").unwrap();
        assert_eq!(
            out.to_string(),
            "ID: S1, Paid: $1000, Total: $1000, Balance: $0, Status: Cleared"
        );
    }

    #[test]
    fn test_extreme_fee_amounts_are_errors() {
        let mut school = School::default();
        let mut run = |line: &str| school.execute(Command::parse(line).unwrap());
        let out_of_range = AdminError::AmountOutOfRange {
            student_id: "S1".into(),
        };

        assert_eq!(
            run("fee-add S1 -79228162514264337593543950335 79228162514264337593543950335")
                .unwrap_err(),
            out_of_range
        );
        run("fee-add S1 0 79228162514264337593543950335").unwrap();
        assert_eq!(run("fee-pay S1 -1").unwrap_err(), out_of_range);
        assert_eq!(
            run("fee S1").unwrap().to_string(),
            "ID: S1, Paid: $0, Total: $79228162514264337593543950335, \
             Balance: $79228162514264337593543950335, Status: Pending"
        );
    }

    #[test]
    fn test_render_rankings_and_empty_states() {
        let mut school = School::default();
        assert_eq!(
            school.execute(Command::Rankings).unwrap().to_string(),
            "No performance records available."
        );
        assert_eq!(
            school.execute(Command::ProcessQueue).unwrap().to_string(),
            "No pending registration requests."
        );

        school
            .execute(Command::parse("scores A 90,80").unwrap())
            .unwrap();
        let out = school.execute(Command::Top { k: 1 }).unwrap().to_string();
        assert_eq!(
            out,
            "=== TOP 1 PERFORMER(S) ===\n1. Student A: Average = 85.00, Scores = [90, 80]"
        );
    }
}
