//! End-to-end checks of the component contracts through the public API.

use rust_decimal::Decimal;
use school_admin::{
    AdminError, Entity, EnrollmentOutcome, FeeStatus, School, SchoolConfig, StudentUpdate,
};

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

#[test]
fn registry_rejects_second_registration_unchanged() {
    let mut school = School::default();
    school.registry.register("S001", "Alice", "CS101").unwrap();

    let err = school
        .registry
        .register("S001", "Eve", "MATH201")
        .unwrap_err();
    assert_eq!(err, AdminError::already_exists(Entity::Student, "S001"));

    let record = school.registry.find("S001").unwrap();
    assert_eq!(record.name, "Alice");
    assert_eq!(record.course_id, "CS101");
    assert_eq!(school.registry.len(), 1);
}

#[test]
fn registry_update_then_delete() {
    let mut school = School::default();
    school.registry.register("S001", "Alice", "CS101").unwrap();
    school
        .registry
        .update(
            "S001",
            StudentUpdate {
                name: Some("Alice J.".into()),
                course_id: None,
            },
        )
        .unwrap();
    assert_eq!(school.registry.find("S001").unwrap().course_id, "CS101");

    school.registry.delete("S001").unwrap();
    assert_eq!(
        school.registry.find("S001").unwrap_err(),
        AdminError::not_found(Entity::Student, "S001")
    );
}

#[test]
fn scheduler_accepts_exactly_capacity_in_arrival_order() {
    let mut config = SchoolConfig::default();
    config.capacities.insert("LAB".into(), 3);
    let mut school = School::new(&config);

    for i in 0..7 {
        school.scheduler.submit_request(format!("S{}", i), "LAB");
    }
    let outcomes = school.scheduler.process_all();

    let accepted: Vec<&str> = outcomes
        .iter()
        .filter_map(|o| match o {
            EnrollmentOutcome::Accepted(req) => Some(req.student_id.as_str()),
            EnrollmentOutcome::Rejected(..) => None,
        })
        .collect();
    assert_eq!(accepted, vec!["S0", "S1", "S2"]);
    assert_eq!(outcomes.iter().filter(|o| !o.is_accepted()).count(), 4);
    assert_eq!(school.scheduler.get_allocations()["LAB"].len(), 3);
}

#[test]
fn scheduler_empty_queue_twice() {
    let mut school = School::default();
    school.scheduler.submit_request("S001", "CS101");
    school.scheduler.process_all();
    let before = school.scheduler.get_allocations().clone();

    assert!(school.scheduler.process_all().is_empty());
    assert!(school.scheduler.process_all().is_empty());
    assert_eq!(school.scheduler.get_allocations(), &before);
}

#[test]
fn fee_report_sorted_and_status_derived() {
    let mut school = School::default();
    school.fees.add_record("S003", d(300), d(1500)).unwrap();
    school.fees.add_record("S001", d(500), d(1000)).unwrap();
    school.fees.add_record("S002", d(1200), d(1200)).unwrap();

    let report = school.fees.generate_report();
    let ids: Vec<&str> = report.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(ids, vec!["S001", "S002", "S003"]);
    assert_eq!(report[1].status, FeeStatus::Cleared);
    assert_eq!(report[2].balance, d(1200));

    school.fees.update_amount("S001", d(1000)).unwrap();
    let record = school.fees.find("S001").unwrap();
    assert_eq!(record.balance, Decimal::ZERO);
    assert_eq!(record.status, FeeStatus::Cleared);
}

#[test]
fn library_borrow_return_round_trip() {
    let mut school = School::default();
    school.library.add_book("B1", "T", 1);

    school.library.borrow("B1", "X").unwrap();
    assert_eq!(school.library.check_availability("B1").unwrap().available, 0);
    assert!(matches!(
        school.library.borrow("B1", "Y"),
        Err(AdminError::Unavailable { .. })
    ));
    school.library.return_book("B1", "X").unwrap();
    assert_eq!(school.library.check_availability("B1").unwrap().available, 1);
    assert!(matches!(
        school.library.return_book("B1", "Z"),
        Err(AdminError::NotBorrowed { .. })
    ));
}

#[test]
fn ranking_top_k_order() {
    let mut school = School::default();
    school.ranking.add_record("A", vec![90.0, 80.0]).unwrap();
    school.ranking.add_record("B", vec![100.0, 100.0]).unwrap();
    school.ranking.add_record("C", vec![10.0, 10.0]).unwrap();

    let top = school.ranking.top_k(2);
    assert_eq!(top.len(), 2);
    assert_eq!((top[0].student_id.as_str(), top[0].average), ("B", 100.0));
    assert_eq!((top[1].student_id.as_str(), top[1].average), ("A", 85.0));
    assert_eq!(school.ranking.rankings().len(), 3);
}
