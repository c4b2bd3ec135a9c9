use super::common::*;
use crate::rewards::access::AccessError;
use crate::rewards::analytics::AnalyticsError;
use crate::rewards::domain::PlasticType;
use crate::rewards::ledger::SubmissionIntake;

#[test]
fn report_counts_users_submissions_and_points() {
    let (stack, _) = default_stack();

    stack
        .ledger
        .submit(Some(CITIZEN_TOKEN), pet_intake())
        .expect("pet batch");
    stack
        .ledger
        .submit(Some(CITIZEN_TOKEN), hdpe_intake())
        .expect("hdpe batch");
    stack
        .ledger
        .submit(Some(BUYER_TOKEN), hdpe_intake())
        .expect("buyer batch");

    let snapshot = stack
        .analytics
        .report(Some(ADMIN_TOKEN))
        .expect("admin report");

    assert_eq!(snapshot.total_users, 5);
    assert_eq!(snapshot.total_submissions, 3);
    // 10 (PET 2kg x5) + 9 + 9 (HDPE 3kg x2 each) + the suspended seed's 120.
    assert_eq!(snapshot.total_points_distributed, 148);
}

#[test]
fn breakdown_sums_weight_per_present_type_only() {
    let (stack, _) = default_stack();

    stack
        .ledger
        .submit(Some(CITIZEN_TOKEN), pet_intake())
        .expect("pet batch");
    stack
        .ledger
        .submit(Some(CITIZEN_TOKEN), hdpe_intake())
        .expect("hdpe batch");
    stack
        .ledger
        .submit(Some(BUYER_TOKEN), hdpe_intake())
        .expect("second hdpe batch");

    let snapshot = stack
        .analytics
        .report(Some(ADMIN_TOKEN))
        .expect("admin report");

    assert_eq!(snapshot.submissions_by_type.len(), 2, "absent types omitted");

    let pet = snapshot
        .submissions_by_type
        .iter()
        .find(|line| line.plastic_type == PlasticType::Pet)
        .expect("PET line");
    assert!((pet.total_weight_kg - 2.0).abs() < f64::EPSILON);
    assert_eq!(pet.submission_count, 1);

    let hdpe = snapshot
        .submissions_by_type
        .iter()
        .find(|line| line.plastic_type == PlasticType::Hdpe)
        .expect("HDPE line");
    assert!((hdpe.total_weight_kg - 6.0).abs() < f64::EPSILON);
    assert_eq!(hdpe.submission_count, 2);
}

#[test]
fn report_is_admin_only() {
    let (stack, _) = default_stack();
    for token in [CITIZEN_TOKEN, BUYER_TOKEN, COLLECTOR_TOKEN] {
        match stack.analytics.report(Some(token)) {
            Err(AnalyticsError::Access(AccessError::Forbidden)) => {}
            other => panic!("expected forbidden, got {other:?}"),
        }
    }
    match stack.analytics.report(None) {
        Err(AnalyticsError::Access(AccessError::Unauthenticated)) => {}
        other => panic!("expected unauthenticated, got {other:?}"),
    }
}

#[test]
fn empty_platform_reports_zeroes() {
    let (stack, _) = default_stack();
    let snapshot = stack
        .analytics
        .report(Some(ADMIN_TOKEN))
        .expect("admin report");

    assert_eq!(snapshot.total_submissions, 0);
    assert_eq!(snapshot.total_points_distributed, 120, "seed points only");
    assert!(snapshot.submissions_by_type.is_empty());
}

#[test]
fn csv_export_lists_every_submission() {
    let (stack, _) = default_stack();

    let first = stack
        .ledger
        .submit(Some(CITIZEN_TOKEN), pet_intake())
        .expect("pet batch");
    let intake = SubmissionIntake {
        description: None,
        ..hdpe_intake()
    };
    let second = stack
        .ledger
        .submit(Some(BUYER_TOKEN), intake)
        .expect("hdpe batch");

    let csv = stack
        .analytics
        .export_submissions_csv(Some(ADMIN_TOKEN))
        .expect("export renders");

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some(
            "submission_id,owner_id,plastic_type,weight_kg,quantity,points_earned,status,created_at"
        )
    );
    let body: Vec<_> = lines.collect();
    assert_eq!(body.len(), 2);
    // Newest first.
    assert!(body[0].starts_with(&format!("{},user-buyer,HDPE,3,2,9,pending", second.submission.id.0)));
    assert!(body[1].starts_with(&format!("{},user-citizen,PET,2,5,10,pending", first.submission.id.0)));
}

#[test]
fn csv_export_is_admin_only() {
    let (stack, _) = default_stack();
    match stack.analytics.export_submissions_csv(Some(COLLECTOR_TOKEN)) {
        Err(AnalyticsError::Access(AccessError::Forbidden)) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }
}
