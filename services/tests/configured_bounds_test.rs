use common::config::AppConfig;
use rust_decimal::Decimal;
use services::memory_store::InMemoryStore;
use services::{Actor, AssignmentRef, GradingError, GradingService, SubmissionStatus};
use std::str::FromStr;

fn dec(s: &str) -> Option<Decimal> {
    Some(Decimal::from_str(s).unwrap())
}

#[tokio::test]
async fn test_configured_max_grade_drives_validation() {
    AppConfig::set_max_grade(Decimal::from(20));

    let store = InMemoryStore::new();
    store
        .add_assignment(AssignmentRef {
            id: 1,
            course_id: 10,
            professor_id: 100,
        })
        .await;
    let svc = GradingService::from_config(store);
    assert_eq!(svc.bounds().max(), Decimal::from(20));

    let prof = Actor::professor(100);
    let s = svc
        .submit_or_resubmit(&Actor::student(1), 1, "quiz.pdf")
        .await
        .unwrap();

    assert!(matches!(
        svc.finalize_grading(&prof, s.id, dec("20.01"), None).await,
        Err(GradingError::InvalidGrade(_))
    ));
    assert_eq!(
        svc.get_submission(s.id).await.unwrap().status(),
        SubmissionStatus::Pending
    );

    let done = svc
        .finalize_grading(&prof, s.id, dec("20.00"), None)
        .await
        .unwrap();
    assert_eq!(done.grade().unwrap().to_string(), "20.00");
}
