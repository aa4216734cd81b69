use school_admin::api::{ApiClient, MasterKind};
use school_admin::db::LocalStore;
use school_admin::fees::{self, TermStatus};
use school_admin::model::{AttendanceMark, FeeItem, FeePayment, FeeStructure, Lookup, StudentRecord};
use school_admin::source::{DataSource, Remote};

fn mark(date: &str, student_id: i64, present: bool) -> AttendanceMark {
    AttendanceMark { date: date.into(), class_id: 1, section_id: 1, student_id, present }
}

#[tokio::test]
async fn master_options_come_back_as_lookups() {
    let source = DataSource::mock().unwrap();
    let genders: Vec<String> = source.master(MasterKind::Gender).await.into_iter().map(|l| l.name).collect();
    assert_eq!(genders, ["Male", "Female", "Other"]);
    let teachers = source.active_teachers().await;
    assert_eq!(teachers.len(), 2);
}

#[tokio::test]
async fn saved_student_is_listed_with_an_id() {
    let source = DataSource::mock().unwrap();
    let student = StudentRecord { first_name: "Asha".into(), last_name: "Rao".into(), ..Default::default() };
    assert!(source.save_student(student).await.is_success());
    let students = source.students().await;
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].full_name(), "Asha Rao");
    assert!(students[0].id.is_some());
}

#[tokio::test]
async fn unreachable_backend_reads_as_empty_lists() {
    let store = LocalStore::in_memory().unwrap();
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();
    let source = DataSource::new(Remote::Live(client), store);
    assert!(source.classes().await.is_empty());
    assert!(source.students().await.is_empty());
    assert!(!source.save_classroom("LKG".into()).await.is_success());
}

#[tokio::test]
async fn holidays_are_listed_by_date_and_deleted() {
    let source = DataSource::mock().unwrap();
    assert!(source.add_holiday("Diwali".into(), "2024-11-01".into()).await.is_success());
    assert!(source.add_holiday("Republic Day".into(), "2024-01-26".into()).await.is_success());

    let holidays = source.holidays().await;
    let names: Vec<&str> = holidays.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["Republic Day", "Diwali"]);

    assert!(source.delete_holiday(holidays[0].id).await.is_success());
    assert_eq!(source.holidays().await.len(), 1);
}

#[tokio::test]
async fn attendance_range_and_latest_mark() {
    let source = DataSource::mock().unwrap();
    let day_one = vec![mark("2024-06-03", 1, true), mark("2024-06-03", 2, true)];
    assert!(source.save_attendance(day_one).await.is_success());
    assert!(source.save_attendance(vec![mark("2024-06-03", 2, false)]).await.is_success());
    assert!(source.save_attendance(vec![mark("2024-06-10", 1, true)]).await.is_success());

    let week = source.attendance(1, 1, "2024-06-03".into(), "2024-06-09".into()).await;
    assert_eq!(week.len(), 2);
    assert!(week.iter().any(|m| m.student_id == 2 && !m.present));
    assert!(source.attendance(1, 2, "2024-06-01".into(), "2024-06-30".into()).await.is_empty());
}

#[tokio::test]
async fn payments_feed_the_term_schedule() {
    let source = DataSource::mock().unwrap();
    let structure = FeeStructure {
        class_id: 1,
        number_of_terms: 2,
        fee_items: vec![FeeItem {
            id: 1,
            name: "Tuition".into(),
            amount: 10000.0,
            fee_type: Lookup::new(13, "School Fee"),
            description: None,
            is_required: true,
        }],
        ..Default::default()
    };
    let payment = FeePayment {
        id: 0,
        student_id: 7,
        term: 1,
        amount: 5000.0,
        mode: "Cash".into(),
        paid_on: "2024-06-01".into(),
    };
    assert!(source.record_payment(payment.clone()).await.is_success());
    assert!(source.record_payment(FeePayment { term: 2, amount: 1000.0, ..payment }).await.is_success());

    let payments = source.payments(7).await;
    assert_eq!(payments.len(), 2);
    let schedule = fees::term_schedule(&structure, &payments);
    assert_eq!(schedule[0].status, TermStatus::Paid);
    assert_eq!(schedule[1].status, TermStatus::PartiallyPaid);
    assert_eq!(fees::outstanding(&structure, &payments), 4000.0);
    assert!(source.payments(8).await.is_empty());
}

#[tokio::test]
async fn doctors_are_scoped_to_a_designation() {
    let source = DataSource::mock().unwrap();
    let designations = source.designations().await;
    assert!(!designations.is_empty());
    assert!(!source.hospitals().await.is_empty());
    let doctors = source.doctors(designations[0].id).await;
    assert!(!doctors.is_empty());
    assert!(source.doctors(-1).await.is_empty());
}
