use school_admin::api::Outcome;
use school_admin::api::endpoints as ep;
use school_admin::app::pages::{FormMsg, MarksPage};
use school_admin::mock::MockBackend;
use school_admin::model::Lookup;
use school_admin::source::{DataSource, Remote};
use serde_json::json;

fn mock_of(source: &DataSource) -> &MockBackend {
    match source.remote() {
        Remote::Mock(mock) => mock,
        Remote::Live(_) => panic!("expected the mock backend"),
    }
}

fn id_of(items: &[Lookup], name: &str) -> i64 {
    items.iter().find(|l| l.name == name).map(|l| l.id).unwrap()
}

/// Walks the LKG, section A, Math 100/35 entry through page and source.
async fn fill_lkg_math(source: &DataSource, page: &mut MarksPage) {
    let classes = source.classes().await;
    let lkg = id_of(&classes, "LKG");

    page.open_new();
    let request = page.select_class(lkg);
    let sections = source.sections(request.class_id).await;
    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    let section_a = id_of(&sections, "A");
    page.accept_sections(request.ticket, sections);

    let subjects = source.class_subjects(request.class_id).await;
    let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Math", "English"]);
    let math = id_of(&subjects, "Math");
    page.accept_subjects(request.ticket, subjects);
    page.select_section(section_a);

    page.edit_row(0, FormMsg::Input("subject_id", math.to_string()));
    page.edit_row(0, FormMsg::Input("max_marks", "100".into()));
    page.edit_row(0, FormMsg::Input("pass_marks", "35".into()));
}

#[tokio::test]
async fn marksheet_is_posted_and_listed() {
    let source = DataSource::mock().unwrap();
    let mut page = MarksPage::default();
    fill_lkg_math(&source, &mut page).await;

    let entry = page.submit().unwrap();
    let (class_id, section_id, subject_id) = (entry.class_id, entry.section_id, entry.subjects[0].subject_id);
    let outcome = source.save_marks(entry).await;
    assert!(outcome.is_success());
    page.finish(outcome.is_success());
    assert!(!page.show_form);

    let writes = mock_of(&source).recorded_writes();
    let write = writes.last().unwrap();
    assert_eq!(write.method, "POST");
    assert_eq!(write.path, ep::MARKSHEETS);
    assert_eq!(
        write.body,
        json!({
            "classId": class_id,
            "sectionId": section_id,
            "subjects": [{"subjectId": subject_id, "maxMarks": 100, "passMarks": 35, "remark": ""}]
        })
    );

    let listed = source.marksheets().await;
    assert_eq!(listed.len(), 1);
    assert_eq!((listed[0].class_id, listed[0].section_id), (class_id, section_id));
    assert_eq!(listed[0].subjects[0].max_marks, 100);
    assert!(listed[0].id.is_some());
}

#[tokio::test]
async fn rejected_marksheet_keeps_the_rows() {
    let source = DataSource::mock().unwrap();
    mock_of(&source).reject_writes(true);
    let mut page = MarksPage::default();
    fill_lkg_math(&source, &mut page).await;

    let entry = page.submit().unwrap();
    let outcome = source.save_marks(entry).await;
    assert_eq!(outcome, Outcome::failure("Server rejected the request"));
    page.finish(outcome.is_success());

    assert!(page.show_form);
    assert!(!page.header.is_pending());
    assert_eq!(page.rows[0].value("max_marks"), "100");
    assert_eq!(page.rows[0].value("pass_marks"), "35");
    assert!(source.marksheets().await.is_empty());
}

#[tokio::test]
async fn edited_marksheet_is_put_back() {
    let source = DataSource::mock().unwrap();
    let mut page = MarksPage::default();
    fill_lkg_math(&source, &mut page).await;
    assert!(source.save_marks(page.submit().unwrap()).await.is_success());
    page.finish(true);

    let stored = source.marksheets().await.remove(0);
    let request = page.open_edit(&stored);
    page.accept_sections(request.ticket, source.sections(request.class_id).await);
    page.accept_subjects(request.ticket, source.class_subjects(request.class_id).await);
    page.edit_row(0, FormMsg::Input("pass_marks", "40".into()));

    let entry = page.submit().unwrap();
    assert_eq!(entry.id, stored.id);
    assert!(source.save_marks(entry).await.is_success());

    let writes = mock_of(&source).recorded_writes();
    assert_eq!(writes.last().map(|w| w.method), Some("PUT"));
    let listed = source.marksheets().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].subjects[0].pass_marks, 40);
}
