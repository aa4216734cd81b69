use chrono::NaiveDate;

use crate::cascade::{CascadingSelector, ClassRequest};
use crate::forms::{DATE_FORMAT, FormState, SubmitBlocked, schemas};
use crate::model::{Lookup, ProgressNote, StudentRecord};

#[derive(Debug, Clone)]
pub struct NotesPage {
    pub cascade: CascadingSelector,
    pub form: FormState,
}

impl Default for NotesPage {
    fn default() -> Self {
        Self { cascade: CascadingSelector::new(), form: FormState::new(schemas::progress_note()) }
    }
}

impl NotesPage {
    pub fn select_class(&mut self, class_id: i64) -> ClassRequest {
        self.form.set("class_id", class_id.to_string());
        self.form.set("section_id", "");
        self.form.set("student_id", "");
        self.cascade.select_class(class_id)
    }

    pub fn accept_sections(&mut self, ticket: u64, sections: Vec<Lookup>) {
        self.cascade.accept_sections(ticket, Ok(sections));
    }

    pub fn select_section(&mut self, section_id: i64) {
        if self.cascade.select_section(section_id).is_some() {
            self.form.set("section_id", section_id.to_string());
            self.form.set("student_id", "");
        }
    }

    /// Students of the selected section as choices.
    pub fn roster(&self, students: &[StudentRecord]) -> Vec<Lookup> {
        let (Some(class_id), Some(section_id)) = (self.cascade.class_id(), self.cascade.section_id()) else {
            return Vec::new();
        };
        students
            .iter()
            .filter(|s| s.class_id == class_id && s.section_id == section_id)
            .filter_map(|s| Some(Lookup::new(s.id?, s.full_name())))
            .collect()
    }

    /// The note, dated `today`.
    pub fn submit(&mut self, students: &[StudentRecord], today: NaiveDate) -> Result<ProgressNote, SubmitBlocked> {
        self.form.begin_submit()?;
        let student_id = self.form.integer("student_id");
        let student_name = students
            .iter()
            .find(|s| s.id == Some(student_id))
            .map(StudentRecord::full_name)
            .unwrap_or_default();
        Ok(ProgressNote {
            id: 0,
            class_id: self.form.integer("class_id"),
            section_id: self.form.integer("section_id"),
            student_id,
            student_name,
            note: self.form.value("note").trim().to_string(),
            date: today.format(DATE_FORMAT).to_string(),
        })
    }

    /// The class and section stay selected for the next note.
    pub fn finish(&mut self, success: bool) {
        if !success {
            self.form.finish_submit(false);
            return;
        }
        let (class_id, section_id) = (self.form.value("class_id").to_string(), self.form.value("section_id").to_string());
        self.form.finish_submit(true);
        self.form.set("class_id", class_id);
        self.form.set("section_id", section_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students() -> Vec<StudentRecord> {
        vec![
            StudentRecord { id: Some(1), first_name: "Ravi".into(), last_name: "Kumar".into(), class_id: 1, section_id: 2, ..Default::default() },
            StudentRecord { id: Some(2), first_name: "Asha".into(), class_id: 1, section_id: 1, ..Default::default() },
        ]
    }

    #[test]
    fn note_is_dated_today_for_picked_student() {
        let mut page = NotesPage::default();
        let req = page.select_class(1);
        page.accept_sections(req.ticket, vec![Lookup::new(1, "A"), Lookup::new(2, "B")]);
        page.select_section(2);
        assert_eq!(page.roster(&students()), vec![Lookup::new(1, "Ravi Kumar")]);
        page.form.set("student_id", "1");
        page.form.set("note", "Reads fluently");
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let note = page.submit(&students(), today).unwrap();
        assert_eq!(note.date, "2024-07-01");
        assert_eq!(note.student_name, "Ravi Kumar");
        assert_eq!(note.section_id, 2);

        page.finish(true);
        assert_eq!(page.form.value("note"), "");
        assert_eq!(page.form.value("section_id"), "2");
    }

    #[test]
    fn short_note_is_rejected() {
        let mut page = NotesPage::default();
        page.form.set("note", "ok");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit(&[], NaiveDate::MIN) else {
            panic!("short note accepted");
        };
        assert_eq!(errors.get("note"), Some("Progress note must be at least 3 characters"));
        assert_eq!(errors.get("student_id"), Some("Student is required"));
    }
}
