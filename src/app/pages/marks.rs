//! Marksheet editor: one header (class, section) and a list of subject rows.

use std::collections::BTreeSet;

use crate::cascade::{CascadingSelector, ClassRequest};
use crate::forms::{FormState, SubmitBlocked, ValidationErrors, schemas};
use crate::model::{Lookup, MarkEntry, MarkSubject};

use super::{FormMsg, apply};

#[derive(Debug, Clone)]
pub struct MarksPage {
    pub header: FormState,
    pub cascade: CascadingSelector,
    pub rows: Vec<FormState>,
    pub editing: Option<i64>,
    pub show_form: bool,
    pub viewing: Option<MarkEntry>,
    pub error: Option<String>,
}

impl Default for MarksPage {
    fn default() -> Self {
        Self {
            header: FormState::new(schemas::marksheet()),
            cascade: CascadingSelector::new(),
            rows: vec![FormState::new(schemas::mark_row())],
            editing: None,
            show_form: false,
            viewing: None,
            error: None,
        }
    }
}

impl MarksPage {
    pub fn open_new(&mut self) {
        *self = Self { show_form: true, ..Self::default() };
    }

    pub fn open_edit(&mut self, entry: &MarkEntry) -> ClassRequest {
        self.open_new();
        self.header.load([
            ("class_id", entry.class_id.to_string()),
            ("section_id", entry.section_id.to_string()),
        ]);
        if !entry.subjects.is_empty() {
            self.rows = entry
                .subjects
                .iter()
                .map(|s| {
                    let mut row = FormState::new(schemas::mark_row());
                    row.load([
                        ("subject_id", s.subject_id.to_string()),
                        ("max_marks", s.max_marks.to_string()),
                        ("pass_marks", s.pass_marks.to_string()),
                        ("remark", s.remark.clone()),
                    ]);
                    row
                })
                .collect();
        }
        self.editing = entry.id;
        self.cascade.preselect(entry.class_id, entry.section_id)
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Subjects are scoped to the class, so rows lose their subject when the
    /// class changes.
    pub fn select_class(&mut self, class_id: i64) -> ClassRequest {
        self.header.set("class_id", class_id.to_string());
        self.header.set("section_id", "");
        for row in &mut self.rows {
            row.set("subject_id", "");
        }
        self.cascade.select_class(class_id)
    }

    pub fn accept_sections(&mut self, ticket: u64, sections: Vec<Lookup>) {
        if let Some(request) = self.cascade.accept_sections(ticket, Ok(sections)) {
            self.header.set("section_id", request.section_id.to_string());
        }
    }

    pub fn accept_subjects(&mut self, ticket: u64, subjects: Vec<Lookup>) {
        self.cascade.accept_class_items(ticket, Ok(subjects));
    }

    pub fn select_section(&mut self, section_id: i64) {
        if self.cascade.select_section(section_id).is_some() {
            self.header.set("section_id", section_id.to_string());
            self.header.touch("section_id");
        }
    }

    pub fn subjects(&self) -> &[Lookup] {
        self.cascade.class_items()
    }

    /// Subjects row `index` may still pick: every subject of the class that
    /// no other row uses.
    pub fn available_subjects(&self, index: usize) -> Vec<Lookup> {
        let taken: BTreeSet<i64> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .filter_map(|(_, row)| row.id("subject_id"))
            .collect();
        self.subjects().iter().filter(|s| !taken.contains(&s.id)).cloned().collect()
    }

    pub fn add_row(&mut self) {
        self.rows.push(FormState::new(schemas::mark_row()));
    }

    /// The last row stays.
    pub fn remove_row(&mut self, index: usize) {
        if self.rows.len() > 1 && index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    pub fn edit_row(&mut self, index: usize, msg: FormMsg) {
        if let Some(row) = self.rows.get_mut(index) {
            apply(row, msg);
        }
    }

    fn check_rows(&mut self) -> Result<(), String> {
        let mut first_error = None;
        for (i, row) in self.rows.iter_mut().enumerate() {
            if let Err(errors) = row.validate_all() {
                first_error.get_or_insert_with(|| {
                    format!("Row {}: {}", i + 1, errors.first().unwrap_or("invalid entry"))
                });
            }
        }
        if let Some(message) = first_error {
            return Err(message);
        }
        let mut seen = BTreeSet::new();
        if !self.rows.iter().all(|row| seen.insert(row.integer("subject_id"))) {
            return Err("Each subject can only be added once".into());
        }
        Ok(())
    }

    pub fn submit(&mut self) -> Result<MarkEntry, SubmitBlocked> {
        if self.header.is_pending() {
            return Err(SubmitBlocked::Pending);
        }
        let rows = self.check_rows();
        let header = self.header.begin_submit();
        if let Err(message) = rows {
            if header.is_ok() {
                self.header.finish_submit(false);
            }
            self.error = Some(message.clone());
            let mut errors = match header {
                Err(SubmitBlocked::Invalid(errors)) => errors,
                _ => ValidationErrors::default(),
            };
            errors.0.insert("subjects", message);
            return Err(SubmitBlocked::Invalid(errors));
        }
        header?;
        self.error = None;

        let (class_id, section_id) = (self.header.integer("class_id"), self.header.integer("section_id"));
        let section = self.cascade.selected_section().cloned().unwrap_or_default();
        Ok(MarkEntry {
            id: self.editing,
            class_id,
            section_id,
            class_name: String::new(),
            section_name: section.name,
            subjects: self
                .rows
                .iter()
                .map(|row| {
                    let subject_id = row.integer("subject_id");
                    MarkSubject {
                        subject_id,
                        subject_name: super::lookup_or_default(self.subjects(), Some(subject_id)).name,
                        max_marks: row.integer("max_marks"),
                        pass_marks: row.integer("pass_marks"),
                        remark: row.value("remark").trim().to_string(),
                    }
                })
                .collect(),
        })
    }

    /// Success closes the dialog; failure keeps every row as entered.
    pub fn finish(&mut self, success: bool) {
        self.header.finish_submit(success);
        if success {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_subjects() -> MarksPage {
        let mut page = MarksPage::default();
        page.open_new();
        let req = page.select_class(1);
        page.accept_sections(req.ticket, vec![Lookup::new(1, "A"), Lookup::new(2, "B")]);
        page.accept_subjects(req.ticket, vec![Lookup::new(1, "Math"), Lookup::new(2, "English")]);
        page.select_section(1);
        page
    }

    fn fill(page: &mut MarksPage, index: usize, subject: &str, max: &str, pass: &str) {
        page.edit_row(index, FormMsg::Input("subject_id", subject.into()));
        page.edit_row(index, FormMsg::Input("max_marks", max.into()));
        page.edit_row(index, FormMsg::Input("pass_marks", pass.into()));
    }

    #[test]
    fn builds_entry_for_selected_section() {
        let mut page = page_with_subjects();
        fill(&mut page, 0, "1", "100", "35");
        let entry = page.submit().unwrap();
        assert_eq!((entry.class_id, entry.section_id), (1, 1));
        assert_eq!(entry.section_name, "A");
        assert_eq!(entry.subjects.len(), 1);
        assert_eq!(entry.subjects[0].subject_name, "Math");
        assert_eq!((entry.subjects[0].max_marks, entry.subjects[0].pass_marks), (100, 35));
    }

    #[test]
    fn duplicate_subjects_are_rejected() {
        let mut page = page_with_subjects();
        fill(&mut page, 0, "1", "100", "35");
        page.add_row();
        fill(&mut page, 1, "1", "50", "20");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit() else {
            panic!("duplicate subject accepted");
        };
        assert_eq!(errors.get("subjects"), Some("Each subject can only be added once"));
        assert!(!page.header.is_pending());
    }

    #[test]
    fn pass_above_max_is_rejected() {
        let mut page = page_with_subjects();
        fill(&mut page, 0, "1", "50", "60");
        assert!(page.submit().is_err());
        assert_eq!(page.error.as_deref(), Some("Row 1: Pass marks cannot exceed max marks"));
    }

    #[test]
    fn used_subjects_are_not_offered_twice() {
        let mut page = page_with_subjects();
        fill(&mut page, 0, "1", "100", "35");
        page.add_row();
        let names: Vec<String> = page.available_subjects(1).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["English"]);
        assert_eq!(page.available_subjects(0).len(), 2);
    }

    #[test]
    fn class_change_clears_row_subjects() {
        let mut page = page_with_subjects();
        fill(&mut page, 0, "1", "100", "35");
        page.select_class(2);
        assert_eq!(page.rows[0].value("subject_id"), "");
        assert_eq!(page.rows[0].value("max_marks"), "100");
        assert!(page.subjects().is_empty());
    }

    #[test]
    fn failure_keeps_rows_and_success_closes() {
        let mut page = page_with_subjects();
        fill(&mut page, 0, "2", "80", "28");
        page.submit().unwrap();
        assert!(matches!(page.submit(), Err(SubmitBlocked::Pending)));
        page.finish(false);
        assert_eq!(page.rows[0].value("max_marks"), "80");
        assert!(page.show_form);
        page.submit().unwrap();
        page.finish(true);
        assert!(!page.show_form);
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut page = MarksPage::default();
        page.remove_row(0);
        assert_eq!(page.rows.len(), 1);
    }
}
