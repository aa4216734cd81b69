use std::collections::BTreeMap;

use crate::cascade::{CascadingSelector, ClassRequest, SectionRequest};
use crate::forms::{FormState, SubmitBlocked, ValidationErrors, parse_time, schemas};
use crate::model::{Lookup, TimePeriod};

use super::{id_string, lookup_or_default};

/// `end - start` as `Hh Mm`. `None` unless both parse and end is later.
pub fn duration(start: &str, end: &str) -> Option<String> {
    let (start, end) = (parse_time(start)?, parse_time(end)?);
    let minutes = (end - start).num_minutes();
    (minutes > 0).then(|| format!("{}h {}m", minutes / 60, minutes % 60))
}

#[derive(Debug, Clone)]
pub struct PeriodsPage {
    pub cascade: CascadingSelector<TimePeriod>,
    pub form: FormState,
    pub editing: Option<i64>,
    pub show_form: bool,
}

impl Default for PeriodsPage {
    fn default() -> Self {
        Self {
            cascade: CascadingSelector::new(),
            form: FormState::new(schemas::period()),
            editing: None,
            show_form: false,
        }
    }
}

impl PeriodsPage {
    pub fn select_class(&mut self, class_id: i64) -> ClassRequest {
        self.show_form = false;
        self.cascade.select_class(class_id)
    }

    pub fn select_section(&mut self, section_id: i64) -> Option<SectionRequest> {
        self.show_form = false;
        self.cascade.select_section(section_id)
    }

    pub fn periods(&self) -> &[TimePeriod] {
        self.cascade.section_items()
    }

    pub fn subjects(&self) -> &[Lookup] {
        self.cascade.class_items()
    }

    /// Only possible once a section is chosen.
    pub fn open_new(&mut self) -> bool {
        if self.cascade.section_id().is_none() {
            return false;
        }
        self.form.reset();
        self.editing = None;
        self.show_form = true;
        true
    }

    pub fn open_edit(&mut self, period: &TimePeriod) {
        self.form.load([
            ("name", period.name.clone()),
            ("subject_id", id_string(&period.subject)),
            ("teacher_id", id_string(&period.teacher)),
            ("start_date", period.start_date.clone()),
            ("end_date", period.end_date.clone()),
            ("start_time", period.start_time.clone()),
            ("end_time", period.end_time.clone()),
            ("is_active", period.is_active.to_string()),
        ]);
        self.editing = period.id;
        self.show_form = true;
    }

    pub fn close(&mut self) {
        self.show_form = false;
        self.editing = None;
        self.form.reset();
    }

    pub fn duration(&self) -> Option<String> {
        duration(self.form.value("start_time"), self.form.value("end_time"))
    }

    pub fn submit(&mut self, teachers: &[Lookup]) -> Result<TimePeriod, SubmitBlocked> {
        let (Some(class_id), Some(section_id)) = (self.cascade.class_id(), self.cascade.section_id()) else {
            let missing = BTreeMap::from([("section_id", "Select a class and section first".to_string())]);
            return Err(SubmitBlocked::Invalid(ValidationErrors(missing)));
        };
        self.form.begin_submit()?;
        let form = &self.form;
        Ok(TimePeriod {
            id: self.editing,
            class_id,
            section_id,
            name: form.value("name").trim().to_string(),
            subject: lookup_or_default(self.cascade.class_items(), form.id("subject_id")),
            teacher: lookup_or_default(teachers, form.id("teacher_id")),
            start_date: form.value("start_date").to_string(),
            end_date: form.value("end_date").to_string(),
            start_time: form.value("start_time").to_string(),
            end_time: form.value("end_time").to_string(),
            is_active: form.flag("is_active"),
        })
    }

    /// On success the periods of the selected pair are fetched again.
    pub fn finish(&mut self, success: bool) -> Option<SectionRequest> {
        self.form.finish_submit(success);
        if !success {
            return None;
        }
        self.close();
        self.cascade.refresh()
    }
}

/// The same period with its active flag flipped, ready to be saved.
pub fn toggled(period: &TimePeriod) -> TimePeriod {
    TimePeriod { is_active: !period.is_active, ..period.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> PeriodsPage {
        let mut page = PeriodsPage::default();
        let req = page.select_class(1);
        page.cascade.accept_sections(req.ticket, Ok(vec![Lookup::new(1, "A")]));
        page.cascade.accept_class_items(req.ticket, Ok(vec![Lookup::new(4, "Math")]));
        page.select_section(1).unwrap();
        page
    }

    #[test]
    fn durations() {
        assert_eq!(duration("09:00", "10:30").as_deref(), Some("1h 30m"));
        assert_eq!(duration("09:00", "09:45").as_deref(), Some("0h 45m"));
        assert_eq!(duration("10:00", "09:00"), None);
        assert_eq!(duration("", "09:00"), None);
    }

    #[test]
    fn form_needs_a_section() {
        let mut page = PeriodsPage::default();
        assert!(!page.open_new());
        let mut page = ready();
        assert!(page.open_new());
    }

    #[test]
    fn submit_builds_period_for_selected_pair() {
        let mut page = ready();
        page.open_new();
        for (name, value) in [
            ("name", "Period 1"),
            ("subject_id", "4"),
            ("teacher_id", "2"),
            ("start_date", "2024-06-01"),
            ("end_date", "2025-03-31"),
            ("start_time", "09:00"),
            ("end_time", "09:45"),
        ] {
            page.form.set(name, value);
        }
        let teachers = vec![Lookup::new(2, "Mary Johnson")];
        let period = page.submit(&teachers).unwrap();
        assert_eq!((period.class_id, period.section_id), (1, 1));
        assert_eq!(period.subject.name, "Math");
        assert_eq!(period.teacher.name, "Mary Johnson");
        assert!(period.is_active);

        let refresh = page.finish(true).unwrap();
        assert_eq!((refresh.class_id, refresh.section_id), (1, 1));
        assert!(!page.show_form);
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let mut page = ready();
        page.open_new();
        page.form.set("start_date", "2024-06-01");
        page.form.set("end_date", "2024-05-01");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit(&[]) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.get("end_date"), Some("End date cannot be before start date"));
    }

    #[test]
    fn toggle_flips_only_the_flag() {
        let period = TimePeriod { id: Some(3), name: "P1".into(), is_active: true, ..Default::default() };
        let flipped = toggled(&period);
        assert!(!flipped.is_active);
        assert_eq!(flipped.id, Some(3));
        assert_eq!(flipped.name, "P1");
    }
}
