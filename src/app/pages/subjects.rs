use crate::cascade::{CascadingSelector, ClassRequest};
use crate::forms::{FormState, SubmitBlocked, schemas};
use crate::model::Lookup;

#[derive(Debug, Clone)]
pub struct SubjectsPage {
    pub cascade: CascadingSelector,
    pub form: FormState,
}

impl Default for SubjectsPage {
    fn default() -> Self {
        Self { cascade: CascadingSelector::new(), form: FormState::new(schemas::subject()) }
    }
}

impl SubjectsPage {
    pub fn select_class(&mut self, class_id: i64) -> ClassRequest {
        self.form.set("class_id", class_id.to_string());
        self.cascade.select_class(class_id)
    }

    pub fn accept_subjects(&mut self, ticket: u64, subjects: Vec<Lookup>) {
        self.cascade.accept_class_items(ticket, Ok(subjects));
    }

    pub fn subjects(&self) -> &[Lookup] {
        self.cascade.class_items()
    }

    pub fn submit(&mut self) -> Result<(i64, String), SubmitBlocked> {
        self.form.begin_submit()?;
        let class_id = self.form.id("class_id").unwrap_or_default();
        Ok((class_id, self.form.value("name").trim().to_string()))
    }

    /// On success the subject list of the same class is fetched again.
    pub fn finish(&mut self, success: bool) -> Option<ClassRequest> {
        let class_id = self.cascade.class_id();
        self.form.finish_submit(success);
        let class_id = class_id.filter(|_| success)?;
        Some(self.select_class(class_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_refetches_same_class_and_keeps_it_selected() {
        let mut page = SubjectsPage::default();
        let req = page.select_class(2);
        page.accept_subjects(req.ticket, vec![Lookup::new(1, "Math")]);
        page.form.set("name", "EVS");
        assert_eq!(page.submit().unwrap(), (2, "EVS".to_string()));
        let again = page.finish(true).unwrap();
        assert_eq!(again.class_id, 2);
        assert_ne!(again.ticket, req.ticket);
        assert_eq!(page.form.id("class_id"), Some(2));
        assert_eq!(page.form.value("name"), "");
    }

    #[test]
    fn subject_needs_a_class() {
        let mut page = SubjectsPage::default();
        page.form.set("name", "EVS");
        assert!(matches!(page.submit(), Err(SubmitBlocked::Invalid(_))));
    }
}
