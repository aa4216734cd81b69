use crate::forms::{FormState, SubmitBlocked, schemas};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassroomModal {
    AddClass,
    AddSection,
}

#[derive(Debug, Clone)]
pub struct ClassroomsPage {
    pub class_form: FormState,
    pub section_form: FormState,
    pub modal: Option<ClassroomModal>,
}

impl Default for ClassroomsPage {
    fn default() -> Self {
        Self {
            class_form: FormState::new(schemas::classroom()),
            section_form: FormState::new(schemas::section()),
            modal: None,
        }
    }
}

impl ClassroomsPage {
    pub fn open_add_class(&mut self) {
        self.class_form.reset();
        self.modal = Some(ClassroomModal::AddClass);
    }

    /// Opens the section dialog, with the class preset when the button of a
    /// class row was used.
    pub fn open_add_section(&mut self, class_id: Option<i64>) {
        self.section_form.reset();
        if let Some(id) = class_id {
            self.section_form.set("class_id", id.to_string());
        }
        self.modal = Some(ClassroomModal::AddSection);
    }

    pub fn close(&mut self) {
        self.modal = None;
    }

    pub fn submit_class(&mut self) -> Result<String, SubmitBlocked> {
        self.class_form.begin_submit()?;
        Ok(self.class_form.value("name").trim().to_string())
    }

    pub fn submit_section(&mut self) -> Result<(i64, String), SubmitBlocked> {
        self.section_form.begin_submit()?;
        let class_id = self.section_form.id("class_id").unwrap_or_default();
        Ok((class_id, self.section_form.value("name").trim().to_string()))
    }

    pub fn finish_class(&mut self, success: bool) {
        self.class_form.finish_submit(success);
        if success {
            self.close();
        }
    }

    pub fn finish_section(&mut self, success: bool) {
        self.section_form.finish_submit(success);
        if success {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_dialog_presets_class() {
        let mut page = ClassroomsPage::default();
        page.open_add_section(Some(3));
        page.section_form.set("name", " C ");
        assert_eq!(page.submit_section().unwrap(), (3, "C".to_string()));
    }

    #[test]
    fn failed_class_save_keeps_dialog_open() {
        let mut page = ClassroomsPage::default();
        page.open_add_class();
        page.class_form.set("name", "Class 3");
        page.submit_class().unwrap();
        page.finish_class(false);
        assert_eq!(page.modal, Some(ClassroomModal::AddClass));
        assert_eq!(page.class_form.value("name"), "Class 3");
        page.submit_class().unwrap();
        page.finish_class(true);
        assert_eq!(page.modal, None);
    }
}
