use crate::cascade::{CascadingSelector, ClassRequest};
use crate::fees::compute_final_amount;
use crate::forms::{FormState, SubmitBlocked, ValidationErrors, schemas};
use crate::listing::{Pager, filter_by};
use crate::model::{DiscountType, FeeDetails, Lookup, StudentRecord};

use super::{find_lookup, id_string};

/// Lookup lists a student record is assembled from.
#[derive(Debug, Clone, Copy)]
pub struct StudentChoices<'a> {
    pub classes: &'a [Lookup],
    pub genders: &'a [Lookup],
    pub occupations: &'a [Lookup],
}

#[derive(Debug, Clone)]
pub struct StudentsPage {
    pub search: String,
    pub pager: Pager,
    pub form: FormState,
    pub cascade: CascadingSelector,
    pub editing: Option<i64>,
    /// Record being edited, used for lookups whose lists have not arrived.
    pub original: Option<StudentRecord>,
    pub show_form: bool,
}

/// Entry of `items` with `id`, else the stored entry when it has that id.
fn resolve(items: &[Lookup], id: Option<i64>, stored: Option<Lookup>) -> Lookup {
    match find_lookup(items, id) {
        Some(found) => found.clone(),
        None => stored.filter(|l| Some(l.id) == id && !l.is_unset()).unwrap_or_default(),
    }
}

impl StudentsPage {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            pager: Pager::new(page_size),
            form: FormState::new(schemas::student()),
            cascade: CascadingSelector::new(),
            editing: None,
            original: None,
            show_form: false,
        }
    }

    pub fn visible<'a>(&self, students: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        filter_by(students, &self.search, StudentRecord::full_name)
    }

    pub fn set_search(&mut self, query: String) {
        self.search = query;
        self.pager.page = 0;
    }

    pub fn open_new(&mut self) {
        self.form.reset();
        self.cascade.clear();
        self.editing = None;
        self.original = None;
        self.show_form = true;
    }

    /// Prefills the form. The returned request loads the sections of the
    /// student's class; the section is re-selected once they arrive.
    pub fn open_edit(&mut self, student: &StudentRecord) -> ClassRequest {
        let fee = &student.fee_details;
        self.form.load([
            ("first_name", student.first_name.clone()),
            ("last_name", student.last_name.clone()),
            ("gender", id_string(&student.gender)),
            ("parent_name", student.parent_name.clone()),
            ("mother_name", student.mother_name.clone()),
            ("father_occupation", id_string(&student.father_occupation)),
            ("mother_occupation", id_string(&student.mother_occupation)),
            ("mobile", student.mobile.clone()),
            ("email", student.email.clone()),
            ("address", student.address.clone()),
            ("class_id", student.class_id.to_string()),
            ("section_id", student.section_id.to_string()),
            ("total_fee", fee.total_fee.to_string()),
            ("discount_type", fee.discount_type.as_str().to_string()),
            ("discount_value", fee.discount_value.to_string()),
            ("transport_required", student.transport_required.to_string()),
            ("transport_start", student.transport_start.clone()),
            ("transport_fee", student.transport_fee.to_string()),
            ("active", if student.active { "Active" } else { "Inactive" }.to_string()),
        ]);
        self.editing = student.id;
        self.original = Some(student.clone());
        self.show_form = true;
        self.cascade.preselect(student.class_id, student.section_id)
    }

    pub fn close(&mut self) {
        self.show_form = false;
        self.editing = None;
        self.original = None;
        self.form.reset();
        self.cascade.clear();
    }

    pub fn select_class(&mut self, class_id: i64) -> ClassRequest {
        self.form.set("class_id", class_id.to_string());
        self.form.set("section_id", "");
        self.form.touch("class_id");
        self.cascade.select_class(class_id)
    }

    pub fn accept_sections(&mut self, ticket: u64, sections: Vec<Lookup>) {
        if let Some(request) = self.cascade.accept_sections(ticket, Ok(sections)) {
            self.form.set("section_id", request.section_id.to_string());
        } else if self.cascade.section_id().is_none() && self.editing.is_some() {
            // The stored section no longer exists under the class.
            self.form.set("section_id", "");
        }
    }

    pub fn select_section(&mut self, section_id: i64) {
        if self.cascade.select_section(section_id).is_some() {
            self.form.set("section_id", section_id.to_string());
            self.form.touch("section_id");
        }
    }

    pub fn discount_type(&self) -> DiscountType {
        DiscountType::parse(self.form.value("discount_type")).unwrap_or_default()
    }

    /// Net fee shown next to the inputs, recomputed on every keystroke.
    pub fn final_amount(&self) -> f64 {
        compute_final_amount(
            self.form.number("total_fee"),
            self.discount_type(),
            self.form.number("discount_value"),
        )
    }

    pub fn record(&self, choices: StudentChoices<'_>) -> StudentRecord {
        let form = &self.form;
        let transport = form.flag("transport_required");
        let stored = self.original.as_ref();
        let class = resolve(
            choices.classes,
            form.id("class_id"),
            stored.map(|s| Lookup::new(s.class_id, s.class_name.clone())),
        );
        let section = resolve(
            self.cascade.sections(),
            form.id("section_id"),
            stored.map(|s| Lookup::new(s.section_id, s.section_name.clone())),
        );
        StudentRecord {
            id: self.editing,
            first_name: form.value("first_name").trim().to_string(),
            last_name: form.value("last_name").trim().to_string(),
            gender: resolve(choices.genders, form.id("gender"), stored.map(|s| s.gender.clone())),
            parent_name: form.value("parent_name").trim().to_string(),
            mother_name: form.value("mother_name").trim().to_string(),
            father_occupation: resolve(
                choices.occupations,
                form.id("father_occupation"),
                stored.map(|s| s.father_occupation.clone()),
            ),
            mother_occupation: resolve(
                choices.occupations,
                form.id("mother_occupation"),
                stored.map(|s| s.mother_occupation.clone()),
            ),
            mobile: form.value("mobile").trim().to_string(),
            email: form.value("email").trim().to_string(),
            address: form.value("address").trim().to_string(),
            class_id: class.id,
            class_name: class.name,
            section_id: section.id,
            section_name: section.name,
            fee_details: FeeDetails::new(
                form.number("total_fee"),
                self.discount_type(),
                form.number("discount_value"),
            ),
            transport_required: transport,
            transport_start: if transport { form.value("transport_start").to_string() } else { String::new() },
            transport_fee: if transport { form.number("transport_fee") } else { 0.0 },
            active: form.value("active") == "Active",
        }
    }

    /// Refuses to send a record whose class or section cannot be named yet.
    pub fn submit(&mut self, choices: StudentChoices<'_>) -> Result<StudentRecord, SubmitBlocked> {
        self.form.begin_submit()?;
        let record = self.record(choices);
        let mut errors = ValidationErrors::default();
        if record.class_id == 0 || record.class_name.is_empty() {
            errors.0.insert("class_id", "Classes are still loading".into());
        }
        if record.section_id == 0 || record.section_name.is_empty() {
            errors.0.insert("section_id", "Sections are still loading".into());
        }
        if !errors.is_empty() {
            self.form.finish_submit(false);
            return Err(SubmitBlocked::Invalid(errors));
        }
        Ok(record)
    }

    pub fn finish(&mut self, success: bool) {
        self.form.finish_submit(success);
        if success {
            self.close();
        }
    }
}
