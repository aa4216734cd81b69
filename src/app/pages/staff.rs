use crate::forms::{FormState, SubmitBlocked, schemas};
use crate::listing::{Pager, filter_by};
use crate::model::{Lookup, StaffRecord};

use super::{id_string, lookup_or_default};

#[derive(Debug, Clone, Copy)]
pub struct StaffChoices<'a> {
    pub genders: &'a [Lookup],
    pub qualifications: &'a [Lookup],
    pub designations: &'a [Lookup],
    pub staff_types: &'a [Lookup],
}

#[derive(Debug, Clone)]
pub struct StaffPage {
    pub search: String,
    pub pager: Pager,
    pub form: FormState,
    pub editing: Option<i64>,
    pub show_form: bool,
    pub viewing: Option<StaffRecord>,
}

impl StaffPage {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            pager: Pager::new(page_size),
            form: FormState::new(schemas::staff()),
            editing: None,
            show_form: false,
            viewing: None,
        }
    }

    pub fn visible<'a>(&self, staff: &'a [StaffRecord]) -> Vec<&'a StaffRecord> {
        filter_by(staff, &self.search, |s| format!("{} {}", s.full_name(), s.designation.name))
    }

    pub fn set_search(&mut self, query: String) {
        self.search = query;
        self.pager.page = 0;
    }

    pub fn open_new(&mut self) {
        self.form.reset();
        self.editing = None;
        self.show_form = true;
    }

    /// The stored password is never shown; an empty one keeps it unchanged.
    pub fn open_edit(&mut self, staff: &StaffRecord) {
        self.form.load([
            ("first_name", staff.first_name.clone()),
            ("last_name", staff.last_name.clone()),
            ("gender", id_string(&staff.gender)),
            ("qualification", id_string(&staff.qualification)),
            ("specialist", staff.specialist.clone()),
            ("experience", staff.experience.clone()),
            ("designation", id_string(&staff.designation)),
            ("staff_type", id_string(&staff.staff_type)),
            ("mobile", staff.mobile.clone()),
            ("email", staff.email.clone()),
            ("username", staff.username.clone()),
            ("salary", staff.salary.to_string()),
            ("active", if staff.active { "Active" } else { "Inactive" }.to_string()),
            ("transport_required", staff.transport_required.to_string()),
        ]);
        self.editing = staff.id;
        self.show_form = true;
    }

    pub fn close(&mut self) {
        self.show_form = false;
        self.editing = None;
        self.form.reset();
    }

    pub fn record(&self, choices: StaffChoices<'_>) -> StaffRecord {
        let form = &self.form;
        StaffRecord {
            id: self.editing,
            first_name: form.value("first_name").trim().to_string(),
            last_name: form.value("last_name").trim().to_string(),
            gender: lookup_or_default(choices.genders, form.id("gender")),
            qualification: lookup_or_default(choices.qualifications, form.id("qualification")),
            specialist: form.value("specialist").trim().to_string(),
            experience: form.value("experience").trim().to_string(),
            designation: lookup_or_default(choices.designations, form.id("designation")),
            staff_type: lookup_or_default(choices.staff_types, form.id("staff_type")),
            mobile: form.value("mobile").trim().to_string(),
            email: form.value("email").trim().to_string(),
            username: form.value("username").trim().to_string(),
            password: form.value("password").to_string(),
            salary: form.number("salary"),
            active: form.value("active") == "Active",
            transport_required: form.flag("transport_required"),
        }
    }

    pub fn submit(&mut self, choices: StaffChoices<'_>) -> Result<StaffRecord, SubmitBlocked> {
        self.form.begin_submit()?;
        Ok(self.record(choices))
    }

    pub fn finish(&mut self, success: bool) {
        self.form.finish_submit(success);
        if success {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_round_trips_through_form() {
        let genders = vec![Lookup::new(1, "Female")];
        let qualifications = vec![Lookup::new(5, "M.Sc")];
        let designations = vec![Lookup::new(9, "Teacher")];
        let staff_types = vec![Lookup::new(12, "Teaching")];
        let choices = StaffChoices {
            genders: &genders,
            qualifications: &qualifications,
            designations: &designations,
            staff_types: &staff_types,
        };
        let staff = StaffRecord {
            id: Some(3),
            first_name: "Mary".into(),
            last_name: "Johnson".into(),
            gender: Lookup::new(1, "Female"),
            qualification: Lookup::new(5, "M.Sc"),
            designation: Lookup::new(9, "Teacher"),
            staff_type: Lookup::new(12, "Teaching"),
            mobile: "9876543210".into(),
            email: "mary@school.in".into(),
            salary: 30000.0,
            active: true,
            ..Default::default()
        };
        let mut page = StaffPage::new(5);
        page.open_edit(&staff);
        let saved = page.submit(choices).unwrap();
        assert_eq!(saved, staff);
    }

    #[test]
    fn bad_mobile_blocks_submit() {
        let mut page = StaffPage::new(5);
        page.open_new();
        page.form.set("mobile", "98765");
        let choices = StaffChoices { genders: &[], qualifications: &[], designations: &[], staff_types: &[] };
        let Err(SubmitBlocked::Invalid(errors)) = page.submit(choices) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.get("mobile"), Some("Mobile Number must be 10 digits"));
        assert_eq!(errors.get("first_name"), Some("First Name is required"));
    }

    #[test]
    fn search_matches_designation() {
        let staff = vec![
            StaffRecord { first_name: "Mary".into(), designation: Lookup::new(1, "Principal"), ..Default::default() },
            StaffRecord { first_name: "Ravi".into(), designation: Lookup::new(2, "Teacher"), ..Default::default() },
        ];
        let mut page = StaffPage::new(5);
        page.set_search("princ".into());
        assert_eq!(page.visible(&staff).len(), 1);
    }
}
