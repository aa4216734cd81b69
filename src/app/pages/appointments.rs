use crate::forms::{FormState, SubmitBlocked, schemas};
use crate::model::{Appointment, Lookup};

use super::lookup_or_default;

#[derive(Debug, Clone)]
pub struct AppointmentsPage {
    pub form: FormState,
    pub doctors: Vec<Lookup>,
    doctors_for: Option<i64>,
}

impl Default for AppointmentsPage {
    fn default() -> Self {
        Self { form: FormState::new(schemas::appointment()), doctors: Vec::new(), doctors_for: None }
    }
}

impl AppointmentsPage {
    /// A new designation drops the doctor choice and its list.
    pub fn select_designation(&mut self, designation_id: i64) -> i64 {
        self.form.set("designation", designation_id.to_string());
        self.form.touch("designation");
        self.form.set("doctor", "");
        self.doctors.clear();
        self.doctors_for = Some(designation_id);
        designation_id
    }

    pub fn accept_doctors(&mut self, designation_id: i64, doctors: Vec<Lookup>) -> bool {
        if self.doctors_for != Some(designation_id) {
            return false;
        }
        self.doctors = doctors;
        true
    }

    pub fn submit(&mut self, hospitals: &[Lookup], designations: &[Lookup]) -> Result<Appointment, SubmitBlocked> {
        self.form.begin_submit()?;
        let form = &self.form;
        Ok(Appointment {
            id: 0,
            patient_name: form.value("patient_name").trim().to_string(),
            hospital: lookup_or_default(hospitals, form.id("hospital")),
            designation: lookup_or_default(designations, form.id("designation")),
            doctor: lookup_or_default(&self.doctors, form.id("doctor")),
            date: form.value("date").to_string(),
        })
    }

    pub fn finish(&mut self, success: bool) {
        self.form.finish_submit(success);
        if success {
            self.doctors.clear();
            self.doctors_for = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn designation_change_resets_doctor() {
        let mut page = AppointmentsPage::default();
        page.select_designation(1);
        assert!(page.accept_doctors(1, vec![Lookup::new(1, "Dr. Mehta")]));
        page.form.set("doctor", "1");
        page.select_designation(2);
        assert_eq!(page.form.value("doctor"), "");
        assert!(page.doctors.is_empty());
        assert!(!page.accept_doctors(1, vec![Lookup::new(1, "Dr. Mehta")]));
    }

    #[test]
    fn booking_resolves_names() {
        let hospitals = vec![Lookup::new(1, "City Hospital")];
        let designations = vec![Lookup::new(2, "Cardiologist")];
        let mut page = AppointmentsPage::default();
        page.form.set("patient_name", "Ravi");
        page.form.set("hospital", "1");
        page.select_designation(2);
        page.accept_doctors(2, vec![Lookup::new(5, "Dr. Rao")]);
        page.form.set("doctor", "5");
        page.form.set("date", "2024-07-10");
        let booked = page.submit(&hospitals, &designations).unwrap();
        assert_eq!(booked.doctor.name, "Dr. Rao");
        assert_eq!(booked.hospital.name, "City Hospital");
        page.finish(true);
        assert!(page.doctors.is_empty());
    }
}
