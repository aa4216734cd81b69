use chrono::NaiveDate;

use crate::fees::{TermLine, term_schedule};
use crate::forms::{FormState, SubmitBlocked, ValidationErrors, schemas};
use crate::model::{FeePayment, FeeStructure, StudentRecord};

#[derive(Debug, Clone)]
pub struct PayFeePage {
    pub student_id: Option<i64>,
    pub form: FormState,
    pub payments: Vec<FeePayment>,
}

impl PayFeePage {
    pub fn new(today: NaiveDate) -> Self {
        let mut form = FormState::new(schemas::payment());
        form.set_date("paid_on", today);
        Self { student_id: None, form, payments: Vec::new() }
    }

    pub fn select_student(&mut self, student_id: i64) {
        let paid_on = self.form.value("paid_on").to_string();
        self.form.reset();
        self.form.set("student_id", student_id.to_string());
        self.form.set("paid_on", paid_on);
        self.student_id = Some(student_id);
        self.payments.clear();
    }

    /// Payments of a student that is no longer selected are dropped.
    pub fn accept_payments(&mut self, student_id: i64, payments: Vec<FeePayment>) -> bool {
        if self.student_id != Some(student_id) {
            return false;
        }
        self.payments = payments;
        true
    }

    pub fn student<'a>(&self, students: &'a [StudentRecord]) -> Option<&'a StudentRecord> {
        let id = self.student_id?;
        students.iter().find(|s| s.id == Some(id))
    }

    /// The structure of the student's class, active ones first.
    pub fn structure<'a>(&self, student: &StudentRecord, structures: &'a [FeeStructure]) -> Option<&'a FeeStructure> {
        let mut matching = structures.iter().filter(|s| s.class_id == student.class_id);
        let first = matching.clone().find(|s| s.is_active);
        first.or_else(|| matching.next())
    }

    pub fn schedule(&self, structure: &FeeStructure) -> Vec<TermLine> {
        term_schedule(structure, &self.payments)
    }

    /// The term has to be one of the terms of `structure`.
    pub fn submit(&mut self, structure: Option<&FeeStructure>) -> Result<FeePayment, SubmitBlocked> {
        self.form.begin_submit()?;
        let term = self.form.integer("term");
        let problem = match structure {
            None => Some("No fee structure for this class"),
            Some(s) if term > s.number_of_terms.max(1) => Some("Term is beyond the terms of the fee structure"),
            Some(_) => None,
        };
        if let Some(message) = problem {
            self.form.finish_submit(false);
            let mut errors = ValidationErrors::default();
            errors.0.insert("term", message.to_string());
            return Err(SubmitBlocked::Invalid(errors));
        }
        let form = &self.form;
        Ok(FeePayment {
            id: 0,
            student_id: form.integer("student_id"),
            term,
            amount: form.number("amount"),
            mode: form.value("mode").to_string(),
            paid_on: form.value("paid_on").to_string(),
        })
    }

    /// A recorded payment keeps the student selected for the next one.
    pub fn finish(&mut self, success: bool) {
        self.form.finish_submit(false);
        if success {
            if let Some(id) = self.student_id {
                let payments = std::mem::take(&mut self.payments);
                self.select_student(id);
                self.payments = payments;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::TermStatus;
    use crate::model::{FeeItem, Lookup};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn structure(class_id: i64, active: bool, amount: f64) -> FeeStructure {
        FeeStructure {
            id: Some(class_id),
            class_id,
            fee_items: vec![FeeItem {
                id: 1,
                name: "Tuition".into(),
                amount,
                fee_type: Lookup::new(1, "School Fee"),
                description: None,
                is_required: true,
            }],
            number_of_terms: 3,
            is_active: active,
            ..Default::default()
        }
    }

    #[test]
    fn picks_active_structure_of_the_class() {
        let page = PayFeePage::new(today());
        let student = StudentRecord { id: Some(1), class_id: 2, ..Default::default() };
        let structures = vec![structure(1, true, 100.0), structure(2, false, 200.0), structure(2, true, 300.0)];
        assert_eq!(page.structure(&student, &structures).map(|s| s.fee_items[0].amount), Some(300.0));
    }

    #[test]
    fn schedule_reflects_payments() {
        let mut page = PayFeePage::new(today());
        page.select_student(1);
        page.accept_payments(1, vec![FeePayment {
            id: 1,
            student_id: 1,
            term: 1,
            amount: 3000.0,
            mode: "Cash".into(),
            paid_on: "2024-06-01".into(),
        }]);
        let lines = page.schedule(&structure(1, true, 9000.0));
        assert_eq!(lines[0].status, TermStatus::Paid);
        assert_eq!(lines[1].status, TermStatus::Unpaid);
    }

    #[test]
    fn payments_of_other_student_are_dropped() {
        let mut page = PayFeePage::new(today());
        page.select_student(1);
        page.select_student(2);
        assert!(!page.accept_payments(1, Vec::new()));
    }

    #[test]
    fn payment_defaults_to_today_and_cash() {
        let mut page = PayFeePage::new(today());
        page.select_student(4);
        page.form.set("amount", "1500");
        let payment = page.submit(Some(&structure(1, true, 9000.0))).unwrap();
        assert_eq!(payment.paid_on, "2024-07-01");
        assert_eq!(payment.mode, "Cash");
        assert_eq!((payment.student_id, payment.term), (4, 1));
        page.finish(true);
        assert_eq!(page.form.value("amount"), "");
        assert_eq!(page.student_id, Some(4));
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut page = PayFeePage::new(today());
        page.select_student(4);
        page.form.set("amount", "0");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit(Some(&structure(1, true, 9000.0))) else {
            panic!("zero payment accepted");
        };
        assert_eq!(errors.get("amount"), Some("Amount must be at least 1"));
    }

    #[test]
    fn term_outside_the_structure_is_rejected() {
        let fee = structure(1, true, 3000.0);
        let mut page = PayFeePage::new(today());
        page.select_student(4);
        page.form.set("amount", "1000");
        page.form.set("term", "5");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit(Some(&fee)) else {
            panic!("term 5 of 3 accepted");
        };
        assert_eq!(errors.get("term"), Some("Term is beyond the terms of the fee structure"));
        assert!(!page.form.is_pending());

        page.form.set("term", "3");
        let payment = page.submit(Some(&fee)).unwrap();
        page.accept_payments(4, vec![payment]);
        assert_eq!(crate::fees::outstanding(&fee, &page.payments), 2000.0);
    }

    #[test]
    fn payment_needs_a_fee_structure() {
        let mut page = PayFeePage::new(today());
        page.select_student(4);
        page.form.set("amount", "1000");
        let Err(SubmitBlocked::Invalid(errors)) = page.submit(None) else {
            panic!("payment without a structure accepted");
        };
        assert_eq!(errors.get("term"), Some("No fee structure for this class"));
    }
}
