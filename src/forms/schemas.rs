//! Concrete form schemas of every screen.
//!
//! Choice fields (class, section, gender...) hold the selected lookup id as a
//! string. Flags hold `"true"` or `"false"`.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldSpec, FormSchema, Rule};
use crate::model::PAYMENT_MODES;

static MOBILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("mobile pattern"));
static ACADEMIC_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2,4}$").expect("academic year pattern"));

pub const DISCOUNT_TYPES: &[&str] = &["none", "percentage", "amount"];
pub const STATUSES: &[&str] = &["Active", "Inactive"];

fn field(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(name, label)
}

fn money(name: &'static str, label: &'static str) -> FieldSpec {
    field(name, label).default_value("0").required().rule(Rule::Number { min: Some(0.0), max: None })
}

pub fn login() -> FormSchema {
    FormSchema::new(vec![
        field("email", "Email").required().rule(Rule::Email),
        field("password", "Password").required(),
    ])
}

pub fn signup() -> FormSchema {
    FormSchema::new(vec![
        field("name", "Name").required(),
        field("email", "Email").required().rule(Rule::Email),
        field("password", "Password").required().rule(Rule::MinLength(8)),
        field("confirm_password", "Confirm Password")
            .required()
            .rule(Rule::EqualsField("password", "Passwords must match")),
    ])
}

pub fn appointment() -> FormSchema {
    FormSchema::new(vec![
        field("patient_name", "Patient name").required(),
        field("hospital", "Hospital").required(),
        field("designation", "Designation").required(),
        field("doctor", "Doctor").required(),
        field("date", "Appointment date").required().rule(Rule::Date),
    ])
}

pub fn student() -> FormSchema {
    FormSchema::new(vec![
        field("first_name", "First Name").required(),
        field("last_name", "Last Name").required(),
        field("gender", "Gender").required(),
        field("parent_name", "Parent Name").required(),
        field("mother_name", "Mother Name").required(),
        field("father_occupation", "Father Occupation").required(),
        field("mother_occupation", "Mother Occupation").required(),
        field("mobile", "Mobile Number")
            .required()
            .rule(Rule::Pattern(&MOBILE, "Mobile Number must be 10 digits")),
        field("email", "Email").required().rule(Rule::Email),
        field("address", "Student Address").required(),
        field("class_id", "Class").required(),
        field("section_id", "Section").required(),
        money("total_fee", "Total Fee"),
        field("discount_type", "Discount type")
            .default_value("none")
            .required()
            .rule(Rule::OneOf(DISCOUNT_TYPES)),
        money("discount_value", "Discount value"),
        field("transport_required", "Transport Required").default_value("false"),
        field("transport_start", "Transport Start")
            .required()
            .rule(Rule::Date)
            .only_when("transport_required", "true"),
        money("transport_fee", "Transport Fee").only_when("transport_required", "true"),
        field("active", "Status").default_value("Active").required().rule(Rule::OneOf(STATUSES)),
    ])
}

pub fn staff() -> FormSchema {
    FormSchema::new(vec![
        field("first_name", "First Name").required(),
        field("last_name", "Last Name").required(),
        field("gender", "Gender").required(),
        field("qualification", "Qualification").required(),
        field("specialist", "Specialist"),
        field("experience", "Experience").rule(Rule::Integer { min: Some(0) }),
        field("designation", "Designation").required(),
        field("staff_type", "Staff Type").required(),
        field("mobile", "Mobile Number")
            .required()
            .rule(Rule::Pattern(&MOBILE, "Mobile Number must be 10 digits")),
        field("email", "Email ID").required().rule(Rule::Email),
        field("username", "Username"),
        field("password", "Password").rule(Rule::MinLength(8)),
        money("salary", "Salary"),
        field("active", "Status").default_value("Active").required().rule(Rule::OneOf(STATUSES)),
        field("transport_required", "Transport Required").default_value("false"),
    ])
}

pub fn classroom() -> FormSchema {
    FormSchema::new(vec![field("name", "Class name").required()])
}

pub fn section() -> FormSchema {
    FormSchema::new(vec![
        field("class_id", "Class").required(),
        field("name", "Section name").required(),
    ])
}

pub fn subject() -> FormSchema {
    FormSchema::new(vec![
        field("class_id", "Class").required(),
        field("name", "Subject name").required(),
    ])
}

pub fn fee_structure() -> FormSchema {
    FormSchema::new(vec![
        field("class_id", "Class").required(),
        field("academic_year", "Academic Year")
            .required()
            .rule(Rule::Pattern(&ACADEMIC_YEAR, "Academic Year must look like 2024-25")),
        field("number_of_terms", "Number of Terms")
            .default_value("1")
            .required()
            .rule(Rule::Integer { min: Some(1) }),
        field("is_active", "Active").default_value("true"),
    ])
}

pub fn fee_item() -> FormSchema {
    FormSchema::new(vec![
        field("name", "Fee name").required(),
        field("fee_type", "Fee type").required(),
        money("amount", "Amount"),
        field("description", "Description"),
        field("is_required", "Required").default_value("true"),
    ])
}

pub fn period() -> FormSchema {
    FormSchema::new(vec![
        field("name", "Period name").required(),
        field("subject_id", "Subject").required(),
        field("teacher_id", "Teacher").required(),
        field("start_date", "Start date").required().rule(Rule::Date),
        field("end_date", "End date")
            .required()
            .rule(Rule::Date)
            .rule(Rule::NotBefore("start_date", "End date cannot be before start date")),
        field("start_time", "Start time").required().rule(Rule::Time),
        field("end_time", "End time")
            .required()
            .rule(Rule::Time)
            .rule(Rule::After("start_time", "End time must be after start time")),
        field("is_active", "Active").default_value("true"),
    ])
}

/// Header of a marksheet; the subject rows use [`mark_row`].
pub fn marksheet() -> FormSchema {
    FormSchema::new(vec![
        field("class_id", "Class").required(),
        field("section_id", "Section").required(),
    ])
}

pub fn mark_row() -> FormSchema {
    FormSchema::new(vec![
        field("subject_id", "Subject").required(),
        field("max_marks", "Max marks").required().rule(Rule::Integer { min: Some(1) }),
        field("pass_marks", "Pass marks")
            .required()
            .rule(Rule::Integer { min: Some(0) })
            .rule(Rule::AtMostField("max_marks", "Pass marks cannot exceed max marks")),
        field("remark", "Remark"),
    ])
}

pub fn holiday() -> FormSchema {
    FormSchema::new(vec![
        field("name", "Holiday name").required(),
        field("date", "Date").required().rule(Rule::Date),
    ])
}

pub fn progress_note() -> FormSchema {
    FormSchema::new(vec![
        field("class_id", "Class").required(),
        field("section_id", "Section").required(),
        field("student_id", "Student").required(),
        field("note", "Progress note").required().rule(Rule::MinLength(3)),
    ])
}

pub fn group() -> FormSchema {
    FormSchema::new(vec![field("name", "Group name").required()])
}

pub fn payment() -> FormSchema {
    FormSchema::new(vec![
        field("student_id", "Student").required(),
        field("term", "Term").default_value("1").required().rule(Rule::Integer { min: Some(1) }),
        field("amount", "Amount").required().rule(Rule::Number { min: Some(1.0), max: None }),
        field("mode", "Payment mode").default_value("Cash").required().rule(Rule::OneOf(PAYMENT_MODES)),
        field("paid_on", "Payment date").required().rule(Rule::Date),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormState;

    #[test]
    fn signup_requires_matching_passwords() {
        let mut form = FormState::new(signup());
        form.set("name", "Priya");
        form.set("email", "priya@school.in");
        form.set("password", "s3cretpass");
        form.set("confirm_password", "s3cretpas");
        assert!(form.validate_all().is_err());
        assert_eq!(form.error("confirm_password"), Some("Passwords must match"));
        form.set("confirm_password", "s3cretpass");
        assert!(form.error("confirm_password").is_none());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut form = FormState::new(signup());
        form.set("password", "short");
        form.touch("password");
        assert_eq!(form.error("password"), Some("Password must be at least 8 characters"));
    }

    #[test]
    fn period_end_time_must_follow_start() {
        let mut form = FormState::new(period());
        form.set("start_time", "10:00");
        form.set("end_time", "09:30");
        form.touch("end_time");
        assert_eq!(form.error("end_time"), Some("End time must be after start time"));
    }

    #[test]
    fn pass_marks_bounded_by_max() {
        let mut form = FormState::new(mark_row());
        form.set("subject_id", "1");
        form.set("max_marks", "50");
        form.set("pass_marks", "60");
        assert!(form.validate_all().is_err());
        assert_eq!(form.error("pass_marks"), Some("Pass marks cannot exceed max marks"));
        form.set("max_marks", "100");
        assert!(form.error("pass_marks").is_none());
    }

    #[test]
    fn student_defaults() {
        let form = FormState::new(student());
        assert_eq!(form.value("discount_type"), "none");
        assert_eq!(form.value("active"), "Active");
        assert!(!form.flag("transport_required"));
        assert!(!form.is_required("transport_fee"));
    }
}
