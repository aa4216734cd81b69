//! Schema-driven form state.
//!
//! A form is a named set of fields. Each field has a default, a list of rules
//! and optionally a condition on another field that makes it relevant. The
//! schema alone decides which fields are mandatory.

pub mod schemas;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::model::Lookup;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("email pattern")
});

#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Email,
    Pattern(&'static LazyLock<Regex>, &'static str),
    Number { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i64> },
    MinLength(usize),
    EqualsField(&'static str, &'static str),
    OneOf(&'static [&'static str]),
    Date,
    Time,
    /// Date or time that must not be earlier than the other field.
    NotBefore(&'static str, &'static str),
    /// Time that must be strictly later than the other field.
    After(&'static str, &'static str),
    /// Number that must not exceed the other field.
    AtMostField(&'static str, &'static str),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub default: &'static str,
    pub rules: Vec<Rule>,
    pub required_when: Option<(&'static str, &'static str)>,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label, default: "", rules: Vec::new(), required_when: None }
    }

    pub fn default_value(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    /// The field only counts (and only is required) while `field == value`.
    pub fn only_when(mut self, field: &'static str, value: &'static str) -> Self {
        self.required_when = Some((field, value));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_required(&self, name: &str, values: &BTreeMap<&'static str, String>) -> bool {
        self.field(name).is_some_and(|f| {
            is_active(f, values) && f.rules.iter().any(|r| matches!(r, Rule::Required))
        })
    }
}

fn is_active(field: &FieldSpec, values: &BTreeMap<&'static str, String>) -> bool {
    match field.required_when {
        Some((other, expected)) => values.get(other).map(String::as_str) == Some(expected),
        None => true,
    }
}

fn check(field: &FieldSpec, values: &BTreeMap<&'static str, String>) -> Option<String> {
    if !is_active(field, values) {
        return None;
    }
    let raw = values.get(field.name).map(String::as_str).unwrap_or("");
    let value = raw.trim();
    let label = field.label;
    if value.is_empty() {
        return field
            .rules
            .iter()
            .any(|r| matches!(r, Rule::Required))
            .then(|| format!("{label} is required"));
    }
    for rule in &field.rules {
        let violation = match rule {
            Rule::Required => None,
            Rule::Email => (!EMAIL.is_match(value)).then(|| "Invalid email".to_string()),
            Rule::Pattern(re, message) => (!re.is_match(value)).then(|| message.to_string()),
            Rule::Number { min, max } => match value.parse::<f64>() {
                Ok(n) if n.is_finite() => match (*min, *max) {
                    (Some(m), _) if n < m && m == 0.0 => Some(format!("{label} must be positive")),
                    (Some(m), _) if n < m => Some(format!("{label} must be at least {m}")),
                    (_, Some(m)) if n > m => Some(format!("{label} must be at most {m}")),
                    _ => None,
                },
                _ => Some(format!("{label} must be a number")),
            },
            Rule::Integer { min } => match value.parse::<i64>() {
                Ok(n) if min.is_some_and(|m| n < m) => {
                    Some(format!("{label} must be at least {}", min.unwrap_or_default()))
                }
                Ok(_) => None,
                Err(_) => Some(format!("{label} must be a whole number")),
            },
            Rule::MinLength(n) => (value.chars().count() < *n)
                .then(|| format!("{label} must be at least {n} characters")),
            Rule::EqualsField(other, message) => {
                (values.get(other).map(String::as_str) != Some(raw)).then(|| message.to_string())
            }
            Rule::OneOf(allowed) => (!allowed.contains(&value)).then(|| format!("{label} is invalid")),
            Rule::Date => parse_date(value).is_none().then(|| format!("{label} must be a date (YYYY-MM-DD)")),
            Rule::Time => parse_time(value).is_none().then(|| format!("{label} must be a time (HH:MM)")),
            Rule::NotBefore(other, message) => {
                let other = values.get(other).map(|s| s.trim()).unwrap_or("");
                let earlier = match (parse_date(value), parse_date(other)) {
                    (Some(a), Some(b)) => a < b,
                    _ => matches!((parse_time(value), parse_time(other)), (Some(a), Some(b)) if a < b),
                };
                earlier.then(|| message.to_string())
            }
            Rule::After(other, message) => {
                let other = values.get(other).map(|s| s.trim()).unwrap_or("");
                matches!((parse_time(value), parse_time(other)), (Some(a), Some(b)) if a <= b)
                    .then(|| message.to_string())
            }
            Rule::AtMostField(other, message) => {
                let other = values.get(other).and_then(|s| s.trim().parse::<f64>().ok());
                matches!((value.parse::<f64>().ok(), other), (Some(a), Some(b)) if a > b)
                    .then(|| message.to_string())
            }
        };
        if violation.is_some() {
            return violation;
        }
    }
    None
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) need attention", .0.len())]
pub struct ValidationErrors(pub BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A submission of this form is already in flight.
    Pending,
    Invalid(ValidationErrors),
}

impl fmt::Display for SubmitBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitBlocked::Pending => write!(f, "A submission is already in progress"),
            SubmitBlocked::Invalid(errors) => {
                write!(f, "{}", errors.first().unwrap_or("Please correct the highlighted fields"))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    schema: FormSchema,
    values: BTreeMap<&'static str, String>,
    touched: BTreeSet<&'static str>,
    errors: BTreeMap<&'static str, String>,
    pending: bool,
}

impl FormState {
    pub fn new(schema: FormSchema) -> Self {
        let mut form = Self { schema, ..Default::default() };
        form.reset();
        form
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn flag(&self, name: &str) -> bool {
        self.value(name) == "true"
    }

    pub fn number(&self, name: &str) -> f64 {
        self.value(name).trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
    }

    pub fn integer(&self, name: &str) -> i64 {
        self.value(name).trim().parse().unwrap_or(0)
    }

    pub fn id(&self, name: &str) -> Option<i64> {
        self.value(name).trim().parse().ok().filter(|id| *id != 0)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.schema.is_required(name, &self.values)
    }

    /// Sets a value. Fields that were already validated once are re-checked
    /// right away so their inline error follows the input.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.values.insert(name, value.into());
        let dependents: Vec<&'static str> = self
            .schema
            .fields()
            .iter()
            .filter(|f| {
                self.touched.contains(f.name)
                    && (f.name == name
                        || f.required_when.is_some_and(|(other, _)| other == name)
                        || f.rules.iter().any(|r| matches!(r,
                            Rule::EqualsField(o, _) | Rule::NotBefore(o, _) | Rule::After(o, _) | Rule::AtMostField(o, _) if *o == name)))
            })
            .map(|f| f.name)
            .collect();
        for field in dependents {
            self.revalidate(field);
        }
    }

    pub fn set_flag(&mut self, name: &'static str, value: bool) {
        self.set(name, if value { "true" } else { "false" });
    }

    pub fn set_choice(&mut self, name: &'static str, choice: Option<&Lookup>) {
        self.set(name, choice.map(|c| c.id.to_string()).unwrap_or_default());
    }

    pub fn set_date(&mut self, name: &'static str, date: NaiveDate) {
        self.set(name, date.format(DATE_FORMAT).to_string());
    }

    /// Blur validation of a single field.
    pub fn touch(&mut self, name: &'static str) {
        self.touched.insert(name);
        self.revalidate(name);
    }

    fn revalidate(&mut self, name: &'static str) {
        match self.schema.field(name).and_then(|f| check(f, &self.values)) {
            Some(message) => self.errors.insert(name, message),
            None => self.errors.remove(name),
        };
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn validate_all(&mut self) -> Result<(), ValidationErrors> {
        self.errors.clear();
        let names: Vec<&'static str> = self.schema.fields().iter().map(|f| f.name).collect();
        for name in names {
            self.touched.insert(name);
            self.revalidate(name);
        }
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors.clone()))
        }
    }

    /// Validates every field and marks the form pending. While pending no
    /// second submission can start.
    pub fn begin_submit(&mut self) -> Result<(), SubmitBlocked> {
        if self.pending {
            return Err(SubmitBlocked::Pending);
        }
        self.validate_all().map_err(SubmitBlocked::Invalid)?;
        self.pending = true;
        Ok(())
    }

    /// Ends the in-flight submission. Success resets the form; failure keeps
    /// every entered value so the user can retry.
    pub fn finish_submit(&mut self, success: bool) {
        self.pending = false;
        if success {
            self.reset();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn reset(&mut self) {
        self.values = self.schema.fields().iter().map(|f| (f.name, f.default.to_string())).collect();
        self.touched.clear();
        self.errors.clear();
        self.pending = false;
    }

    /// Prefills the form for editing.
    pub fn load<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<String>,
    {
        self.reset();
        for (name, value) in values {
            self.values.insert(name, value.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSpec::new("name", "Name").required(),
            FieldSpec::new("mobile", "Mobile Number")
                .required()
                .rule(Rule::Pattern(&DIGITS, "Mobile Number must be 10 digits")),
            FieldSpec::new("fee", "Total Fee").default_value("0").required().rule(Rule::Number { min: Some(0.0), max: None }),
            FieldSpec::new("transport", "Transport").default_value("false"),
            FieldSpec::new("transport_fee", "Transport Fee")
                .required()
                .rule(Rule::Number { min: Some(0.0), max: None })
                .only_when("transport", "true"),
        ])
    }

    #[test]
    fn empty_required_field_blocks_submit() {
        let mut form = FormState::new(schema());
        form.set("mobile", "9876543210");
        let err = form.begin_submit().unwrap_err();
        match err {
            SubmitBlocked::Invalid(errors) => assert_eq!(errors.get("name"), Some("Name is required")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!form.is_pending());
        assert_eq!(form.error("name"), Some("Name is required"));
    }

    #[test]
    fn pattern_and_range_rules() {
        let mut form = FormState::new(schema());
        form.set("name", "Ravi");
        form.set("mobile", "12345");
        form.set("fee", "-5");
        assert!(form.validate_all().is_err());
        assert_eq!(form.error("mobile"), Some("Mobile Number must be 10 digits"));
        assert_eq!(form.error("fee"), Some("Total Fee must be positive"));
    }

    #[test]
    fn conditional_field_only_required_when_enabled() {
        let mut form = FormState::new(schema());
        form.set("name", "Ravi");
        form.set("mobile", "9876543210");
        assert!(form.validate_all().is_ok());
        assert!(!form.is_required("transport_fee"));

        form.set_flag("transport", true);
        assert!(form.is_required("transport_fee"));
        assert!(form.validate_all().is_err());
        assert_eq!(form.error("transport_fee"), Some("Transport Fee is required"));
    }

    #[test]
    fn pending_blocks_duplicate_submission() {
        let mut form = FormState::new(schema());
        form.set("name", "Ravi");
        form.set("mobile", "9876543210");
        assert!(form.begin_submit().is_ok());
        assert_eq!(form.begin_submit(), Err(SubmitBlocked::Pending));
    }

    #[test]
    fn failed_submit_keeps_values_and_success_resets() {
        let mut form = FormState::new(schema());
        form.set("name", "Ravi");
        form.set("mobile", "9876543210");
        form.begin_submit().unwrap();
        form.finish_submit(false);
        assert_eq!(form.value("name"), "Ravi");
        assert!(!form.is_pending());

        form.begin_submit().unwrap();
        form.finish_submit(true);
        assert_eq!(form.value("name"), "");
        assert_eq!(form.value("fee"), "0");
    }

    #[test]
    fn touched_field_revalidates_on_input() {
        let mut form = FormState::new(schema());
        form.touch("name");
        assert!(form.error("name").is_some());
        form.set("name", "R");
        assert!(form.error("name").is_none());
    }
}
