use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A lookup entry (class, section, subject, gender, occupation, fee type...).
///
/// The backend is inconsistent about the shape: `{id, name}`, `{id, value}`,
/// `{id, title}` and bare strings all occur. Everything is normalized into this
/// one type at the API boundary, see [`Lookup::from_value`].
/// An unset entry serializes as `null` and reads back as unset.
#[derive(Debug, Clone, Default, Deserialize, Eq)]
#[serde(try_from = "Value")]
pub struct Lookup {
    pub id: i64,
    pub name: String,
    pub kind: Option<String>,
}

impl Lookup {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), kind: None }
    }

    pub fn is_unset(&self) -> bool {
        self.id == 0 && self.name.is_empty()
    }

    /// Normalizes one raw option. `position` is the index inside the list it
    /// came from and is used as the id for bare strings (`position + 1`).
    pub fn from_value(value: &Value, position: usize) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => {
                Some(Self::new(position as i64 + 1, s.trim()))
            }
            Value::Object(map) => {
                let id = map.get("id").and_then(as_i64)?;
                let name = ["name", "value", "title", "label"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())?;
                let kind = map.get("type").and_then(Value::as_str).map(str::to_string);
                Some(Self { id, name: name.to_string(), kind })
            }
            _ => None,
        }
    }
}

fn is_blank_entry(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    let id = map.get("id").map_or(Some(0), as_i64);
    let labelled = ["name", "value", "title", "label"]
        .iter()
        .any(|key| map.get(*key).and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty()));
    id == Some(0) && !labelled
}

impl TryFrom<Value> for Lookup {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.is_null() || is_blank_entry(&value) {
            return Ok(Self::default());
        }
        Self::from_value(&value, 0).ok_or_else(|| format!("not a lookup entry: {value}"))
    }
}

impl Serialize for Lookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_unset() {
            return serializer.serialize_none();
        }
        let mut map = serializer.serialize_map(Some(if self.kind.is_some() { 3 } else { 2 }))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(kind) = &self.kind {
            map.serialize_entry("type", kind)?;
        }
        map.end()
    }
}

impl PartialEq for Lookup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Numbers arrive as numbers, numeric strings, empty strings or null.
pub(crate) fn flexible_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_f64(&value).unwrap_or(0.0))
}

pub(crate) fn flexible_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_i64(&value).unwrap_or(0))
}

pub(crate) fn flexible_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_i64(&value))
}

pub(crate) fn flexible_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// `true`, `"Active"`, `"true"` and `{value: "Active"}` all mean active.
pub(crate) fn flexible_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(truthy(&value))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "active" | "true" | "yes" | "1"),
        Value::Object(map) => map.get("value").or_else(|| map.get("name")).is_some_and(truthy),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    None,
    Percentage,
    Amount,
}

impl DiscountType {
    pub const ALL: &'static [DiscountType] = &[
        DiscountType::None,
        DiscountType::Percentage,
        DiscountType::Amount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::None => "none",
            DiscountType::Percentage => "percentage",
            DiscountType::Amount => "amount",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.as_str() == s)
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            DiscountType::None => "No Discount",
            DiscountType::Percentage => "Percentage (%)",
            DiscountType::Amount => "Fixed Amount (₹)",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDetails {
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_fee: f64,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub discount_value: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub final_amount: f64,
}

impl FeeDetails {
    pub fn new(total_fee: f64, discount_type: DiscountType, discount_value: f64) -> Self {
        Self {
            total_fee,
            discount_type,
            discount_value,
            final_amount: crate::fees::compute_final_amount(total_fee, discount_type, discount_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default, deserialize_with = "flexible_opt_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: Lookup,
    #[serde(default)]
    pub parent_name: String,
    #[serde(default)]
    pub mother_name: String,
    #[serde(default)]
    pub father_occupation: Lookup,
    #[serde(default)]
    pub mother_occupation: Lookup,
    #[serde(default, deserialize_with = "flexible_string")]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, alias = "selectedClass", deserialize_with = "flexible_i64")]
    pub class_id: i64,
    #[serde(default)]
    pub class_name: String,
    #[serde(default, alias = "selectedSection", deserialize_with = "flexible_i64")]
    pub section_id: i64,
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub fee_details: FeeDetails,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub transport_required: bool,
    #[serde(default)]
    pub transport_start: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub transport_fee: f64,
    #[serde(default = "yes", deserialize_with = "flexible_bool")]
    pub active: bool,
}

impl StudentRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    #[serde(default, deserialize_with = "flexible_opt_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: Lookup,
    #[serde(default)]
    pub qualification: Lookup,
    #[serde(default)]
    pub specialist: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub experience: String,
    #[serde(default)]
    pub designation: Lookup,
    #[serde(default)]
    pub staff_type: Lookup,
    #[serde(default, rename = "mobileNumber", alias = "mobile", deserialize_with = "flexible_string")]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub salary: f64,
    #[serde(default = "yes", rename = "isActive", alias = "active", deserialize_with = "flexible_bool")]
    pub active: bool,
    #[serde(default, rename = "isTransportRequired", alias = "transportRequired", deserialize_with = "flexible_bool")]
    pub transport_required: bool,
}

impl StaffRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Classroom {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(alias = "className")]
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Lookup>,
}

impl Classroom {
    pub fn as_lookup(&self) -> Lookup {
        Lookup::new(self.id, self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeItem {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub amount: f64,
    #[serde(default, alias = "type")]
    pub fee_type: Lookup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "yes")]
    pub is_required: bool,
}

/// Built-in fee types, used when the `FeeType` master list comes back empty.
pub fn default_fee_types() -> Vec<Lookup> {
    vec![
        Lookup::new(1, "School Fee"),
        Lookup::new(2, "Transport Fee"),
        Lookup::new(3, "Uniform Fee"),
        Lookup::new(4, "Other Fee"),
    ]
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructure {
    #[serde(default, deserialize_with = "flexible_opt_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub class_id: i64,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_amount: f64,
    #[serde(default)]
    pub fee_items: Vec<FeeItem>,
    #[serde(default = "one_term", deserialize_with = "flexible_i64")]
    pub number_of_terms: i64,
    #[serde(default = "yes")]
    pub is_active: bool,
}

fn one_term() -> i64 {
    1
}

impl FeeStructure {
    pub fn class(&self) -> Lookup {
        Lookup::new(self.class_id, self.class_name.clone())
    }

    /// Recomputes `total_amount` from the items. Called before every submit so
    /// the stored total is never a typed value.
    pub fn recompute_total(&mut self) {
        self.total_amount = crate::fees::total_amount(&self.fee_items);
    }

    pub fn per_term(&self) -> f64 {
        crate::fees::compute_per_term(self.total_amount, self.number_of_terms)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimePeriod {
    pub id: Option<i64>,
    pub class_id: i64,
    pub section_id: i64,
    pub name: String,
    pub subject: Lookup,
    pub teacher: Lookup,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSubject {
    #[serde(deserialize_with = "flexible_i64")]
    pub subject_id: i64,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub max_marks: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub pass_marks: i64,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntry {
    #[serde(default, deserialize_with = "flexible_opt_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "flexible_i64")]
    pub class_id: i64,
    #[serde(deserialize_with = "flexible_i64")]
    pub section_id: i64,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub subjects: Vec<MarkSubject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: i64,
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNote {
    pub id: i64,
    pub class_id: i64,
    pub section_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub note: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GroupMember {
    #[serde(rename_all = "camelCase")]
    Student { id: i64, name: String, class_name: String, section_name: String },
    Teacher { id: i64, name: String },
}

impl GroupMember {
    /// Stable key across members of both kinds, e.g. `student-3`.
    pub fn key(&self) -> String {
        match self {
            GroupMember::Student { id, .. } => format!("student-{id}"),
            GroupMember::Teacher { id, .. } => format!("teacher-{id}"),
        }
    }
}

impl fmt::Display for GroupMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupMember::Student { name, class_name, section_name, .. } => {
                write!(f, "{name} ({class_name}-{section_name})")
            }
            GroupMember::Teacher { name, .. } => write!(f, "{name} (Teacher)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub members: Vec<GroupMember>,
}

pub const PAYMENT_MODES: &[&str] = &["Cash", "Card", "UPI", "Cheque", "Bank Transfer"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayment {
    pub id: i64,
    pub student_id: i64,
    pub term: i64,
    pub amount: f64,
    pub mode: String,
    pub paid_on: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub date: String,
    pub class_id: i64,
    pub section_id: i64,
    pub student_id: i64,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    pub hospital: Lookup,
    pub designation: Lookup,
    pub doctor: Lookup,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_accepts_every_backend_shape() {
        assert_eq!(Lookup::from_value(&json!({"id": 3, "name": "LKG"}), 0), Some(Lookup::new(3, "LKG")));
        assert_eq!(Lookup::from_value(&json!({"id": "7", "value": "Male"}), 0), Some(Lookup::new(7, "Male")));
        assert_eq!(Lookup::from_value(&json!({"id": 2, "title": "Cardiologist"}), 0), Some(Lookup::new(2, "Cardiologist")));
        assert_eq!(Lookup::from_value(&json!("Engineer"), 4), Some(Lookup::new(5, "Engineer")));
        assert_eq!(Lookup::from_value(&json!({"name": "no id"}), 0), None);
        assert_eq!(Lookup::from_value(&json!(42), 0), None);
    }

    #[test]
    fn unset_lookup_reads_back_as_unset() {
        let value = serde_json::to_value(Lookup::default()).unwrap();
        assert!(value.is_null());
        assert_eq!(serde_json::from_value::<Lookup>(value).unwrap(), Lookup::default());
        let blank: Lookup = serde_json::from_value(json!({"id": 0, "name": ""})).unwrap();
        assert!(blank.is_unset());
        assert!(serde_json::from_value::<Lookup>(json!({"id": 4})).is_err());
    }

    #[test]
    fn set_lookup_survives_a_round_trip() {
        let lookup = Lookup { id: 17, name: "Active".into(), kind: Some("Status".into()) };
        let value = serde_json::to_value(&lookup).unwrap();
        assert_eq!(value, json!({"id": 17, "name": "Active", "type": "Status"}));
        let back: Lookup = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind.as_deref(), Some("Status"));
        assert_eq!(back, lookup);
    }

    #[test]
    fn student_with_unset_lookups_reads_back() {
        let student = StudentRecord { first_name: "Asha".into(), ..Default::default() };
        let value = serde_json::to_value(&student).unwrap();
        let back: StudentRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back.first_name, "Asha");
        assert!(back.gender.is_unset());
    }

    #[test]
    fn master_lookup_keeps_its_type() {
        let l = Lookup::from_value(&json!({"id": 17, "value": "Active", "type": "status"}), 0).unwrap();
        assert_eq!(l.kind.as_deref(), Some("status"));
    }

    #[test]
    fn staff_reads_backend_field_names() {
        let staff: StaffRecord = serde_json::from_value(json!({
            "id": 4,
            "firstName": "Asha",
            "lastName": "Rao",
            "gender": {"id": 1, "value": "Female", "type": "gender"},
            "mobileNumber": 9876543210u64,
            "salary": "25000",
            "isActive": {"id": 17, "value": "Active"},
            "isTransportRequired": false
        }))
        .unwrap();
        assert_eq!(staff.mobile, "9876543210");
        assert_eq!(staff.salary, 25000.0);
        assert!(staff.active);
        assert_eq!(staff.gender.name, "Female");
    }

    #[test]
    fn student_accepts_form_style_ids_and_string_flags() {
        let student: StudentRecord = serde_json::from_value(json!({
            "firstName": "Ravi",
            "selectedClass": 1,
            "selectedSection": "2",
            "gender": "Male",
            "active": "Inactive",
            "transportFee": ""
        }))
        .unwrap();
        assert_eq!(student.class_id, 1);
        assert_eq!(student.section_id, 2);
        assert!(!student.active);
        assert_eq!(student.transport_fee, 0.0);
    }

    #[test]
    fn group_member_serializes_with_type_tag() {
        let member = GroupMember::Teacher { id: 2, name: "Ms. Johnson".into() };
        assert_eq!(serde_json::to_value(&member).unwrap(), json!({"type": "teacher", "id": 2, "name": "Ms. Johnson"}));
        assert_eq!(member.key(), "teacher-2");
    }
}
