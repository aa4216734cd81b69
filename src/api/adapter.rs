//! Normalizes backend payloads into the crate's types.
//!
//! List endpoints are expected to answer with a JSON array. A few wrap it in
//! an envelope object (`data` for staff, `subjects` for class subjects). Any
//! other shape is treated as no data.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::warn;

use crate::model::{Lookup, MarkEntry, TimePeriod, as_i64};

/// Envelope key of `GET staff` and `GET staff/activeTeachers`.
pub const STAFF_ENVELOPE: &str = "data";
/// Envelope key of `GET student/subjects/{classId}`.
pub const SUBJECTS_ENVELOPE: &str = "subjects";

pub fn list_items(value: &Value, envelope: Option<&str>) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match envelope.and_then(|key| map.get(key)) {
            Some(Value::Array(items)) => items.clone(),
            _ => {
                warn!(?envelope, "list response is an object without a known envelope, using no data");
                Vec::new()
            }
        },
        Value::Null => Vec::new(),
        other => {
            warn!(kind = json_kind(other), "list response is not an array, using no data");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Option list. Entries without an id or label are dropped.
pub fn lookups(value: &Value, envelope: Option<&str>) -> Vec<Lookup> {
    list_items(value, envelope)
        .iter()
        .enumerate()
        .filter_map(|(position, item)| Lookup::from_value(item, position))
        .collect()
}

/// Decodes each list entry on its own; entries that do not fit `T` are
/// skipped with a warning instead of failing the whole list.
pub fn records<T: DeserializeOwned>(value: &Value, envelope: Option<&str>) -> Vec<T> {
    list_items(value, envelope)
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(position, %error, "skipping undecodable record");
                None
            }
        })
        .collect()
}

/// Staff rows carry `firstName`/`lastName` instead of a single label.
pub fn teachers(value: &Value) -> Vec<Lookup> {
    list_items(value, Some(STAFF_ENVELOPE))
        .iter()
        .enumerate()
        .filter_map(|(position, item)| {
            let id = item.get("id").and_then(as_i64)?;
            let first = item.get("firstName").and_then(Value::as_str).unwrap_or_default();
            let last = item.get("lastName").and_then(Value::as_str).unwrap_or_default();
            let name = format!("{first} {last}").trim().to_string();
            if name.is_empty() {
                Lookup::from_value(item, position)
            } else {
                Some(Lookup::new(id, name))
            }
        })
        .collect()
}

/// Subject either nested as an object or flattened into `subjectId` and
/// `subjectName`. Teacher likewise.
pub fn time_period_from_value(value: &Value, class_id: i64, section_id: i64) -> Option<TimePeriod> {
    let text = |key: &str| value.get(key).and_then(Value::as_str).unwrap_or_default().trim().to_string();
    let nested = |key: &str, id_key: &str, name_key: &str| -> Lookup {
        value
            .get(key)
            .and_then(|v| Lookup::from_value(v, 0))
            .or_else(|| {
                let id = value.get(id_key).and_then(as_i64)?;
                Some(Lookup::new(id, text(name_key)))
            })
            .unwrap_or_default()
    };
    let name = text("name");
    if name.is_empty() {
        return None;
    }
    let is_active = match value.get("isActive") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("active") || s == "true",
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        _ => true,
    };
    Some(TimePeriod {
        id: value.get("id").and_then(as_i64),
        class_id: value.get("classId").and_then(as_i64).unwrap_or(class_id),
        section_id: value.get("sectionId").and_then(as_i64).unwrap_or(section_id),
        name,
        subject: nested("subject", "subjectId", "subjectName"),
        teacher: nested("teacher", "teacherId", "teacherName"),
        start_date: text("startDate"),
        end_date: text("endDate"),
        start_time: text("startTime"),
        end_time: text("endTime"),
        is_active,
    })
}

pub fn time_periods(value: &Value, class_id: i64, section_id: i64) -> Vec<TimePeriod> {
    list_items(value, None)
        .iter()
        .filter_map(|item| time_period_from_value(item, class_id, section_id))
        .collect()
}

pub fn time_period_payload(period: &TimePeriod) -> Value {
    let mut body = json!({
        "classId": period.class_id,
        "sectionId": period.section_id,
        "name": period.name,
        "subjectId": period.subject.id,
        "teacherId": period.teacher.id,
        "startDate": period.start_date,
        "endDate": period.end_date,
        "startTime": period.start_time,
        "endTime": period.end_time,
        "isActive": period.is_active,
    });
    if let (Some(id), Some(map)) = (period.id, body.as_object_mut()) {
        map.insert("id".into(), json!(id));
    }
    body
}

/// Wire shape of a marksheet write.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub class_id: i64,
    pub section_id: i64,
    pub subjects: Vec<MarkLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkLine {
    pub subject_id: i64,
    pub max_marks: i64,
    pub pass_marks: i64,
    pub remark: String,
}

impl From<&MarkEntry> for MarksPayload {
    fn from(entry: &MarkEntry) -> Self {
        Self {
            id: entry.id,
            class_id: entry.class_id,
            section_id: entry.section_id,
            subjects: entry
                .subjects
                .iter()
                .map(|s| MarkLine {
                    subject_id: s.subject_id,
                    max_marks: s.max_marks,
                    pass_marks: s.pass_marks,
                    remark: s.remark.clone(),
                })
                .collect(),
        }
    }
}

pub fn section_payload(class_id: i64, section_name: &str) -> Value {
    json!({ "sectionName": section_name, "classId": class_id })
}

pub fn classroom_payload(class_name: &str) -> Value {
    json!({ "className": class_name })
}

pub fn subject_payload(class_id: i64, subject_name: &str) -> Value {
    json!({ "classId": class_id, "subjectName": subject_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarkSubject, StaffRecord};

    #[test]
    fn arrays_pass_through_and_other_shapes_are_empty() {
        assert_eq!(lookups(&json!([{"id": 1, "name": "LKG"}]), None), vec![Lookup::new(1, "LKG")]);
        assert!(lookups(&json!({"message": "oops"}), None).is_empty());
        assert!(lookups(&json!("error"), None).is_empty());
        assert!(lookups(&Value::Null, None).is_empty());
    }

    #[test]
    fn envelope_keys_unwrap_lists() {
        let subjects = json!({"subjects": [{"id": 1, "name": "Math"}, {"id": 2, "name": "English"}]});
        assert_eq!(lookups(&subjects, Some(SUBJECTS_ENVELOPE)).len(), 2);
        let staff = json!({"data": [{"id": 3, "firstName": "Anil", "mobileNumber": "9876543210"}]});
        let rows: Vec<StaffRecord> = records(&staff, Some(STAFF_ENVELOPE));
        assert_eq!(rows[0].first_name, "Anil");
    }

    #[test]
    fn undecodable_rows_are_skipped() {
        let rows: Vec<MarkEntry> = records(&json!([{"classId": 1, "sectionId": 2}, {"junk": true}]), None);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn teacher_names_join_first_and_last() {
        let t = teachers(&json!([{"id": 2, "firstName": "Mary", "lastName": "Johnson"}]));
        assert_eq!(t, vec![Lookup::new(2, "Mary Johnson")]);
    }

    #[test]
    fn time_period_accepts_nested_and_flat_subject() {
        let nested = time_period_from_value(
            &json!({"id": 1, "name": "P1", "subject": {"id": 4, "name": "Math"}, "startTime": "09:00"}),
            1,
            2,
        )
        .unwrap();
        assert_eq!(nested.subject, Lookup::new(4, "Math"));
        assert_eq!((nested.class_id, nested.section_id), (1, 2));
        let flat = time_period_from_value(&json!({"name": "P2", "subjectId": "5", "subjectName": "Art"}), 1, 2).unwrap();
        assert_eq!(flat.subject, Lookup::new(5, "Art"));
        assert!(flat.is_active);
    }

    #[test]
    fn marks_payload_has_the_backend_shape() {
        let entry = MarkEntry {
            id: None,
            class_id: 1,
            section_id: 1,
            class_name: "LKG".into(),
            section_name: "A".into(),
            subjects: vec![MarkSubject {
                subject_id: 1,
                subject_name: "Math".into(),
                max_marks: 100,
                pass_marks: 35,
                remark: String::new(),
            }],
        };
        assert_eq!(
            serde_json::to_value(MarksPayload::from(&entry)).unwrap(),
            json!({"classId": 1, "sectionId": 1, "subjects": [{"subjectId": 1, "maxMarks": 100, "passMarks": 35, "remark": ""}]})
        );
    }
}
