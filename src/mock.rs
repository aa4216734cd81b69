//! In-process stand-in for the REST backend.
//!
//! Serves the same paths and JSON shapes as the real server out of the local
//! store, so the adapter and the submission gateway run unchanged against it.
//! Every write is recorded for inspection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tracing::debug;

use crate::api::endpoints as ep;
use crate::db::{self, LocalStore, StoreError};
use crate::model::as_i64;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct MockBackend {
    store: LocalStore,
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MockBackend {
    /// Seeds the school reference data into `store` when it has none.
    pub fn new(store: LocalStore) -> Result<Self, StoreError> {
        store.with(db::seed_school)?;
        Ok(Self { store, writes: Arc::default(), reject_writes: Arc::default() })
    }

    /// Makes every following write answer `{status: "error"}`.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn recorded_writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, StoreError> {
        let path = path.trim_matches('/').to_string();
        let param = |key: &str| query.iter().find(|(k, _)| *k == key).and_then(|(_, v)| v.parse::<i64>().ok());
        let kind = query.iter().find(|(k, _)| *k == "type").map(|(_, v)| v.clone());
        let class_id = param("classId");
        let section_id = param("sectionId");
        debug!(%path, "mock GET");

        self.store
            .run(move |conn| {
                let value = match path.as_str() {
                    ep::CLASSES => json!(db::classes(conn)?),
                    ep::CLASSES_WITH_SECTIONS => json!(db::classrooms(conn)?),
                    ep::SECTIONS => json!(db::sections_of(conn, class_id.unwrap_or_default())?),
                    ep::STUDENTS => json!(db::list_documents(conn, db::STUDENT_DOC)?),
                    ep::STAFF => json!({ "data": db::list_documents(conn, db::STAFF_DOC)? }),
                    ep::ACTIVE_TEACHERS => {
                        let active: Vec<Value> = db::list_documents(conn, db::STAFF_DOC)?
                            .into_iter()
                            .filter(|s| s.get("isActive").and_then(Value::as_bool).unwrap_or(true))
                            .collect();
                        json!({ "data": active })
                    }
                    ep::MASTER => json!(db::master_options(conn, kind.as_deref().unwrap_or_default())?),
                    ep::FEE_STRUCTURE => json!(db::list_documents(conn, db::FEE_STRUCTURE_DOC)?),
                    ep::MARKSHEETS => json!(db::list_documents(conn, db::MARKSHEET_DOC)?),
                    ep::TIME_PERIODS_BY_CLASS_AND_SECTION => {
                        let periods: Vec<Value> = db::list_documents(conn, db::TIME_PERIOD_DOC)?
                            .into_iter()
                            .filter(|p| {
                                p.get("classId").and_then(as_i64) == class_id
                                    && p.get("sectionId").and_then(as_i64) == section_id
                            })
                            .collect();
                        json!(periods)
                    }
                    other => match other.strip_prefix("student/subjects/").and_then(|id| id.parse::<i64>().ok()) {
                        Some(id) => json!({ "subjects": db::subjects_of(conn, id)? }),
                        None => json!({ "status": "error", "message": format!("unknown path {other}") }),
                    },
                };
                Ok(value)
            })
            .await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, StoreError> {
        self.write("POST", path, body).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value, StoreError> {
        self.write("PUT", path, body).await
    }

    async fn write(&self, method: &'static str, path: &str, body: Value) -> Result<Value, StoreError> {
        let path = path.trim_matches('/').to_string();
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(RecordedWrite { method, path: path.clone(), body: body.clone() });
        }
        debug!(method, %path, "mock write");
        if self.reject_writes.load(Ordering::SeqCst) {
            return Ok(json!({ "status": "error", "message": "Server rejected the request" }));
        }

        self.store
            .run(move |conn| {
                let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::trim).unwrap_or_default().to_string();
                let num = |key: &str| body.get(key).and_then(as_i64);
                let id = if method == "PUT" { num("id") } else { None };
                let stored = match path.as_str() {
                    ep::SAVE_CLASSROOM => {
                        let name = text("className");
                        if name.is_empty() {
                            return Ok(rejected("Class name is required"));
                        }
                        db::insert_class(conn, &name)?
                    }
                    ep::SAVE_SECTION => {
                        let class_id = num("classId").unwrap_or_default();
                        if !db::class_exists(conn, class_id)? {
                            return Ok(rejected("Unknown class"));
                        }
                        db::insert_section(conn, class_id, &text("sectionName"))?
                    }
                    ep::CREATE_SUBJECT => {
                        let class_id = num("classId").unwrap_or_default();
                        if !db::class_exists(conn, class_id)? {
                            return Ok(rejected("Unknown class"));
                        }
                        db::insert_subject(conn, class_id, &text("subjectName"))?
                    }
                    ep::STUDENTS => db::upsert_document(conn, db::STUDENT_DOC, id, &body)?,
                    ep::STAFF => db::upsert_document(conn, db::STAFF_DOC, id, &body)?,
                    ep::FEE_STRUCTURE => db::upsert_document(conn, db::FEE_STRUCTURE_DOC, id, &body)?,
                    ep::MARKSHEETS => db::upsert_document(conn, db::MARKSHEET_DOC, id, &body)?,
                    ep::TIME_PERIODS => db::upsert_document(conn, db::TIME_PERIOD_DOC, id, &body)?,
                    other => return Ok(rejected(&format!("unknown path {other}"))),
                };
                Ok(json!({ "status": "success", "data": { "id": stored } }))
            })
            .await
            .or_else(|error| match error {
                StoreError::NotFound(what) => Ok(rejected(&format!("{what} does not exist"))),
                StoreError::Sqlite(e) => Ok(rejected(&e.to_string())),
                other => Err(other),
            })
    }
}

fn rejected(message: &str) -> Value {
    json!({ "status": "error", "message": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> MockBackend {
        MockBackend::new(LocalStore::in_memory().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn serves_lists_in_backend_shapes() {
        let mock = backend();
        let classes = mock.get(ep::CLASSES, &[]).await.unwrap();
        assert_eq!(classes[0], json!({"id": 1, "name": "LKG"}));
        let subjects = mock.get(&ep::subjects_of_class(1), &[]).await.unwrap();
        assert_eq!(subjects["subjects"].as_array().map(Vec::len), Some(2));
        let staff = mock.get(ep::STAFF, &[]).await.unwrap();
        assert!(staff["data"].is_array());
    }

    #[tokio::test]
    async fn strips_trailing_slash_of_write_paths() {
        let mock = backend();
        let ack = mock.post(ep::STUDENT_WRITE, json!({"firstName": "Ravi"})).await.unwrap();
        assert_eq!(ack["status"], "success");
        assert_eq!(mock.recorded_writes()[0].path, "student");
    }

    #[tokio::test]
    async fn put_of_missing_record_is_rejected() {
        let mock = backend();
        let ack = mock.put(ep::MARKSHEETS, json!({"id": 77, "classId": 1, "sectionId": 1})).await.unwrap();
        assert_eq!(ack["status"], "error");
    }

    #[tokio::test]
    async fn duplicate_class_name_is_rejected() {
        let mock = backend();
        let ack = mock.post(ep::SAVE_CLASSROOM, json!({"className": "LKG"})).await.unwrap();
        assert_eq!(ack["status"], "error");
    }
}
