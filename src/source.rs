//! The data source every screen talks to.
//!
//! School data goes to the remote side (the live REST backend or the mock).
//! Entities without a backend endpoint always go to the local store. List
//! reads are fail-soft: any failure is logged and yields an empty list.

use serde_json::Value;
use tracing::{info, warn};

use crate::api::adapter::{self, MarksPayload, STAFF_ENVELOPE, SUBJECTS_ENVELOPE};
use crate::api::{ApiClient, ApiError, MasterKind, Outcome, endpoints as ep, interpret};
use crate::config::{Config, DataSourceKind};
use crate::db::{self, LocalStore, StoreError};
use crate::mock::MockBackend;
use crate::model::{
    Appointment, AttendanceMark, Classroom, FeePayment, FeeStructure, Group, Holiday, Lookup, MarkEntry,
    ProgressNote, StaffRecord, StudentRecord, TimePeriod,
};

#[derive(Debug, Clone)]
pub enum Remote {
    Live(ApiClient),
    Mock(MockBackend),
}

impl Remote {
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        match self {
            Remote::Live(client) => client.get(path, query).await,
            Remote::Mock(mock) => Ok(mock.get(path, query).await?),
        }
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        match self {
            Remote::Live(client) => client.post(path, &body).await,
            Remote::Mock(mock) => Ok(mock.post(path, body).await?),
        }
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        match self {
            Remote::Live(client) => client.put(path, &body).await,
            Remote::Mock(mock) => Ok(mock.put(path, body).await?),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataSource {
    remote: Remote,
    store: LocalStore,
}

impl DataSource {
    pub fn new(remote: Remote, store: LocalStore) -> Self {
        Self { remote, store }
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let store = LocalStore::open(&config.local_db_path)?;
        let remote = match config.data_source {
            DataSourceKind::Live => Remote::Live(ApiClient::new(&config.api_base_url)?),
            DataSourceKind::Mock => Remote::Mock(MockBackend::new(store.clone())?),
        };
        info!(source = ?config.data_source, url = %config.api_base_url, "data source ready");
        Ok(Self { remote, store })
    }

    /// Mock source over a fresh in-memory database.
    pub fn mock() -> Result<Self, SourceError> {
        let store = LocalStore::in_memory()?;
        Ok(Self { remote: Remote::Mock(MockBackend::new(store.clone())?), store })
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    async fn fetch(&self, what: &'static str, path: &str, query: &[(&str, String)]) -> Value {
        match self.remote.get(path, query).await {
            Ok(value) => value,
            Err(error) => {
                warn!(what, %error, "fetch failed, using no data");
                Value::Null
            }
        }
    }

    // Reference data

    pub async fn classes(&self) -> Vec<Lookup> {
        adapter::lookups(&self.fetch("classes", ep::CLASSES, &[]).await, None)
    }

    pub async fn sections(&self, class_id: i64) -> Vec<Lookup> {
        adapter::lookups(&self.fetch("sections", ep::SECTIONS, &ep::sections_query(class_id)).await, None)
    }

    pub async fn class_subjects(&self, class_id: i64) -> Vec<Lookup> {
        let value = self.fetch("subjects", &ep::subjects_of_class(class_id), &[]).await;
        adapter::lookups(&value, Some(SUBJECTS_ENVELOPE))
    }

    pub async fn classrooms(&self) -> Vec<Classroom> {
        adapter::records(&self.fetch("classrooms", ep::CLASSES_WITH_SECTIONS, &[]).await, None)
    }

    pub async fn master(&self, kind: MasterKind) -> Vec<Lookup> {
        adapter::lookups(&self.fetch("master options", ep::MASTER, &kind.query()).await, None)
    }

    pub async fn active_teachers(&self) -> Vec<Lookup> {
        adapter::teachers(&self.fetch("active teachers", ep::ACTIVE_TEACHERS, &[]).await)
    }

    // School records

    pub async fn students(&self) -> Vec<StudentRecord> {
        adapter::records(&self.fetch("students", ep::STUDENTS, &[]).await, None)
    }

    pub async fn staff(&self) -> Vec<StaffRecord> {
        adapter::records(&self.fetch("staff", ep::STAFF, &[]).await, Some(STAFF_ENVELOPE))
    }

    pub async fn fee_structures(&self) -> Vec<FeeStructure> {
        adapter::records(&self.fetch("fee structures", ep::FEE_STRUCTURE, &[]).await, None)
    }

    pub async fn marksheets(&self) -> Vec<MarkEntry> {
        adapter::records(&self.fetch("marksheets", ep::MARKSHEETS, &[]).await, None)
    }

    pub async fn time_periods(&self, class_id: i64, section_id: i64) -> Vec<TimePeriod> {
        let query = ep::periods_query(class_id, section_id);
        let value = self.fetch("time periods", ep::TIME_PERIODS_BY_CLASS_AND_SECTION, &query).await;
        adapter::time_periods(&value, class_id, section_id)
    }

    // Writes

    async fn create_or_update(&self, action: &str, path: &str, id: Option<i64>, body: Value) -> Outcome {
        let response = match id {
            Some(_) => self.remote.put(path, body).await,
            None => self.remote.post(path, body).await,
        };
        interpret(action, response)
    }

    pub async fn save_classroom(&self, name: String) -> Outcome {
        let response = self.remote.post(ep::SAVE_CLASSROOM, adapter::classroom_payload(&name)).await;
        interpret("add class", response)
    }

    pub async fn save_section(&self, class_id: i64, name: String) -> Outcome {
        let response = self.remote.post(ep::SAVE_SECTION, adapter::section_payload(class_id, &name)).await;
        interpret("add section", response)
    }

    pub async fn create_subject(&self, class_id: i64, name: String) -> Outcome {
        let response = self.remote.post(ep::CREATE_SUBJECT, adapter::subject_payload(class_id, &name)).await;
        interpret("add subject", response)
    }

    pub async fn save_student(&self, student: StudentRecord) -> Outcome {
        match serde_json::to_value(&student) {
            Ok(body) => self.create_or_update("save student", ep::STUDENT_WRITE, student.id, body).await,
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    pub async fn save_staff(&self, staff: StaffRecord) -> Outcome {
        match serde_json::to_value(&staff) {
            Ok(body) => self.create_or_update("save staff", ep::STAFF_WRITE, staff.id, body).await,
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    /// The total is recomputed from the items before sending.
    pub async fn save_fee_structure(&self, mut structure: FeeStructure) -> Outcome {
        structure.recompute_total();
        match serde_json::to_value(&structure) {
            Ok(body) => self.create_or_update("save fee structure", ep::FEE_STRUCTURE, structure.id, body).await,
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    pub async fn save_marks(&self, entry: MarkEntry) -> Outcome {
        match serde_json::to_value(MarksPayload::from(&entry)) {
            Ok(body) => self.create_or_update("save marks", ep::MARKSHEETS, entry.id, body).await,
            Err(e) => Outcome::failure(e.to_string()),
        }
    }

    pub async fn save_time_period(&self, period: TimePeriod) -> Outcome {
        let body = adapter::time_period_payload(&period);
        self.create_or_update("save time period", ep::TIME_PERIODS, period.id, body).await
    }

    // Local-only entities

    async fn local_list<T, F>(&self, what: &'static str, f: F) -> Vec<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<Vec<T>, StoreError> + Send + 'static,
    {
        self.store.run(f).await.unwrap_or_else(|error| {
            warn!(what, %error, "local read failed, using no data");
            Vec::new()
        })
    }

    async fn local_write<T, F>(&self, action: &'static str, f: F) -> Outcome
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T, StoreError> + Send + 'static,
    {
        match self.store.run(f).await {
            Ok(_) => {
                info!(action, "saved locally");
                Outcome::success()
            }
            Err(error) => {
                warn!(action, %error, "local write failed");
                Outcome::failure(format!("Failed to {action}: {error}"))
            }
        }
    }

    pub async fn holidays(&self) -> Vec<Holiday> {
        self.local_list("holidays", db::holidays).await
    }

    pub async fn add_holiday(&self, name: String, date: String) -> Outcome {
        self.local_write("add holiday", move |conn| db::insert_holiday(conn, &name, &date)).await
    }

    pub async fn delete_holiday(&self, id: i64) -> Outcome {
        self.local_write("delete holiday", move |conn| db::delete_holiday(conn, id)).await
    }

    pub async fn progress_notes(&self) -> Vec<ProgressNote> {
        self.local_list("progress notes", db::progress_notes).await
    }

    pub async fn add_progress_note(&self, note: ProgressNote) -> Outcome {
        self.local_write("save progress note", move |conn| db::insert_progress_note(conn, &note)).await
    }

    pub async fn groups(&self) -> Vec<Group> {
        self.local_list("groups", |conn| db::documents(conn, db::GROUP_DOC)).await
    }

    pub async fn save_group(&self, group: Group) -> Outcome {
        let id = (group.id != 0).then_some(group.id);
        self.local_write("save group", move |conn| db::upsert_document(conn, db::GROUP_DOC, id, &group)).await
    }

    pub async fn delete_group(&self, id: i64) -> Outcome {
        self.local_write("delete group", move |conn| db::delete_document(conn, db::GROUP_DOC, id)).await
    }

    pub async fn payments(&self, student_id: i64) -> Vec<FeePayment> {
        self.local_list("payments", move |conn| db::payments_of(conn, student_id)).await
    }

    pub async fn record_payment(&self, payment: FeePayment) -> Outcome {
        self.local_write("record payment", move |conn| db::insert_payment(conn, &payment)).await
    }

    pub async fn attendance(&self, class_id: i64, section_id: i64, from: String, to: String) -> Vec<AttendanceMark> {
        self.local_list("attendance", move |conn| db::attendance_between(conn, class_id, section_id, &from, &to))
            .await
    }

    pub async fn save_attendance(&self, marks: Vec<AttendanceMark>) -> Outcome {
        self.local_write("save attendance", move |conn| db::save_attendance(conn, &marks)).await
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.local_list("appointments", |conn| db::documents(conn, db::APPOINTMENT_DOC)).await
    }

    pub async fn book_appointment(&self, appointment: Appointment) -> Outcome {
        self.local_write("book appointment", move |conn| {
            db::upsert_document(conn, db::APPOINTMENT_DOC, None, &appointment)
        })
        .await
    }

    pub async fn hospitals(&self) -> Vec<Lookup> {
        self.local_list("hospitals", db::hospitals).await
    }

    pub async fn designations(&self) -> Vec<Lookup> {
        self.local_list("designations", db::designations).await
    }

    pub async fn doctors(&self, designation_id: i64) -> Vec<Lookup> {
        self.local_list("doctors", move |conn| db::doctors_of(conn, designation_id)).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
