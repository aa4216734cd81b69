//! Local SQLite store.
//!
//! Holds the entities that have no backend endpoint (holidays, progress notes,
//! groups, fee payments, attendance, appointments, local accounts) and, for
//! the mock data source, the school data itself.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{AttendanceMark, Classroom, FeePayment, Holiday, Lookup, ProgressNote};

pub const MEMORY: &str = ":memory:";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored document is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database lock poisoned")]
    Poisoned,
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("{0} not found")]
    NotFound(String),
}

/// Shared handle to the SQLite connection. Work is run on the blocking pool.
#[derive(Debug, Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == MEMORY { Connection::open_in_memory()? } else { Connection::open(path)? };
        init_schema(&conn)?;
        seed_appointment_references(&conn)?;
        info!(path, "local store opened");
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(MEMORY)
    }

    /// Runs `f` against the connection on tokio's blocking pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }

    /// Synchronous access, for setup code that runs before the event loop.
    pub fn with<T>(&self, f: impl FnOnce(&Connection) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let guard = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&guard)
    }
}

pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS classes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id INTEGER NOT NULL REFERENCES classes(id),
            name TEXT NOT NULL,
            UNIQUE (class_id, name)
        );
        CREATE TABLE IF NOT EXISTS subjects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id INTEGER NOT NULL REFERENCES classes(id),
            name TEXT NOT NULL,
            UNIQUE (class_id, name)
        );
        CREATE TABLE IF NOT EXISTS master_options (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            value TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            body TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS holidays (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            date TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS progress_notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id INTEGER NOT NULL,
            section_id INTEGER NOT NULL,
            student_id INTEGER NOT NULL,
            student_name TEXT NOT NULL,
            note TEXT NOT NULL,
            date TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS attendance (
            date TEXT NOT NULL,
            class_id INTEGER NOT NULL,
            section_id INTEGER NOT NULL,
            student_id INTEGER NOT NULL,
            present INTEGER NOT NULL,
            PRIMARY KEY (date, student_id)
        );
        CREATE TABLE IF NOT EXISTS fee_payments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL,
            term INTEGER NOT NULL,
            amount REAL NOT NULL,
            mode TEXT NOT NULL,
            paid_on TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS hospitals (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS designations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS doctors (
            id INTEGER PRIMARY KEY,
            designation_id INTEGER NOT NULL REFERENCES designations(id),
            name TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

fn is_empty(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(count == 0)
}

fn seed_appointment_references(conn: &Connection) -> Result<(), StoreError> {
    if !is_empty(conn, "hospitals")? {
        return Ok(());
    }
    for (id, name) in [(1, "City Hospital"), (2, "Green Valley Clinic"), (3, "Sunrise Medical Center")] {
        conn.execute("INSERT INTO hospitals (id, name) VALUES (?1, ?2)", params![id, name])?;
    }
    for (id, name) in [(1, "Cardiologist"), (2, "Pediatrician"), (3, "Dermatologist")] {
        conn.execute("INSERT INTO designations (id, name) VALUES (?1, ?2)", params![id, name])?;
    }
    for (id, designation, name) in [
        (1, 1, "Dr. Meera Iyer"),
        (2, 1, "Dr. Arjun Shah"),
        (3, 2, "Dr. Kavya Nair"),
        (4, 2, "Dr. Rahul Verma"),
        (5, 3, "Dr. Sana Khan"),
    ] {
        conn.execute(
            "INSERT INTO doctors (id, designation_id, name) VALUES (?1, ?2, ?3)",
            params![id, designation, name],
        )?;
    }
    Ok(())
}

/// Reference data of the mock data source. Does nothing when classes exist.
pub fn seed_school(conn: &Connection) -> Result<(), StoreError> {
    if !is_empty(conn, "classes")? {
        return Ok(());
    }
    let classes: [(&str, &[&str]); 4] = [
        ("LKG", &["Math", "English"]),
        ("UKG", &["Math", "English", "EVS"]),
        ("Class 1", &["Mathematics", "English", "Science", "Hindi"]),
        ("Class 2", &["Mathematics", "English", "Science", "Hindi"]),
    ];
    for (name, subjects) in classes {
        let class_id = insert_class(conn, name)?;
        for section in ["A", "B"] {
            insert_section(conn, class_id, section)?;
        }
        for subject in subjects {
            insert_subject(conn, class_id, subject)?;
        }
    }

    let masters: &[(i64, &str, &str)] = &[
        (1, "gender", "Male"),
        (2, "gender", "Female"),
        (3, "gender", "Other"),
        (4, "Qualification", "B.Ed"),
        (5, "Qualification", "M.Ed"),
        (6, "Qualification", "M.Sc"),
        (7, "Qualification", "B.A."),
        (8, "Desgination", "Teacher"),
        (9, "Desgination", "Principal"),
        (10, "Desgination", "Clerk"),
        (11, "StaffType", "Teaching"),
        (12, "StaffType", "Non-Teaching"),
        (13, "FeeType", "School Fee"),
        (14, "FeeType", "Transport Fee"),
        (15, "FeeType", "Uniform Fee"),
        (16, "FeeType", "Other Fee"),
        (17, "Status", "Active"),
        (18, "Status", "Inactive"),
        (19, "occupation", "Engineer"),
        (20, "occupation", "Doctor"),
        (21, "occupation", "Farmer"),
        (22, "occupation", "Business"),
        (23, "occupation", "Teacher"),
        (24, "occupation", "Homemaker"),
    ];
    for (id, kind, value) in masters {
        conn.execute(
            "INSERT INTO master_options (id, kind, value) VALUES (?1, ?2, ?3)",
            params![id, kind, value],
        )?;
    }

    for staff in [
        serde_json::json!({
            "firstName": "Mary", "lastName": "Johnson",
            "gender": {"id": 2, "value": "Female", "type": "gender"},
            "designation": {"id": 8, "value": "Teacher", "type": "Desgination"},
            "staffType": {"id": 11, "value": "Teaching", "type": "StaffType"},
            "mobileNumber": "9876500001", "email": "mary.johnson@school.in",
            "salary": 32000, "isActive": true, "isTransportRequired": false
        }),
        serde_json::json!({
            "firstName": "Ravi", "lastName": "Kumar",
            "gender": {"id": 1, "value": "Male", "type": "gender"},
            "designation": {"id": 8, "value": "Teacher", "type": "Desgination"},
            "staffType": {"id": 11, "value": "Teaching", "type": "StaffType"},
            "mobileNumber": "9876500002", "email": "ravi.kumar@school.in",
            "salary": 30000, "isActive": true, "isTransportRequired": true
        }),
    ] {
        upsert_document(conn, STAFF_DOC, None, &staff)?;
    }
    info!("mock school data seeded");
    Ok(())
}

// Document kinds

pub const STUDENT_DOC: &str = "student";
pub const STAFF_DOC: &str = "staff";
pub const FEE_STRUCTURE_DOC: &str = "fee_structure";
pub const MARKSHEET_DOC: &str = "marksheet";
pub const TIME_PERIOD_DOC: &str = "time_period";
pub const GROUP_DOC: &str = "group";
pub const APPOINTMENT_DOC: &str = "appointment";

/// All documents of `kind`, each with its row id written into `id`.
pub fn list_documents(conn: &Connection, kind: &str) -> Result<Vec<Value>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, body FROM documents WHERE kind = ?1 ORDER BY id")?;
    let rows = stmt.query_map([kind], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
    let mut documents = Vec::new();
    for row in rows {
        let (id, body) = row?;
        let mut value: Value = serde_json::from_str(&body)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("id".into(), Value::from(id));
        }
        documents.push(value);
    }
    Ok(documents)
}

pub fn documents<T: DeserializeOwned>(conn: &Connection, kind: &str) -> Result<Vec<T>, StoreError> {
    list_documents(conn, kind)?
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(StoreError::from))
        .collect()
}

/// Inserts (`id == None`) or replaces a document and returns its id.
pub fn upsert_document<T: Serialize + ?Sized>(
    conn: &Connection,
    kind: &str,
    id: Option<i64>,
    body: &T,
) -> Result<i64, StoreError> {
    let body = serde_json::to_string(body)?;
    match id {
        Some(id) => {
            let changed = conn.execute(
                "UPDATE documents SET body = ?1 WHERE id = ?2 AND kind = ?3",
                params![body, id, kind],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("{kind} #{id}")));
            }
            debug!(kind, id, "document replaced");
            Ok(id)
        }
        None => {
            conn.execute("INSERT INTO documents (kind, body) VALUES (?1, ?2)", params![kind, body])?;
            let id = conn.last_insert_rowid();
            debug!(kind, id, "document inserted");
            Ok(id)
        }
    }
}

pub fn delete_document(conn: &Connection, kind: &str, id: i64) -> Result<(), StoreError> {
    conn.execute("DELETE FROM documents WHERE id = ?1 AND kind = ?2", params![id, kind])?;
    Ok(())
}

// Classes, sections, subjects

pub fn classes(conn: &Connection) -> Result<Vec<Lookup>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM classes ORDER BY id")?;
    let rows = stmt.query_map([], |row| Ok(Lookup::new(row.get(0)?, row.get::<_, String>(1)?)))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn sections_of(conn: &Connection, class_id: i64) -> Result<Vec<Lookup>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM sections WHERE class_id = ?1 ORDER BY name")?;
    let rows = stmt.query_map([class_id], |row| Ok(Lookup::new(row.get(0)?, row.get::<_, String>(1)?)))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn classrooms(conn: &Connection) -> Result<Vec<Classroom>, StoreError> {
    classes(conn)?
        .into_iter()
        .map(|class| {
            Ok(Classroom { sections: sections_of(conn, class.id)?, id: class.id, name: class.name })
        })
        .collect()
}

pub fn class_exists(conn: &Connection, class_id: i64) -> Result<bool, StoreError> {
    Ok(conn
        .query_row("SELECT 1 FROM classes WHERE id = ?1", [class_id], |_| Ok(()))
        .optional()?
        .is_some())
}

pub fn insert_class(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT INTO classes (name) VALUES (?1)", [name.trim()])?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_section(conn: &Connection, class_id: i64, name: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT INTO sections (class_id, name) VALUES (?1, ?2)", params![class_id, name.trim()])?;
    Ok(conn.last_insert_rowid())
}

pub fn subjects_of(conn: &Connection, class_id: i64) -> Result<Vec<Lookup>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM subjects WHERE class_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map([class_id], |row| Ok(Lookup::new(row.get(0)?, row.get::<_, String>(1)?)))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn insert_subject(conn: &Connection, class_id: i64, name: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT INTO subjects (class_id, name) VALUES (?1, ?2)", params![class_id, name.trim()])?;
    Ok(conn.last_insert_rowid())
}

/// Master options in the backend's `{id, value, type}` shape.
pub fn master_options(conn: &Connection, kind: &str) -> Result<Vec<Value>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, value, kind FROM master_options WHERE kind = ?1 ORDER BY id")?;
    let rows = stmt.query_map([kind], |row| {
        Ok(serde_json::json!({
            "id": row.get::<_, i64>(0)?,
            "value": row.get::<_, String>(1)?,
            "type": row.get::<_, String>(2)?,
        }))
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// Accounts

/// Name and password hash of the account registered under `email`.
pub fn find_user(conn: &Connection, email: &str) -> Result<Option<(String, String)>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT name, password_hash FROM users WHERE email = ?1 COLLATE NOCASE",
            [email.trim()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?)
}

pub fn is_email_taken(conn: &Connection, email: &str) -> Result<bool, StoreError> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM users WHERE email = ?1 COLLATE NOCASE", [email.trim()], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn register_user(conn: &Connection, name: &str, email: &str, password_hash: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO users (name, email, password_hash) VALUES (?1, ?2, ?3)",
        params![name.trim(), email.trim(), password_hash],
    )?;
    Ok(())
}

// Holidays

pub fn holidays(conn: &Connection) -> Result<Vec<Holiday>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, date FROM holidays ORDER BY date, id")?;
    let rows = stmt.query_map([], |row| Ok(Holiday { id: row.get(0)?, name: row.get(1)?, date: row.get(2)? }))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn insert_holiday(conn: &Connection, name: &str, date: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT INTO holidays (name, date) VALUES (?1, ?2)", params![name.trim(), date])?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_holiday(conn: &Connection, id: i64) -> Result<(), StoreError> {
    conn.execute("DELETE FROM holidays WHERE id = ?1", [id])?;
    Ok(())
}

// Progress notes

pub fn progress_notes(conn: &Connection) -> Result<Vec<ProgressNote>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, class_id, section_id, student_id, student_name, note, date
         FROM progress_notes ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ProgressNote {
            id: row.get(0)?,
            class_id: row.get(1)?,
            section_id: row.get(2)?,
            student_id: row.get(3)?,
            student_name: row.get(4)?,
            note: row.get(5)?,
            date: row.get(6)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn insert_progress_note(conn: &Connection, note: &ProgressNote) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO progress_notes (class_id, section_id, student_id, student_name, note, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![note.class_id, note.section_id, note.student_id, note.student_name, note.note.trim(), note.date],
    )?;
    Ok(conn.last_insert_rowid())
}

// Attendance

pub fn attendance_between(
    conn: &Connection,
    class_id: i64,
    section_id: i64,
    from: &str,
    to: &str,
) -> Result<Vec<AttendanceMark>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT date, class_id, section_id, student_id, present FROM attendance
         WHERE class_id = ?1 AND section_id = ?2 AND date >= ?3 AND date <= ?4
         ORDER BY date, student_id",
    )?;
    let rows = stmt.query_map(params![class_id, section_id, from, to], |row| {
        Ok(AttendanceMark {
            date: row.get(0)?,
            class_id: row.get(1)?,
            section_id: row.get(2)?,
            student_id: row.get(3)?,
            present: row.get::<_, i64>(4)? != 0,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Saves one day of marks. A student marked twice on the same date keeps the
/// latest value.
pub fn save_attendance(conn: &Connection, marks: &[AttendanceMark]) -> Result<usize, StoreError> {
    let mut stmt = conn.prepare(
        "INSERT INTO attendance (date, class_id, section_id, student_id, present)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (date, student_id) DO UPDATE SET
            class_id = excluded.class_id,
            section_id = excluded.section_id,
            present = excluded.present",
    )?;
    for mark in marks {
        stmt.execute(params![mark.date, mark.class_id, mark.section_id, mark.student_id, mark.present as i64])?;
    }
    Ok(marks.len())
}

// Fee payments

pub fn payments_of(conn: &Connection, student_id: i64) -> Result<Vec<FeePayment>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, term, amount, mode, paid_on FROM fee_payments
         WHERE student_id = ?1 ORDER BY paid_on, id",
    )?;
    let rows = stmt.query_map([student_id], |row| {
        Ok(FeePayment {
            id: row.get(0)?,
            student_id: row.get(1)?,
            term: row.get(2)?,
            amount: row.get(3)?,
            mode: row.get(4)?,
            paid_on: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn insert_payment(conn: &Connection, payment: &FeePayment) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO fee_payments (student_id, term, amount, mode, paid_on) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![payment.student_id, payment.term, payment.amount, payment.mode, payment.paid_on],
    )?;
    Ok(conn.last_insert_rowid())
}

// Appointment reference data

fn named_rows(conn: &Connection, sql: &str, param: Option<i64>) -> Result<Vec<Lookup>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let map = |row: &rusqlite::Row<'_>| Ok(Lookup::new(row.get(0)?, row.get::<_, String>(1)?));
    let rows = match param {
        Some(p) => stmt.query_map([p], map)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

pub fn hospitals(conn: &Connection) -> Result<Vec<Lookup>, StoreError> {
    named_rows(conn, "SELECT id, name FROM hospitals ORDER BY id", None)
}

pub fn designations(conn: &Connection) -> Result<Vec<Lookup>, StoreError> {
    named_rows(conn, "SELECT id, name FROM designations ORDER BY id", None)
}

pub fn doctors_of(conn: &Connection, designation_id: i64) -> Result<Vec<Lookup>, StoreError> {
    named_rows(conn, "SELECT id, name FROM doctors WHERE designation_id = ?1 ORDER BY id", Some(designation_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        seed_appointment_references(&conn).unwrap();
        seed_school(&conn).unwrap();
        conn
    }

    #[test]
    fn seeded_lkg_has_two_sections_and_subjects() {
        let conn = store();
        let lkg = classes(&conn).unwrap().into_iter().find(|c| c.name == "LKG").unwrap();
        let sections: Vec<String> = sections_of(&conn, lkg.id).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(sections, ["A", "B"]);
        let subjects: Vec<String> = subjects_of(&conn, lkg.id).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(subjects, ["Math", "English"]);
    }

    #[test]
    fn seeding_twice_is_a_no_op() {
        let conn = store();
        seed_school(&conn).unwrap();
        assert_eq!(classes(&conn).unwrap().len(), 4);
    }

    #[test]
    fn documents_get_their_row_id() {
        let conn = store();
        let id = upsert_document(&conn, GROUP_DOC, None, &json!({"name": "Choir", "members": []})).unwrap();
        upsert_document(&conn, GROUP_DOC, Some(id), &json!({"name": "Senior Choir", "members": []})).unwrap();
        let docs = list_documents(&conn, GROUP_DOC).unwrap();
        assert_eq!(docs, vec![json!({"id": id, "name": "Senior Choir", "members": []})]);
        assert!(matches!(upsert_document(&conn, GROUP_DOC, Some(999), &json!({})), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn attendance_keeps_latest_mark_per_day() {
        let conn = store();
        let mark = |present| AttendanceMark {
            date: "2024-07-01".into(),
            class_id: 1,
            section_id: 1,
            student_id: 5,
            present,
        };
        save_attendance(&conn, &[mark(true)]).unwrap();
        save_attendance(&conn, &[mark(false)]).unwrap();
        let marks = attendance_between(&conn, 1, 1, "2024-07-01", "2024-07-31").unwrap();
        assert_eq!(marks, vec![mark(false)]);
    }

    #[test]
    fn email_lookup_ignores_case() {
        let conn = store();
        register_user(&conn, "Admin", "admin@school.in", "hash").unwrap();
        assert!(is_email_taken(&conn, "ADMIN@school.in").unwrap());
        assert_eq!(find_user(&conn, "Admin@School.in").unwrap(), Some(("Admin".into(), "hash".into())));
    }

    #[test]
    fn doctors_follow_designation() {
        let conn = store();
        let names: Vec<String> = doctors_of(&conn, 2).unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["Dr. Kavya Nair", "Dr. Rahul Verma"]);
    }
}
