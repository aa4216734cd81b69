//! Backend paths, relative to the configured base url.

pub const CLASSES: &str = "student/classes";
pub const CLASSES_WITH_SECTIONS: &str = "student/classeswithsections";
pub const SECTIONS: &str = "student/sections";
pub const SAVE_CLASSROOM: &str = "student/saveClassroom";
pub const SAVE_SECTION: &str = "student/saveSection";
pub const CREATE_SUBJECT: &str = "student/createSubject";

pub const STUDENTS: &str = "student";
pub const STUDENT_WRITE: &str = "student/";

pub const STAFF: &str = "staff";
pub const STAFF_WRITE: &str = "staff/";
pub const ACTIVE_TEACHERS: &str = "staff/activeTeachers";

pub const MASTER: &str = "master";
pub const FEE_STRUCTURE: &str = "master/fee-structure";
pub const MARKSHEETS: &str = "master/marksheets";
pub const TIME_PERIODS: &str = "master/timeperiods";
pub const TIME_PERIODS_BY_CLASS_AND_SECTION: &str = "master/timeperiodsByClassAndSection";

pub fn subjects_of_class(class_id: i64) -> String {
    format!("student/subjects/{class_id}")
}

pub fn sections_query(class_id: i64) -> Vec<(&'static str, String)> {
    vec![("classId", class_id.to_string())]
}

pub fn periods_query(class_id: i64, section_id: i64) -> Vec<(&'static str, String)> {
    vec![("classId", class_id.to_string()), ("sectionId", section_id.to_string())]
}

/// Master list kinds served by `GET master?type=`. The spelling is the
/// backend's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterKind {
    Gender,
    Qualification,
    Designation,
    StaffType,
    Status,
    FeeType,
    Occupation,
}

impl MasterKind {
    pub const ALL: [MasterKind; 7] = [
        MasterKind::Gender,
        MasterKind::Qualification,
        MasterKind::Designation,
        MasterKind::StaffType,
        MasterKind::Status,
        MasterKind::FeeType,
        MasterKind::Occupation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MasterKind::Gender => "gender",
            MasterKind::Qualification => "Qualification",
            MasterKind::Designation => "Desgination",
            MasterKind::StaffType => "StaffType",
            MasterKind::Status => "Status",
            MasterKind::FeeType => "FeeType",
            MasterKind::Occupation => "occupation",
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![("type", self.as_str().to_string())]
    }
}
