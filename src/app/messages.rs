use std::path::PathBuf;

use iced_aw::date_picker::Date;

use crate::api::{MasterKind, Outcome};
use crate::app::pages::{AttendanceTab, FormMsg};
use crate::app::state::Screen;
use crate::auth::Session;
use crate::model::{
    Appointment, AttendanceMark, Classroom, FeePayment, FeeStructure, Group, GroupMember, Holiday, Lookup,
    MarkEntry, ProgressNote, StaffRecord, StudentRecord, TimePeriod,
};

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Screen),
    Logout,
    ThemeSelected(&'static str),
    DismissToast(u64),
    OpenDatePicker(DateField),
    CancelDatePicker,
    DatePicked(DateField, Date),
    Export(ExportKind),
    Exported(Result<Option<PathBuf>, String>),
    /// Result of a task issued under the given view epoch.
    Loaded(u64, Loaded),

    Login(FormMsg),
    LoginPressed,
    Signup(FormMsg),
    SignupPressed,

    Appointments(AppointmentMsg),
    Students(StudentMsg),
    Staff(StaffMsg),
    Classrooms(ClassroomMsg),
    Subjects(SubjectMsg),
    Periods(PeriodMsg),
    Fees(FeeMsg),
    Marks(MarksMsg),
    PayFee(PayFeeMsg),
    Attendance(AttendanceMsg),
    Groups(GroupMsg),
    Holidays(HolidayMsg),
    Notes(NoteMsg),
}

/// Which date input a picker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Appointment,
    TransportStart,
    PeriodStart,
    PeriodEnd,
    Holiday,
    Attendance,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Students,
    FeeStructures,
}

/// Screens whose cascade issued a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeTarget {
    Students,
    Subjects,
    Periods,
    Marks,
    Attendance,
    Notes,
}

/// Writes whose outcome comes back through [`Loaded::Saved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Appointment,
    Student,
    Staff,
    Classroom,
    Section,
    Subject,
    Period,
    PeriodToggle,
    FeeStructure,
    Marks,
    Payment,
    Attendance,
    Group,
    GroupDeleted,
    Holiday,
    HolidayDeleted,
    Note,
}

#[derive(Debug, Clone)]
pub enum Loaded {
    SignedIn(Result<Session, String>),
    Classes(Vec<Lookup>),
    Classrooms(Vec<Classroom>),
    Master(MasterKind, Vec<Lookup>),
    Teachers(Vec<Lookup>),
    Students(Vec<StudentRecord>),
    Staff(Vec<StaffRecord>),
    FeeStructures(Vec<FeeStructure>),
    Marksheets(Vec<MarkEntry>),
    Holidays(Vec<Holiday>),
    Notes(Vec<ProgressNote>),
    Groups(Vec<Group>),
    Appointments(Vec<Appointment>),
    Hospitals(Vec<Lookup>),
    Designations(Vec<Lookup>),
    Doctors { designation_id: i64, items: Vec<Lookup> },
    Sections { target: CascadeTarget, ticket: u64, items: Vec<Lookup> },
    ClassSubjects { target: CascadeTarget, ticket: u64, items: Vec<Lookup> },
    Periods { ticket: u64, items: Vec<TimePeriod> },
    AttendanceMarks { ticket: u64, items: Vec<AttendanceMark> },
    Payments { student_id: i64, items: Vec<FeePayment> },
    Saved(SaveTarget, Outcome),
}

#[derive(Debug, Clone)]
pub enum AppointmentMsg {
    Form(FormMsg),
    DesignationPicked(Lookup),
    Submit,
}

#[derive(Debug, Clone)]
pub enum StudentMsg {
    Search(String),
    PrevPage,
    NextPage,
    New,
    Edit(StudentRecord),
    Close,
    Form(FormMsg),
    ClassPicked(Lookup),
    SectionPicked(Lookup),
    Submit,
}

#[derive(Debug, Clone)]
pub enum StaffMsg {
    Search(String),
    PrevPage,
    NextPage,
    New,
    Edit(StaffRecord),
    View(StaffRecord),
    CloseView,
    Close,
    Form(FormMsg),
    Submit,
}

#[derive(Debug, Clone)]
pub enum ClassroomMsg {
    AddClass,
    AddSection(Option<i64>),
    Close,
    ClassForm(FormMsg),
    SectionForm(FormMsg),
    SubmitClass,
    SubmitSection,
}

#[derive(Debug, Clone)]
pub enum SubjectMsg {
    ClassPicked(Lookup),
    Form(FormMsg),
    Submit,
}

#[derive(Debug, Clone)]
pub enum PeriodMsg {
    ClassPicked(Lookup),
    SectionPicked(Lookup),
    New,
    Edit(TimePeriod),
    Toggle(TimePeriod),
    Close,
    Form(FormMsg),
    Submit,
}

#[derive(Debug, Clone)]
pub enum FeeMsg {
    New,
    Edit(FeeStructure),
    Close,
    Form(FormMsg),
    ItemForm(FormMsg),
    AddItem,
    EditItem(usize),
    RemoveItem(usize),
    Submit,
}

#[derive(Debug, Clone)]
pub enum MarksMsg {
    New,
    Edit(MarkEntry),
    View(MarkEntry),
    CloseView,
    Close,
    ClassPicked(Lookup),
    SectionPicked(Lookup),
    AddRow,
    RemoveRow(usize),
    Row(usize, FormMsg),
    Submit,
}

#[derive(Debug, Clone)]
pub enum PayFeeMsg {
    StudentPicked(Lookup),
    Form(FormMsg),
    Submit,
}

#[derive(Debug, Clone)]
pub enum AttendanceMsg {
    Tab(AttendanceTab),
    ClassPicked(Lookup),
    SectionPicked(Lookup),
    Toggle(i64, bool),
    Save,
}

#[derive(Debug, Clone)]
pub enum GroupMsg {
    New,
    Edit(Group),
    Close,
    Form(FormMsg),
    AddMember(GroupMember),
    RemoveMember(String),
    Delete(i64),
    Submit,
}

#[derive(Debug, Clone)]
pub enum HolidayMsg {
    Form(FormMsg),
    Delete(i64),
    Submit,
}

#[derive(Debug, Clone)]
pub enum NoteMsg {
    ClassPicked(Lookup),
    SectionPicked(Lookup),
    Form(FormMsg),
    Submit,
}
