use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use iced::Theme;

use crate::api::MasterKind;
use crate::app::messages::DateField;
use crate::app::pages::{
    AppointmentsPage, AttendancePage, ClassroomsPage, FeeStructurePage, GroupsPage, HolidaysPage, MarksPage,
    NotesPage, PayFeePage, PeriodsPage, StaffPage, StudentsPage, SubjectsPage,
};
use crate::auth::{LocalAuth, Session};
use crate::config::Config;
use crate::forms::{FormState, schemas};
use crate::model::{
    Appointment, Classroom, FeeStructure, Group, Holiday, Lookup, MarkEntry, ProgressNote, StaffRecord,
    StudentRecord, default_fee_types,
};
use crate::source::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Dashboard,
    Appointments,
    Students,
    Staff,
    Classrooms,
    Subjects,
    Periods,
    FeeStructure,
    Marks,
    PayFee,
    Attendance,
    Groups,
    Holidays,
    ProgressNotes,
    Settings,
}

impl Screen {
    pub fn needs_session(&self) -> bool {
        !matches!(self, Screen::Login | Screen::Signup)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Screen::Login => "Sign in",
            Screen::Signup => "Sign up",
            Screen::Dashboard => "Dashboard",
            Screen::Appointments => "Appointments",
            Screen::Students => "Students",
            Screen::Staff => "Staff",
            Screen::Classrooms => "Classes",
            Screen::Subjects => "Subjects",
            Screen::Periods => "Time Periods",
            Screen::FeeStructure => "Fee Structure",
            Screen::Marks => "Marks",
            Screen::PayFee => "Pay Student Fee",
            Screen::Attendance => "Attendance",
            Screen::Groups => "Groups",
            Screen::Holidays => "Holidays",
            Screen::ProgressNotes => "Progress Notes",
            Screen::Settings => "Settings",
        })
    }
}

static DEFAULT_FEE_TYPES: LazyLock<Vec<Lookup>> = LazyLock::new(default_fee_types);

/// Records fetched for the current screen. Refilled on every screen entry.
#[derive(Debug, Clone, Default)]
pub struct SchoolData {
    pub classes: Vec<Lookup>,
    pub classrooms: Vec<Classroom>,
    pub masters: HashMap<MasterKind, Vec<Lookup>>,
    pub teachers: Vec<Lookup>,
    pub students: Vec<StudentRecord>,
    pub staff: Vec<StaffRecord>,
    pub fee_structures: Vec<FeeStructure>,
    pub marksheets: Vec<MarkEntry>,
    pub holidays: Vec<Holiday>,
    pub notes: Vec<ProgressNote>,
    pub groups: Vec<Group>,
    pub appointments: Vec<Appointment>,
    pub hospitals: Vec<Lookup>,
    pub designations: Vec<Lookup>,
}

impl SchoolData {
    pub fn master(&self, kind: MasterKind) -> &[Lookup] {
        self.masters.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fee types from the master list, or the built-in ones when it is empty.
    pub fn fee_types(&self) -> &[Lookup] {
        match self.master(MasterKind::FeeType) {
            [] => DEFAULT_FEE_TYPES.as_slice(),
            types => types,
        }
    }

    pub fn class_name(&self, class_id: i64) -> String {
        self.classes
            .iter()
            .find(|c| c.id == class_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Class #{class_id}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub source: DataSource,
    pub auth: LocalAuth,
    pub session: Option<Session>,
    pub screen: Screen,
    /// Bumped on every screen entry; results of older epochs are dropped.
    pub epoch: u64,
    pub data: SchoolData,
    pub toasts: Vec<Toast>,
    pub(crate) next_toast: u64,
    pub date_picker: Option<DateField>,
    //
    pub login: FormState,
    pub signup: FormState,
    pub auth_error: Option<String>,
    //
    pub appointments: AppointmentsPage,
    pub students: StudentsPage,
    pub staff: StaffPage,
    pub classrooms: ClassroomsPage,
    pub subjects: SubjectsPage,
    pub periods: PeriodsPage,
    pub fees: FeeStructurePage,
    pub marks: MarksPage,
    pub pay_fee: PayFeePage,
    pub attendance: AttendancePage,
    pub groups: GroupsPage,
    pub holidays: HolidaysPage,
    pub notes: NotesPage,
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl App {
    pub fn new(config: Config, source: DataSource) -> Self {
        let page_size = config.page_size;
        let today = today();
        Self {
            theme: config.theme(),
            auth: LocalAuth::new(source.store().clone()),
            config,
            source,
            session: None,
            screen: Screen::Login,
            epoch: 0,
            data: SchoolData::default(),
            toasts: Vec::new(),
            next_toast: 0,
            date_picker: None,
            login: FormState::new(schemas::login()),
            signup: FormState::new(schemas::signup()),
            auth_error: None,
            appointments: AppointmentsPage::default(),
            students: StudentsPage::new(page_size),
            staff: StaffPage::new(page_size),
            classrooms: ClassroomsPage::default(),
            subjects: SubjectsPage::default(),
            periods: PeriodsPage::default(),
            fees: FeeStructurePage::default(),
            marks: MarksPage::default(),
            pay_fee: PayFeePage::new(today),
            attendance: AttendancePage::new(today),
            groups: GroupsPage::default(),
            holidays: HolidaysPage::default(),
            notes: NotesPage::default(),
        }
    }

    /// Fresh state for the page of `screen`.
    pub(crate) fn reset_page(&mut self, screen: Screen) {
        let page_size = self.config.page_size;
        match screen {
            Screen::Login => {
                self.login = FormState::new(schemas::login());
                self.auth_error = None;
            }
            Screen::Signup => {
                self.signup = FormState::new(schemas::signup());
                self.auth_error = None;
            }
            Screen::Appointments => self.appointments = AppointmentsPage::default(),
            Screen::Students => self.students = StudentsPage::new(page_size),
            Screen::Staff => self.staff = StaffPage::new(page_size),
            Screen::Classrooms => self.classrooms = ClassroomsPage::default(),
            Screen::Subjects => self.subjects = SubjectsPage::default(),
            Screen::Periods => self.periods = PeriodsPage::default(),
            Screen::FeeStructure => self.fees = FeeStructurePage::default(),
            Screen::Marks => self.marks = MarksPage::default(),
            Screen::PayFee => self.pay_fee = PayFeePage::new(today()),
            Screen::Attendance => self.attendance = AttendancePage::new(today()),
            Screen::Groups => self.groups = GroupsPage::default(),
            Screen::Holidays => self.holidays = HolidaysPage::default(),
            Screen::ProgressNotes => self.notes = NotesPage::default(),
            Screen::Dashboard | Screen::Settings => {}
        }
    }
}
