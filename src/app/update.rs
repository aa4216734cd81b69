use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use iced::Task;
use iced_aw::date_picker::Date;
use tracing::{debug, info, warn};

use super::messages::{
    AppointmentMsg, AttendanceMsg, CascadeTarget, ClassroomMsg, DateField, ExportKind, FeeMsg, GroupMsg, HolidayMsg,
    Loaded, MarksMsg, NoteMsg, PayFeeMsg, PeriodMsg, SaveTarget, StaffMsg, StudentMsg, SubjectMsg,
};
use super::pages::periods::toggled;
use super::pages::staff::StaffChoices;
use super::pages::students::StudentChoices;
use super::pages::apply;
use super::state::{SchoolData, Screen, Toast, ToastKind, today};
use super::{App, Message};
use crate::api::{MasterKind, Outcome};
use crate::cascade::{ClassRequest, SectionRequest};
use crate::config::theme_from_str;
use crate::forms::SubmitBlocked;
use crate::report;
use crate::source::DataSource;

const TOAST_SECONDS: u64 = 4;

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(screen) => self.enter(screen),
            Message::Logout => {
                if let Some(session) = self.session.take() {
                    info!(user = %session.email, "signed out");
                }
                self.data = SchoolData::default();
                self.enter(Screen::Login)
            }
            Message::ThemeSelected(name) => {
                if let Some(theme) = theme_from_str(name) {
                    self.config.set_theme(&theme);
                    self.theme = theme;
                    if let Err(error) = self.config.save() {
                        warn!(%error, "could not save config");
                    }
                }
                Task::none()
            }
            Message::DismissToast(id) => {
                self.toasts.retain(|t| t.id != id);
                Task::none()
            }
            Message::OpenDatePicker(field) => {
                self.date_picker = Some(field);
                Task::none()
            }
            Message::CancelDatePicker => {
                self.date_picker = None;
                Task::none()
            }
            Message::DatePicked(field, date) => {
                self.date_picker = None;
                self.pick_date(field, date)
            }
            Message::Export(kind) => {
                let (table, file_name) = match kind {
                    ExportKind::Students => (report::students_table(&self.data.students), "students.xlsx"),
                    ExportKind::FeeStructures => {
                        (report::fee_structures_table(&self.data.fee_structures), "fee_structures.xlsx")
                    }
                };
                Task::perform(report::export_with_dialog(table, file_name.to_string()), Message::Exported)
            }
            Message::Exported(result) => match result {
                Ok(Some(path)) => self.toast(ToastKind::Success, format!("Exported to {}", path.display())),
                Ok(None) => Task::none(),
                Err(error) => {
                    warn!(%error, "export failed");
                    self.toast(ToastKind::Error, format!("Export failed: {error}"))
                }
            },
            Message::Loaded(epoch, loaded) => {
                if epoch != self.epoch {
                    debug!(epoch, current = self.epoch, "result of a previous screen dropped");
                    return Task::none();
                }
                self.on_loaded(loaded)
            }

            Message::Login(msg) => {
                apply(&mut self.login, msg);
                self.auth_error = None;
                Task::none()
            }
            Message::LoginPressed => {
                if let Err(blocked) = self.login.begin_submit() {
                    self.auth_error = Some(blocked.to_string());
                    return Task::none();
                }
                let auth = self.auth.clone();
                let email = self.login.value("email").trim().to_string();
                let password = self.login.value("password").to_string();
                self.task(
                    async move { auth.sign_in(email, password).await.map_err(|e| e.to_string()) },
                    Loaded::SignedIn,
                )
            }
            Message::Signup(msg) => {
                apply(&mut self.signup, msg);
                self.auth_error = None;
                Task::none()
            }
            Message::SignupPressed => {
                if let Err(blocked) = self.signup.begin_submit() {
                    self.auth_error = Some(blocked.to_string());
                    return Task::none();
                }
                let auth = self.auth.clone();
                let name = self.signup.value("name").trim().to_string();
                let email = self.signup.value("email").trim().to_string();
                let password = self.signup.value("password").to_string();
                self.task(
                    async move { auth.sign_up(name, email, password).await.map_err(|e| e.to_string()) },
                    Loaded::SignedIn,
                )
            }

            Message::Appointments(msg) => self.update_appointments(msg),
            Message::Students(msg) => self.update_students(msg),
            Message::Staff(msg) => self.update_staff(msg),
            Message::Classrooms(msg) => self.update_classrooms(msg),
            Message::Subjects(msg) => self.update_subjects(msg),
            Message::Periods(msg) => self.update_periods(msg),
            Message::Fees(msg) => self.update_fees(msg),
            Message::Marks(msg) => self.update_marks(msg),
            Message::PayFee(msg) => self.update_pay_fee(msg),
            Message::Attendance(msg) => self.update_attendance(msg),
            Message::Groups(msg) => self.update_groups(msg),
            Message::Holidays(msg) => self.update_holidays(msg),
            Message::Notes(msg) => self.update_notes(msg),
        }
    }

    /// Switches screens. The page starts fresh and its data is fetched again.
    pub(crate) fn enter(&mut self, screen: Screen) -> Task<Message> {
        let screen = if screen.needs_session() && self.session.is_none() {
            warn!(%screen, "screen needs a signed in user");
            Screen::Login
        } else {
            screen
        };
        self.epoch += 1;
        self.screen = screen;
        self.date_picker = None;
        self.reset_page(screen);
        info!(%screen, epoch = self.epoch, "screen entered");

        let loads = match screen {
            Screen::Login | Screen::Signup | Screen::Settings => vec![],
            Screen::Dashboard => vec![
                self.load_students(),
                self.load_staff(),
                self.load_classes(),
                self.load_fee_structures(),
            ],
            Screen::Appointments => vec![
                self.load(|s| async move { s.hospitals().await }, Loaded::Hospitals),
                self.load(|s| async move { s.designations().await }, Loaded::Designations),
                self.load_appointments(),
            ],
            Screen::Students => vec![
                self.load_students(),
                self.load_classes(),
                self.load_master(MasterKind::Gender),
                self.load_master(MasterKind::Occupation),
            ],
            Screen::Staff => vec![
                self.load_staff(),
                self.load_master(MasterKind::Gender),
                self.load_master(MasterKind::Qualification),
                self.load_master(MasterKind::Designation),
                self.load_master(MasterKind::StaffType),
                self.load_master(MasterKind::Status),
            ],
            Screen::Classrooms => vec![self.load_classrooms()],
            Screen::Subjects => vec![self.load_classes()],
            Screen::Periods => vec![self.load_classes(), self.load_teachers()],
            Screen::FeeStructure => vec![
                self.load_fee_structures(),
                self.load_classes(),
                self.load_master(MasterKind::FeeType),
            ],
            Screen::Marks => vec![self.load_marksheets(), self.load_classes()],
            Screen::PayFee => vec![self.load_students(), self.load_fee_structures()],
            Screen::Attendance => vec![self.load_classes(), self.load_students()],
            Screen::Groups => vec![self.load_groups(), self.load_students(), self.load_teachers()],
            Screen::Holidays => vec![self.load_holidays()],
            Screen::ProgressNotes => vec![self.load_classes(), self.load_students(), self.load_notes()],
        };
        Task::batch(loads)
    }

    // Tasks

    /// Runs `future`; its output comes back tagged with the current epoch.
    fn task<T, F>(&self, future: F, wrap: impl Fn(T) -> Loaded + Send + 'static) -> Task<Message>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let epoch = self.epoch;
        Task::perform(future, move |value| Message::Loaded(epoch, wrap(value)))
    }

    fn load<T, F>(&self, f: impl FnOnce(DataSource) -> F, wrap: impl Fn(T) -> Loaded + Send + 'static) -> Task<Message>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        self.task(f(self.source.clone()), wrap)
    }

    fn save<F>(&self, target: SaveTarget, f: impl FnOnce(DataSource) -> F) -> Task<Message>
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        debug!(?target, "submitting");
        self.load(f, move |outcome| Loaded::Saved(target, outcome))
    }

    fn load_classes(&self) -> Task<Message> {
        self.load(|s| async move { s.classes().await }, Loaded::Classes)
    }

    fn load_classrooms(&self) -> Task<Message> {
        self.load(|s| async move { s.classrooms().await }, Loaded::Classrooms)
    }

    fn load_master(&self, kind: MasterKind) -> Task<Message> {
        self.load(move |s| async move { s.master(kind).await }, move |items| Loaded::Master(kind, items))
    }

    fn load_teachers(&self) -> Task<Message> {
        self.load(|s| async move { s.active_teachers().await }, Loaded::Teachers)
    }

    fn load_students(&self) -> Task<Message> {
        self.load(|s| async move { s.students().await }, Loaded::Students)
    }

    fn load_staff(&self) -> Task<Message> {
        self.load(|s| async move { s.staff().await }, Loaded::Staff)
    }

    fn load_fee_structures(&self) -> Task<Message> {
        self.load(|s| async move { s.fee_structures().await }, Loaded::FeeStructures)
    }

    fn load_marksheets(&self) -> Task<Message> {
        self.load(|s| async move { s.marksheets().await }, Loaded::Marksheets)
    }

    fn load_holidays(&self) -> Task<Message> {
        self.load(|s| async move { s.holidays().await }, Loaded::Holidays)
    }

    fn load_notes(&self) -> Task<Message> {
        self.load(|s| async move { s.progress_notes().await }, Loaded::Notes)
    }

    fn load_groups(&self) -> Task<Message> {
        self.load(|s| async move { s.groups().await }, Loaded::Groups)
    }

    fn load_appointments(&self) -> Task<Message> {
        self.load(|s| async move { s.appointments().await }, Loaded::Appointments)
    }

    fn load_payments(&self, student_id: i64) -> Task<Message> {
        self.load(
            move |s| async move { s.payments(student_id).await },
            move |items| Loaded::Payments { student_id, items },
        )
    }

    fn load_sections(&self, target: CascadeTarget, req: ClassRequest) -> Task<Message> {
        let ClassRequest { ticket, class_id } = req;
        self.load(
            move |s| async move { s.sections(class_id).await },
            move |items| Loaded::Sections { target, ticket, items },
        )
    }

    fn load_class_subjects(&self, target: CascadeTarget, req: ClassRequest) -> Task<Message> {
        let ClassRequest { ticket, class_id } = req;
        self.load(
            move |s| async move { s.class_subjects(class_id).await },
            move |items| Loaded::ClassSubjects { target, ticket, items },
        )
    }

    fn load_periods(&self, req: SectionRequest) -> Task<Message> {
        let SectionRequest { ticket, class_id, section_id } = req;
        self.load(
            move |s| async move { s.time_periods(class_id, section_id).await },
            move |items| Loaded::Periods { ticket, items },
        )
    }

    fn load_attendance(&self, req: SectionRequest) -> Task<Message> {
        let SectionRequest { ticket, class_id, section_id } = req;
        let (from, to) = self.attendance.range();
        self.load(
            move |s| async move { s.attendance(class_id, section_id, from, to).await },
            move |items| Loaded::AttendanceMarks { ticket, items },
        )
    }

    fn toast(&mut self, kind: ToastKind, text: impl Into<String>) -> Task<Message> {
        self.next_toast += 1;
        let id = self.next_toast;
        self.toasts.push(Toast { id, kind, text: text.into() });
        Task::perform(
            async move {
                tokio::time::sleep(Duration::from_secs(TOAST_SECONDS)).await;
                id
            },
            Message::DismissToast,
        )
    }

    /// A submission that never left the client. Field errors are already
    /// shown inline; the toast repeats the first one.
    fn blocked(&mut self, form: &'static str, blocked: SubmitBlocked) -> Task<Message> {
        match blocked {
            SubmitBlocked::Pending => {
                debug!(form, "submission already in flight");
                Task::none()
            }
            SubmitBlocked::Invalid(errors) => {
                debug!(form, fields = errors.0.len(), "submission blocked by validation");
                self.toast(ToastKind::Error, SubmitBlocked::Invalid(errors).to_string())
            }
        }
    }

    // Results

    fn on_loaded(&mut self, loaded: Loaded) -> Task<Message> {
        match loaded {
            Loaded::SignedIn(result) => {
                let success = result.is_ok();
                self.login.finish_submit(success);
                self.signup.finish_submit(success);
                match result {
                    Ok(session) => {
                        let welcome = format!("Welcome, {}", session.name);
                        self.session = Some(session);
                        self.auth_error = None;
                        let toast = self.toast(ToastKind::Success, welcome);
                        Task::batch([toast, self.enter(Screen::Dashboard)])
                    }
                    Err(error) => {
                        self.auth_error = Some(error);
                        Task::none()
                    }
                }
            }
            Loaded::Classes(items) => {
                self.data.classes = items;
                Task::none()
            }
            Loaded::Classrooms(items) => {
                self.data.classes = items.iter().map(|c| c.as_lookup()).collect();
                self.data.classrooms = items;
                Task::none()
            }
            Loaded::Master(kind, items) => {
                self.data.masters.insert(kind, items);
                Task::none()
            }
            Loaded::Teachers(items) => {
                self.data.teachers = items;
                Task::none()
            }
            Loaded::Students(items) => {
                self.data.students = items;
                Task::none()
            }
            Loaded::Staff(items) => {
                self.data.staff = items;
                Task::none()
            }
            Loaded::FeeStructures(items) => {
                self.data.fee_structures = items;
                Task::none()
            }
            Loaded::Marksheets(items) => {
                self.data.marksheets = items;
                Task::none()
            }
            Loaded::Holidays(items) => {
                self.data.holidays = items;
                Task::none()
            }
            Loaded::Notes(items) => {
                self.data.notes = items;
                Task::none()
            }
            Loaded::Groups(items) => {
                self.data.groups = items;
                Task::none()
            }
            Loaded::Appointments(items) => {
                self.data.appointments = items;
                Task::none()
            }
            Loaded::Hospitals(items) => {
                self.data.hospitals = items;
                Task::none()
            }
            Loaded::Designations(items) => {
                self.data.designations = items;
                Task::none()
            }
            Loaded::Doctors { designation_id, items } => {
                if !self.appointments.accept_doctors(designation_id, items) {
                    debug!(designation_id, "doctors of a previous designation dropped");
                }
                Task::none()
            }
            Loaded::Sections { target, ticket, items } => match target {
                CascadeTarget::Students => {
                    self.students.accept_sections(ticket, items);
                    Task::none()
                }
                CascadeTarget::Periods => match self.periods.cascade.accept_sections(ticket, Ok(items)) {
                    Some(req) => self.load_periods(req),
                    None => Task::none(),
                },
                CascadeTarget::Marks => {
                    self.marks.accept_sections(ticket, items);
                    Task::none()
                }
                CascadeTarget::Attendance => match self.attendance.cascade.accept_sections(ticket, Ok(items)) {
                    Some(req) => self.load_attendance(req),
                    None => Task::none(),
                },
                CascadeTarget::Notes => {
                    self.notes.accept_sections(ticket, items);
                    Task::none()
                }
                CascadeTarget::Subjects => Task::none(),
            },
            Loaded::ClassSubjects { target, ticket, items } => {
                match target {
                    CascadeTarget::Subjects => self.subjects.accept_subjects(ticket, items),
                    CascadeTarget::Periods => {
                        self.periods.cascade.accept_class_items(ticket, Ok(items));
                    }
                    CascadeTarget::Marks => self.marks.accept_subjects(ticket, items),
                    other => debug!(?other, "subjects not used by this screen"),
                }
                Task::none()
            }
            Loaded::Periods { ticket, items } => {
                self.periods.cascade.accept_section_items(ticket, Ok(items));
                Task::none()
            }
            Loaded::AttendanceMarks { ticket, items } => {
                self.attendance.accept_marks(ticket, items);
                Task::none()
            }
            Loaded::Payments { student_id, items } => {
                self.pay_fee.accept_payments(student_id, items);
                Task::none()
            }
            Loaded::Saved(target, outcome) => self.on_saved(target, outcome),
        }
    }

    /// Ends a submission: the form is released, the toast tells the outcome
    /// and on success the affected list is fetched again.
    fn on_saved(&mut self, target: SaveTarget, outcome: Outcome) -> Task<Message> {
        let success = outcome.is_success();
        let (done, follow_up) = match target {
            SaveTarget::Appointment => {
                self.appointments.finish(success);
                ("Appointment booked", self.load_appointments())
            }
            SaveTarget::Student => {
                self.students.finish(success);
                ("Student saved", self.load_students())
            }
            SaveTarget::Staff => {
                self.staff.finish(success);
                ("Staff member saved", self.load_staff())
            }
            SaveTarget::Classroom => {
                self.classrooms.finish_class(success);
                ("Class added", self.load_classrooms())
            }
            SaveTarget::Section => {
                self.classrooms.finish_section(success);
                ("Section added", self.load_classrooms())
            }
            SaveTarget::Subject => {
                let refetch = self.subjects.finish(success);
                let task = match refetch {
                    Some(req) => self.load_class_subjects(CascadeTarget::Subjects, req),
                    None => Task::none(),
                };
                ("Subject added", task)
            }
            SaveTarget::Period => {
                let task = match self.periods.finish(success) {
                    Some(req) => self.load_periods(req),
                    None => Task::none(),
                };
                ("Time period saved", task)
            }
            SaveTarget::PeriodToggle => {
                let task = match success.then(|| self.periods.cascade.refresh()).flatten() {
                    Some(req) => self.load_periods(req),
                    None => Task::none(),
                };
                ("Time period updated", task)
            }
            SaveTarget::FeeStructure => {
                self.fees.finish(success);
                ("Fee structure saved", self.load_fee_structures())
            }
            SaveTarget::Marks => {
                self.marks.finish(success);
                ("Marks saved", self.load_marksheets())
            }
            SaveTarget::Payment => {
                self.pay_fee.finish(success);
                let task = match self.pay_fee.student_id {
                    Some(id) => self.load_payments(id),
                    None => Task::none(),
                };
                ("Payment recorded", task)
            }
            SaveTarget::Attendance => {
                self.attendance.saving = false;
                let task = match success.then(|| self.attendance.cascade.refresh()).flatten() {
                    Some(req) => self.load_attendance(req),
                    None => Task::none(),
                };
                ("Attendance saved", task)
            }
            SaveTarget::Group => {
                self.groups.finish(success);
                ("Group saved", self.load_groups())
            }
            SaveTarget::GroupDeleted => ("Group deleted", self.load_groups()),
            SaveTarget::Holiday => {
                self.holidays.finish(success);
                ("Holiday added", self.load_holidays())
            }
            SaveTarget::HolidayDeleted => ("Holiday deleted", self.load_holidays()),
            SaveTarget::Note => {
                self.notes.finish(success);
                ("Progress note saved", self.load_notes())
            }
        };
        match outcome {
            Outcome::Success { .. } => {
                info!(?target, "saved");
                let toast = self.toast(ToastKind::Success, done);
                Task::batch([toast, follow_up])
            }
            Outcome::Failure { message } => {
                warn!(?target, %message, "save failed");
                self.toast(ToastKind::Error, message)
            }
        }
    }

    fn pick_date(&mut self, field: DateField, date: Date) -> Task<Message> {
        let Some(date) = NaiveDate::from_ymd_opt(date.year, date.month, date.day) else {
            return Task::none();
        };
        let (form, name) = match field {
            DateField::Appointment => (&mut self.appointments.form, "date"),
            DateField::TransportStart => (&mut self.students.form, "transport_start"),
            DateField::PeriodStart => (&mut self.periods.form, "start_date"),
            DateField::PeriodEnd => (&mut self.periods.form, "end_date"),
            DateField::Holiday => (&mut self.holidays.form, "date"),
            DateField::Payment => (&mut self.pay_fee.form, "paid_on"),
            DateField::Attendance => {
                return match self.attendance.set_date(date) {
                    Some(req) => self.load_attendance(req),
                    None => Task::none(),
                };
            }
        };
        form.set_date(name, date);
        form.touch(name);
        Task::none()
    }

    // Screens

    fn update_appointments(&mut self, msg: AppointmentMsg) -> Task<Message> {
        match msg {
            AppointmentMsg::Form(msg) => apply(&mut self.appointments.form, msg),
            AppointmentMsg::DesignationPicked(designation) => {
                let designation_id = self.appointments.select_designation(designation.id);
                return self.load(
                    move |s| async move { s.doctors(designation_id).await },
                    move |items| Loaded::Doctors { designation_id, items },
                );
            }
            AppointmentMsg::Submit => {
                return match self.appointments.submit(&self.data.hospitals, &self.data.designations) {
                    Ok(appointment) => {
                        self.save(SaveTarget::Appointment, |s| async move { s.book_appointment(appointment).await })
                    }
                    Err(blocked) => self.blocked("appointment", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_students(&mut self, msg: StudentMsg) -> Task<Message> {
        match msg {
            StudentMsg::Search(query) => self.students.set_search(query),
            StudentMsg::PrevPage => self.students.pager.prev(),
            StudentMsg::NextPage => {
                let total = self.students.visible(&self.data.students).len();
                self.students.pager.next(total);
            }
            StudentMsg::New => self.students.open_new(),
            StudentMsg::Edit(student) => {
                let req = self.students.open_edit(&student);
                return self.load_sections(CascadeTarget::Students, req);
            }
            StudentMsg::Close => self.students.close(),
            StudentMsg::Form(msg) => apply(&mut self.students.form, msg),
            StudentMsg::ClassPicked(class) => {
                let req = self.students.select_class(class.id);
                return self.load_sections(CascadeTarget::Students, req);
            }
            StudentMsg::SectionPicked(section) => self.students.select_section(section.id),
            StudentMsg::Submit => {
                let choices = StudentChoices {
                    classes: &self.data.classes,
                    genders: self.data.master(MasterKind::Gender),
                    occupations: self.data.master(MasterKind::Occupation),
                };
                return match self.students.submit(choices) {
                    Ok(student) => {
                        info!(id = ?student.id, "saving student");
                        self.save(SaveTarget::Student, |s| async move { s.save_student(student).await })
                    }
                    Err(blocked) => self.blocked("student", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_staff(&mut self, msg: StaffMsg) -> Task<Message> {
        match msg {
            StaffMsg::Search(query) => self.staff.set_search(query),
            StaffMsg::PrevPage => self.staff.pager.prev(),
            StaffMsg::NextPage => {
                let total = self.staff.visible(&self.data.staff).len();
                self.staff.pager.next(total);
            }
            StaffMsg::New => self.staff.open_new(),
            StaffMsg::Edit(staff) => self.staff.open_edit(&staff),
            StaffMsg::View(staff) => self.staff.viewing = Some(staff),
            StaffMsg::CloseView => self.staff.viewing = None,
            StaffMsg::Close => self.staff.close(),
            StaffMsg::Form(msg) => apply(&mut self.staff.form, msg),
            StaffMsg::Submit => {
                let choices = StaffChoices {
                    genders: self.data.master(MasterKind::Gender),
                    qualifications: self.data.master(MasterKind::Qualification),
                    designations: self.data.master(MasterKind::Designation),
                    staff_types: self.data.master(MasterKind::StaffType),
                };
                return match self.staff.submit(choices) {
                    Ok(staff) => {
                        info!(id = ?staff.id, "saving staff member");
                        self.save(SaveTarget::Staff, |s| async move { s.save_staff(staff).await })
                    }
                    Err(blocked) => self.blocked("staff", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_classrooms(&mut self, msg: ClassroomMsg) -> Task<Message> {
        match msg {
            ClassroomMsg::AddClass => self.classrooms.open_add_class(),
            ClassroomMsg::AddSection(class_id) => self.classrooms.open_add_section(class_id),
            ClassroomMsg::Close => self.classrooms.close(),
            ClassroomMsg::ClassForm(msg) => apply(&mut self.classrooms.class_form, msg),
            ClassroomMsg::SectionForm(msg) => apply(&mut self.classrooms.section_form, msg),
            ClassroomMsg::SubmitClass => {
                return match self.classrooms.submit_class() {
                    Ok(name) => self.save(SaveTarget::Classroom, |s| async move { s.save_classroom(name).await }),
                    Err(blocked) => self.blocked("class", blocked),
                };
            }
            ClassroomMsg::SubmitSection => {
                return match self.classrooms.submit_section() {
                    Ok((class_id, name)) => {
                        self.save(SaveTarget::Section, move |s| async move { s.save_section(class_id, name).await })
                    }
                    Err(blocked) => self.blocked("section", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_subjects(&mut self, msg: SubjectMsg) -> Task<Message> {
        match msg {
            SubjectMsg::ClassPicked(class) => {
                let req = self.subjects.select_class(class.id);
                self.load_class_subjects(CascadeTarget::Subjects, req)
            }
            SubjectMsg::Form(msg) => {
                apply(&mut self.subjects.form, msg);
                Task::none()
            }
            SubjectMsg::Submit => match self.subjects.submit() {
                Ok((class_id, name)) => {
                    self.save(SaveTarget::Subject, move |s| async move { s.create_subject(class_id, name).await })
                }
                Err(blocked) => self.blocked("subject", blocked),
            },
        }
    }

    fn update_periods(&mut self, msg: PeriodMsg) -> Task<Message> {
        match msg {
            PeriodMsg::ClassPicked(class) => {
                let req = self.periods.select_class(class.id);
                return Task::batch([
                    self.load_sections(CascadeTarget::Periods, req),
                    self.load_class_subjects(CascadeTarget::Periods, req),
                ]);
            }
            PeriodMsg::SectionPicked(section) => {
                if let Some(req) = self.periods.select_section(section.id) {
                    return self.load_periods(req);
                }
            }
            PeriodMsg::New => {
                if !self.periods.open_new() {
                    return self.toast(ToastKind::Error, "Select a class and section first");
                }
            }
            PeriodMsg::Edit(period) => self.periods.open_edit(&period),
            PeriodMsg::Toggle(period) => {
                let period = toggled(&period);
                return self.save(SaveTarget::PeriodToggle, |s| async move { s.save_time_period(period).await });
            }
            PeriodMsg::Close => self.periods.close(),
            PeriodMsg::Form(msg) => apply(&mut self.periods.form, msg),
            PeriodMsg::Submit => {
                return match self.periods.submit(&self.data.teachers) {
                    Ok(period) => self.save(SaveTarget::Period, |s| async move { s.save_time_period(period).await }),
                    Err(blocked) => self.blocked("time period", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_fees(&mut self, msg: FeeMsg) -> Task<Message> {
        match msg {
            FeeMsg::New => self.fees.open_new(),
            FeeMsg::Edit(structure) => self.fees.open_edit(&structure),
            FeeMsg::Close => self.fees.close(),
            FeeMsg::Form(msg) => apply(&mut self.fees.form, msg),
            FeeMsg::ItemForm(msg) => apply(&mut self.fees.item_form, msg),
            FeeMsg::AddItem => {
                if let Err(errors) = self.fees.add_item(self.data.fee_types()) {
                    debug!(fields = errors.0.len(), "fee item rejected");
                }
            }
            FeeMsg::EditItem(index) => self.fees.edit_item(index),
            FeeMsg::RemoveItem(index) => self.fees.remove_item(index),
            FeeMsg::Submit => {
                return match self.fees.submit(&self.data.classes) {
                    Ok(structure) => {
                        self.save(SaveTarget::FeeStructure, |s| async move { s.save_fee_structure(structure).await })
                    }
                    Err(blocked) => self.blocked("fee structure", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_marks(&mut self, msg: MarksMsg) -> Task<Message> {
        match msg {
            MarksMsg::New => self.marks.open_new(),
            MarksMsg::Edit(entry) => {
                let req = self.marks.open_edit(&entry);
                return Task::batch([
                    self.load_sections(CascadeTarget::Marks, req),
                    self.load_class_subjects(CascadeTarget::Marks, req),
                ]);
            }
            MarksMsg::View(entry) => self.marks.viewing = Some(entry),
            MarksMsg::CloseView => self.marks.viewing = None,
            MarksMsg::Close => self.marks.close(),
            MarksMsg::ClassPicked(class) => {
                let req = self.marks.select_class(class.id);
                return Task::batch([
                    self.load_sections(CascadeTarget::Marks, req),
                    self.load_class_subjects(CascadeTarget::Marks, req),
                ]);
            }
            MarksMsg::SectionPicked(section) => self.marks.select_section(section.id),
            MarksMsg::AddRow => self.marks.add_row(),
            MarksMsg::RemoveRow(index) => self.marks.remove_row(index),
            MarksMsg::Row(index, msg) => self.marks.edit_row(index, msg),
            MarksMsg::Submit => {
                return match self.marks.submit() {
                    Ok(mut entry) => {
                        entry.class_name = self.data.class_name(entry.class_id);
                        self.save(SaveTarget::Marks, |s| async move { s.save_marks(entry).await })
                    }
                    Err(blocked) => self.blocked("marks", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_pay_fee(&mut self, msg: PayFeeMsg) -> Task<Message> {
        match msg {
            PayFeeMsg::StudentPicked(student) => {
                self.pay_fee.select_student(student.id);
                self.load_payments(student.id)
            }
            PayFeeMsg::Form(msg) => {
                apply(&mut self.pay_fee.form, msg);
                Task::none()
            }
            PayFeeMsg::Submit => {
                let structure = self
                    .pay_fee
                    .student(&self.data.students)
                    .and_then(|student| self.pay_fee.structure(student, &self.data.fee_structures))
                    .cloned();
                match self.pay_fee.submit(structure.as_ref()) {
                    Ok(payment) => {
                        self.save(SaveTarget::Payment, |s| async move { s.record_payment(payment).await })
                    }
                    Err(blocked) => self.blocked("payment", blocked),
                }
            }
        }
    }

    fn update_attendance(&mut self, msg: AttendanceMsg) -> Task<Message> {
        match msg {
            AttendanceMsg::Tab(tab) => {
                if let Some(req) = self.attendance.set_tab(tab) {
                    return self.load_attendance(req);
                }
            }
            AttendanceMsg::ClassPicked(class) => {
                let req = self.attendance.select_class(class.id);
                return self.load_sections(CascadeTarget::Attendance, req);
            }
            AttendanceMsg::SectionPicked(section) => {
                if let Some(req) = self.attendance.select_section(section.id) {
                    return self.load_attendance(req);
                }
            }
            AttendanceMsg::Toggle(student_id, present) => self.attendance.toggle(student_id, present),
            AttendanceMsg::Save => {
                if self.attendance.saving {
                    return Task::none();
                }
                let roster = self.attendance.roster(&self.data.students);
                let marks = self.attendance.daily_marks(&roster);
                if marks.is_empty() {
                    return self.toast(ToastKind::Error, "No students to mark in this section");
                }
                self.attendance.saving = true;
                return self.save(SaveTarget::Attendance, |s| async move { s.save_attendance(marks).await });
            }
        }
        Task::none()
    }

    fn update_groups(&mut self, msg: GroupMsg) -> Task<Message> {
        match msg {
            GroupMsg::New => self.groups.open_new(),
            GroupMsg::Edit(group) => self.groups.open_edit(&group),
            GroupMsg::Close => self.groups.close(),
            GroupMsg::Form(msg) => apply(&mut self.groups.form, msg),
            GroupMsg::AddMember(member) => {
                self.groups.add_member(member);
            }
            GroupMsg::RemoveMember(key) => self.groups.remove_member(&key),
            GroupMsg::Delete(id) => {
                return self.save(SaveTarget::GroupDeleted, move |s| async move { s.delete_group(id).await });
            }
            GroupMsg::Submit => {
                return match self.groups.submit() {
                    Ok(group) => self.save(SaveTarget::Group, |s| async move { s.save_group(group).await }),
                    Err(blocked) => self.blocked("group", blocked),
                };
            }
        }
        Task::none()
    }

    fn update_holidays(&mut self, msg: HolidayMsg) -> Task<Message> {
        match msg {
            HolidayMsg::Form(msg) => {
                apply(&mut self.holidays.form, msg);
                Task::none()
            }
            HolidayMsg::Delete(id) => {
                self.save(SaveTarget::HolidayDeleted, move |s| async move { s.delete_holiday(id).await })
            }
            HolidayMsg::Submit => match self.holidays.submit() {
                Ok((name, date)) => {
                    self.save(SaveTarget::Holiday, move |s| async move { s.add_holiday(name, date).await })
                }
                Err(blocked) => self.blocked("holiday", blocked),
            },
        }
    }

    fn update_notes(&mut self, msg: NoteMsg) -> Task<Message> {
        match msg {
            NoteMsg::ClassPicked(class) => {
                let req = self.notes.select_class(class.id);
                self.load_sections(CascadeTarget::Notes, req)
            }
            NoteMsg::SectionPicked(section) => {
                self.notes.select_section(section.id);
                Task::none()
            }
            NoteMsg::Form(msg) => {
                apply(&mut self.notes.form, msg);
                Task::none()
            }
            NoteMsg::Submit => match self.notes.submit(&self.data.students, today()) {
                Ok(note) => self.save(SaveTarget::Note, |s| async move { s.add_progress_note(note).await }),
                Err(blocked) => self.blocked("progress note", blocked),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pages::FormMsg;
    use crate::auth::Session;
    use crate::config::Config;
    use crate::model::{Holiday, StudentRecord};

    fn signed_in() -> App {
        let mut app = App::new(Config::default(), DataSource::mock().unwrap());
        app.session = Some(Session { name: "Admin".into(), email: "admin@school.in".into() });
        app
    }

    fn holiday(id: i64, name: &str) -> Holiday {
        Holiday { id, name: name.into(), date: "2024-11-01".into() }
    }

    fn fill_holiday(app: &mut App) {
        let _ = app.update(Message::Holidays(HolidayMsg::Form(FormMsg::Input("name", "Diwali".into()))));
        let _ = app.update(Message::Holidays(HolidayMsg::Form(FormMsg::Input("date", "2024-11-01".into()))));
        let _ = app.update(Message::Holidays(HolidayMsg::Submit));
    }

    #[tokio::test]
    async fn results_of_a_left_screen_are_dropped() {
        let mut app = signed_in();
        let _ = app.update(Message::Navigate(Screen::Holidays));
        let left = app.epoch;
        let _ = app.update(Message::Navigate(Screen::Students));
        assert!(app.epoch > left);

        let _ = app.update(Message::Loaded(left, Loaded::Holidays(vec![holiday(1, "Diwali")])));
        assert!(app.data.holidays.is_empty());

        let student = StudentRecord { id: Some(3), first_name: "Asha".into(), ..Default::default() };
        let _ = app.update(Message::Loaded(app.epoch, Loaded::Students(vec![student])));
        assert_eq!(app.data.students.len(), 1);
    }

    #[tokio::test]
    async fn screens_need_a_session() {
        let mut app = App::new(Config::default(), DataSource::mock().unwrap());
        let _ = app.update(Message::Navigate(Screen::Students));
        assert_eq!(app.screen, Screen::Login);
    }

    #[tokio::test]
    async fn confirmed_save_waits_for_the_refetch() {
        let mut app = signed_in();
        let _ = app.update(Message::Navigate(Screen::Holidays));
        fill_holiday(&mut app);
        assert!(app.holidays.form.is_pending());

        let epoch = app.epoch;
        let _ = app.update(Message::Loaded(epoch, Loaded::Saved(SaveTarget::Holiday, Outcome::success())));
        assert!(app.data.holidays.is_empty());
        assert!(!app.holidays.form.is_pending());
        assert_eq!(app.holidays.form.value("name"), "");
        assert_eq!(app.toasts.last().map(|t| t.kind), Some(ToastKind::Success));

        let _ = app.update(Message::Loaded(epoch, Loaded::Holidays(vec![holiday(4, "Diwali")])));
        assert_eq!(app.data.holidays, vec![holiday(4, "Diwali")]);
    }

    #[tokio::test]
    async fn rejected_save_keeps_the_form_and_reports() {
        let mut app = signed_in();
        let _ = app.update(Message::Navigate(Screen::Holidays));
        fill_holiday(&mut app);

        let epoch = app.epoch;
        let outcome = Outcome::failure("Server rejected the request");
        let _ = app.update(Message::Loaded(epoch, Loaded::Saved(SaveTarget::Holiday, outcome)));
        assert!(!app.holidays.form.is_pending());
        assert_eq!(app.holidays.form.value("name"), "Diwali");
        assert_eq!(app.holidays.form.value("date"), "2024-11-01");
        let toast = app.toasts.last().unwrap();
        assert_eq!((toast.kind, toast.text.as_str()), (ToastKind::Error, "Server rejected the request"));
        assert!(app.data.holidays.is_empty());
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_ignored() {
        let mut app = signed_in();
        let _ = app.update(Message::Navigate(Screen::Holidays));
        fill_holiday(&mut app);
        let _ = app.update(Message::Holidays(HolidayMsg::Submit));
        assert!(app.holidays.form.is_pending());
        assert!(app.toasts.is_empty());
    }

    #[tokio::test]
    async fn student_save_does_not_touch_the_list() {
        let mut app = signed_in();
        let _ = app.update(Message::Navigate(Screen::Students));
        let epoch = app.epoch;
        let _ = app.update(Message::Loaded(epoch, Loaded::Saved(SaveTarget::Student, Outcome::success())));
        assert!(app.data.students.is_empty());
        assert!(!app.students.show_form);
    }
}
