//! Per-screen state. Everything here is plain data with pure transitions;
//! the update loop owns the tasks that feed it.

pub mod appointments;
pub mod attendance;
pub mod classrooms;
pub mod fee_structure;
pub mod groups;
pub mod holidays;
pub mod marks;
pub mod notes;
pub mod pay_fee;
pub mod periods;
pub mod staff;
pub mod students;
pub mod subjects;

pub use appointments::AppointmentsPage;
pub use attendance::{AttendancePage, AttendanceTab};
pub use classrooms::{ClassroomModal, ClassroomsPage};
pub use fee_structure::FeeStructurePage;
pub use groups::GroupsPage;
pub use holidays::HolidaysPage;
pub use marks::MarksPage;
pub use notes::NotesPage;
pub use pay_fee::PayFeePage;
pub use periods::PeriodsPage;
pub use staff::StaffPage;
pub use students::StudentsPage;
pub use subjects::SubjectsPage;

use crate::forms::FormState;
use crate::model::Lookup;

/// An edit of one form field coming from a widget.
#[derive(Debug, Clone)]
pub enum FormMsg {
    Input(&'static str, String),
    Flag(&'static str, bool),
    Choice(&'static str, Lookup),
}

/// Applies the edit. iced text inputs report no focus loss, so the first
/// edit of a field counts as touching it.
pub fn apply(form: &mut FormState, msg: FormMsg) {
    let name = match msg {
        FormMsg::Input(name, value) => {
            form.set(name, value);
            name
        }
        FormMsg::Flag(name, value) => {
            form.set_flag(name, value);
            name
        }
        FormMsg::Choice(name, choice) => {
            form.set_choice(name, Some(&choice));
            name
        }
    };
    form.touch(name);
}

pub fn find_lookup(items: &[Lookup], id: Option<i64>) -> Option<&Lookup> {
    let id = id?;
    items.iter().find(|item| item.id == id)
}

/// The entry with `id`, or an unset lookup.
pub fn lookup_or_default(items: &[Lookup], id: Option<i64>) -> Lookup {
    find_lookup(items, id).cloned().unwrap_or_default()
}

fn id_string(lookup: &Lookup) -> String {
    if lookup.is_unset() { String::new() } else { lookup.id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schemas;

    #[test]
    fn choice_stores_id_and_validates() {
        let mut form = FormState::new(schemas::section());
        apply(&mut form, FormMsg::Input("name", String::new()));
        assert_eq!(form.error("name"), Some("Section name is required"));
        apply(&mut form, FormMsg::Choice("class_id", Lookup::new(4, "Class 2")));
        assert_eq!(form.id("class_id"), Some(4));
        assert!(form.error("class_id").is_none());
    }

    #[test]
    fn lookup_by_id() {
        let items = vec![Lookup::new(1, "A"), Lookup::new(2, "B")];
        assert_eq!(lookup_or_default(&items, Some(2)).name, "B");
        assert!(lookup_or_default(&items, Some(9)).is_unset());
        assert!(find_lookup(&items, None).is_none());
    }
}
