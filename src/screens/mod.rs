pub mod appointments;
pub mod attendance;
pub mod classrooms;
pub mod dashboard;
pub mod fee_structure;
pub mod groups;
pub mod holidays;
pub mod login;
pub mod marks;
pub mod nav_menu;
pub mod pay_fee;
pub mod periods;
pub mod progress_notes;
pub mod settings;
pub mod staff;
pub mod students;
pub mod subjects;
pub mod widgets;

pub use appointments::appointments_screen;
pub use attendance::attendance_screen;
pub use classrooms::classrooms_screen;
pub use dashboard::dashboard_screen;
pub use fee_structure::fee_structure_screen;
pub use groups::groups_screen;
pub use holidays::holidays_screen;
pub use login::{login_screen, signup_screen};
pub use marks::marks_screen;
pub use nav_menu::nav_menu;
pub use pay_fee::pay_fee_screen;
pub use periods::periods_screen;
pub use progress_notes::progress_notes_screen;
pub use settings::settings_screen;
pub use staff::staff_screen;
pub use students::students_screen;
pub use subjects::subjects_screen;
