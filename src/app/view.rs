use iced::widget::container::bordered_box;
use iced::widget::{Column, Container, Row, Stack, button, horizontal_space, text, vertical_space};
use iced::{Alignment, Color, Element, Length};

use super::state::{Screen, Toast, ToastKind};
use super::{App, Message};
use crate::screens::{
    appointments_screen, attendance_screen, classrooms_screen, dashboard_screen, fee_structure_screen,
    groups_screen, holidays_screen, login_screen, marks_screen, nav_menu, pay_fee_screen, periods_screen,
    progress_notes_screen, settings_screen, signup_screen, staff_screen, students_screen, subjects_screen,
};

fn toast_card<'a>(app: &'a App, toast: &'a Toast) -> Container<'a, Message> {
    let color = match toast.kind {
        ToastKind::Success => Color::from_rgb(0.1, 0.6, 0.2),
        ToastKind::Error => Color::from_rgb(0.85, 0.2, 0.2),
    };
    let content = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text(toast.text.as_str()).color(color))
        .push(button(text("x").size(12)).on_press(Message::DismissToast(toast.id)));
    Container::new(content).padding(10).width(Length::Fixed(360.0)).style(move |_| bordered_box(&app.theme))
}

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let page = match self.screen {
            Screen::Login => login_screen(self),
            Screen::Signup => signup_screen(self),
            Screen::Dashboard => dashboard_screen(self),
            Screen::Appointments => appointments_screen(self),
            Screen::Students => students_screen(self),
            Screen::Staff => staff_screen(self),
            Screen::Classrooms => classrooms_screen(self),
            Screen::Subjects => subjects_screen(self),
            Screen::Periods => periods_screen(self),
            Screen::FeeStructure => fee_structure_screen(self),
            Screen::Marks => marks_screen(self),
            Screen::PayFee => pay_fee_screen(self),
            Screen::Attendance => attendance_screen(self),
            Screen::Groups => groups_screen(self),
            Screen::Holidays => holidays_screen(self),
            Screen::ProgressNotes => progress_notes_screen(self),
            Screen::Settings => settings_screen(self),
        };

        let mut layout = Row::new().spacing(20);
        // Sidebar only once signed in
        if self.session.is_some() && self.screen.needs_session() {
            layout = layout.push(Container::new(nav_menu(self)).width(Length::Fixed(220.0)).height(Length::Fill));
        }
        let layout = layout.push(page.width(Length::Fill));

        if self.toasts.is_empty() {
            return layout.into();
        }
        let toasts = self
            .toasts
            .iter()
            .fold(Column::new().spacing(8).align_x(Alignment::End), |col, t| col.push(toast_card(self, t)));
        let overlay = Column::new()
            .push(vertical_space())
            .push(Row::new().push(horizontal_space()).push(toasts))
            .padding(20);
        Stack::new().push(layout).push(overlay).into()
    }
}
