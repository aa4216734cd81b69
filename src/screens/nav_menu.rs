use iced::widget::{Column, Container, Scrollable, button, vertical_space};
use iced::widget::text;
use iced::{Length, Theme};

use super::widgets::icon_button_content;
use crate::app::state::Screen;
use crate::app::{App, Message};

const ENTRIES: &[(Screen, &str)] = &[
    (Screen::Dashboard, "gauge"),
    (Screen::Students, "user-graduate"),
    (Screen::Staff, "id-badge"),
    (Screen::Classrooms, "school"),
    (Screen::Subjects, "book"),
    (Screen::Periods, "clock"),
    (Screen::FeeStructure, "file-invoice-dollar"),
    (Screen::PayFee, "money-bill"),
    (Screen::Marks, "marker"),
    (Screen::Attendance, "clipboard-check"),
    (Screen::Groups, "users"),
    (Screen::Holidays, "calendar-day"),
    (Screen::ProgressNotes, "note-sticky"),
    (Screen::Appointments, "hospital"),
];

fn entry<'a>(app: &'a App, screen: Screen, icon: &'static str) -> iced::widget::Button<'a, Message> {
    let style: fn(&Theme, button::Status) -> button::Style =
        if app.screen == screen { button::primary } else { button::secondary };
    button(icon_button_content(app, icon, screen.to_string()))
        .style(style)
        .on_press(Message::Navigate(screen))
        .width(Length::Fill)
}

pub fn nav_menu(app: &App) -> Container<'_, Message> {
    let links = ENTRIES
        .iter()
        .fold(Column::new().spacing(8), |column, (screen, icon)| column.push(entry(app, *screen, icon)));

    let user = app.session.as_ref().map(|s| s.name.as_str()).unwrap_or_default();
    let content = Column::new()
        .spacing(10)
        .push(text(user).size(16))
        .push(Scrollable::new(links).height(Length::Fill))
        .push(vertical_space().height(Length::Fixed(10.0)))
        .push(entry(app, Screen::Settings, "gear"))
        .push(
            button(icon_button_content(app, "arrow-right-from-bracket", "Sign out"))
                .on_press(Message::Logout)
                .width(Length::Fill),
        );

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(10)
}
