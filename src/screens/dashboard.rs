use iced::widget::{Column, Container, Row, text};
use iced::{Alignment, Length};
use iced_font_awesome::fa_icon_solid;

use super::widgets::{card, icon_button, title};
use crate::app::messages::ExportKind;
use crate::app::{App, Message};

fn tile<'a>(app: &'a App, icon: &'static str, label: &'a str, count: usize) -> Container<'a, Message> {
    let content = Row::new()
        .spacing(15)
        .align_y(Alignment::Center)
        .push(fa_icon_solid(icon).size(32.0).style(move |_| text::base(&app.theme)))
        .push(Column::new().push(text(count.to_string()).size(28)).push(text(label).size(14)));
    card(app, content).padding(20).width(Length::FillPortion(1))
}

pub fn dashboard_screen(app: &App) -> Container<'_, Message> {
    let data = &app.data;
    let active_students = data.students.iter().filter(|s| s.active).count();
    let tiles = Row::new()
        .spacing(20)
        .push(tile(app, "user-graduate", "Students", data.students.len()))
        .push(tile(app, "id-badge", "Staff", data.staff.len()))
        .push(tile(app, "school", "Classes", data.classes.len()))
        .push(tile(app, "file-invoice-dollar", "Fee structures", data.fee_structures.len()));

    let content = Column::new()
        .spacing(20)
        .push(title("Dashboard"))
        .push(tiles)
        .push(text(format!("{active_students} of {} students are active", data.students.len())))
        .push(
            Row::new()
                .spacing(10)
                .push(icon_button(app, "file-excel", "Export students", Message::Export(ExportKind::Students)))
                .push(icon_button(
                    app,
                    "file-excel",
                    "Export fee structures",
                    Message::Export(ExportKind::FeeStructures),
                )),
        );

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(20)
}
