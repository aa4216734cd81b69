use chrono::NaiveDate;
use iced::widget::{Column, Container, Row, Scrollable, button, checkbox, text};
use iced::widget::scrollable::Direction;
use iced::{Alignment, Element, Length, Theme};
use iced_aw::date_picker;
use iced_font_awesome::fa_icon_solid;

use super::widgets::{card, icon_button_content, picker_date, selector, submit_button, table, title};
use crate::app::messages::{AttendanceMsg, DateField};
use crate::app::pages::attendance::PresenceRow;
use crate::app::pages::{AttendanceTab, find_lookup};
use crate::app::{App, Message};
use crate::model::StudentRecord;

fn tabs(app: &App) -> Row<'_, Message> {
    AttendanceTab::ALL.iter().fold(Row::new().spacing(8), |row, tab| {
        let style: fn(&Theme, button::Status) -> button::Style =
            if app.attendance.tab == *tab { button::primary } else { button::secondary };
        row.push(button(text(tab.to_string())).style(style).on_press(Message::Attendance(AttendanceMsg::Tab(*tab))))
    })
}

fn daily<'a>(app: &'a App, roster: &[&'a StudentRecord]) -> Element<'a, Message> {
    let page = &app.attendance;
    let list = roster.iter().filter_map(|s| Some((s.id?, s.full_name()))).fold(
        Column::new().spacing(8),
        |col, (id, name)| {
            col.push(
                checkbox(name, page.is_present(id))
                    .on_toggle(move |present| Message::Attendance(AttendanceMsg::Toggle(id, present))),
            )
        },
    );
    let present = roster.iter().filter_map(|s| s.id).filter(|id| page.is_present(*id)).count();
    Column::new()
        .spacing(12)
        .push(text(format!("{present} of {} present", roster.len())).size(16))
        .push(card(app, Scrollable::new(list).height(Length::Fill)))
        .push(submit_button("Save attendance", page.saving, Message::Attendance(AttendanceMsg::Save)))
        .into()
}

fn day_header(day: &NaiveDate, monthly: bool) -> String {
    if monthly { day.format("%d").to_string() } else { day.format("%a %d").to_string() }
}

fn mark(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "P",
        Some(false) => "A",
        None => "-",
    }
}

fn summary<'a>(app: &'a App, rows: Vec<PresenceRow>) -> Element<'a, Message> {
    let page = &app.attendance;
    let monthly = page.tab == AttendanceTab::Monthly;
    let days = page.days();
    let narrow = Length::Fixed(if monthly { 28.0 } else { 60.0 });

    let header = days.iter().fold(
        Row::new().spacing(4).push(text("Student").width(Length::Fixed(180.0))),
        |row, day| row.push(text(day_header(day, monthly)).size(12).width(narrow)),
    );
    let header = header.push(text("%").width(Length::Fixed(60.0)));

    let body = rows.into_iter().fold(Column::new().spacing(6), |col, row| {
        let percent = row.percent().map(|p| format!("{p:.0}%")).unwrap_or_else(|| "-".to_string());
        let line = row.days.iter().fold(
            Row::new().spacing(4).push(text(row.name.clone()).size(14).width(Length::Fixed(180.0))),
            |line, value| line.push(text(mark(*value)).size(14).width(narrow)),
        );
        col.push(line.push(text(percent).size(14).width(Length::Fixed(60.0))))
    });

    card(
        app,
        Scrollable::new(Column::new().spacing(8).push(header).push(body)).direction(Direction::Both {
            vertical: Default::default(),
            horizontal: Default::default(),
        }),
    )
    .height(Length::Fill)
    .into()
}

pub fn attendance_screen(app: &App) -> Container<'_, Message> {
    let page = &app.attendance;
    let cascade = &page.cascade;

    let calendar = button(icon_button_content(app, "calendar", page.date.format("%d %b %Y").to_string()))
        .on_press(Message::OpenDatePicker(DateField::Attendance));
    let date = date_picker(
        app.date_picker == Some(DateField::Attendance),
        picker_date(page.date),
        calendar,
        Message::CancelDatePicker,
        |d| Message::DatePicked(DateField::Attendance, d),
    );

    let controls = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(selector(
            "Select class",
            &app.data.classes,
            find_lookup(&app.data.classes, cascade.class_id()),
            |c| Message::Attendance(AttendanceMsg::ClassPicked(c)),
        ))
        .push(selector("Select section", cascade.sections(), cascade.selected_section(), |s| {
            Message::Attendance(AttendanceMsg::SectionPicked(s))
        }))
        .push(date);

    let roster = page.roster(&app.data.students);
    let body: Element<'_, Message> = if cascade.section_id().is_none() {
        Row::new()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(fa_icon_solid("circle-info").style(move |_| text::base(&app.theme)))
            .push(text("Pick a class and section to take attendance").size(14))
            .into()
    } else if roster.is_empty() {
        Column::new().push(table(&["Student"], Vec::new())).into()
    } else if page.tab == AttendanceTab::Daily {
        daily(app, &roster)
    } else {
        summary(app, page.summary(&roster))
    };

    let content = Column::new().spacing(15).push(title("Attendance")).push(tabs(app)).push(controls).push(body);
    Container::new(content).width(Length::Fill).height(Length::Fill).padding(20)
}
