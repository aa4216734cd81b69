use iced::widget::{Column, Container, Row, Scrollable, button, horizontal_space, text};
use iced::{Alignment, Element, Length};

use super::widgets::{
    card, cell, choice_field, date_field, flag_field, icon_button, modal, selector, submit_button, table,
    text_field, title,
};
use crate::app::messages::{DateField, PeriodMsg};
use crate::app::pages::periods::duration;
use crate::app::pages::{FormMsg, find_lookup};
use crate::app::{App, Message};

fn form_msg(msg: FormMsg) -> Message {
    Message::Periods(PeriodMsg::Form(msg))
}

fn period_form(app: &App) -> Element<'_, Message> {
    let page = &app.periods;
    let form = &page.form;
    let heading = if page.editing.is_some() { "Edit time period" } else { "Add time period" };
    let duration = page.duration().unwrap_or_else(|| "-".to_string());

    Column::new()
        .spacing(10)
        .push(text(heading).size(24))
        .push(text_field(form, "name", form_msg))
        .push(choice_field(form, "subject_id", page.subjects(), form_msg))
        .push(choice_field(form, "teacher_id", &app.data.teachers, form_msg))
        .push(date_field(app, form, "start_date", DateField::PeriodStart, form_msg))
        .push(date_field(app, form, "end_date", DateField::PeriodEnd, form_msg))
        .push(text_field(form, "start_time", form_msg))
        .push(text_field(form, "end_time", form_msg))
        .push(text(format!("Duration: {duration}")).size(16))
        .push(flag_field(form, "is_active", form_msg))
        .push(
            Row::new()
                .spacing(10)
                .push(button(text("Cancel")).on_press(Message::Periods(PeriodMsg::Close)))
                .push(submit_button("Save", form.is_pending(), Message::Periods(PeriodMsg::Submit))),
        )
        .into()
}

pub fn periods_screen(app: &App) -> Container<'_, Message> {
    let page = &app.periods;
    let cascade = &page.cascade;

    let stepper = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Class"))
        .push(selector(
            "Select class",
            &app.data.classes,
            find_lookup(&app.data.classes, cascade.class_id()),
            |c| Message::Periods(PeriodMsg::ClassPicked(c)),
        ))
        .push(text("Section"))
        .push(selector("Select section", cascade.sections(), cascade.selected_section(), |s| {
            Message::Periods(PeriodMsg::SectionPicked(s))
        }))
        .push(horizontal_space())
        .push(icon_button(app, "plus", "Add period", Message::Periods(PeriodMsg::New)));

    let rows = page
        .periods()
        .iter()
        .map(|period| {
            let toggle = if period.is_active { "Deactivate" } else { "Activate" };
            vec![
                cell(period.name.as_str()),
                cell(period.subject.name.as_str()),
                cell(period.teacher.name.as_str()),
                cell(format!("{} - {}", period.start_time, period.end_time)),
                cell(duration(&period.start_time, &period.end_time).unwrap_or_default()),
                cell(if period.is_active { "Active" } else { "Inactive" }),
                Row::new()
                    .spacing(5)
                    .push(button(text("Edit")).on_press(Message::Periods(PeriodMsg::Edit(period.clone()))))
                    .push(button(text(toggle)).on_press(Message::Periods(PeriodMsg::Toggle(period.clone()))))
                    .into(),
            ]
        })
        .collect();

    let body: Element<'_, Message> = if cascade.section_id().is_some() {
        card(
            app,
            Scrollable::new(table(&["Name", "Subject", "Teacher", "Time", "Duration", "Status", ""], rows))
                .height(Length::Fill),
        )
        .into()
    } else {
        text("Pick a class and section to see its time periods").size(14).into()
    };

    let base = Column::new().spacing(15).push(title("Time Periods")).push(stepper).push(body);
    let screen = if page.show_form { modal(app, base, period_form(app), 420.0) } else { base.into() };
    Container::new(screen).width(Length::Fill).height(Length::Fill).padding(20)
}
