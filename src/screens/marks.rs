use iced::widget::{Column, Container, Row, Scrollable, button, horizontal_space, pick_list, text, text_input};
use iced::{Alignment, Element, Length};

use super::widgets::{card, cell, error_text, icon_button, modal, selector, submit_button, table, title};
use crate::app::messages::MarksMsg;
use crate::app::pages::{FormMsg, find_lookup};
use crate::app::{App, Message};
use crate::forms::FormState;
use crate::model::MarkEntry;

fn row_editor<'a>(app: &'a App, index: usize, row: &'a FormState) -> Element<'a, Message> {
    let page = &app.marks;
    let selected = find_lookup(page.subjects(), row.id("subject_id")).cloned();
    let subject = pick_list(page.available_subjects(index), selected, move |s| {
        Message::Marks(MarksMsg::Row(index, FormMsg::Choice("subject_id", s)))
    })
    .placeholder("Subject")
    .width(Length::Fixed(180.0));
    let number = |name: &'static str, placeholder: &'a str| {
        text_input(placeholder, row.value(name))
            .on_input(move |v| Message::Marks(MarksMsg::Row(index, FormMsg::Input(name, v))))
            .padding(6)
            .width(Length::Fixed(100.0))
    };
    let remark = text_input("Remark", row.value("remark"))
        .on_input(move |v| Message::Marks(MarksMsg::Row(index, FormMsg::Input("remark", v))))
        .padding(6)
        .width(Length::Fixed(180.0));

    let inputs = Row::new()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(subject)
        .push(number("max_marks", "Max"))
        .push(number("pass_marks", "Pass"))
        .push(remark)
        .push(button(text("X")).on_press_maybe(
            (page.rows.len() > 1).then_some(Message::Marks(MarksMsg::RemoveRow(index))),
        ));
    let errors = ["subject_id", "max_marks", "pass_marks"]
        .iter()
        .filter_map(|name| row.error(name))
        .fold(Column::new(), |col, e| col.push(error_text(e)));
    Column::new().spacing(4).push(inputs).push(errors).into()
}

fn marks_form(app: &App) -> Element<'_, Message> {
    let page = &app.marks;
    let cascade = &page.cascade;
    let heading = if page.editing.is_some() { "Edit marks" } else { "Add marks" };

    let selectors = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(selector(
            "Select class",
            &app.data.classes,
            find_lookup(&app.data.classes, cascade.class_id()),
            |c| Message::Marks(MarksMsg::ClassPicked(c)),
        ))
        .push(selector("Select section", cascade.sections(), cascade.selected_section(), |s| {
            Message::Marks(MarksMsg::SectionPicked(s))
        }));
    let header_errors = ["class_id", "section_id"]
        .iter()
        .filter_map(|name| page.header.error(name))
        .fold(Column::new(), |col, e| col.push(error_text(e)));

    let rows = page
        .rows
        .iter()
        .enumerate()
        .fold(Column::new().spacing(10), |col, (index, row)| col.push(row_editor(app, index, row)));

    let mut content = Column::new()
        .spacing(15)
        .push(text(heading).size(24))
        .push(selectors)
        .push(header_errors)
        .push(Scrollable::new(rows).height(Length::Fixed(360.0)))
        .push(button(text("Add subject row")).on_press(Message::Marks(MarksMsg::AddRow)));
    if let Some(error) = &page.error {
        content = content.push(error_text(error.as_str()));
    }
    content
        .push(
            Row::new()
                .spacing(10)
                .push(button(text("Cancel")).on_press(Message::Marks(MarksMsg::Close)))
                .push(submit_button("Save", page.header.is_pending(), Message::Marks(MarksMsg::Submit))),
        )
        .into()
}

fn marks_details(entry: &MarkEntry) -> Element<'_, Message> {
    let rows = entry
        .subjects
        .iter()
        .map(|s| {
            vec![
                cell(s.subject_name.as_str()),
                cell(s.max_marks.to_string()),
                cell(s.pass_marks.to_string()),
                cell(s.remark.as_str()),
            ]
        })
        .collect();
    Column::new()
        .spacing(12)
        .push(text(format!("{} - {}", entry.class_name, entry.section_name)).size(22))
        .push(table(&["Subject", "Max", "Pass", "Remark"], rows))
        .push(button(text("Close")).on_press(Message::Marks(MarksMsg::CloseView)))
        .into()
}

pub fn marks_screen(app: &App) -> Container<'_, Message> {
    let page = &app.marks;
    let rows = app
        .data
        .marksheets
        .iter()
        .map(|entry| {
            vec![
                cell(entry.class_name.as_str()),
                cell(entry.section_name.as_str()),
                cell(entry.subjects.len().to_string()),
                Row::new()
                    .spacing(5)
                    .push(button(text("View")).on_press(Message::Marks(MarksMsg::View(entry.clone()))))
                    .push(button(text("Edit")).on_press(Message::Marks(MarksMsg::Edit(entry.clone()))))
                    .into(),
            ]
        })
        .collect();

    let base = Column::new()
        .spacing(15)
        .push(
            Row::new()
                .align_y(Alignment::Center)
                .push(title("Marks"))
                .push(horizontal_space())
                .push(icon_button(app, "plus", "Add marks", Message::Marks(MarksMsg::New))),
        )
        .push(card(
            app,
            Scrollable::new(table(&["Class", "Section", "Subjects", ""], rows)).height(Length::Fill),
        ));

    let screen = if page.show_form {
        modal(app, base, marks_form(app), 760.0)
    } else if let Some(entry) = &page.viewing {
        modal(app, base, marks_details(entry), 560.0)
    } else {
        base.into()
    };
    Container::new(screen).width(Length::Fill).height(Length::Fill).padding(20)
}
