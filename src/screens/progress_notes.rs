use iced::widget::{Column, Container, Row, Scrollable, pick_list, text};
use iced::{Alignment, Length};

use super::widgets::{card, cell, error_text, label, selector, submit_button, table, text_field, title};
use crate::app::messages::NoteMsg;
use crate::app::pages::{FormMsg, find_lookup};
use crate::app::{App, Message};

fn form_msg(msg: FormMsg) -> Message {
    Message::Notes(NoteMsg::Form(msg))
}

pub fn progress_notes_screen(app: &App) -> Container<'_, Message> {
    let page = &app.notes;
    let cascade = &page.cascade;
    let form = &page.form;

    let selectors = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Class"))
        .push(selector(
            "Select class",
            &app.data.classes,
            find_lookup(&app.data.classes, cascade.class_id()),
            |c| Message::Notes(NoteMsg::ClassPicked(c)),
        ))
        .push(text("Section"))
        .push(selector("Select section", cascade.sections(), cascade.selected_section(), |s| {
            Message::Notes(NoteMsg::SectionPicked(s))
        }));

    let roster = page.roster(&app.data.students);
    let student = find_lookup(&roster, form.id("student_id")).cloned();
    let mut student_picker = Column::new().spacing(4).push(text(label(form, "student_id")).size(14)).push(
        pick_list(roster, student, |s| form_msg(FormMsg::Choice("student_id", s)))
            .placeholder("Select student")
            .width(Length::Fixed(320.0)),
    );
    if let Some(error) = form.error("student_id") {
        student_picker = student_picker.push(error_text(error));
    }

    let editor = Column::new()
        .spacing(10)
        .push(student_picker)
        .push(text_field(form, "note", form_msg))
        .push(submit_button("Save note", form.is_pending(), Message::Notes(NoteMsg::Submit)));

    let rows = app
        .data
        .notes
        .iter()
        .filter(|n| cascade.section_id().is_none_or(|id| n.section_id == id))
        .map(|n| vec![cell(n.date.as_str()), cell(n.student_name.as_str()), cell(n.note.as_str())])
        .collect();

    let content = Column::new()
        .spacing(15)
        .push(title("Progress Notes"))
        .push(selectors)
        .push(editor)
        .push(card(app, Scrollable::new(table(&["Date", "Student", "Note"], rows)).height(Length::Fill)));

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(20)
}
