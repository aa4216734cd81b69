use iced::widget::{Column, Container, Row, Scrollable, button, horizontal_space, text};
use iced::{Alignment, Element, Length};

use super::widgets::{card, choice_field, icon_button, modal, submit_button, text_field, title};
use crate::app::messages::ClassroomMsg;
use crate::app::pages::{ClassroomModal, FormMsg};
use crate::app::{App, Message};

fn class_msg(msg: FormMsg) -> Message {
    Message::Classrooms(ClassroomMsg::ClassForm(msg))
}

fn section_msg(msg: FormMsg) -> Message {
    Message::Classrooms(ClassroomMsg::SectionForm(msg))
}

fn dialog(app: &App, kind: ClassroomModal) -> Element<'_, Message> {
    let page = &app.classrooms;
    let (heading, fields, pending, submit) = match kind {
        ClassroomModal::AddClass => (
            "Add class",
            Column::new().push(text_field(&page.class_form, "name", class_msg)),
            page.class_form.is_pending(),
            ClassroomMsg::SubmitClass,
        ),
        ClassroomModal::AddSection => (
            "Add section",
            Column::new()
                .spacing(10)
                .push(choice_field(&page.section_form, "class_id", &app.data.classes, section_msg))
                .push(text_field(&page.section_form, "name", section_msg)),
            page.section_form.is_pending(),
            ClassroomMsg::SubmitSection,
        ),
    };
    Column::new()
        .spacing(15)
        .push(text(heading).size(24))
        .push(fields)
        .push(
            Row::new()
                .spacing(10)
                .push(button(text("Cancel")).on_press(Message::Classrooms(ClassroomMsg::Close)))
                .push(submit_button("Save", pending, Message::Classrooms(submit))),
        )
        .into()
}

pub fn classrooms_screen(app: &App) -> Container<'_, Message> {
    let tree = app.data.classrooms.iter().fold(Column::new().spacing(10), |column, class| {
        let sections = if class.sections.is_empty() {
            Column::new().push(text("No sections yet").size(14))
        } else {
            class
                .sections
                .iter()
                .fold(Column::new().spacing(4), |col, s| col.push(text(format!("Section {}", s.name)).size(14)))
        };
        let header = Row::new()
            .align_y(Alignment::Center)
            .push(text(class.name.as_str()).size(18))
            .push(horizontal_space())
            .push(button(text("Add section")).on_press(Message::Classrooms(ClassroomMsg::AddSection(Some(class.id)))));
        column.push(card(app, Column::new().spacing(8).push(header).push(Container::new(sections).padding([0, 20]))))
    });

    let body: Element<'_, Message> = if app.data.classrooms.is_empty() {
        text("No classes yet").into()
    } else {
        Scrollable::new(tree).height(Length::Fill).into()
    };

    let base = Column::new()
        .spacing(15)
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(title("Classes"))
                .push(horizontal_space())
                .push(icon_button(app, "plus", "Add section", Message::Classrooms(ClassroomMsg::AddSection(None))))
                .push(icon_button(app, "plus", "Add class", Message::Classrooms(ClassroomMsg::AddClass))),
        )
        .push(body);

    let screen = match app.classrooms.modal {
        Some(kind) => modal(app, base, dialog(app, kind), 420.0),
        None => base.into(),
    };
    Container::new(screen).width(Length::Fill).height(Length::Fill).padding(20)
}
