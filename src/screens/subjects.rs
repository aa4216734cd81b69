use iced::widget::{Column, Container, Row, Scrollable, text};
use iced::{Alignment, Length};

use super::widgets::{card, selector, submit_button, text_field, title};
use crate::app::messages::SubjectMsg;
use crate::app::pages::{FormMsg, find_lookup};
use crate::app::{App, Message};

fn form_msg(msg: FormMsg) -> Message {
    Message::Subjects(SubjectMsg::Form(msg))
}

pub fn subjects_screen(app: &App) -> Container<'_, Message> {
    let page = &app.subjects;
    let class = find_lookup(&app.data.classes, page.cascade.class_id());

    let picker = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Class"))
        .push(selector("Select class", &app.data.classes, class, |c| {
            Message::Subjects(SubjectMsg::ClassPicked(c))
        }));

    let mut content = Column::new().spacing(15).push(title("Subjects")).push(picker);

    if let Some(class) = class {
        let list = page
            .subjects()
            .iter()
            .fold(Column::new().spacing(6), |col, s| col.push(text(s.name.as_str())));
        let list = if page.subjects().is_empty() {
            Column::new().push(text(format!("No subjects for {} yet", class.name)))
        } else {
            list
        };
        let add = Row::new()
            .spacing(10)
            .align_y(Alignment::End)
            .push(text_field(&page.form, "name", form_msg))
            .push(submit_button("Add subject", page.form.is_pending(), Message::Subjects(SubjectMsg::Submit)));
        content = content.push(card(app, Scrollable::new(list).height(Length::Fill))).push(add);
    } else {
        content = content.push(text("Pick a class to see its subjects").size(14));
    }

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(20)
}
