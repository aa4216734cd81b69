use iced::widget::{Column, Container, Row, Scrollable, button, horizontal_space, pick_list, text};
use iced::{Alignment, Element, Length};

use super::widgets::{card, cell, error_text, icon_button, modal, submit_button, table, text_field, title};
use crate::app::messages::GroupMsg;
use crate::app::pages::FormMsg;
use crate::app::pages::groups::candidates;
use crate::app::{App, Message};
use crate::model::GroupMember;

fn form_msg(msg: FormMsg) -> Message {
    Message::Groups(GroupMsg::Form(msg))
}

fn group_form(app: &App) -> Element<'_, Message> {
    let page = &app.groups;
    let heading = if page.editing.is_some() { "Edit group" } else { "New group" };
    let available = page.available(candidates(&app.data.students, &app.data.teachers));

    let members = page.members.iter().fold(Column::new().spacing(6), |col, member| {
        col.push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(text(member.to_string()))
                .push(horizontal_space())
                .push(button(text("Remove")).on_press(Message::Groups(GroupMsg::RemoveMember(member.key())))),
        )
    });

    let mut content = Column::new()
        .spacing(12)
        .push(text(heading).size(24))
        .push(text_field(&page.form, "name", form_msg))
        .push(
            pick_list(available, None::<GroupMember>, |m| Message::Groups(GroupMsg::AddMember(m)))
                .placeholder("Add a student or teacher")
                .width(Length::Fill),
        )
        .push(text(format!("Members ({})", page.members.len())).size(16))
        .push(Scrollable::new(members).height(Length::Fixed(260.0)));
    if page.members.is_empty() {
        content = content.push(error_text("Add at least one member"));
    }
    content
        .push(
            Row::new()
                .spacing(10)
                .push(button(text("Cancel")).on_press(Message::Groups(GroupMsg::Close)))
                .push(submit_button("Save", page.form.is_pending(), Message::Groups(GroupMsg::Submit))),
        )
        .into()
}

pub fn groups_screen(app: &App) -> Container<'_, Message> {
    let rows = app
        .data
        .groups
        .iter()
        .map(|group| {
            vec![
                cell(group.name.as_str()),
                cell(group.members.len().to_string()),
                Row::new()
                    .spacing(5)
                    .push(button(text("Edit")).on_press(Message::Groups(GroupMsg::Edit(group.clone()))))
                    .push(button(text("Delete")).on_press(Message::Groups(GroupMsg::Delete(group.id))))
                    .into(),
            ]
        })
        .collect();

    let base = Column::new()
        .spacing(15)
        .push(
            Row::new()
                .align_y(Alignment::Center)
                .push(title("Groups"))
                .push(horizontal_space())
                .push(icon_button(app, "plus", "New group", Message::Groups(GroupMsg::New))),
        )
        .push(card(app, Scrollable::new(table(&["Group", "Members", ""], rows)).height(Length::Fill)));

    let screen = if app.groups.show_form { modal(app, base, group_form(app), 520.0) } else { base.into() };
    Container::new(screen).width(Length::Fill).height(Length::Fill).padding(20)
}
