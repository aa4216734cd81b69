use iced::widget::{Column, Container, Row, Scrollable, button, horizontal_space, text};
use iced::{Alignment, Element, Length};

use super::widgets::{
    card, cell, choice_field, flag_field, icon_button, modal, money, option_field, pager_row, search_box,
    secure_field, submit_button, table, text_field, title,
};
use crate::api::MasterKind;
use crate::app::messages::StaffMsg;
use crate::app::pages::FormMsg;
use crate::app::{App, Message};
use crate::forms::schemas::STATUSES;
use crate::model::StaffRecord;

fn form_msg(msg: FormMsg) -> Message {
    Message::Staff(StaffMsg::Form(msg))
}

fn staff_form(app: &App) -> Element<'_, Message> {
    let page = &app.staff;
    let form = &page.form;
    let data = &app.data;
    let heading = if page.editing.is_some() { "Edit staff member" } else { "Add staff member" };

    let left = Column::new()
        .spacing(10)
        .push(text_field(form, "first_name", form_msg))
        .push(text_field(form, "last_name", form_msg))
        .push(choice_field(form, "gender", data.master(MasterKind::Gender), form_msg))
        .push(choice_field(form, "qualification", data.master(MasterKind::Qualification), form_msg))
        .push(text_field(form, "specialist", form_msg))
        .push(text_field(form, "experience", form_msg))
        .push(choice_field(form, "designation", data.master(MasterKind::Designation), form_msg))
        .push(choice_field(form, "staff_type", data.master(MasterKind::StaffType), form_msg));
    let right = Column::new()
        .spacing(10)
        .push(text_field(form, "mobile", form_msg))
        .push(text_field(form, "email", form_msg))
        .push(text_field(form, "username", form_msg))
        .push(secure_field(form, "password", form_msg))
        .push(text_field(form, "salary", form_msg))
        .push(option_field(form, "active", STATUSES, form_msg))
        .push(flag_field(form, "transport_required", form_msg));

    Column::new()
        .spacing(15)
        .push(text(heading).size(24))
        .push(Scrollable::new(Row::new().spacing(30).push(left).push(right)).height(Length::Fixed(520.0)))
        .push(
            Row::new()
                .spacing(10)
                .push(button(text("Cancel")).on_press(Message::Staff(StaffMsg::Close)))
                .push(submit_button("Save", form.is_pending(), Message::Staff(StaffMsg::Submit))),
        )
        .into()
}

fn detail<'a>(label: &'a str, value: String) -> Row<'a, Message> {
    Row::new().spacing(10).push(text(label).size(14).width(Length::Fixed(140.0))).push(text(value).size(14))
}

fn staff_details(staff: &StaffRecord) -> Element<'_, Message> {
    Column::new()
        .spacing(8)
        .push(text(staff.full_name()).size(24))
        .push(detail("Gender", staff.gender.name.clone()))
        .push(detail("Qualification", staff.qualification.name.clone()))
        .push(detail("Specialist", staff.specialist.clone()))
        .push(detail("Experience", staff.experience.clone()))
        .push(detail("Designation", staff.designation.name.clone()))
        .push(detail("Staff type", staff.staff_type.name.clone()))
        .push(detail("Mobile", staff.mobile.clone()))
        .push(detail("Email", staff.email.clone()))
        .push(detail("Salary", money(staff.salary)))
        .push(detail("Status", if staff.active { "Active" } else { "Inactive" }.to_string()))
        .push(detail("Transport", if staff.transport_required { "Yes" } else { "No" }.to_string()))
        .push(button(text("Close")).on_press(Message::Staff(StaffMsg::CloseView)))
        .into()
}

pub fn staff_screen(app: &App) -> Container<'_, Message> {
    let page = &app.staff;
    let visible = page.visible(&app.data.staff);
    let rows = page
        .pager
        .slice(&visible)
        .iter()
        .copied()
        .map(|staff| {
            vec![
                cell(staff.full_name()),
                cell(staff.designation.name.as_str()),
                cell(staff.mobile.as_str()),
                cell(if staff.active { "Active" } else { "Inactive" }),
                Row::new()
                    .spacing(5)
                    .push(button(text("View")).on_press(Message::Staff(StaffMsg::View(staff.clone()))))
                    .push(button(text("Edit")).on_press(Message::Staff(StaffMsg::Edit(staff.clone()))))
                    .into(),
            ]
        })
        .collect();

    let toolbar = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(search_box(&page.search, |q| Message::Staff(StaffMsg::Search(q))))
        .push(horizontal_space())
        .push(icon_button(app, "plus", "Add staff", Message::Staff(StaffMsg::New)));

    let base = Column::new()
        .spacing(15)
        .push(title("Staff"))
        .push(toolbar)
        .push(card(
            app,
            Scrollable::new(table(&["Name", "Designation", "Mobile", "Status", ""], rows)).height(Length::Fill),
        ))
        .push(pager_row(
            &page.pager,
            visible.len(),
            Message::Staff(StaffMsg::PrevPage),
            Message::Staff(StaffMsg::NextPage),
        ));

    let screen: Element<'_, Message> = if page.show_form {
        modal(app, base, staff_form(app), 760.0)
    } else if let Some(staff) = &page.viewing {
        modal(app, base, staff_details(staff), 480.0)
    } else {
        base.into()
    };
    Container::new(screen).width(Length::Fill).height(Length::Fill).padding(20)
}
