use iced::widget::{Column, Container, Row, Scrollable, button, horizontal_space, text};
use iced::{Alignment, Element, Length};

use super::widgets::{
    card, cell, choice_field, date_field, error_text, flag_field, icon_button, modal, money, option_field,
    pager_row, search_box, selector, submit_button, table, text_field, title,
};
use crate::api::MasterKind;
use crate::app::messages::{DateField, ExportKind, StudentMsg};
use crate::app::pages::{FormMsg, find_lookup};
use crate::app::{App, Message};
use crate::forms::schemas::{DISCOUNT_TYPES, STATUSES};
use crate::model::DiscountType;

fn form_msg(msg: FormMsg) -> Message {
    Message::Students(StudentMsg::Form(msg))
}

fn student_form(app: &App) -> Element<'_, Message> {
    let page = &app.students;
    let form = &page.form;
    let occupations = app.data.master(MasterKind::Occupation);
    let heading = if page.editing.is_some() { "Edit student" } else { "Add student" };

    let mut class_row = Column::new().spacing(4).push(text("Class *").size(14)).push(selector(
        "Select class",
        &app.data.classes,
        find_lookup(&app.data.classes, page.cascade.class_id()),
        |c| Message::Students(StudentMsg::ClassPicked(c)),
    ));
    if let Some(error) = form.error("class_id") {
        class_row = class_row.push(error_text(error));
    }
    let mut section_row = Column::new().spacing(4).push(text("Section *").size(14)).push(selector(
        "Select section",
        page.cascade.sections(),
        page.cascade.selected_section(),
        |s| Message::Students(StudentMsg::SectionPicked(s)),
    ));
    if let Some(error) = form.error("section_id") {
        section_row = section_row.push(error_text(error));
    }

    let personal = Column::new()
        .spacing(10)
        .push(text_field(form, "first_name", form_msg))
        .push(text_field(form, "last_name", form_msg))
        .push(choice_field(form, "gender", app.data.master(MasterKind::Gender), form_msg))
        .push(text_field(form, "parent_name", form_msg))
        .push(text_field(form, "mother_name", form_msg))
        .push(choice_field(form, "father_occupation", occupations, form_msg))
        .push(choice_field(form, "mother_occupation", occupations, form_msg))
        .push(text_field(form, "mobile", form_msg))
        .push(text_field(form, "email", form_msg))
        .push(text_field(form, "address", form_msg));

    let mut school = Column::new()
        .spacing(10)
        .push(class_row)
        .push(section_row)
        .push(text_field(form, "total_fee", form_msg))
        .push(option_field(form, "discount_type", DISCOUNT_TYPES, form_msg));
    if page.discount_type() != DiscountType::None {
        school = school.push(text_field(form, "discount_value", form_msg));
    }
    school = school
        .push(text(format!("Final amount: {}", money(page.final_amount()))).size(16))
        .push(flag_field(form, "transport_required", form_msg));
    if form.flag("transport_required") {
        school = school
            .push(date_field(app, form, "transport_start", DateField::TransportStart, form_msg))
            .push(text_field(form, "transport_fee", form_msg));
    }
    school = school.push(option_field(form, "active", STATUSES, form_msg));

    let content = Column::new()
        .spacing(15)
        .push(text(heading).size(24))
        .push(Scrollable::new(Row::new().spacing(30).push(personal).push(school)).height(Length::Fixed(520.0)))
        .push(
            Row::new()
                .spacing(10)
                .push(button(text("Cancel")).on_press(Message::Students(StudentMsg::Close)))
                .push(submit_button("Save", form.is_pending(), Message::Students(StudentMsg::Submit))),
        );
    content.into()
}

pub fn students_screen(app: &App) -> Container<'_, Message> {
    let page = &app.students;
    let visible = page.visible(&app.data.students);
    let rows = page
        .pager
        .slice(&visible)
        .iter()
        .copied()
        .map(|student| {
            vec![
                cell(student.full_name()),
                cell(format!("{} {}", student.class_name, student.section_name)),
                cell(student.mobile.as_str()),
                cell(money(student.fee_details.final_amount)),
                cell(if student.active { "Active" } else { "Inactive" }),
                button(text("Edit")).on_press(Message::Students(StudentMsg::Edit(student.clone()))).into(),
            ]
        })
        .collect();

    let toolbar = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(search_box(&page.search, |q| Message::Students(StudentMsg::Search(q))))
        .push(horizontal_space())
        .push(icon_button(app, "file-excel", "Export", Message::Export(ExportKind::Students)))
        .push(icon_button(app, "plus", "Add student", Message::Students(StudentMsg::New)));

    let base = Column::new()
        .spacing(15)
        .push(title("Students"))
        .push(toolbar)
        .push(card(
            app,
            Scrollable::new(table(&["Name", "Class", "Mobile", "Fee", "Status", ""], rows)).height(Length::Fill),
        ))
        .push(pager_row(
            &page.pager,
            visible.len(),
            Message::Students(StudentMsg::PrevPage),
            Message::Students(StudentMsg::NextPage),
        ));

    let screen: Element<'_, Message> =
        if page.show_form { modal(app, base, student_form(app), 760.0) } else { base.into() };
    Container::new(screen).width(Length::Fill).height(Length::Fill).padding(20)
}
