use iced::Length;
use iced::widget::{Column, Container, Row, Scrollable, pick_list, text};

use super::widgets::{
    FIELD_WIDTH, card, cell, choice_field, date_field, error_text, label, submit_button, table, text_field, title,
};
use crate::app::messages::{AppointmentMsg, DateField};
use crate::app::pages::{FormMsg, find_lookup};
use crate::app::{App, Message};

fn form_msg(msg: FormMsg) -> Message {
    Message::Appointments(AppointmentMsg::Form(msg))
}

pub fn appointments_screen(app: &App) -> Container<'_, Message> {
    let page = &app.appointments;
    let form = &page.form;

    let designation = find_lookup(&app.data.designations, form.id("designation"));
    let mut designation_field = Column::new().spacing(4).push(text(label(form, "designation")).size(14)).push(
        pick_list(app.data.designations.as_slice(), designation, |d| {
            Message::Appointments(AppointmentMsg::DesignationPicked(d))
        })
        .placeholder("Select")
        .width(Length::Fixed(FIELD_WIDTH)),
    );
    if let Some(error) = form.error("designation") {
        designation_field = designation_field.push(error_text(error));
    }

    let booking = Column::new()
        .spacing(10)
        .push(text_field(form, "patient_name", form_msg))
        .push(choice_field(form, "hospital", &app.data.hospitals, form_msg))
        .push(designation_field)
        .push(choice_field(form, "doctor", &page.doctors, form_msg))
        .push(date_field(app, form, "date", DateField::Appointment, form_msg))
        .push(submit_button("Book appointment", form.is_pending(), Message::Appointments(AppointmentMsg::Submit)));

    let rows = app
        .data
        .appointments
        .iter()
        .map(|a| {
            vec![
                cell(a.date.as_str()),
                cell(a.patient_name.as_str()),
                cell(a.hospital.name.as_str()),
                cell(a.designation.name.as_str()),
                cell(a.doctor.name.as_str()),
            ]
        })
        .collect();

    let content = Row::new()
        .spacing(30)
        .push(Column::new().spacing(15).push(title("Appointments")).push(booking))
        .push(card(
            app,
            Scrollable::new(table(&["Date", "Patient", "Hospital", "Designation", "Doctor"], rows))
                .height(Length::Fill),
        ));

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(20)
}
