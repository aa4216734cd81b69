use iced::widget::{Column, Container, Row, Scrollable, button, text};
use iced::{Alignment, Length};

use super::widgets::{card, cell, date_field, submit_button, table, text_field, title};
use crate::app::messages::{DateField, HolidayMsg};
use crate::app::pages::FormMsg;
use crate::app::pages::holidays::sorted;
use crate::app::{App, Message};

fn form_msg(msg: FormMsg) -> Message {
    Message::Holidays(HolidayMsg::Form(msg))
}

pub fn holidays_screen(app: &App) -> Container<'_, Message> {
    let form = &app.holidays.form;
    let add = Row::new()
        .spacing(15)
        .align_y(Alignment::End)
        .push(text_field(form, "name", form_msg))
        .push(date_field(app, form, "date", DateField::Holiday, form_msg))
        .push(submit_button("Add holiday", form.is_pending(), Message::Holidays(HolidayMsg::Submit)));

    let rows = sorted(&app.data.holidays)
        .into_iter()
        .map(|h| {
            vec![
                cell(h.date.as_str()),
                cell(h.name.as_str()),
                button(text("Delete")).on_press(Message::Holidays(HolidayMsg::Delete(h.id))).into(),
            ]
        })
        .collect();

    let content = Column::new()
        .spacing(15)
        .push(title("Holidays"))
        .push(add)
        .push(card(app, Scrollable::new(table(&["Date", "Holiday", ""], rows)).height(Length::Fill)));

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(20)
}
