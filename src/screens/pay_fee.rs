use iced::widget::{Column, Container, Row, Scrollable, container, pick_list, text};
use iced::{Alignment, Color, Element, Length};

use super::widgets::{card, cell, date_field, money, option_field, submit_button, table, text_field, title};
use crate::app::messages::{DateField, PayFeeMsg};
use crate::app::pages::FormMsg;
use crate::app::{App, Message};
use crate::fees::{TermLine, TermStatus, outstanding};
use crate::model::{Lookup, PAYMENT_MODES};

fn form_msg(msg: FormMsg) -> Message {
    Message::PayFee(PayFeeMsg::Form(msg))
}

fn status_chip<'a>(status: TermStatus) -> Element<'a, Message> {
    let color = match status {
        TermStatus::Paid => Color::from_rgb(0.1, 0.6, 0.2),
        TermStatus::PartiallyPaid => Color::from_rgb(0.85, 0.55, 0.0),
        TermStatus::Unpaid => Color::from_rgb(0.8, 0.2, 0.2),
    };
    container(text(status.to_string()).size(13).color(Color::WHITE))
        .padding([2, 8])
        .style(move |_| container::Style::default().background(color))
        .into()
}

fn schedule_rows<'a>(lines: &[TermLine]) -> Vec<Vec<Element<'a, Message>>> {
    lines
        .iter()
        .map(|line| {
            vec![
                cell(format!("Term {}", line.term)),
                cell(money(line.due)),
                cell(money(line.paid)),
                cell(money(line.balance())),
                status_chip(line.status),
            ]
        })
        .collect()
}

pub fn pay_fee_screen(app: &App) -> Container<'_, Message> {
    let page = &app.pay_fee;
    let options: Vec<Lookup> = app
        .data
        .students
        .iter()
        .filter_map(|s| Some(Lookup::new(s.id?, format!("{} ({} {})", s.full_name(), s.class_name, s.section_name))))
        .collect();
    let selected = page.student_id.and_then(|id| options.iter().find(|o| o.id == id).cloned());
    let picker = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Student"))
        .push(
            pick_list(options, selected, |s| Message::PayFee(PayFeeMsg::StudentPicked(s)))
                .placeholder("Select student")
                .width(Length::Fixed(360.0)),
        );

    let mut content = Column::new().spacing(15).push(title("Pay Student Fee")).push(picker);

    let Some(student) = page.student(&app.data.students) else {
        content = content.push(text("Pick a student to see the fee schedule").size(14));
        return Container::new(content).width(Length::Fill).height(Length::Fill).padding(20);
    };

    match page.structure(student, &app.data.fee_structures) {
        None => {
            content = content.push(text(format!("No fee structure for {} yet", student.class_name)).size(14));
        }
        Some(structure) => {
            let lines = page.schedule(structure);
            let summary = Row::new()
                .spacing(30)
                .push(text(format!("Academic year: {}", structure.academic_year)))
                .push(text(format!("Total: {}", money(structure.total_amount))))
                .push(text(format!("Outstanding: {}", money(outstanding(structure, &page.payments)))));
            let form = &page.form;
            let payment = Row::new()
                .spacing(15)
                .align_y(Alignment::End)
                .push(text_field(form, "term", form_msg))
                .push(text_field(form, "amount", form_msg))
                .push(option_field(form, "mode", PAYMENT_MODES, form_msg))
                .push(date_field(app, form, "paid_on", DateField::Payment, form_msg));
            content = content
                .push(summary)
                .push(card(app, table(&["Term", "Due", "Paid", "Balance", "Status"], schedule_rows(&lines))))
                .push(text("Record payment").size(18))
                .push(payment)
                .push(submit_button("Record payment", form.is_pending(), Message::PayFee(PayFeeMsg::Submit)));
        }
    }

    let history = page
        .payments
        .iter()
        .map(|p| {
            vec![
                cell(p.paid_on.as_str()),
                cell(format!("Term {}", p.term)),
                cell(money(p.amount)),
                cell(p.mode.as_str()),
            ]
        })
        .collect();
    content = content
        .push(text("Payments").size(18))
        .push(card(app, table(&["Date", "Term", "Amount", "Mode"], history)));

    Container::new(Scrollable::new(content)).width(Length::Fill).height(Length::Fill).padding(20)
}
