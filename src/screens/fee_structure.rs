use iced::widget::{Column, Container, Row, Scrollable, button, horizontal_space, text};
use iced::{Alignment, Element, Length};

use super::widgets::{
    card, cell, choice_field, error_text, flag_field, icon_button, modal, money, submit_button, table, text_field,
    title,
};
use crate::app::messages::{ExportKind, FeeMsg};
use crate::app::pages::FormMsg;
use crate::app::{App, Message};
use crate::model::FeeStructure;

fn form_msg(msg: FormMsg) -> Message {
    Message::Fees(FeeMsg::Form(msg))
}

fn item_msg(msg: FormMsg) -> Message {
    Message::Fees(FeeMsg::ItemForm(msg))
}

fn structure_form(app: &App) -> Element<'_, Message> {
    let page = &app.fees;
    let fee_types = app.data.fee_types();
    let form = &page.form;
    let items = &page.item_form;
    let heading = if page.editing.is_some() { "Edit fee structure" } else { "Add fee structure" };

    let header = Column::new()
        .spacing(10)
        .push(choice_field(form, "class_id", &app.data.classes, form_msg))
        .push(text_field(form, "academic_year", form_msg))
        .push(text_field(form, "number_of_terms", form_msg))
        .push(flag_field(form, "is_active", form_msg));

    let item_rows = page
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            vec![
                cell(item.name.as_str()),
                cell(item.fee_type.name.as_str()),
                cell(money(item.amount)),
                cell(if item.is_required { "Required" } else { "Optional" }),
                Row::new()
                    .spacing(5)
                    .push(button(text("Edit")).on_press(Message::Fees(FeeMsg::EditItem(index))))
                    .push(button(text("Remove")).on_press(Message::Fees(FeeMsg::RemoveItem(index))))
                    .into(),
            ]
        })
        .collect();

    let mut item_editor = Column::new()
        .spacing(10)
        .push(text("Fee items").size(18))
        .push(table(&["Name", "Type", "Amount", "", ""], item_rows));
    if let Some(error) = &page.items_error {
        item_editor = item_editor.push(error_text(error.as_str()));
    }
    item_editor = item_editor
        .push(text_field(items, "name", item_msg))
        .push(choice_field(items, "fee_type", fee_types, item_msg))
        .push(text_field(items, "amount", item_msg))
        .push(text_field(items, "description", item_msg))
        .push(flag_field(items, "is_required", item_msg))
        .push(button(text(if page.editing_item.is_some() { "Update item" } else { "Add item" })).on_press(Message::Fees(FeeMsg::AddItem)));

    let totals = Row::new()
        .spacing(30)
        .push(text(format!("Total: {}", money(page.total()))).size(16))
        .push(text(format!("Per term: {}", money(page.per_term()))).size(16));

    Column::new()
        .spacing(15)
        .push(text(heading).size(24))
        .push(Scrollable::new(Column::new().spacing(20).push(header).push(item_editor)).height(Length::Fixed(480.0)))
        .push(totals)
        .push(
            Row::new()
                .spacing(10)
                .push(button(text("Cancel")).on_press(Message::Fees(FeeMsg::Close)))
                .push(submit_button("Save", form.is_pending(), Message::Fees(FeeMsg::Submit))),
        )
        .into()
}

fn structure_row(structure: &FeeStructure) -> Vec<Element<'_, Message>> {
    vec![
        cell(structure.class_name.as_str()),
        cell(structure.academic_year.as_str()),
        cell(structure.fee_items.len().to_string()),
        cell(money(structure.total_amount)),
        cell(structure.number_of_terms.to_string()),
        cell(money(structure.per_term())),
        cell(if structure.is_active { "Active" } else { "Inactive" }),
        button(text("Edit")).on_press(Message::Fees(FeeMsg::Edit(structure.clone()))).into(),
    ]
}

pub fn fee_structure_screen(app: &App) -> Container<'_, Message> {
    let rows = app.data.fee_structures.iter().map(structure_row).collect();

    let base = Column::new()
        .spacing(15)
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(title("Fee Structure"))
                .push(horizontal_space())
                .push(icon_button(app, "file-excel", "Export", Message::Export(ExportKind::FeeStructures)))
                .push(icon_button(app, "plus", "Add structure", Message::Fees(FeeMsg::New))),
        )
        .push(card(
            app,
            Scrollable::new(table(
                &["Class", "Academic year", "Items", "Total", "Terms", "Per term", "Status", ""],
                rows,
            ))
            .height(Length::Fill),
        ));

    let screen = if app.fees.show_form { modal(app, base, structure_form(app), 640.0) } else { base.into() };
    Container::new(screen).width(Length::Fill).height(Length::Fill).padding(20)
}
