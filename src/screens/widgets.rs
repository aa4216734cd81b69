//! Building blocks shared by the screens.

use chrono::Datelike;
use iced::widget::container::{background, bordered_box};
use iced::widget::{
    Button, Column, Container, Row, Space, Stack, Text, button, checkbox, horizontal_space, mouse_area, pick_list,
    text, text_input,
};
use iced::{Alignment, Color, Element, Length, Renderer, Theme};
use iced_aw::date_picker;
use iced_aw::date_picker::Date;
use iced_font_awesome::fa_icon_solid;

use crate::app::messages::DateField;
use crate::app::pages::{FormMsg, find_lookup};
use crate::app::{App, Message};
use crate::forms::{FormState, parse_date};
use crate::listing::Pager;
use crate::model::Lookup;

pub const FIELD_WIDTH: f32 = 320.0;
const ERROR: Color = Color { r: 0.85, g: 0.2, b: 0.2, a: 1.0 };

pub fn icon_button_content<'a>(
    app: &'a App,
    icon: &'static str,
    label: impl text::IntoFragment<'a>,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(fa_icon_solid(icon).style(move |_| text::base(&app.theme)))
        .push(text(label))
}

pub fn icon_button<'a>(app: &'a App, icon: &'static str, label: &'a str, message: Message) -> Button<'a, Message> {
    button(icon_button_content(app, icon, label)).on_press(message)
}

pub fn title<'a>(label: impl text::IntoFragment<'a>) -> Text<'a> {
    text(label).size(28)
}

pub fn error_text<'a>(message: impl text::IntoFragment<'a>) -> Text<'a> {
    text(message).size(14).color(ERROR)
}

pub fn card<'a>(app: &'a App, content: impl Into<Element<'a, Message>>) -> Container<'a, Message> {
    Container::new(content).padding(10).width(Length::Fill).style(move |_| bordered_box(&app.theme))
}

/// Field label with a `*` when the field is currently required.
pub fn label(form: &FormState, name: &str) -> String {
    let base = form.schema().field(name).map(|f| f.label).unwrap_or(name);
    if form.is_required(name) { format!("{base} *") } else { base.to_string() }
}

fn labelled<'a>(
    form: &'a FormState,
    name: &'static str,
    input: impl Into<Element<'a, Message>>,
) -> Column<'a, Message> {
    let mut column = Column::new().spacing(4).push(text(label(form, name)).size(14)).push(input);
    if let Some(error) = form.error(name) {
        column = column.push(error_text(error));
    }
    column
}

pub fn text_field<'a>(
    form: &'a FormState,
    name: &'static str,
    wrap: impl Fn(FormMsg) -> Message + 'a,
) -> Column<'a, Message> {
    let input = text_input(&label(form, name), form.value(name))
        .on_input(move |value| wrap(FormMsg::Input(name, value)))
        .padding(8)
        .width(Length::Fixed(FIELD_WIDTH));
    labelled(form, name, input)
}

pub fn secure_field<'a>(
    form: &'a FormState,
    name: &'static str,
    wrap: impl Fn(FormMsg) -> Message + 'a,
) -> Column<'a, Message> {
    let input = text_input(&label(form, name), form.value(name))
        .on_input(move |value| wrap(FormMsg::Input(name, value)))
        .secure(true)
        .padding(8)
        .width(Length::Fixed(FIELD_WIDTH));
    labelled(form, name, input)
}

pub fn choice_field<'a>(
    form: &'a FormState,
    name: &'static str,
    options: &'a [Lookup],
    wrap: impl Fn(FormMsg) -> Message + 'a,
) -> Column<'a, Message> {
    let selected = find_lookup(options, form.id(name));
    let input = pick_list(options, selected, move |choice| wrap(FormMsg::Choice(name, choice)))
        .placeholder("Select")
        .width(Length::Fixed(FIELD_WIDTH));
    labelled(form, name, input)
}

/// A choice among fixed strings stored verbatim in the form.
pub fn option_field<'a>(
    form: &'a FormState,
    name: &'static str,
    options: &'static [&'static str],
    wrap: impl Fn(FormMsg) -> Message + 'a,
) -> Column<'a, Message> {
    let selected = options.iter().copied().find(|o| *o == form.value(name));
    let input = pick_list(options, selected, move |choice: &'static str| {
        wrap(FormMsg::Input(name, choice.to_string()))
    })
    .placeholder("Select")
    .width(Length::Fixed(FIELD_WIDTH));
    labelled(form, name, input)
}

pub fn flag_field<'a>(
    form: &'a FormState,
    name: &'static str,
    wrap: impl Fn(FormMsg) -> Message + 'a,
) -> Column<'a, Message> {
    let label = form.schema().field(name).map(|f| f.label).unwrap_or(name);
    Column::new()
        .push(checkbox(label, form.flag(name)).on_toggle(move |value| wrap(FormMsg::Flag(name, value))))
}

pub fn picker_date(date: chrono::NaiveDate) -> Date {
    Date { year: date.year(), month: date.month(), day: date.day() }
}

/// Date input with a calendar button. Typing is allowed; the picker writes
/// the same `YYYY-MM-DD` text.
pub fn date_field<'a>(
    app: &'a App,
    form: &'a FormState,
    name: &'static str,
    field: DateField,
    wrap: impl Fn(FormMsg) -> Message + 'a,
) -> Column<'a, Message> {
    let current = parse_date(form.value(name)).map(picker_date).unwrap_or_else(Date::today);
    let input = text_input("YYYY-MM-DD", form.value(name))
        .on_input(move |value| wrap(FormMsg::Input(name, value)))
        .padding(8)
        .width(Length::Fixed(FIELD_WIDTH - 50.0));
    let calendar = button(fa_icon_solid("calendar").style(move |_| text::base(&app.theme)))
        .on_press(Message::OpenDatePicker(field));
    let picker = date_picker(
        app.date_picker == Some(field),
        current,
        calendar,
        Message::CancelDatePicker,
        move |date| Message::DatePicked(field, date),
    );
    labelled(form, name, Row::new().spacing(8).align_y(Alignment::Center).push(input).push(picker))
}

/// Plain lookup picker outside of any form.
pub fn selector<'a>(
    placeholder: &'a str,
    options: &'a [Lookup],
    selected: Option<&'a Lookup>,
    on_select: impl Fn(Lookup) -> Message + 'a,
) -> Element<'a, Message> {
    pick_list(options, selected, on_select).placeholder(placeholder).width(Length::Fixed(240.0)).into()
}

/// Submit button; disabled while the form's submission is pending.
pub fn submit_button<'a>(label: &'a str, pending: bool, message: Message) -> Button<'a, Message> {
    let label = if pending { "Saving..." } else { label };
    button(text(label)).padding([8, 16]).on_press_maybe((!pending).then_some(message))
}

pub fn search_box<'a>(value: &'a str, on_input: impl Fn(String) -> Message + 'a) -> Element<'a, Message> {
    text_input("Search by name", value).on_input(on_input).padding(8).width(Length::Fixed(300.0)).into()
}

pub fn pager_row<'a>(pager: &Pager, total: usize, prev: Message, next: Message) -> Row<'a, Message> {
    let pages = pager.page_count(total);
    Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(horizontal_space())
        .push(button(text("Prev")).on_press_maybe((pager.page > 0).then_some(prev)))
        .push(text(pager.label(total)))
        .push(button(text("Next")).on_press_maybe((pager.page + 1 < pages).then_some(next)))
}

/// Header and rows laid out with fixed-portion columns.
pub fn table<'a>(headers: &[&'static str], rows: Vec<Vec<Element<'a, Message>>>) -> Column<'a, Message> {
    let header = headers.iter().fold(Row::new().spacing(10), |row, h| {
        row.push(Container::new(text(*h).size(15)).width(Length::FillPortion(1)))
    });
    let mut column = Column::new().spacing(8).push(header);
    if rows.is_empty() {
        return column.push(text("No records found").size(14));
    }
    for cells in rows {
        let row = cells
            .into_iter()
            .fold(Row::new().spacing(10).align_y(Alignment::Center), |row, cell| {
                row.push(Container::new(cell).width(Length::FillPortion(1)))
            });
        column = column.push(row);
    }
    column
}

pub fn cell<'a>(value: impl text::IntoFragment<'a>) -> Element<'a, Message> {
    text(value).size(14).into()
}

pub fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// `content` centered on a dimmed layer over `base`.
pub fn modal<'a>(
    app: &'a App,
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    width: f32,
) -> Element<'a, Message> {
    let dialog = Container::new(content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(width));
    let overlay = Container::new(mouse_area(Container::new(dialog).center(Length::Fill).padding(40)))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }));
    Stack::new().push(base).push(overlay).into()
}

pub fn spacer<'a>() -> Element<'a, Message, Theme, Renderer> {
    Space::with_height(Length::Fixed(10.0)).into()
}
