use iced::widget::{Container, column, pick_list, text, vertical_space};
use iced::{Center, Length};

use crate::app::{App, Message};
use crate::config::{DataSourceKind, theme_names, theme_to_str};

pub fn settings_screen(app: &App) -> Container<'_, Message> {
    let current = theme_to_str(&app.theme);
    let source = match app.config.data_source {
        DataSourceKind::Live => format!("Live backend at {}", app.config.api_base_url),
        DataSourceKind::Mock => "Built-in mock backend".to_string(),
    };
    let content = column![
        text("Settings").size(30),
        vertical_space().height(Length::Fixed(20.0)),
        text("Theme").size(16),
        pick_list(theme_names(), Some(current), Message::ThemeSelected).placeholder("Choose a theme"),
        vertical_space().height(Length::Fixed(20.0)),
        text("Data source").size(16),
        text(source),
        text(format!("Local store: {}", app.config.local_db_path)).size(14),
        text(format!("Rows per page: {}", app.config.page_size)).size(14),
    ]
    .spacing(10)
    .align_x(Center);

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(40)
}
