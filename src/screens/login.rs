use iced::widget::{Container, button, column, text, vertical_space};
use iced::{Center, Length};

use super::widgets::{error_text, secure_field, submit_button, text_field};
use crate::app::state::Screen;
use crate::app::{App, Message};

pub fn login_screen(app: &App) -> Container<'_, Message> {
    let form = &app.login;
    let content = column![
        text("Sign in").size(30),
        vertical_space(),
        text_field(form, "email", Message::Login),
        secure_field(form, "password", Message::Login),
        submit_button("Sign in", form.is_pending(), Message::LoginPressed),
        error_text(app.auth_error.as_deref().unwrap_or_default()),
        vertical_space(),
        button("Create an account").on_press(Message::Navigate(Screen::Signup)).padding(10),
    ]
    .spacing(15)
    .width(Length::Fill)
    .align_x(Center);

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(40)
}

pub fn signup_screen(app: &App) -> Container<'_, Message> {
    let form = &app.signup;
    let content = column![
        text("Sign up").size(30),
        vertical_space(),
        text_field(form, "name", Message::Signup),
        text_field(form, "email", Message::Signup),
        secure_field(form, "password", Message::Signup),
        secure_field(form, "confirm_password", Message::Signup),
        submit_button("Sign up", form.is_pending(), Message::SignupPressed),
        error_text(app.auth_error.as_deref().unwrap_or_default()),
        vertical_space(),
        button("Back to sign in").on_press(Message::Navigate(Screen::Login)).padding(10),
    ]
    .spacing(15)
    .width(Length::Fill)
    .align_x(Center);

    Container::new(content).width(Length::Fill).height(Length::Fill).padding(40)
}
