use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

use crate::{Message, Screen};

/// Landing page with the two ways in
pub fn view<'a>() -> Element<'a, Message> {
    let content = column![
        text("STUDIO GALLERY").size(48),
        text("Timeless photographs, delivered privately").size(18),
        row![
            button(text("Client Gallery"))
                .padding(12)
                .on_press(Message::Navigate(Screen::Client)),
            button(text("Admin Portal"))
                .padding(12)
                .style(button::secondary)
                .on_press(Message::Navigate(Screen::Admin)),
        ]
        .spacing(20),
    ]
    .spacing(24)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
