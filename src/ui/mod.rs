//! View builders for each screen plus the pieces they share

pub mod admin;
pub mod client;
pub mod home;

use iced::widget::{button, column, container, horizontal_space, image, row, text, Image, Row};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::state::PhotoRecord;
use crate::{Message, Screen, Studio};

/// Size of a photo card in the grids
const CARD_WIDTH: f32 = 220.0;
const CARD_HEIGHT: f32 = 290.0;

const ERROR_COLOR: Color = Color {
    r: 0.86,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};
const NOTICE_COLOR: Color = Color {
    r: 0.2,
    g: 0.55,
    b: 0.3,
    a: 1.0,
};

/// Navigation bar above every screen except the landing page
fn nav_bar<'a>(active: Screen) -> Element<'a, Message> {
    let link = |label: &'a str, screen: Screen| {
        button(text(label).size(14))
            .padding([6, 14])
            .style(if screen == active { button::primary } else { button::text })
            .on_press(Message::Navigate(screen))
    };

    row![
        link("STUDIO", Screen::Home),
        horizontal_space(),
        link("CLIENT GALLERY", Screen::Client),
        link("ADMIN", Screen::Admin),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

/// Wrap a screen body with the nav bar
pub(crate) fn page<'a>(active: Screen, body: Element<'a, Message>) -> Element<'a, Message> {
    container(column![nav_bar(active), body].spacing(30))
        .padding(30)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub(crate) fn error_text<'a>(message: &'a str) -> Element<'a, Message> {
    text(message).size(14).color(ERROR_COLOR).into()
}

pub(crate) fn notice_text<'a>(message: &'a str) -> Element<'a, Message> {
    text(message).size(14).color(NOTICE_COLOR).into()
}

/// One photo with its name, a caption line and an action button
pub(crate) fn photo_card<'a>(
    studio: &'a Studio,
    record: &'a PhotoRecord,
    caption: String,
    action: Element<'a, Message>,
) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match studio.previews.get(&record.id) {
        Some(handle) => {
            let picture: Image<image::Handle> = image(handle.clone());
            picture
                .width(Length::Fixed(CARD_WIDTH))
                .height(Length::Fixed(CARD_HEIGHT))
                .content_fit(ContentFit::Cover)
                .into()
        }
        None => container(text("Preview unavailable").size(12))
            .width(Length::Fixed(CARD_WIDTH))
            .height(Length::Fixed(CARD_HEIGHT))
            .center_x(Length::Fixed(CARD_WIDTH))
            .center_y(Length::Fixed(CARD_HEIGHT))
            .into(),
    };

    column![
        preview,
        text(record.original_name.as_str()).size(14),
        text(caption).size(12),
        action,
    ]
    .spacing(6)
    .width(Length::Fixed(CARD_WIDTH))
    .into()
}

/// Cards laid out left to right, wrapping onto new lines
pub(crate) fn photo_grid<'a>(cards: Vec<Element<'a, Message>>) -> Element<'a, Message> {
    Row::with_children(cards).spacing(20).wrap().into()
}
