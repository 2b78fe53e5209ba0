use iced::widget::{button, column, horizontal_space, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length};

use crate::{Message, Screen, Studio};

pub fn view(studio: &Studio) -> Element<'_, Message> {
    let body = if studio.client.is_authenticated() {
        gallery(studio)
    } else {
        login(studio)
    };

    super::page(Screen::Client, body)
}

/// Access code form
fn login(studio: &Studio) -> Element<'_, Message> {
    let mut form = column![
        text("CLIENT GALLERY").size(40),
        text("Enter your access code to view and download your photos").size(16),
        text_input("Enter access code", &studio.client_code)
            .on_input(Message::ClientCodeChanged)
            .on_submit(Message::ClientLogin)
            .padding(12)
            .width(Length::Fixed(360.0)),
    ]
    .spacing(20)
    .align_x(Alignment::Center)
    .width(Length::Fill);

    if let Some(error) = &studio.client_error {
        form = form.push(super::error_text(error));
    }

    form.push(
        button(text("Access Gallery"))
            .padding(12)
            .on_press(Message::ClientLogin),
    )
    .into()
}

fn gallery(studio: &Studio) -> Element<'_, Message> {
    let code = studio
        .client
        .code()
        .map(|code| code.to_string())
        .unwrap_or_default();
    let images = studio.client.images();

    let header = row![
        column![
            text("YOUR GALLERY").size(40),
            text(format!("Access code: {} ({} photos)", code, images.len())).size(14),
        ]
        .spacing(6),
        horizontal_space(),
        button(text("Refresh"))
            .padding(10)
            .style(button::secondary)
            .on_press(Message::ClientRefresh),
        button(text("Logout")).padding(10).on_press(Message::ClientLogout),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut content = column![header].spacing(24);

    if let Some(error) = &studio.client_error {
        content = content.push(super::error_text(error));
    }

    if images.is_empty() {
        content = content.push(text("No photos available yet. Please check back later.").size(16));
    } else {
        let cards = images
            .iter()
            .map(|record| {
                let downloading = studio.client.is_downloading(&record.id);
                let label = if downloading { "Downloading..." } else { "Download" };
                let action = button(text(label))
                    .padding(8)
                    .on_press_maybe((!downloading).then(|| Message::Download(record.id.clone())));

                super::photo_card(
                    studio,
                    record,
                    record.uploaded_at.format("%B %-d, %Y").to_string(),
                    action.into(),
                )
            })
            .collect();

        content = content.push(super::photo_grid(cards));
    }

    scrollable(content).height(Length::Fill).into()
}
