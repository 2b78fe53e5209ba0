use iced::widget::{button, column, horizontal_space, row, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length};

use crate::gallery::encode;
use crate::{Message, Screen, Studio};

pub fn view(studio: &Studio) -> Element<'_, Message> {
    let body = if studio.admin.is_authenticated() {
        portal(studio)
    } else {
        login(studio)
    };

    super::page(Screen::Admin, body)
}

fn login(studio: &Studio) -> Element<'_, Message> {
    let mut form = column![
        text("ADMIN PORTAL").size(40),
        text("Enter admin password to upload photos").size(16),
        text_input("Enter admin password", &studio.admin_password)
            .secure(true)
            .on_input(Message::AdminPasswordChanged)
            .on_submit(Message::AdminLogin)
            .padding(12)
            .width(Length::Fixed(360.0)),
    ]
    .spacing(20)
    .align_x(Alignment::Center)
    .width(Length::Fill);

    if let Some(error) = &studio.admin_error {
        form = form.push(super::error_text(error));
    }

    form.push(
        button(text("Access Admin"))
            .padding(12)
            .on_press(Message::AdminLogin),
    )
    .into()
}

fn portal(studio: &Studio) -> Element<'_, Message> {
    let header = row![
        column![
            text("UPLOAD PHOTOS").size(40),
            text("Upload photos for your clients to download").size(16),
        ]
        .spacing(6),
        horizontal_space(),
        button(text("Logout")).padding(10).on_press(Message::AdminLogout),
    ]
    .align_y(Alignment::Center);

    scrollable(
        column![header, upload_panel(studio), uploaded_photos(studio)]
            .spacing(36)
            .padding([0, 10]),
    )
    .height(Length::Fill)
    .into()
}

fn upload_panel(studio: &Studio) -> Element<'_, Message> {
    let uploading = studio.uploading.is_some();

    let selection_label = if studio.selected_files.is_empty() {
        "Select multiple images".to_string()
    } else {
        format!("{} file(s) selected", studio.selected_files.len())
    };

    let selected = Column::with_children(studio.selected_files.iter().enumerate().map(|(index, path)| {
        row![
            text(encode::file_name(path)).size(14),
            horizontal_space(),
            button(text("Remove").size(12))
                .padding([4, 10])
                .style(button::text)
                .on_press(Message::RemoveSelected(index)),
        ]
        .align_y(Alignment::Center)
        .into()
    }))
    .spacing(4);

    let mut panel = column![
        text("UPLOAD NEW PHOTOS").size(24),
        text("ACCESS CODE").size(13),
        text_input("WEDDING2024, PORTRAIT2024, etc.", &studio.upload_code)
            .on_input(Message::UploadCodeChanged)
            .padding(10),
        text("Enter the access code your client will use to view these photos").size(12),
        text("SELECT PHOTOS").size(13),
        row![
            button(text("Choose Photos"))
                .padding(10)
                .style(button::secondary)
                .on_press_maybe((!uploading).then_some(Message::PickFiles)),
            button(text("Import Folder"))
                .padding(10)
                .style(button::secondary)
                .on_press_maybe((!uploading).then_some(Message::PickFolder)),
            text(selection_label).size(13),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        selected,
    ]
    .spacing(12);

    if let Some(error) = &studio.admin_error {
        panel = panel.push(super::error_text(error));
    }
    if let Some(notice) = &studio.admin_notice {
        panel = panel.push(super::notice_text(notice));
    }

    let ready = !uploading && !studio.selected_files.is_empty() && !studio.upload_code.is_empty();
    let label = if uploading { "Uploading..." } else { "Upload Photos" };

    panel
        .push(
            button(text(label))
                .padding(12)
                .width(Length::Fill)
                .on_press_maybe(ready.then_some(Message::Upload)),
        )
        .into()
}

fn uploaded_photos(studio: &Studio) -> Element<'_, Message> {
    let images = studio.admin.images();
    let title = text(format!("UPLOADED PHOTOS ({})", images.len())).size(24);

    if images.is_empty() {
        return column![title, text("No photos uploaded yet.").size(16)]
            .spacing(16)
            .into();
    }

    let mut section = column![title].spacing(16);
    if !studio.hidden_codes.is_empty() {
        let codes: Vec<&str> = studio.hidden_codes.iter().map(|code| code.as_str()).collect();
        section = section.push(
            text(format!("Also stored but not listed here: {}", codes.join(", "))).size(13),
        );
    }

    let cards = images
        .iter()
        .map(|record| {
            let delete = button(text("Delete").size(12))
                .padding([6, 12])
                .style(button::danger)
                .on_press(Message::DeleteRequested {
                    id: record.id.clone(),
                    code: record.owner_code.clone(),
                });

            super::photo_card(
                studio,
                record,
                format!("Code: {}", record.owner_code),
                delete.into(),
            )
        })
        .collect();

    section.push(super::photo_grid(cards)).into()
}
