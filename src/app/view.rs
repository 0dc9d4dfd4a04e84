// SPDX-License-Identifier: MPL-2.0
//! View rendering for the demo application.

use super::demo::DemoAction;
use super::Message;
use crate::presenter::{overlay, Snapshot};
use iced::widget::{button, Column, Container, Stack, Text};
use iced::{alignment, Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub snapshot: &'a Snapshot,
    pub status: &'a str,
    pub badge: &'a str,
    pub queued: usize,
}

/// Renders the demo panel with the error overlay stacked above it.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let buttons = DemoAction::ALL.into_iter().fold(
        Column::new().spacing(8.0).align_x(alignment::Horizontal::Center),
        |column, action| {
            column.push(
                button(Text::new(action.label()))
                    .on_press(Message::Demo(action))
                    .width(Length::Fixed(260.0)),
            )
        },
    );

    let panel = Column::new()
        .spacing(16.0)
        .align_x(alignment::Horizontal::Center)
        .push(Text::new("Portal error overlay").size(24.0))
        .push(buttons)
        .push(Text::new(format!("Security badge: {}", ctx.badge)))
        .push(Text::new(format!("Last report: {}", ctx.status)))
        .push(Text::new(format!("Waiting in queue: {}", ctx.queued)));

    let content = Container::new(panel)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center);

    Stack::new()
        .push(content)
        .push(overlay::view(ctx.snapshot).map(Message::Overlay))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
