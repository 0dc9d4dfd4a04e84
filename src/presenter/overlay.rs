// SPDX-License-Identifier: MPL-2.0
//! iced rendering of the error overlay.
//!
//! The overlay is a column of toasts layered above the host content. It is
//! rendered from a [`Snapshot`] so the view never holds the presenter lock.

use iced::widget::{button, text, Column, Container, Row, Text};
use iced::{alignment, Element, Length};

use super::style::{self, spacing, typography};
use super::{Anchor, Notification, NotificationId, Snapshot};
use crate::config::TOAST_WIDTH;

/// Messages emitted by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMessage {
    /// The close button of a toast was pressed.
    Dismiss(NotificationId),
}

/// Width of a single toast for an anchor.
#[must_use]
pub fn toast_width(anchor: Anchor) -> Length {
    match anchor {
        Anchor::TopRight => Length::Fixed(TOAST_WIDTH),
        Anchor::FullWidth => Length::Fill,
    }
}

/// Renders a single toast.
pub fn toast<'a>(notification: &'a Notification, anchor: Anchor) -> Element<'a, OverlayMessage> {
    let message = Text::new(notification.message()).size(typography::BODY);
    let captured = Text::new(notification.captured_label()).size(typography::CAPTION);

    let close = button(text("\u{2715}").size(typography::BODY))
        .on_press(OverlayMessage::Dismiss(notification.id()))
        .padding(spacing::XXS)
        .style(style::close_button);

    let body = Column::new()
        .spacing(spacing::XXS)
        .width(Length::Fill)
        .push(message)
        .push(captured);

    let content = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Top)
        .push(body)
        .push(close);

    Container::new(content)
        .width(toast_width(anchor))
        .padding(spacing::SM)
        .style(style::toast)
        .into()
}

/// Renders the overlay container with every visible notification, in mount order.
pub fn view(snapshot: &Snapshot) -> Element<'_, OverlayMessage> {
    if snapshot.notifications.is_empty() {
        return Container::new(text(""))
            .width(Length::Shrink)
            .height(Length::Shrink)
            .into();
    }

    let horizontal = match snapshot.anchor {
        Anchor::TopRight => alignment::Horizontal::Right,
        Anchor::FullWidth => alignment::Horizontal::Center,
    };

    let toasts = Column::with_children(
        snapshot
            .notifications
            .iter()
            .map(|notification| toast(notification, snapshot.anchor)),
    )
    .spacing(spacing::XS)
    .align_x(horizontal);

    Container::new(toasts)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(horizontal)
        .align_y(alignment::Vertical::Top)
        .padding(spacing::MD)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_width_depends_on_anchor() {
        assert_eq!(toast_width(Anchor::TopRight), Length::Fixed(TOAST_WIDTH));
        assert_eq!(toast_width(Anchor::FullWidth), Length::Fill);
    }

    #[test]
    fn dismiss_message_carries_id() {
        let id = NotificationId::new();
        assert_eq!(OverlayMessage::Dismiss(id), OverlayMessage::Dismiss(id));
    }
}
