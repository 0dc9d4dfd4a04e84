// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the demo application.

use super::Message;
use iced::{event, time, window, Subscription};
use std::time::Duration;

/// Overlay refresh period.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Forwards window resizes so the overlay can re-anchor.
pub fn create_resize_subscription() -> Subscription<Message> {
    event::listen_with(window_event)
}

fn window_event(
    event: event::Event,
    _status: event::Status,
    _window: window::Id,
) -> Option<Message> {
    match event {
        event::Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
        _ => None,
    }
}

/// Drives expiry checks and snapshot refreshes.
///
/// Always active: the drain loop mounts notifications off the UI thread, so
/// the view cannot know in advance when one appears.
pub fn create_tick_subscription() -> Subscription<Message> {
    time::every(TICK_INTERVAL).map(Message::Tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Size;

    #[test]
    fn resize_maps_to_window_resized() {
        let event = event::Event::Window(window::Event::Resized(Size::new(640.0, 480.0)));
        let message = window_event(event, event::Status::Ignored, window::Id::unique());
        assert!(matches!(
            message,
            Some(Message::WindowResized(size)) if size.width == 640.0
        ));
    }

    #[test]
    fn other_window_events_are_ignored() {
        let event = event::Event::Window(window::Event::Focused);
        assert!(window_event(event, event::Status::Captured, window::Id::unique()).is_none());
    }
}
