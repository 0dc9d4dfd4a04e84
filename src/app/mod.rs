// SPDX-License-Identifier: MPL-2.0
//! Demo portal application.
//!
//! A small iced window wired exactly like a production host: the error
//! subsystem is initialized before anything else, its drain loop and console
//! re-assertion run on the iced executor, and the overlay is stacked above
//! the page content.

pub mod demo;
mod message;
pub mod subscription;
mod view;

pub use message::{Flags, Message};

use crate::capture::{ErrorCapture, Outcome};
use crate::config::DEFAULT_NARROW_VIEWPORT_WIDTH;
use crate::console;
use crate::init::ErrorOverlay;
use crate::presenter::{self, overlay::OverlayMessage, SharedPresenter, Snapshot};
use demo::DemoAction;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

pub const WINDOW_DEFAULT_WIDTH: f32 = 1024.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 700.0;
pub const MIN_WINDOW_WIDTH: f32 = 320.0;
pub const MIN_WINDOW_HEIGHT: f32 = 480.0;

const _: () = assert!(WINDOW_DEFAULT_WIDTH >= DEFAULT_NARROW_VIEWPORT_WIDTH);

/// Root application state.
pub struct App {
    /// `None` when initialization failed; the app then runs without overlay.
    overlay: Option<ErrorOverlay>,
    /// Used when `overlay` is `None` so demo actions still have a sink.
    fallback_capture: ErrorCapture,
    snapshot: Snapshot,
    status: String,
    badge: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("overlay_active", &self.overlay.is_some())
            .field("visible", &self.snapshot.notifications.len())
            .finish_non_exhaustive()
    }
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires a `Fn` boot function; flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let Flags { config, log_handle } = flags;
        let mut overlay = match ErrorOverlay::init(&config, console::global(), log_handle) {
            Ok(overlay) => Some(overlay),
            Err(err) => {
                tracing::error!("error overlay unavailable: {err}");
                None
            }
        };

        let mut tasks = Vec::new();
        if let Some(overlay) = overlay.as_mut() {
            presenter::lock(overlay.presenter()).resize(WINDOW_DEFAULT_WIDTH);
            if let Some(drain) = overlay.drain_loop() {
                tasks.push(Task::perform(drain.run(), |()| {
                    Message::BackgroundStopped("drain loop")
                }));
            }
            if let Some(reassertion) = overlay.reassertion() {
                tasks.push(Task::perform(reassertion, |()| {
                    Message::BackgroundStopped("console re-assertion")
                }));
            }
        }

        let app = Self {
            overlay,
            fallback_capture: ErrorCapture::new(),
            snapshot: Snapshot::default(),
            status: "nothing reported yet".to_string(),
            badge: "not rendered".to_string(),
        };
        (app, Task::batch(tasks))
    }

    fn title(&self) -> String {
        "Portal error overlay".to_string()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_resize_subscription(),
            subscription::create_tick_subscription(),
        ])
    }

    fn capture(&self) -> &ErrorCapture {
        self.overlay
            .as_ref()
            .map_or(&self.fallback_capture, ErrorOverlay::capture)
    }

    fn presenter(&self) -> Option<&SharedPresenter> {
        self.overlay.as_ref().map(ErrorOverlay::presenter)
    }

    fn refresh_snapshot(&mut self) {
        if let Some(overlay) = &self.overlay {
            let mut state = presenter::lock(overlay.presenter());
            state.unmount_expired(tokio::time::Instant::now());
            self.snapshot = state.snapshot();
        }
    }

    fn record(&mut self, outcome: Option<Outcome>) {
        self.status = match outcome {
            Some(Outcome::Enqueued { .. }) => "queued for display".to_string(),
            Some(Outcome::Dropped) => "dropped by relevance filter".to_string(),
            Some(Outcome::Suppressed) => "warning suppressed".to_string(),
            None => "no capture installed".to_string(),
        };
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Overlay(OverlayMessage::Dismiss(id)) => {
                if let Some(shared) = self.presenter() {
                    presenter::lock(shared).dismiss(id);
                }
                self.refresh_snapshot();
            }
            Message::Tick(_) => self.refresh_snapshot(),
            Message::WindowResized(size) => {
                if let Some(shared) = self.presenter() {
                    presenter::lock(shared).resize(size.width);
                }
                self.refresh_snapshot();
            }
            Message::Demo(action) => return self.handle_demo(action),
            Message::RequestFinished(result) => {
                self.status = match result {
                    Some(body) => format!("request succeeded: {body}"),
                    None => "request failed and was reported".to_string(),
                };
            }
            Message::BackgroundStopped(name) => {
                tracing::warn!("{name} stopped unexpectedly");
            }
        }
        Task::none()
    }

    fn handle_demo(&mut self, action: DemoAction) -> Task<Message> {
        match action {
            DemoAction::TlsFailure => self.record(demo::raise_tls_failures(1)),
            DemoAction::Burst => self.record(demo::raise_tls_failures(5)),
            DemoAction::UnrelatedBug => {
                let outcome = demo::raise_unrelated_bug(self.capture());
                self.record(Some(outcome));
            }
            DemoAction::BoundaryPanic => {
                self.badge = demo::render_security_badge(self.capture());
                self.status = "render panic caught by boundary".to_string();
            }
            DemoAction::FailingRequest => {
                self.status = "request in flight".to_string();
                return Task::perform(
                    demo::reported_payment_request(self.capture().clone()),
                    Message::RequestFinished,
                );
            }
            DemoAction::ConsoleNoise => {
                demo::console_noise();
                self.status = if console::global().is_silent() {
                    "console written (silenced)".to_string()
                } else {
                    "console written".to_string()
                };
            }
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            snapshot: &self.snapshot,
            status: &self.status,
            badge: &self.badge,
            queued: self.capture().queued_len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::Anchor;
    use iced::Size;

    // The only unit test that initializes the process-wide overlay.
    #[test]
    fn window_resize_re_anchors_overlay() {
        let mut flags = Flags::default();
        flags.config.console.silence = Some(false);
        let (mut app, _task) = App::new(flags);
        assert!(app.overlay.is_some());

        let _ = app.update(Message::WindowResized(Size::new(500.0, 800.0)));
        assert_eq!(app.snapshot.anchor, Anchor::FullWidth);

        let _ = app.update(Message::WindowResized(Size::new(1200.0, 800.0)));
        assert_eq!(app.snapshot.anchor, Anchor::TopRight);

        let _ = app.update(Message::WindowResized(Size::new(768.0, 800.0)));
        assert_eq!(app.snapshot.anchor, Anchor::TopRight);
    }
}
