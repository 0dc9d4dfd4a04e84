// SPDX-License-Identifier: MPL-2.0
//! Overlay design tokens and widget styles.

use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme, Vector};

pub mod palette {
    use iced::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
}

pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    pub const SHADOW: f32 = 0.35;
}

pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
}

pub mod typography {
    pub const BODY: f32 = 14.0;
    pub const CAPTION: f32 = 12.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
}

pub mod border {
    pub const WIDTH_ACCENT: f32 = 2.0;
}

const TOAST_SHADOW: Shadow = Shadow {
    color: Color {
        a: opacity::SHADOW,
        ..palette::BLACK
    },
    offset: Vector { x: 0.0, y: 4.0 },
    blur_radius: 8.0,
};

const _: () = {
    assert!(spacing::XXS < spacing::XS);
    assert!(spacing::XS < spacing::SM);
    assert!(spacing::SM < spacing::MD);
    assert!(radius::SM < radius::MD);
};

/// Error toast card: theme background with a red accent border.
pub fn toast(theme: &Theme) -> container::Style {
    let base = theme.extended_palette().background.base;

    container::Style {
        background: Some(Background::Color(base.color)),
        border: Border {
            color: palette::ERROR_500,
            width: border::WIDTH_ACCENT,
            radius: radius::MD.into(),
        },
        shadow: TOAST_SHADOW,
        text_color: Some(base.text),
        ..Default::default()
    }
}

/// Close button: transparent until hovered.
pub fn close_button(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().background.base;
    let hover = |alpha: f32| button::Style {
        background: Some(Background::Color(Color {
            a: alpha,
            ..palette::GRAY_400
        })),
        text_color: base.text,
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        shadow: Shadow::default(),
        snap: true,
    };

    match status {
        button::Status::Active => button::Style {
            background: None,
            text_color: base.text,
            border: Border::default(),
            shadow: Shadow::default(),
            snap: true,
        },
        button::Status::Hovered => hover(opacity::OVERLAY_SUBTLE),
        button::Status::Pressed => hover(opacity::OVERLAY_MEDIUM),
        button::Status::Disabled => button::Style {
            background: None,
            text_color: Color {
                a: opacity::OVERLAY_MEDIUM,
                ..base.text
            },
            border: Border::default(),
            shadow: Shadow::default(),
            snap: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_uses_error_accent() {
        let style = toast(&Theme::Dark);
        assert_eq!(style.border.color, palette::ERROR_500);
        assert!(style.background.is_some());
    }

    #[test]
    fn close_button_is_transparent_at_rest() {
        let style = close_button(&Theme::Light, button::Status::Active);
        assert!(style.background.is_none());

        let hovered = close_button(&Theme::Light, button::Status::Hovered);
        assert!(hovered.background.is_some());
    }
}
