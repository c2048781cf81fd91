use ratatui::style::{Color, Modifier, Style};

/// Colors for one appearance; every view draws through this
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub brand: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub surface: Color,
    pub on_accent: Color,
    pub key: Color,
    pub error: Color,
    pub success: Color,
}

impl Palette {
    pub const DARK: Self = Self {
        brand: Color::Magenta,
        accent: Color::Cyan,
        text: Color::White,
        muted: Color::DarkGray,
        border: Color::DarkGray,
        surface: Color::Black,
        on_accent: Color::Black,
        key: Color::Yellow,
        error: Color::LightRed,
        success: Color::Green,
    };

    pub const LIGHT: Self = Self {
        brand: Color::Magenta,
        accent: Color::Blue,
        text: Color::Black,
        muted: Color::Gray,
        border: Color::Gray,
        surface: Color::White,
        on_accent: Color::White,
        key: Color::LightYellow,
        error: Color::Red,
        success: Color::Green,
    };

    #[must_use]
    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::DARK } else { Self::LIGHT }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.on_accent)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn brand_title(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }
}
