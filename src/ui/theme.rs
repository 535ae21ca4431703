use ratatui::style::{Color, Modifier, Style};

pub struct Palette;

impl Palette {
    pub const TEAL: Color = Color::Rgb(45, 212, 191);
    pub const INDIGO: Color = Color::Rgb(129, 140, 248);
    pub const AMBER: Color = Color::Rgb(245, 158, 11);
    pub const SLATE: Color = Color::Rgb(100, 116, 139);
    pub const DARK_SLATE: Color = Color::Rgb(51, 65, 85);
    pub const WHITE: Color = Color::Rgb(248, 250, 252);
    pub const SOFT_WHITE: Color = Color::Rgb(203, 213, 225);
}

pub struct Glyphs;

impl Glyphs {
    pub const USER_PREFIX: &'static str = "> ";
    pub const ASSISTANT_PREFIX: &'static str = "● ";
    pub const CONTINUATION: &'static str = "  ";
    pub const CURSOR: &'static str = "▊";
    pub const BULLET: &'static str = "•";
    pub const QUOTE_BAR: &'static str = "│ ";
    pub const RULE: &'static str = "─";
    pub const CODE_OPEN: &'static str = "╭";
    pub const CODE_LINE: &'static str = "│";
    pub const CODE_CLOSE: &'static str = "╰";
}

pub struct Spinners;

impl Spinners {
    pub const BRAILLE: &'static [&'static str] =
        &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

pub struct Theme;

impl Theme {
    #[must_use]
    pub const fn primary() -> Style {
        Style::new().fg(Palette::TEAL)
    }

    #[must_use]
    pub const fn primary_bold() -> Style {
        Style::new().fg(Palette::TEAL).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub const fn code() -> Style {
        Style::new().fg(Palette::INDIGO)
    }

    #[must_use]
    pub const fn warning() -> Style {
        Style::new().fg(Palette::AMBER)
    }

    #[must_use]
    pub const fn muted() -> Style {
        Style::new().fg(Palette::SLATE)
    }

    #[must_use]
    pub const fn border() -> Style {
        Style::new().fg(Palette::DARK_SLATE)
    }

    #[must_use]
    pub const fn user() -> Style {
        Style::new().fg(Palette::WHITE)
    }

    #[must_use]
    pub const fn assistant() -> Style {
        Style::new().fg(Palette::SOFT_WHITE)
    }

    #[must_use]
    pub const fn quote() -> Style {
        Style::new()
            .fg(Palette::SLATE)
            .add_modifier(Modifier::ITALIC)
    }
}
