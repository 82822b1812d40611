use crossterm::style::{Color, Stylize};
use ratatui::style::{Color as RatatuiColor, Modifier, Style};

pub const THEME_NAMES: [&str; 2] = ["dark", "light"];

/// Foreground plus optional background, usable both in the calendar view
/// and for plain command output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ink {
    pub fg: Color,
    pub bg: Option<Color>,
}

impl Ink {
    pub const fn plain(fg: Color) -> Self {
        Self { fg, bg: None }
    }

    pub const fn on(fg: Color, bg: Color) -> Self {
        Self { fg, bg: Some(bg) }
    }

    pub fn style(&self) -> Style {
        let style = Style::default().fg(RatatuiColor::from(self.fg));
        match self.bg {
            Some(bg) => style.bg(RatatuiColor::from(bg)),
            None => style,
        }
    }

    pub fn emphasized(&self, modifier: Modifier) -> Style {
        self.style().add_modifier(modifier)
    }

    /// ANSI-colored text for printing outside the calendar view
    pub fn paint(&self, text: &str) -> String {
        let styled = text.with(self.fg);
        match self.bg {
            Some(bg) => styled.on(bg).to_string(),
            None => styled.to_string(),
        }
    }

    pub fn paint_bold(&self, text: &str) -> String {
        let styled = text.with(self.fg).bold();
        match self.bg {
            Some(bg) => styled.on(bg).to_string(),
            None => styled.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub day: Ink,
    pub weekend: Ink,
    pub today: Ink,
    pub selected: Ink,
    pub has_entry: Ink,
    pub active_mood: Ink,

    pub frame: Ink,
    pub heading: Ink,
    pub muted: Ink,

    pub text: Ink,
    pub hint: Ink,
    pub success: Ink,
    pub error: Ink,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        let accent = Color::DarkCyan;
        Self {
            name: "dark",
            palette: Palette {
                day: Ink::plain(Color::White),
                weekend: Ink::plain(Color::Rgb { r: 150, g: 150, b: 150 }),
                today: Ink::plain(Color::Yellow),
                selected: Ink::on(Color::Black, Color::Cyan),
                has_entry: Ink::plain(Color::Green),
                active_mood: Ink::on(Color::Black, Color::Yellow),

                frame: Ink::plain(accent),
                heading: Ink::plain(accent),
                muted: Ink::plain(Color::DarkGrey),

                text: Ink::plain(Color::White),
                hint: Ink::plain(accent),
                success: Ink::plain(Color::Green),
                error: Ink::plain(Color::Red),
            },
        }
    }

    pub fn light() -> Self {
        let accent = Color::DarkBlue;
        Self {
            name: "light",
            palette: Palette {
                day: Ink::plain(Color::Black),
                weekend: Ink::plain(Color::Grey),
                today: Ink::plain(Color::DarkYellow),
                selected: Ink::on(Color::White, accent),
                has_entry: Ink::plain(Color::DarkGreen),
                active_mood: Ink::on(Color::White, Color::DarkMagenta),

                frame: Ink::plain(accent),
                heading: Ink::plain(accent),
                muted: Ink::plain(Color::Grey),

                text: Ink::plain(Color::Black),
                hint: Ink::plain(accent),
                success: Ink::plain(Color::DarkGreen),
                error: Ink::plain(Color::DarkRed),
            },
        }
    }

    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Unknown names get the dark theme.
    pub fn by_name(name: &str) -> Self {
        Self::named(name).unwrap_or_default()
    }
}
