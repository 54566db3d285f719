use crossterm::style::Stylize;

pub use crossterm::style::Color;

/// Bold ANSI colouring that can be switched off per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) if self.enabled => text.with(color).bold().to_string(),
            _ => text.to_owned(),
        }
    }

    /// Error emphasis: bold red on yellow.
    #[must_use]
    pub fn alarm(&self, text: &str) -> String {
        if self.enabled {
            text.with(Color::Red).on(Color::Yellow).bold().to_string()
        } else {
            text.to_owned()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(true)
    }
}
