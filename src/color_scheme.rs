use crossterm::style::Color;

/// Color scheme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSchemeId {
    Default = 0,
    Monochrome = 1,
}

impl ColorSchemeId {
    pub fn all() -> &'static [ColorSchemeId] {
        &[ColorSchemeId::Default, ColorSchemeId::Monochrome]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorSchemeId::Default => "Default",
            ColorSchemeId::Monochrome => "Monochrome",
        }
    }

    pub fn from_index(idx: usize) -> Self {
        Self::all().get(idx).copied().unwrap_or(ColorSchemeId::Default)
    }
}

/// Color slots used by the frame. `None` means "no styling": nothing is
/// emitted, not even a reset.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub interface: Option<Color>, // Header: interface column
    pub rx: Option<Color>,        // Receive header columns + bars
    pub tx: Option<Color>,        // Transmit header columns + bars
}

impl ColorScheme {
    pub fn from_id(id: ColorSchemeId) -> Self {
        match id {
            ColorSchemeId::Default => Self::default_scheme(),
            ColorSchemeId::Monochrome => Self::monochrome(),
        }
    }

    fn default_scheme() -> Self {
        Self {
            interface: Some(Color::DarkYellow),
            rx: Some(Color::DarkRed),
            tx: Some(Color::DarkGreen),
        }
    }

    fn monochrome() -> Self {
        Self {
            interface: None,
            rx: None,
            tx: None,
        }
    }
}
