use crate::models::AlertVariant;
use ratatui::style::{Color, Modifier, Style};

/// Value bands as `(lower bound, colour)`, sorted by lower bound
pub type Bands = &'static [(f64, Color)];

pub struct Theme;

impl Theme {
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Green;
    pub const HIGHLIGHT: Color = Color::Cyan;
    pub const ERROR: Color = Color::Red;

    /// Same cut points as the hot and cold tip categories
    pub const TEMPERATURE_BANDS: Bands = &[
        (f64::NEG_INFINITY, Color::LightBlue),
        (10.0, Color::Cyan),
        (25.0, Color::Yellow),
        (35.0, Color::Red),
    ];
    pub const WIND_BANDS: Bands = &[
        (0.0, Color::LightCyan),
        (25.0, Color::Yellow),
        (50.0, Color::Red),
    ];
    pub const HUMIDITY_BANDS: Bands = &[
        (0.0, Color::Green),
        (80.0, Color::Yellow),
        (90.0, Color::Red),
    ];
    pub const RAIN_BANDS: Bands = &[
        (0.0, Color::DarkGray),
        (0.1, Color::Blue),
        (40.0, Color::Red),
    ];

    /// Colour of the highest band whose lower bound `value` reaches
    pub fn band_color(bands: Bands, value: f64) -> Option<Color> {
        bands
            .iter()
            .rev()
            .find(|(lower, _)| value >= *lower)
            .map(|(_, color)| *color)
    }

    pub fn temp_color(temp_c: f64) -> Color {
        Self::band_color(Self::TEMPERATURE_BANDS, temp_c).unwrap_or(Self::FG)
    }

    pub fn precipitation(mm: f64) -> Style {
        Style::default().fg(Self::band_color(Self::RAIN_BANDS, mm).unwrap_or(Self::DIM))
    }

    /// Banner style for an alert variant; destructive alerts are bold
    pub fn alert(variant: AlertVariant) -> Style {
        let style = Style::default().fg(variant.color());
        match variant {
            AlertVariant::Destructive => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn header() -> Style {
        Self::normal().add_modifier(Modifier::BOLD)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn highlight() -> Style {
        Style::default().fg(Self::HIGHLIGHT).add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Self::header().bg(Self::DIM)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn nav_key() -> Style {
        Self::title()
    }

    pub fn nav_label() -> Style {
        Self::dim()
    }

    pub fn border() -> Style {
        Self::dim()
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }
}
