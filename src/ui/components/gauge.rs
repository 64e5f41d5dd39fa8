use crate::ui::theme::{Bands, Theme};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct GaugeWidget<'a> {
    title: &'a str,
    value: Option<f64>,
    unit: &'a str,
    min: f64,
    max: f64,
    bands: Bands,
    precision: usize,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str, value: Option<f64>, unit: &'a str) -> Self {
        Self {
            title,
            value,
            unit,
            min: 0.0,
            max: 100.0,
            bands: &[],
            precision: 1,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn bands(mut self, bands: Bands) -> Self {
        self.bands = bands;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    fn get_color(&self, value: f64) -> Color {
        Theme::band_color(self.bands, value).unwrap_or(Theme::FG)
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        match self.value {
            Some(value) => {
                let color = self.get_color(value);
                let value_str = format!("{:.prec$}{}", value, self.unit, prec = self.precision);

                // Render value
                let value_line =
                    Line::from(vec![Span::styled(value_str, Style::default().fg(color))]);

                let para = Paragraph::new(value_line);
                para.render(inner, buf);

                // Render bar if space allows
                if inner.height >= 2 {
                    let bar_area = Rect {
                        x: inner.x,
                        y: inner.y + 1,
                        width: inner.width,
                        height: 1,
                    };

                    let ratio = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
                    let filled = (bar_area.width as f64 * ratio) as u16;

                    for x in bar_area.x..bar_area.x + bar_area.width {
                        let ch = if x < bar_area.x + filled {
                            '█'
                        } else {
                            '░'
                        };
                        buf[(x, bar_area.y)].set_char(ch).set_fg(color);
                    }
                }
            }
            None => {
                let na_line = Line::from(vec![Span::styled("N/A", Theme::dim())]);
                let para = Paragraph::new(na_line);
                para.render(inner, buf);
            }
        }
    }
}

pub fn temperature_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "°C")
        .range(-5.0, 50.0)
        .bands(Theme::TEMPERATURE_BANDS)
}

pub fn wind_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, " km/h")
        .range(0.0, 80.0)
        .precision(0)
        .bands(Theme::WIND_BANDS)
}

pub fn humidity_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "%")
        .range(0.0, 100.0)
        .precision(0)
        .bands(Theme::HUMIDITY_BANDS)
}

pub fn rain_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, " mm")
        .range(0.0, 50.0)
        .bands(Theme::RAIN_BANDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_follows_highest_threshold_reached() {
        let gauge = temperature_gauge("Temp", Some(38.0));
        assert_eq!(gauge.get_color(38.0), Color::Red);
        assert_eq!(gauge.get_color(18.0), Color::Cyan);
        assert_eq!(gauge.get_color(-2.0), Color::LightBlue);
        assert_eq!(wind_gauge("Wind", None).get_color(30.0), Color::Yellow);
    }

    #[test]
    fn renders_value_and_bar() {
        let area = Rect::new(0, 0, 16, 4);
        let mut buf = Buffer::empty(area);
        humidity_gauge("Humidity", Some(50.0)).render(area, &mut buf);
        let value_row: String = (1..15).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(value_row.starts_with("50%"));
        // Half of the 14-cell bar is filled
        assert_eq!(buf[(1, 2)].symbol(), "█");
        assert_eq!(buf[(14, 2)].symbol(), "░");
    }

    #[test]
    fn missing_value_renders_na() {
        let area = Rect::new(0, 0, 16, 4);
        let mut buf = Buffer::empty(area);
        wind_gauge("Wind", None).render(area, &mut buf);
        let value_row: String = (1..4).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(value_row, "N/A");
    }
}
