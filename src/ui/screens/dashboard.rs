use crate::i18n::{Catalog, Language};
use crate::logic::Outlook;
use crate::models::{ActiveAlert, Crop, FarmingTip};
use crate::ui::components::{humidity_gauge, rain_gauge, temperature_gauge, wind_gauge};
use crate::ui::screens::nav_line;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct DashboardScreen<'a> {
    pub location: &'a str,
    pub outlook: &'a Outlook,
    pub tip: Option<&'a FarmingTip>,
    pub crops: &'a [&'a Crop],
    pub seasons: &'a [&'static str],
    pub catalog: &'a Catalog,
    pub language: Language,
    pub status_message: Option<&'a str>,
}

impl<'a> DashboardScreen<'a> {
    pub fn new(
        location: &'a str,
        outlook: &'a Outlook,
        catalog: &'a Catalog,
        language: Language,
    ) -> Self {
        Self {
            location,
            outlook,
            tip: None,
            crops: &[],
            seasons: &[],
            catalog,
            language,
            status_message: None,
        }
    }

    pub fn with_tip(mut self, tip: Option<&'a FarmingTip>) -> Self {
        self.tip = tip;
        self
    }

    /// Recommended crops and the season names they were picked for
    pub fn with_crops(mut self, crops: &'a [&'a Crop], seasons: &'a [&'static str]) -> Self {
        self.crops = crops;
        self.seasons = seasons;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }

    fn t(&self, key: &'a str) -> &'a str {
        self.catalog.get(key, self.language)
    }
}

impl Widget for DashboardScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(5), // Alert banner
                Constraint::Length(5), // Gauges row
                Constraint::Min(6),    // Tip and crops
                Constraint::Length(5), // Forecast strip
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_alert(chunks[1], buf);
        self.render_gauges(chunks[2], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);

        self.render_tip(middle[0], buf);
        self.render_crops(middle[1], buf);
        self.render_forecast(chunks[4], buf);
        self.render_status_message(chunks[5], buf);

        Paragraph::new(nav_line(self.catalog, self.language, &[])).render(chunks[6], buf);
    }
}

impl DashboardScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let place = self
            .outlook
            .forecast
            .as_ref()
            .map(|f| f.location.display_name())
            .unwrap_or_else(|| self.location.to_string());

        let title = format!("{} - {}", self.t("app_title"), place);

        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let last_updated = self
            .outlook
            .last_updated
            .map(|dt| {
                dt.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| "Never".to_string());

        let info = format!("{}: {} | Last updated: {}", self.t("location"), self.location, last_updated);
        let para = Paragraph::new(Span::styled(info, Theme::dim())).block(block);
        para.render(area, buf);
    }

    fn render_alert(&self, area: Rect, buf: &mut Buffer) {
        let alert = &self.outlook.alert;
        let style = Theme::alert(alert.variant());

        let title = format!("{} {}", alert.icon().symbol(), self.t(alert.title_key()));
        let block = Block::default()
            .title(Span::styled(title, style))
            .borders(Borders::ALL)
            .border_style(style);

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match alert {
            ActiveAlert::Normal => {
                let text = match (&self.outlook.forecast, &self.outlook.last_error) {
                    (None, Some(_)) => self.t("weather_unavailable"),
                    _ => self.t("alert_normal_message"),
                };
                vec![Line::from(Span::styled(text, Theme::normal()))]
            }
            ActiveAlert::Triggered { rule, .. } => vec![
                Line::from(Span::styled(rule.message.as_str(), style)),
                Line::from(vec![
                    Span::styled(format!("{}: ", self.t("recommended_actions")), Theme::dim()),
                    Span::styled(rule.recommended_actions.as_str(), Theme::normal()),
                ]),
            ],
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_gauges(&self, area: Rect, buf: &mut Buffer) {
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ])
            .split(area);

        let current = self.outlook.forecast.as_ref().and_then(|f| f.current.as_ref());
        let today = self.outlook.forecast.as_ref().and_then(|f| f.today());

        temperature_gauge(self.t("temperature"), current.map(|c| c.temp_c))
            .render(gauge_chunks[0], buf);
        temperature_gauge(self.t("feels_like"), current.map(|c| c.feels_like_c))
            .render(gauge_chunks[1], buf);
        wind_gauge(self.t("wind"), current.map(|c| c.wind_kph)).render(gauge_chunks[2], buf);
        humidity_gauge(self.t("humidity"), current.map(|c| c.humidity_pct))
            .render(gauge_chunks[3], buf);
        rain_gauge(self.t("rain"), today.map(|d| d.total_precip_mm)).render(gauge_chunks[4], buf);
    }

    fn render_tip(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(self.t("daily_tip"), Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let line = match self.tip {
            Some(tip) => Line::from(vec![
                Span::styled(
                    format!("[{}] ", tip.category.as_str()),
                    Style::default().fg(tip.category.color()),
                ),
                Span::styled(tip.tip_text.as_str(), Theme::normal()),
            ]),
            None => Line::from(Span::styled(self.t("no_tip"), Theme::dim())),
        };

        Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_crops(&self, area: Rect, buf: &mut Buffer) {
        let title = if self.seasons.is_empty() {
            self.t("crop_recommendations").to_string()
        } else {
            format!("{} ({})", self.t("crop_recommendations"), self.seasons.join(", "))
        };
        let block = Block::default()
            .title(Span::styled(title, Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.crops.is_empty() {
            let para = Paragraph::new(Span::styled(self.t("no_crops_in_season"), Theme::dim()));
            para.render(inner, buf);
            return;
        }

        let lang = self.language.code();
        let items: Vec<ListItem> = self
            .crops
            .iter()
            .map(|crop| {
                ListItem::new(Line::from(vec![
                    Span::styled(crop.display_name(lang), Theme::highlight()),
                    Span::styled(
                        format!("  {} | {}", crop.ideal_temperature, crop.ideal_rainfall),
                        Theme::dim(),
                    ),
                ]))
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_forecast(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(self.t("forecast_7day"), Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let days = match self.outlook.forecast {
            Some(ref f) if !f.days.is_empty() => &f.days,
            _ => {
                let para = Paragraph::new(Span::styled(self.t("enter_location_prompt"), Theme::dim()));
                para.render(inner, buf);
                return;
            }
        };

        let constraints: Vec<Constraint> = days
            .iter()
            .map(|_| Constraint::Ratio(1, days.len() as u32))
            .collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);

        for (day, col) in days.iter().zip(cols.iter()) {
            let lines = vec![
                Line::from(Span::styled(day.date.format("%a %d").to_string(), Theme::dim())),
                Line::from(vec![
                    Span::styled(
                        format!("{:.0}", day.max_temp_c),
                        Style::default().fg(Theme::temp_color(day.max_temp_c)),
                    ),
                    Span::styled("/", Theme::dim()),
                    Span::styled(
                        format!("{:.0}°", day.min_temp_c),
                        Style::default().fg(Theme::temp_color(day.min_temp_c)),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("{:.1}mm", day.total_precip_mm),
                    Theme::precipitation(day.total_precip_mm),
                )),
            ];
            Paragraph::new(lines).render(*col, buf);
        }
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        let span = match (self.status_message, self.outlook.last_error.as_deref()) {
            (Some(msg), _) => Span::styled(msg, Theme::success()),
            (None, Some(err)) => Span::styled(err, Theme::error()),
            (None, None) => return,
        };
        Paragraph::new(span).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertRule;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut text = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_triggered_alert_banner() {
        let catalog = Catalog::bundled().unwrap();
        let outlook = Outlook {
            alert: ActiveAlert::Triggered {
                rule: AlertRule::new("wind", "Strong winds expected.", "Stake tall crops.")
                    .with_wind(30.0),
                priority_class: crate::models::PriorityClass::High,
            },
            ..Outlook::default()
        };
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        DashboardScreen::new("Pune", &outlook, &catalog, Language::English).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Weather Warning"));
        assert!(text.contains("Strong winds expected."));
        assert!(text.contains("Pune"));
    }

    #[test]
    fn renders_normal_state_without_forecast() {
        let catalog = Catalog::bundled().unwrap();
        let outlook = Outlook::default();
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        DashboardScreen::new("Pune", &outlook, &catalog, Language::English).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Weather Normal"));
        assert!(text.contains("N/A"));
    }
}
