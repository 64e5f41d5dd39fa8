use crate::i18n::{Catalog, Language};
use crate::models::{Crop, CropLifecycle, IndianState, Season};
use crate::ui::screens::nav_line;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

pub struct CropsScreen<'a> {
    pub crops: &'a [Crop],
    pub selected_index: usize,
    pub lifecycle: Option<&'a CropLifecycle>,
    pub show_details: bool,
    pub catalog: &'a Catalog,
    pub language: Language,
    pub status_message: Option<&'a str>,
}

impl<'a> CropsScreen<'a> {
    pub fn new(crops: &'a [Crop], catalog: &'a Catalog, language: Language) -> Self {
        Self {
            crops,
            selected_index: 0,
            lifecycle: None,
            show_details: false,
            catalog,
            language,
            status_message: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    /// Show the details pane with the lifecycle guide, if one was found
    pub fn with_details(mut self, lifecycle: Option<&'a CropLifecycle>) -> Self {
        self.show_details = true;
        self.lifecycle = lifecycle;
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

impl Widget for CropsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        if self.show_details {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[0]);
            self.render_list(panes[0], buf);
            self.render_details(panes[1], buf);
        } else {
            self.render_list(chunks[0], buf);
        }

        if let Some(msg) = self.status_message {
            Paragraph::new(Span::styled(msg, Theme::success())).render(chunks[1], buf);
        }

        let actions = [("t", "Show/Hide"), ("Enter", "Details"), ("↑↓", "Navigate")];
        Paragraph::new(nav_line(self.catalog, self.language, &actions)).render(chunks[2], buf);
    }
}

impl CropsScreen<'_> {
    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let lang = self.language.code();
        let items: Vec<ListItem> = self
            .crops
            .iter()
            .map(|crop| {
                let (state, style) = if crop.is_visible {
                    (self.t("visible"), Theme::success())
                } else {
                    (self.t("hidden"), Theme::dim())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(crop.display_name(lang), Theme::normal()),
                    Span::styled(format!("  [{}]", state), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(Span::styled(
                        format!("{} ({})", self.t("crops_heading"), self.crops.len()),
                        Theme::title(),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused()),
            )
            .highlight_style(Theme::selected());

        let mut state = ListState::default();
        if !self.crops.is_empty() {
            state.select(Some(self.selected_index));
        }

        StatefulWidget::render(list, area, buf, &mut state);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let Some(crop) = self.crops.get(self.selected_index) else {
            return;
        };

        let block = Block::default()
            .title(Span::styled(
                crop.display_name(self.language.code()).to_string(),
                Theme::title(),
            ))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let mut lines = vec![Line::from(Span::styled(
            self.t("key_information"),
            Theme::header(),
        ))];

        let seasons = crop
            .suitable_season_ids
            .iter()
            .map(|id| Season::find(id).map(|s| s.name).unwrap_or(id.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let states = crop
            .supported_state_ids
            .iter()
            .map(|id| IndianState::find(id).map(|s| s.name).unwrap_or(id.as_str()))
            .collect::<Vec<_>>()
            .join(", ");

        let facts = [
            (self.t("season"), seasons),
            (self.t("soil"), crop.soil_types.join(", ")),
            (self.t("ideal_temperature"), crop.ideal_temperature.clone()),
            (self.t("ideal_rainfall"), crop.ideal_rainfall.clone()),
            (self.t("expected_yield"), format!("{:.1} q/acre", crop.expected_yield)),
            (
                self.t("market_price"),
                format!("₹{:.0}/q", crop.approximate_market_price),
            ),
            ("States", states),
        ];
        for (label, value) in facts {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", label), Theme::dim()),
                Span::styled(value, Theme::normal()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(self.t("crop_guide"), Theme::header())));

        match self.lifecycle {
            Some(lifecycle) => {
                for (key, value) in lifecycle.stages() {
                    lines.push(Line::from(Span::styled(self.t(key), Theme::highlight())));
                    lines.push(Line::from(Span::styled(value, Theme::normal())));
                }
            }
            None => lines.push(Line::from(Span::styled(
                self.t("crop_guide_unavailable"),
                Theme::dim(),
            ))),
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
