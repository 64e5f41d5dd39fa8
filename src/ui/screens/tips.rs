use crate::i18n::{Catalog, Language};
use crate::models::FarmingTip;
use crate::ui::screens::{nav_line, truncate};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget, Wrap},
};

pub struct TipsScreen<'a> {
    pub tips: &'a [FarmingTip],
    pub selected_index: usize,
    pub catalog: &'a Catalog,
    pub language: Language,
    pub status_message: Option<&'a str>,
}

impl<'a> TipsScreen<'a> {
    pub fn new(tips: &'a [FarmingTip], catalog: &'a Catalog, language: Language) -> Self {
        Self {
            tips,
            selected_index: 0,
            catalog,
            language,
            status_message: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
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

impl Widget for TipsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Table
                Constraint::Length(5), // Full text of the selected tip
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        self.render_table(chunks[0], buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let text = self
            .tips
            .get(self.selected_index)
            .map(|t| t.tip_text.as_str())
            .unwrap_or("-");
        Paragraph::new(Span::styled(text, Theme::normal()))
            .block(block)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);

        if let Some(msg) = self.status_message {
            Paragraph::new(Span::styled(msg, Theme::success())).render(chunks[2], buf);
        }

        let actions = [("t", "Toggle"), ("d", "Delete"), ("↑↓", "Navigate")];
        Paragraph::new(nav_line(self.catalog, self.language, &actions)).render(chunks[3], buf);
    }
}

impl TipsScreen<'_> {
    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let header_cells = [
            self.t("category"),
            self.t("language_label"),
            "",
            self.t("scheduled"),
            self.t("tips_heading"),
        ]
        .into_iter()
        .map(|h| Cell::from(h).style(Theme::header()));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .tips
            .iter()
            .map(|tip| {
                let (state, state_style) = if tip.is_enabled {
                    (self.t("enabled"), Theme::success())
                } else {
                    (self.t("disabled"), Theme::dim())
                };
                let language = Language::from_code(&tip.language)
                    .map(|l| l.native_name())
                    .unwrap_or(tip.language.as_str());

                Row::new(vec![
                    Cell::from(tip.category.as_str())
                        .style(Style::default().fg(tip.category.color())),
                    Cell::from(language),
                    Cell::from(state).style(state_style),
                    Cell::from(
                        tip.scheduled_date
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::from(truncate(&tip.tip_text, 60)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(Span::styled(
                        format!("{} ({})", self.t("tips_heading"), self.tips.len()),
                        Theme::title(),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused()),
            )
            .row_highlight_style(Theme::selected());

        let mut state = TableState::default();
        if !self.tips.is_empty() {
            state.select(Some(self.selected_index));
        }

        StatefulWidget::render(table, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TipCategory;
    use chrono::NaiveDate;

    #[test]
    fn lists_tips_with_schedule_and_language() {
        let tips = vec![
            FarmingTip::new("t1", "Water early in the morning.", TipCategory::Hot),
            FarmingTip::new("t2", "बारिश से पहले खाद न डालें।", TipCategory::Rainy)
                .in_language("hi")
                .scheduled_for(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
        ];
        let catalog = Catalog::bundled().unwrap();
        let area = Rect::new(0, 0, 120, 20);
        let mut buf = Buffer::empty(area);
        TipsScreen::new(&tips, &catalog, Language::English)
            .with_selection(1)
            .render(area, &mut buf);

        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buf[(x, y)].symbol());
            }
        }
        assert!(text.contains("Farming Tips (2)"));
        assert!(text.contains("hot"));
        assert!(text.contains("2024-07-01"));
        assert!(text.contains("Water early in the morning."));
    }
}
