use crate::i18n::{Catalog, Language};
use crate::logic::alerts::priority;
use crate::models::AlertRule;
use crate::ui::screens::{nav_line, truncate};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

pub struct AlertRulesScreen<'a> {
    pub rules: &'a [AlertRule],
    pub selected_index: usize,
    pub catalog: &'a Catalog,
    pub language: Language,
    pub status_message: Option<&'a str>,
}

impl<'a> AlertRulesScreen<'a> {
    pub fn new(rules: &'a [AlertRule], catalog: &'a Catalog, language: Language) -> Self {
        Self {
            rules,
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

impl Widget for AlertRulesScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Table
                Constraint::Length(4), // Selected rule actions
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_table(chunks[1], buf);
        self.render_actions(chunks[2], buf);

        if let Some(msg) = self.status_message {
            Paragraph::new(Span::styled(msg, Theme::success())).render(chunks[3], buf);
        }

        let actions = [("t", "Toggle"), ("d", "Delete"), ("↑↓", "Navigate")];
        Paragraph::new(nav_line(self.catalog, self.language, &actions)).render(chunks[4], buf);
    }
}

impl AlertRulesScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let enabled = self.rules.iter().filter(|r| r.is_enabled).count();

        let block = Block::default()
            .title(Span::styled(self.t("rules_heading"), Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let info = Line::from(vec![
            Span::styled(format!("{} rules", self.rules.len()), Theme::dim()),
            Span::styled(format!(" ({} {})", enabled, self.t("enabled")), Theme::dim()),
        ]);

        Paragraph::new(info).block(block).render(area, buf);
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let header_cells = ["ID", self.t("condition"), self.t("message"), "", ""]
            .into_iter()
            .map(|h| Cell::from(h).style(Theme::header()));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .rules
            .iter()
            .map(|rule| {
                let priority_class = priority::classify(rule);
                let (state, state_style) = if rule.is_enabled {
                    (self.t("enabled"), Theme::success())
                } else {
                    (self.t("disabled"), Theme::dim())
                };

                Row::new(vec![
                    Cell::from(rule.id.as_str()),
                    Cell::from(rule.condition_summary()),
                    Cell::from(truncate(&rule.message, 40)),
                    Cell::from(priority_class.as_str())
                        .style(Style::default().fg(priority_class.variant().color())),
                    Cell::from(state).style(state_style),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(18),
            Constraint::Length(30),
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused()),
            )
            .row_highlight_style(Theme::selected());

        let mut state = TableState::default();
        if !self.rules.is_empty() {
            state.select(Some(self.selected_index));
        }

        StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_actions(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(self.t("recommended_actions"), Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let text = self
            .rules
            .get(self.selected_index)
            .map(|r| r.recommended_actions.as_str())
            .unwrap_or("-");

        Paragraph::new(Span::styled(text, Theme::normal()))
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(rules: &[AlertRule]) -> String {
        let catalog = Catalog::bundled().unwrap();
        let area = Rect::new(0, 0, 120, 20);
        let mut buf = Buffer::empty(area);
        AlertRulesScreen::new(rules, &catalog, Language::English).render(area, &mut buf);

        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn lists_rules_with_state() {
        let rules = vec![
            AlertRule::new("frost", "Frost tonight.", "Cover seedlings.").with_frost_risk(),
            AlertRule::new("rain-heavy", "Heavy rain.", "Clear drains.")
                .with_rain(50.0)
                .disabled(),
        ];
        let text = render(&rules);
        assert!(text.contains("frost"));
        assert!(text.contains("rain-heavy"));
        assert!(text.contains("Disabled"));
        assert!(text.contains("Critical"));
        assert!(text.contains("Cover seedlings."));
    }

    #[test]
    fn renders_empty_list() {
        let text = render(&[]);
        assert!(text.contains("0 rules"));
    }
}
