pub mod alert_rules;
pub mod crops;
pub mod dashboard;
pub mod tips;

pub use alert_rules::AlertRulesScreen;
pub use crops::CropsScreen;
pub use dashboard::DashboardScreen;
pub use tips::TipsScreen;

use crate::i18n::{Catalog, Language};
use crate::ui::Theme;
use ratatui::text::{Line, Span};

/// Screen-switching keys shared by every screen, followed by `actions`
pub fn nav_line<'a>(
    catalog: &'a Catalog,
    language: Language,
    actions: &[(&'a str, &'a str)],
) -> Line<'a> {
    let mut spans = Vec::new();
    for (key, label) in actions {
        spans.push(Span::styled(format!("[{}]", key), Theme::nav_key()));
        spans.push(Span::styled(format!("{} ", label), Theme::nav_label()));
    }

    let global = [
        ("1", "nav_dashboard"),
        ("2", "nav_rules"),
        ("3", "nav_tips"),
        ("4", "nav_crops"),
        ("r", "nav_refresh"),
        ("l", "nav_language"),
        ("q", "nav_quit"),
    ];
    for (key, label_key) in global {
        spans.push(Span::styled(format!("[{}]", key), Theme::nav_key()));
        spans.push(Span::styled(
            format!("{} ", catalog.get(label_key, language)),
            Theme::nav_label(),
        ));
    }
    spans.push(Span::styled(language.native_name(), Theme::highlight()));

    Line::from(spans)
}

/// Shorten to `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Wheat", 10), "Wheat");
        assert_eq!(truncate("Light rain expected.", 10), "Light r...");
        // Multi-byte text is cut on character boundaries
        assert_eq!(truncate("गेहूं की बुवाई का समय", 6), "गेह...");
    }

    #[test]
    fn nav_line_translates_labels() {
        let catalog = Catalog::bundled().unwrap();
        let line = nav_line(&catalog, Language::Hindi, &[("t", "Toggle")]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("[t]Toggle "));
        assert!(text.contains("फसलें"));
        assert!(text.ends_with("हिन्दी"));
    }
}
