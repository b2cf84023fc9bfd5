//! One-line bars below the tree: status and key hints.

use crate::plot::PlotMark;
use crate::search::SearchState;
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TREE_KEYS: &[(&str, &str)] = &[
    ("q", "quit"),
    ("hjkl", "nav"),
    ("/", "search"),
    ("n/N", "next/prev"),
    ("p", "plot"),
    ("P", "plot against"),
    ("t", "preview"),
    ("c/y", "copy"),
    ("T", "theme"),
    ("?", "help"),
];
const SEARCH_KEYS: &[(&str, &str)] = &[("Enter", "search"), ("Esc", "cancel")];
const PLOT_KEYS: &[(&str, &str)] = &[("q/Esc", "close")];

/// What the status bar should say, most urgent first.
#[derive(Debug, Clone, Copy)]
pub struct StatusLine<'a> {
    /// Last load error, shown in place of everything else.
    pub error: Option<&'a str>,
    /// Last status message.
    pub message: &'a str,
    /// Search prompt and match counter.
    pub search: &'a SearchState,
    /// Dataset marked as the Y series.
    pub mark: Option<&'a PlotMark>,
}

impl StatusLine<'_> {
    fn spans(&self, colors: &ThemeColors) -> Vec<Span<'static>> {
        if let Some(error) = self.error {
            return vec![Span::styled(error.to_string(), Style::default().fg(colors.red))];
        }
        if self.search.is_active() {
            return vec![
                Span::styled("/", Style::default().fg(colors.yellow)),
                Span::raw(self.search.buffer().to_string()),
            ];
        }

        let mut spans = vec![Span::raw(self.message.to_string())];
        if self.search.match_count() > 0 {
            spans.push(Span::styled(
                format!(
                    "  [{}/{} '{}']",
                    self.search.current_match_index() + 1,
                    self.search.match_count(),
                    self.search.query()
                ),
                Style::default().fg(colors.aqua),
            ));
        }
        if let Some(mark) = self.mark {
            spans.push(Span::styled(
                format!("  Y={} (select X, p to plot, r to reset)", mark.path),
                Style::default().fg(colors.purple),
            ));
        }
        spans
    }
}

/// Draw the status bar.
pub fn draw_status(f: &mut Frame<'_>, area: Rect, status: &StatusLine<'_>, colors: &ThemeColors) {
    let line = Line::from(status.spans(colors));
    let paragraph = Paragraph::new(line).style(Style::default().fg(colors.fg0).bg(colors.bg1));
    f.render_widget(paragraph, area);
}

fn key_hints(plot_visible: bool, search_active: bool) -> &'static [(&'static str, &'static str)] {
    if plot_visible {
        PLOT_KEYS
    } else if search_active {
        SEARCH_KEYS
    } else {
        TREE_KEYS
    }
}

/// Draw the key hints for the current mode.
pub fn draw_keymap(
    f: &mut Frame<'_>,
    area: Rect,
    plot_visible: bool,
    search_active: bool,
    colors: &ThemeColors,
) {
    let key_style = Style::default()
        .fg(colors.yellow)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    for (i, (key, action)) in key_hints(plot_visible, search_active).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(colors.gray)));
        }
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(":{}", action)));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().fg(colors.fg0).bg(colors.bg0));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Theme;

    fn text(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn error_hides_everything_else() {
        let search = SearchState::new();
        let status = StatusLine {
            error: Some("Error loading file"),
            message: "Ready",
            search: &search,
            mark: None,
        };
        let colors = ThemeColors::from_theme(Theme::GruvboxDark);
        assert_eq!(text(&status.spans(&colors)), "Error loading file");
    }

    #[test]
    fn mark_is_shown_after_message() {
        let search = SearchState::new();
        let mark = PlotMark {
            key: "/y".to_string(),
            path: "/y".to_string(),
        };
        let status = StatusLine {
            error: None,
            message: "Marked /y as Y",
            search: &search,
            mark: Some(&mark),
        };
        let colors = ThemeColors::from_theme(Theme::GruvboxDark);
        let shown = text(&status.spans(&colors));
        assert!(shown.starts_with("Marked /y as Y"));
        assert!(shown.contains("Y=/y"));
    }

    #[test]
    fn hints_follow_mode() {
        assert_eq!(key_hints(true, false), PLOT_KEYS);
        assert_eq!(key_hints(false, true), SEARCH_KEYS);
        assert!(key_hints(false, false).contains(&("P", "plot against")));
    }
}
