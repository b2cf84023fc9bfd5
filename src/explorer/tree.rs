//! Tree panel UI rendering.

use super::{ExplorerState, TreeItem};
use crate::data::NodeKind;
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Draw the tree panel UI.
pub fn draw_tree(
    f: &mut Frame<'_>,
    explorer: &mut ExplorerState,
    title: Option<&str>,
    marked: Option<&str>,
    area: Rect,
    colors: &ThemeColors,
) {
    if explorer.root().is_none() {
        draw_welcome(f, area, colors);
        return;
    }

    // Subtract 2 for borders
    let viewport_height = area.height.saturating_sub(2) as usize;
    let viewport_width = area.width.saturating_sub(2) as usize;
    explorer.adjust_scroll(viewport_height);

    let cursor = explorer.cursor();
    let items: Vec<ListItem<'_>> = explorer
        .visible_items()
        .iter()
        .enumerate()
        .skip(explorer.scroll_offset())
        .take(viewport_height)
        .map(|(idx, item)| {
            let is_marked = marked == Some(item.key.as_str());
            ListItem::new(tree_line(item, idx == cursor, is_marked, viewport_width, colors))
        })
        .collect();

    let title = title
        .map(|t| format!(" {} ", t))
        .unwrap_or_else(|| " h5lens ".to_string());

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.bg2))
            .style(Style::default().bg(colors.bg0)),
    );

    f.render_widget(list, area);
}

fn tree_line(
    item: &TreeItem,
    selected: bool,
    marked: bool,
    width: usize,
    colors: &ThemeColors,
) -> Line<'static> {
    let indent = "  ".repeat(item.level);
    let expand_icon = match (item.expandable, item.expanded) {
        (true, true) => "▼ ",
        (true, false) => "▶ ",
        (false, _) => "  ",
    };
    let mark = if marked { " [Y]" } else { "" };

    let prefix = format!("{}{}", indent, expand_icon);
    let room = width.saturating_sub(prefix.width() + mark.width());
    let label = truncate_to_width(&item.label, room);

    if selected {
        let text = format!("{}{}{}", prefix, label, mark);
        return Line::from(text).style(
            Style::default()
                .fg(colors.bg0)
                .bg(colors.yellow)
                .add_modifier(Modifier::BOLD),
        );
    }

    let label_style = match item.kind {
        NodeKind::Group => Style::default().fg(colors.fg0),
        NodeKind::Dataset => Style::default()
            .fg(colors.aqua)
            .add_modifier(Modifier::BOLD),
        NodeKind::Attribute => Style::default().fg(colors.blue),
    };

    let mut spans = vec![
        Span::raw(prefix),
        Span::styled(label, label_style),
    ];
    if marked {
        spans.push(Span::styled(mark, Style::default().fg(colors.purple)));
    }
    Line::from(spans)
}

/// Cut `text` to at most `width` terminal columns, ending with `…` when cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Draw the welcome screen.
pub fn draw_welcome(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled(
            "Welcome to h5lens!",
            Style::default()
                .fg(colors.yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("No file loaded"),
        Line::from(""),
        Line::from("Usage: h5lens <file.h5>"),
        Line::from("       h5lens convert <file.mat> <file.h5>"),
        Line::from(""),
        Line::from("Keyboard shortcuts:"),
        Line::from("  j/k or ↓/↑  - Navigate"),
        Line::from("  h/l or ←/→  - Collapse/Expand"),
        Line::from("  /           - Search"),
        Line::from("  p / P       - Plot / Plot against"),
        Line::from("  t           - Toggle preview"),
        Line::from("  T           - Cycle theme"),
        Line::from("  q           - Quit"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" h5lens ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .style(Style::default().bg(colors.bg0)),
        )
        .style(Style::default().fg(colors.fg0));

    f.render_widget(paragraph, area);
}
