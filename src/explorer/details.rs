//! Details pane for the selected node.

use super::{ExplorerState, TreeItem};
use crate::data::{EntryDetails, NodeKind, Preview};
use crate::ui::formatters::format_number;
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What the details pane shows for the selected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsView {
    /// A group; groups have no contents to preview.
    Group {
        /// Group path.
        path: String,
    },
    /// A dataset or attribute.
    Entry(EntryDetails),
    /// Reading the entry failed.
    Error(String),
}

/// Details computed for one node key.
#[derive(Debug, Clone)]
pub struct CachedDetails {
    /// Key of the node the details belong to.
    pub key: String,
    /// The details.
    pub view: DetailsView,
}

/// Draw the details pane.
pub fn draw_details(
    f: &mut Frame<'_>,
    explorer: &ExplorerState,
    details: Option<&CachedDetails>,
    area: Rect,
    colors: &ThemeColors,
) {
    let lines = match (explorer.current_item(), details) {
        (Some(item), Some(cached)) if cached.key == item.key => {
            format_details(item, &cached.view, colors)
        },
        _ => vec![Line::from(Span::styled(
            "Select a node to view details",
            Style::default().fg(colors.fg0),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Details ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .style(Style::default().bg(colors.bg0)),
        )
        .style(Style::default().fg(colors.fg0))
        .wrap(Wrap { trim: false })
        .scroll((explorer.preview_scroll, 0));

    f.render_widget(paragraph, area);
}

/// Format details of `item` as styled lines.
pub fn format_details(
    item: &TreeItem,
    view: &DetailsView,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    let kind = match item.kind {
        NodeKind::Group => "group",
        NodeKind::Dataset => "dataset",
        NodeKind::Attribute => "attribute",
    };

    let mut lines = vec![
        Line::from(Span::styled(
            item.name.clone(),
            Style::default()
                .fg(colors.aqua)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("─".repeat(50), Style::default().fg(colors.bg2))),
        Line::from(""),
        field_line("Type: ", kind.to_string(), colors),
        field_line("Path: ", item.display_path(), colors),
    ];

    match view {
        DetailsView::Group { .. } => {},
        DetailsView::Error(message) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(colors.red),
            )));
        },
        DetailsView::Entry(details) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Array Info",
                Style::default()
                    .fg(colors.aqua)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(field_line("  Data type: ", details.dtype.clone(), colors));
            lines.push(field_line("  Shape: ", details.shape_label(), colors));
            lines.push(field_line(
                "  Size: ",
                format!("{} bytes", format_number(details.byte_size)),
                colors,
            ));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Contents",
                Style::default()
                    .fg(colors.green)
                    .add_modifier(Modifier::BOLD),
            )));

            let style = match details.preview {
                Preview::Text(_) => Style::default().fg(colors.fg0),
                Preview::TooLarge | Preview::Unavailable(_) => Style::default().fg(colors.gray),
            };
            for text in details.preview.as_text().lines() {
                lines.push(Line::from(Span::styled(text.to_string(), style)));
            }
        },
    }

    lines
}

fn field_line(label: &'static str, value: String, colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors.fg1)),
        Span::styled(value, Style::default().fg(colors.fg0)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Theme;
    use crate::data::TOO_LARGE_MARKER;

    fn item(kind: NodeKind) -> TreeItem {
        TreeItem {
            key: "/d".to_string(),
            name: "d".to_string(),
            path: "/d".to_string(),
            kind,
            label: "d".to_string(),
            level: 1,
            expandable: false,
            expanded: false,
        }
    }

    fn text_of(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn large_entries_show_marker() {
        let colors = ThemeColors::from_theme(Theme::GruvboxDark);
        let view = DetailsView::Entry(EntryDetails {
            path: "/d".to_string(),
            dtype: "float64".to_string(),
            shape: vec![200_000],
            byte_size: 1_600_000,
            preview: Preview::TooLarge,
        });
        let text = text_of(&format_details(&item(NodeKind::Dataset), &view, &colors));
        assert!(text.contains(TOO_LARGE_MARKER));
        assert!(text.contains("1,600,000 bytes"));
        assert!(text.contains("(200000,)"));
    }

    #[test]
    fn groups_show_no_contents() {
        let colors = ThemeColors::from_theme(Theme::GruvboxLight);
        let view = DetailsView::Group {
            path: "/d".to_string(),
        };
        let text = text_of(&format_details(&item(NodeKind::Group), &view, &colors));
        assert!(text.contains("Type: group"));
        assert!(!text.contains("Contents"));
    }
}
