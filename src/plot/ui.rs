//! Plot popup - pure rendering layer.

use super::{PlotData, PlotState};
use crate::config::PlotConfig;
use crate::ui::ThemeColors;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

/// Draw the plot popup.
pub fn draw_plot(f: &mut Frame<'_>, state: &PlotState, config: &PlotConfig, colors: &ThemeColors) {
    if !state.visible {
        return;
    }

    let area = centered_rect(config.popup_percent, config.popup_percent, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Plot ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.bg2))
        .style(Style::default().bg(colors.bg0));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(inner);

    if let Some(ref error) = state.error {
        draw_error(f, chunks[0], error, colors);
    } else if let Some(ref data) = state.data {
        draw_chart(f, chunks[0], data, config, colors);
    }

    let footer = Paragraph::new("Esc/q: close")
        .style(Style::default().fg(colors.green))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[1]);
}

fn series_color(index: usize, colors: &ThemeColors) -> Color {
    let palette = [
        colors.aqua,
        colors.orange,
        colors.purple,
        colors.green,
        colors.blue,
        colors.yellow,
    ];
    palette[index % palette.len()]
}

/// Keep at most `bins` evenly spaced points.
fn downsample(points: &[(f64, f64)], bins: usize) -> Vec<(f64, f64)> {
    if bins == 0 || points.len() <= bins {
        return points.to_vec();
    }
    let step = points.len() as f64 / bins as f64;
    (0..bins)
        .map(|i| points[((i as f64 * step) as usize).min(points.len() - 1)])
        .collect()
}

fn draw_chart(
    f: &mut Frame<'_>,
    area: Rect,
    data: &PlotData,
    config: &PlotConfig,
    colors: &ThemeColors,
) {
    let Some(((x_min, x_max), (min_val, max_val))) = data.bounds() else {
        let para = Paragraph::new("No valid data to display")
            .style(Style::default().fg(colors.fg0))
            .alignment(Alignment::Center);
        f.render_widget(para, area);
        return;
    };

    // Flat lines still need a visible range
    let padding = ((max_val - min_val).abs() * config.y_axis_padding_factor).max(0.5);
    let (y_min, y_max) = (min_val - padding, max_val + padding);
    let (x_min, x_max) = if x_min == x_max {
        (x_min - 0.5, x_max + 0.5)
    } else {
        (x_min, x_max)
    };

    let bins = (area.width as usize).saturating_sub(8).max(1) * 2;
    let series: Vec<Vec<(f64, f64)>> = data
        .series
        .iter()
        .map(|s| {
            let finite: Vec<(f64, f64)> = s
                .points
                .iter()
                .copied()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect();
            downsample(&finite, bins)
        })
        .collect();

    let datasets: Vec<Dataset<'_>> = data
        .series
        .iter()
        .zip(&series)
        .enumerate()
        .map(|(i, (s, points))| {
            Dataset::default()
                .name(s.name.as_str())
                .marker(ratatui::symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i, colors)))
                .data(points)
        })
        .collect();

    let x_axis = Axis::default()
        .title(data.x_label.as_str())
        .style(Style::default().fg(colors.fg0))
        .bounds([x_min, x_max])
        .labels(vec![
            format_axis_label(x_min),
            format_axis_label((x_min + x_max) / 2.0),
            format_axis_label(x_max),
        ]);

    let y_axis = Axis::default()
        .title("Value")
        .style(Style::default().fg(colors.fg0))
        .bounds([y_min, y_max])
        .labels(vec![
            format_axis_label(y_min),
            format_axis_label((y_min + y_max) / 2.0),
            format_axis_label(y_max),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .title(format!(" {} ", data.title))
                .title_style(Style::default().fg(colors.yellow)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    f.render_widget(chart, area);
}

/// Format axis label with smart precision.
fn format_axis_label(val: f64) -> String {
    if !val.is_finite() {
        return "?".to_string();
    }
    let abs_val = val.abs();
    if abs_val == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e5).contains(&abs_val) {
        format!("{:.1e}", val)
    } else if abs_val >= 100.0 {
        format!("{:.0}", val)
    } else if abs_val >= 1.0 {
        format!("{:.1}", val)
    } else {
        format!("{:.2}", val)
    }
}

fn draw_error(f: &mut Frame<'_>, area: Rect, error: &str, colors: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled(
            "Cannot Plot",
            Style::default()
                .fg(colors.yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error.to_string(), Style::default().fg(colors.fg0))),
        Line::from(""),
        Line::from("Press Esc to close"),
    ];

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(colors.fg0))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
