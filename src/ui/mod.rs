//! User interface rendering.
//!
//! Shared widgets (theme colors, formatters, status and keymap bars) and the
//! top-level layout.

mod bars;
pub mod formatters;
mod theme;

use crate::app::App;
use crate::explorer::{details::draw_details, tree::draw_tree};
use crate::plot::ui::draw_plot;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use bars::{draw_keymap, draw_status, StatusLine};
pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    app.refresh_details();
    let colors = ThemeColors::from_theme(app.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    let title = app.file_name();
    let marked = app.plot.mark.as_ref().map(|m| m.key.clone());

    if app.explorer.show_preview {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);

        draw_tree(
            f,
            &mut app.explorer,
            title.as_deref(),
            marked.as_deref(),
            content[0],
            &colors,
        );
        draw_details(f, &app.explorer, app.details.as_ref(), content[1], &colors);
    } else {
        draw_tree(
            f,
            &mut app.explorer,
            title.as_deref(),
            marked.as_deref(),
            chunks[0],
            &colors,
        );
    }

    let status = StatusLine {
        error: app.error_message.as_deref(),
        message: &app.status,
        search: &app.search,
        mark: app.plot.mark.as_ref(),
    };
    draw_status(f, chunks[1], &status, &colors);
    draw_keymap(f, chunks[2], app.plot.visible, app.search.is_active(), &colors);

    draw_plot(f, &app.plot, &app.config.plot, &colors);
}
