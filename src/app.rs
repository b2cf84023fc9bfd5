//! Application state and logic.

use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::data::{NodeKind, Session};
use crate::explorer::details::{CachedDetails, DetailsView};
use crate::explorer::{ExplorerState, TreeItem};
use crate::plot::{PlotData, PlotState};
use crate::search::SearchState;
use crate::util;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Viewer settings.
    pub config: ViewerConfig,
    /// Open file, if any.
    pub session: Option<Session>,
    /// Explorer state (tree navigation + details).
    pub explorer: ExplorerState,
    /// Details of the selected node.
    pub details: Option<CachedDetails>,
    /// Search state.
    pub search: SearchState,
    /// Plot state.
    pub plot: PlotState,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Error message.
    pub error_message: Option<String>,
}

impl App {
    /// Create a new application instance, loading `file_path` if given.
    pub fn new(file_path: Option<PathBuf>, config: ViewerConfig) -> Self {
        let mut app = Self {
            config,
            session: None,
            explorer: ExplorerState::new(),
            details: None,
            search: SearchState::new(),
            plot: PlotState::new(),
            status: "Ready".to_string(),
            theme: Theme::GruvboxDark,
            error_message: None,
        };

        if let Some(path) = file_path {
            app.load_file(&path);
        }

        app
    }

    /// Load a file, replacing the current one.
    ///
    /// The previous session and its tree are dropped before the new file is
    /// walked; on failure nothing stays loaded.
    pub fn load_file(&mut self, path: &Path) {
        self.close_file();

        let loaded = Session::open(path).and_then(|session| {
            let root = session.populate()?;
            Ok((session, root))
        });

        match loaded {
            Ok((session, root)) => {
                tracing::info!(
                    path = %path.display(),
                    nodes = root.descendant_count(),
                    "File loaded successfully"
                );
                self.status = format!("{} loaded", session.file_name());
                self.explorer.build_from_root(root);
                self.session = Some(session);
                self.error_message = None;
            },
            Err(e) => {
                tracing::error!("Error loading file: {}", e);
                self.error_message = Some(format!("Error loading file: {}", e));
                self.status = "Error loading file".to_string();
            },
        }
    }

    /// Close the current file and drop everything derived from it.
    pub fn close_file(&mut self) {
        self.explorer.clear();
        self.details = None;
        self.search.cancel();
        self.plot.close();
        self.plot.reset();
        if let Some(session) = self.session.take() {
            session.close();
        }
    }

    /// Name of the loaded file.
    pub fn file_name(&self) -> Option<String> {
        self.session.as_ref().map(Session::file_name)
    }

    /// Get the item under the cursor.
    pub fn current_item(&self) -> Option<&TreeItem> {
        self.explorer.current_item()
    }

    /// Read details of the selected node unless they are already cached.
    pub fn refresh_details(&mut self) {
        let Some(item) = self.explorer.current_item() else {
            self.details = None;
            return;
        };
        if self.details.as_ref().is_some_and(|d| d.key == item.key) {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        let limit = self.config.explorer.preview_limit;
        let view = match session.details(&item.path, item.attribute(), limit) {
            Ok(Some(details)) => DetailsView::Entry(details),
            Ok(None) => DetailsView::Group {
                path: item.path.clone(),
            },
            Err(e) => {
                tracing::warn!(path = %item.display_path(), "Failed to read details: {}", e);
                DetailsView::Error(e.to_string())
            },
        };
        self.details = Some(CachedDetails {
            key: item.key.clone(),
            view,
        });
    }

    /// Toggle preview panel.
    pub fn toggle_preview(&mut self) {
        self.explorer.toggle_preview();
        self.status = if self.explorer.show_preview {
            "Preview: ON".to_string()
        } else {
            "Preview: OFF".to_string()
        };
    }

    fn selected_dataset(&mut self) -> Option<TreeItem> {
        match self.explorer.current_item() {
            Some(item) if item.kind == NodeKind::Dataset => Some(item.clone()),
            Some(_) => {
                self.status = "Only datasets can be plotted".to_string();
                None
            },
            None => {
                self.status = "No node selected".to_string();
                None
            },
        }
    }

    /// Plot the selected dataset, or the marked one against it.
    pub fn plot_selected(&mut self) {
        let Some(item) = self.selected_dataset() else {
            return;
        };
        let Some(session) = &self.session else {
            self.status = "No file loaded".to_string();
            return;
        };

        let result = match self.plot.take_mark() {
            Some(mark) => session.read_numeric(&mark.path).and_then(|y| {
                let x = session.read_numeric(&item.path)?;
                PlotData::build(&mark.path, y, Some((&item.path, x)))
            }),
            None => session
                .read_numeric(&item.path)
                .and_then(|y| PlotData::build(&item.path, y, None)),
        };

        match result {
            Ok(data) => {
                self.status = format!("Plotted {}", data.title);
                self.plot.show(data);
            },
            Err(e) => {
                tracing::warn!("Plot failed: {}", e);
                self.status = "Plot failed".to_string();
                self.plot.set_error(e.to_string());
            },
        }
    }

    /// Mark the selected dataset as the Y series of the next plot.
    pub fn mark_plot_y(&mut self) {
        if let Some(item) = self.selected_dataset() {
            self.status = format!("Marked {} as Y", item.path);
            self.plot.mark(item.key, item.path);
        }
    }

    /// Forget the marked Y series.
    pub fn reset_plot_mark(&mut self) {
        if self.plot.mark.is_some() {
            self.plot.reset();
            self.status = "Plot mark reset".to_string();
        }
    }

    /// Run the submitted search and jump to the first match.
    pub fn run_search(&mut self) {
        self.search.submit();
        if let Some(root) = self.explorer.root() {
            self.search.perform_search(root);
        }
        if self.search.match_count() == 0 {
            self.status = format!("No match for '{}'", self.search.query());
        }
        self.goto_current_match();
    }

    /// Move the cursor to the current search match.
    pub fn goto_current_match(&mut self) {
        if let Some(key) = self.search.current_match_key().map(str::to_string) {
            self.explorer.goto_key(&key);
        }
    }

    /// Copy the selected node's path.
    pub fn copy_selected_path(&mut self) {
        let Some(path) = self.current_item().map(TreeItem::display_path) else {
            self.status = "No node selected".to_string();
            return;
        };
        self.status = match util::copy_to_clipboard(&path) {
            Ok(()) => format!("Copied {}", path),
            Err(e) => format!("Copy failed: {}", e),
        };
    }

    /// Copy the whole tree as text.
    pub fn copy_tree(&mut self) {
        let Some(root) = self.explorer.root() else {
            self.status = "No file loaded".to_string();
            return;
        };
        self.status = match util::copy_tree_structure(root) {
            Ok(()) => "Tree copied!".to_string(),
            Err(e) => format!("Copy failed: {}", e),
        };
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Scroll preview down.
    pub fn scroll_preview_down(&mut self) {
        self.explorer.scroll_down(self.config.explorer.scroll_step);
    }

    /// Scroll preview up.
    pub fn scroll_preview_up(&mut self) {
        self.explorer.scroll_up(self.config.explorer.scroll_step);
    }

    /// Close the plot, or drop the plot mark and search highlights.
    pub fn close_overlay(&mut self) {
        if self.plot.visible {
            self.plot.close();
            return;
        }
        self.reset_plot_mark();
        self.search.cancel();
    }
}
