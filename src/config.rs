//! Viewer configuration defaults.

/// Largest entry, in bytes, whose contents are read for the preview.
pub const DEFAULT_PREVIEW_LIMIT: usize = 1024 * 1024;

/// Configuration for the explorer panes.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Entries above this many bytes show a marker instead of their contents.
    pub preview_limit: usize,
    /// Lines scrolled per step in the details pane.
    pub scroll_step: u16,
    /// Tree rows moved per page.
    pub page_step: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            scroll_step: 5,
            page_step: 15,
        }
    }
}

/// Configuration for the plot view.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Padding factor for the Y axis (0.15 = 15% margin).
    pub y_axis_padding_factor: f64,
    /// Popup size as a percentage of the terminal.
    pub popup_percent: u16,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            y_axis_padding_factor: 0.15,
            popup_percent: 90,
        }
    }
}

/// Combined viewer configuration.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Explorer settings.
    pub explorer: ExplorerConfig,
    /// Plot settings.
    pub plot: PlotConfig,
}
