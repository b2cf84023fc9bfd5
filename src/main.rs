//! h5lens - A terminal-based HDF5 data viewer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use h5lens::app::App;
use h5lens::config::ViewerConfig;
use h5lens::data::Session;
use h5lens::{legacy, ui, util};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "h5lens")]
#[command(about = "A terminal-based HDF5 viewer", long_about = None)]
struct Args {
    /// Path to the HDF5 file to open
    file: Option<PathBuf>,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a MATLAB Level-5 .mat file to HDF5
    Convert {
        /// MAT file to read
        mat: PathBuf,
        /// HDF5 file to create (overwritten if it exists)
        h5: PathBuf,
        /// Open the converted file in the viewer
        #[arg(long)]
        open: bool,
    },
    /// Print the tree of an HDF5 file
    Tree {
        /// HDF5 file to read
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Convert { mat, h5, open }) => {
            if !open {
                init_stderr_logging()?;
            }
            run_convert(&mat, &h5)?;
            if open {
                run_viewer(Some(h5), args.log.as_deref())
            } else {
                Ok(())
            }
        },
        Some(Command::Tree { file }) => run_tree(&file),
        None => run_viewer(args.file, args.log.as_deref()),
    }
}

/// Warnings go to stderr when no terminal UI owns the screen.
///
/// Skipped values are reported by `run_convert` itself, so the flattener's
/// own warnings are filtered out here.
fn init_stderr_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new("warn,h5lens::legacy::flatten=error"))
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn init_file_logging(log_path: &Path) -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run_convert(mat: &Path, h5: &Path) -> Result<()> {
    let report = legacy::convert(mat, h5)
        .with_context(|| format!("Failed to convert {}", mat.display()))?;

    for diagnostic in &report.skipped {
        eprintln!("{}", diagnostic);
    }
    println!(
        "Wrote {} variable(s) to {}",
        report.variables.len(),
        h5.display()
    );
    Ok(())
}

fn run_tree(file: &Path) -> Result<()> {
    let session = Session::open(file)?;
    let root = session.populate()?;
    print!("{}", util::format_tree(&root));
    session.close();
    Ok(())
}

fn run_viewer(file: Option<PathBuf>, log: Option<&Path>) -> Result<()> {
    // Set up logging if --log option is provided
    if let Some(log_path) = log {
        init_file_logging(log_path)?;
        tracing::info!("Starting h5lens");
    }

    // Validate path if provided
    if let Some(ref path) = file {
        if !path.is_file() {
            eprintln!("Error: File not found: {}", path.display());
            std::process::exit(1);
        }
    }

    // Load before touching the terminal so the walk's errors land in the status bar
    let app = App::new(file, ViewerConfig::default());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    tracing::info!("h5lens exited");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut pending_g = false; // For 'gg' vim binding

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Plot popup - handle separately
        if app.plot.visible {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                app.plot.close();
            }
            continue;
        }

        // Search mode - handle separately
        if app.search.is_active() {
            match key.code {
                KeyCode::Enter => app.run_search(),
                KeyCode::Esc => app.search.cancel(),
                KeyCode::Backspace => app.search.backspace(),
                KeyCode::Char(c) => app.search.input(c),
                _ => {},
            }
            continue;
        }

        let page = app.config.explorer.page_step;
        let was_g = std::mem::take(&mut pending_g);

        // Normal mode
        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::NONE, KeyCode::Char('q')) => {
                app.close_file();
                return Ok(());
            },

            // Navigation
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                app.explorer.cursor_up();
            },
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                app.explorer.cursor_down();
            },
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                app.explorer.collapse_current();
            },
            (KeyModifiers::NONE, KeyCode::Right)
            | (KeyModifiers::NONE, KeyCode::Char('l'))
            | (KeyModifiers::NONE, KeyCode::Enter) => {
                app.explorer.expand_current();
            },

            // Vim navigation
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                if was_g {
                    app.explorer.goto_first();
                } else {
                    pending_g = true;
                }
            },
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                app.explorer.goto_last();
            },
            (KeyModifiers::CONTROL, KeyCode::Char('f')) | (KeyModifiers::NONE, KeyCode::PageDown) => {
                app.explorer.page_down(page);
            },
            (KeyModifiers::CONTROL, KeyCode::Char('b')) | (KeyModifiers::NONE, KeyCode::PageUp) => {
                app.explorer.page_up(page);
            },
            (KeyModifiers::SHIFT, KeyCode::Char('E')) => {
                app.explorer.expand_all();
            },

            // Search
            (KeyModifiers::NONE, KeyCode::Char('/')) => {
                app.search.start();
            },
            (KeyModifiers::NONE, KeyCode::Char('n')) => {
                app.search.next_match();
                app.goto_current_match();
            },
            (KeyModifiers::SHIFT, KeyCode::Char('N')) => {
                app.search.prev_match();
                app.goto_current_match();
            },

            // Plotting
            (KeyModifiers::NONE, KeyCode::Char('p')) => {
                app.plot_selected();
            },
            (KeyModifiers::SHIFT, KeyCode::Char('P')) => {
                app.mark_plot_y();
            },
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                app.reset_plot_mark();
            },

            // Features
            (KeyModifiers::NONE, KeyCode::Char('t')) => {
                app.toggle_preview();
            },
            (KeyModifiers::SHIFT, KeyCode::Char('T')) => {
                app.cycle_theme();
            },
            (KeyModifiers::SHIFT, KeyCode::Char('?')) | (KeyModifiers::NONE, KeyCode::Char('?')) => {
                app.status = "Help: q=quit, j/k=nav, /=search (/path, @attr), p=plot, P=plot against, r=reset mark, t=preview, T=theme, c=copy tree, y=copy path".to_string();
            },

            // Clipboard
            (KeyModifiers::NONE, KeyCode::Char('c')) => {
                app.copy_tree();
            },
            (KeyModifiers::NONE, KeyCode::Char('y')) => {
                app.copy_selected_path();
            },

            // Preview scrolling
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (KeyModifiers::SHIFT, KeyCode::Char('J')) => {
                app.scroll_preview_down();
            },
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (KeyModifiers::SHIFT, KeyCode::Char('K')) => {
                app.scroll_preview_up();
            },

            // Escape - close overlays
            (KeyModifiers::NONE, KeyCode::Esc) => {
                app.close_overlay();
            },

            _ => {},
        }
    }
}
