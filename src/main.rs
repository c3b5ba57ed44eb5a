mod app;
mod config;
mod controller;
mod draft;
mod image;
mod print;
mod render;
mod ui;

use app::{App, InputMode, View};
use clap::{Parser, Subcommand};
use config::Config;
use controller::FormController;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use draft::{ResumeDraft, Section};
use image::FsImageStore;
use std::path::PathBuf;

/// TUI resume builder with a printable standalone HTML export
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Draft JSON to preload (fallback if no subcommand)
    #[arg(short, long)]
    draft: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive builder (default)
    Run {
        /// Draft JSON to preload
        #[arg(short, long)]
        draft: Option<PathBuf>,
    },
    /// Render a draft JSON straight to a printable HTML document
    Render {
        /// Input draft JSON
        #[arg(short, long)]
        input: PathBuf,
        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    // Normalize command
    let command = match cli.command {
        Some(c) => c,
        None => Commands::Run { draft: cli.draft },
    };

    match command {
        Commands::Render { input, output } => {
            let draft = draft::load_draft(&input)?;
            let images = FsImageStore::open_default()?;
            let doc = render::ResumeDocument::project(&draft);
            let html = render::document_html(&doc, &images);
            std::fs::write(&output, html)?;
            eprintln!("Rendered {} -> {}", input.display(), output.display());
        }
        Commands::Run { draft } => {
            let initial = match draft {
                Some(path) => draft::load_draft(&path)?,
                None => ResumeDraft::default(),
            };

            let config = Config::load();
            let images = FsImageStore::open_default()?;
            let controller = FormController::new(initial);
            let mut app = App::from_config(controller, Box::new(images), &config);

            // Init terminal
            let mut terminal = ratatui::init();

            // Initial page size setup
            let size = terminal.size()?;
            app.update_page_size(size.height);

            // Main loop
            let result = run_app(&mut terminal, &mut app);

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Log to a file under the cache dir; stderr belongs to the raw-mode
/// terminal while the TUI runs.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let Some(dirs) = directories::ProjectDirs::from("com", "resumeforge", "resume-forge") else {
        return;
    };
    if std::fs::create_dir_all(dirs.cache_dir()).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::options()
        .create(true)
        .append(true)
        .open(dirs.cache_dir().join("resume-forge.log"))
    else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if crossterm::event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(_, height) => {
                    app.update_page_size(height);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Handle based on input mode and view
    if app.input_mode == InputMode::Editing {
        handle_edit_input(app, key);
        return;
    }
    match app.view {
        View::Form => handle_form_key(app, key),
        View::Preview => handle_preview_key(app, key),
    }
}

fn handle_edit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.end_edit(true);
        }
        KeyCode::Esc => {
            app.end_edit(false);
        }
        KeyCode::Backspace => {
            app.edit_backspace();
        }
        KeyCode::Char(c) => {
            app.edit_push(c);
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.quit();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.focus_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.focus_prev();
        }
        KeyCode::Enter => {
            app.begin_edit();
        }
        KeyCode::Char('a') => {
            app.add_entry_here();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.remove_entry_here();
        }
        KeyCode::Right | KeyCode::Char(']') => {
            app.next_section();
        }
        KeyCode::Left | KeyCode::Char('[') => {
            app.previous_section();
        }
        KeyCode::Char('1') => {
            app.go_to_section(Section::Personal);
        }
        KeyCode::Char('2') => {
            app.go_to_section(Section::Experience);
        }
        KeyCode::Char('3') => {
            app.go_to_section(Section::Education);
        }
        KeyCode::Char('4') => {
            app.go_to_section(Section::Skills);
        }
        KeyCode::Char('g') => {
            app.request_preview();
        }
        KeyCode::Esc => {
            app.status_msg.clear();
        }
        _ => {}
    }
}

fn handle_preview_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_preview();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
        }
        KeyCode::PageDown => {
            app.scroll_page_down();
        }
        KeyCode::PageUp => {
            app.scroll_page_up();
        }
        KeyCode::Char('p') => {
            app.print_preview();
        }
        _ => {}
    }
}
