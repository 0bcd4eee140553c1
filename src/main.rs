mod config;
mod deadline;
mod models;
mod storage;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::storage::FileStorage;
use crate::store::ProjectStore;
use crate::ui::{
    project_wizard::{
        handle_input as handle_project_wizard_input, render_project_wizard, ProjectWizardAction,
        ProjectWizardState,
    },
    projects::{
        handle_input as handle_projects_input, render_projects, ProjectAction, ProjectsState,
    },
};

#[derive(Parser)]
#[command(name = "project-tracker", version, about = "Track contract projects from the terminal")]
struct Cli {
    /// Directory to keep project data in (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

// Represents the current screen in the app
enum AppScreen {
    Projects,
    ProjectWizard,
}

// Main application state
struct AppState {
    store: ProjectStore<FileStorage>,
    screen: AppScreen,
    projects_state: Option<ProjectsState>,
    wizard_state: Option<ProjectWizardState>,
}

impl AppState {
    fn new(store: ProjectStore<FileStorage>) -> Self {
        Self {
            store,
            screen: AppScreen::Projects,
            projects_state: None,
            wizard_state: None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Load configuration
    let config = config::init()?;
    let data_dir = cli.data_dir.unwrap_or(config.data_dir);

    // Load the project list; a cold or broken data dir falls back to
    // sample records instead of failing.
    let store = ProjectStore::load(FileStorage::new(data_dir));

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app_state = AppState::new(store);

    // Initialize the projects screen
    load_projects_screen(&mut app_state);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match app_state.screen {
            AppScreen::Projects => {
                if let Some(state) = &mut app_state.projects_state {
                    render_projects(f, state);
                }
            }
            AppScreen::ProjectWizard => {
                if let Some(state) = &mut app_state.wizard_state {
                    render_project_wizard(f, state);
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Projects => handle_projects_screen(app_state)?,
            AppScreen::ProjectWizard => handle_project_wizard_screen(app_state)?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

// Rebuild the list screen from the store's current snapshot
fn load_projects_screen(app_state: &mut AppState) {
    let projects = app_state.store.projects().to_vec();
    app_state.projects_state = Some(ProjectsState::new(projects));
    app_state.screen = AppScreen::Projects;
}

fn handle_projects_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.projects_state {
        match handle_projects_input(state)? {
            Some(ProjectAction::Exit) => {
                return Ok(true);
            }
            Some(ProjectAction::NewProject) => {
                app_state.wizard_state = Some(ProjectWizardState::new());
                app_state.screen = AppScreen::ProjectWizard;
            }
            Some(ProjectAction::EditProject(project_id)) => {
                match app_state.store.get(&project_id) {
                    Some(project) => {
                        app_state.wizard_state = Some(ProjectWizardState::from_existing(project));
                        app_state.screen = AppScreen::ProjectWizard;
                    }
                    // Stale selection: the record is gone, refresh the list
                    None => load_projects_screen(app_state),
                }
            }
            Some(ProjectAction::DeleteProject(project_id)) => {
                app_state.store.delete(&project_id);
                load_projects_screen(app_state);
            }
            None => {}
        }
    }

    Ok(false)
}

fn handle_project_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.wizard_state {
        match handle_project_wizard_input(state)? {
            Some(ProjectWizardAction::Cancel) => {
                load_projects_screen(app_state);
            }
            Some(ProjectWizardAction::Create(draft)) => {
                app_state.store.create(draft);
                load_projects_screen(app_state);
            }
            Some(ProjectWizardAction::Update(project_id, draft)) => {
                // A stale id is a no-op; the refreshed list shows the
                // record is gone
                app_state.store.update(&project_id, draft);
                load_projects_screen(app_state);
            }
            None => {}
        }
    }

    Ok(false)
}
