use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::deadline::{days_remaining, DaysRemaining, Urgency};
use crate::models::Project;

// Represents the state of the project list screen
pub struct ProjectsState {
    projects: Vec<Project>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl ProjectsState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut list_state = ListState::default();
        if !projects.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn next(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.projects.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.projects.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<String> {
        self.selected_project().map(|p| p.id.clone())
    }
}

pub enum ProjectAction {
    Exit,
    NewProject,
    EditProject(String),   // Contains project id
    DeleteProject(String), // Contains project id
}

fn badge_style(badge: &DaysRemaining) -> Style {
    let color = match badge.urgency {
        Some(Urgency::Overdue) => Color::Red,
        Some(Urgency::DueToday) | Some(Urgency::OneDayLeft) | Some(Urgency::Urgent) => {
            Color::Yellow
        }
        Some(Urgency::Approaching) => Color::Blue,
        Some(Urgency::Comfortable) => Color::Green,
        None => return Style::default().fg(Color::DarkGray),
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// One card per project: title line with the days-remaining badge,
// detail line with dates and role assignments.
fn project_card(project: &Project, today: chrono::NaiveDate) -> ListItem<'static> {
    let badge = days_remaining(project.end_date, today);

    let title_line = Spans::from(vec![
        Span::styled(
            project.project_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", badge.label()), badge_style(&badge)),
    ]);

    let end_date = match project.end_date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "N/A".to_string(),
    };
    let detail_line = Spans::from(vec![
        Span::raw(format!("ID: {}", project.contract_id)),
        Span::raw("  |  "),
        Span::raw(format!(
            "{} to {}",
            project.start_date.format("%Y-%m-%d"),
            end_date
        )),
        Span::raw("  |  "),
        Span::raw(format!("TFP: {}", project.tfp)),
        Span::raw("  |  "),
        Span::raw(format!("BOC FP: {}", project.boc_fp)),
    ]);

    ListItem::new(vec![title_line, detail_line, Spans::from("")])
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let today = Local::now().date_naive();
    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| project_card(project, today))
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(projects_list, chunks[0], &mut state.list_state);

    let buttons_text = if state.selected_project().is_some() {
        "<A> Add Project | <E> Edit Project | <D> Delete Project | <Q> Quit".to_string()
    } else {
        "<A> Add Project | <Q> Quit".to_string()
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this project?"),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
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

pub fn handle_input(state: &mut ProjectsState) -> Result<Option<ProjectAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                } else {
                    return Ok(Some(ProjectAction::Exit));
                }
            }
            KeyCode::Char('a') => {
                if !state.show_delete_confirmation {
                    return Ok(Some(ProjectAction::NewProject));
                }
            }
            KeyCode::Char('e') => {
                if !state.show_delete_confirmation {
                    if let Some(id) = state.selected_project_id() {
                        return Ok(Some(ProjectAction::EditProject(id)));
                    }
                }
            }
            KeyCode::Char('d') => {
                if !state.show_delete_confirmation && state.selected_project().is_some() {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Char('y') => {
                if state.show_delete_confirmation {
                    if let Some(id) = state.selected_project_id() {
                        state.toggle_delete_confirmation();
                        return Ok(Some(ProjectAction::DeleteProject(id)));
                    }
                }
            }
            KeyCode::Char('n') => {
                // Declining the confirmation is a no-op
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Down => {
                if !state.show_delete_confirmation {
                    state.next();
                }
            }
            KeyCode::Up => {
                if !state.show_delete_confirmation {
                    state.previous();
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
