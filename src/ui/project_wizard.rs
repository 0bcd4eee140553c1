use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Project, ProjectDraft};
use crate::ui::components::date_input::DateInputState;

pub enum ProjectWizardAction {
    Cancel,
    Create(ProjectDraft),
    Update(String, ProjectDraft), // Contains project id
}

#[derive(Clone, PartialEq, Copy)]
pub enum ProjectField {
    Name,
    ContractId,
    StartDate,
    EndDate,
    Tfp,
    BocFp,
}

pub struct ProjectWizardState {
    editing_id: Option<String>,
    pub draft: ProjectDraft,
    pub current_field: ProjectField,
    pub editing: bool,
    pub start_date_state: DateInputState,
    pub end_date_state: DateInputState,
}

impl ProjectWizardState {
    pub fn new() -> Self {
        let today = Local::now().date_naive();

        Self {
            editing_id: None,
            draft: ProjectDraft {
                project_name: String::new(),
                contract_id: String::new(),
                start_date: today,
                end_date: None,
                tfp: String::new(),
                boc_fp: String::new(),
            },
            current_field: ProjectField::Name,
            editing: false,
            start_date_state: DateInputState::new(today),
            end_date_state: DateInputState::new(today),
        }
    }

    pub fn from_existing(project: &Project) -> Self {
        let draft = project.draft();
        let end_date = draft.end_date.unwrap_or(draft.start_date);
        Self {
            editing_id: Some(project.id.clone()),
            start_date_state: DateInputState::new(draft.start_date),
            end_date_state: DateInputState::new(end_date),
            draft,
            current_field: ProjectField::Name,
            editing: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            match self.current_field {
                ProjectField::StartDate => self.start_date_state.toggle_editing(),
                ProjectField::EndDate => self.end_date_state.toggle_editing(),
                _ => {}
            }
        } else {
            self.start_date_state.stop_editing();
            self.end_date_state.stop_editing();
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::ContractId,
            ProjectField::ContractId => ProjectField::StartDate,
            ProjectField::StartDate => ProjectField::EndDate,
            ProjectField::EndDate => ProjectField::Tfp,
            ProjectField::Tfp => ProjectField::BocFp,
            ProjectField::BocFp => ProjectField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::BocFp,
            ProjectField::ContractId => ProjectField::Name,
            ProjectField::StartDate => ProjectField::ContractId,
            ProjectField::EndDate => ProjectField::StartDate,
            ProjectField::Tfp => ProjectField::EndDate,
            ProjectField::BocFp => ProjectField::Tfp,
        };
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.current_field {
            ProjectField::Name => Some(&mut self.draft.project_name),
            ProjectField::ContractId => Some(&mut self.draft.contract_id),
            ProjectField::Tfp => Some(&mut self.draft.tfp),
            ProjectField::BocFp => Some(&mut self.draft.boc_fp),
            ProjectField::StartDate | ProjectField::EndDate => None,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        if let Some(text) = self.text_field_mut() {
            match key {
                KeyCode::Char(c) => {
                    text.push(c);
                }
                KeyCode::Backspace => {
                    text.pop();
                }
                _ => {}
            }
            return;
        }

        match self.current_field {
            ProjectField::StartDate => {
                self.start_date_state.handle_input(key);
                self.draft.start_date = self.start_date_state.date;
            }
            ProjectField::EndDate => {
                self.end_date_state.handle_input(key);
                self.draft.end_date = Some(self.end_date_state.date);
            }
            _ => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        self.draft.is_complete()
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = if state.is_edit() {
        "Edit Project"
    } else {
        "Add New Project"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let save_label = if state.is_edit() {
        "S - Save Changes"
    } else {
        "S - Create Project"
    };
    let help_text = if state.editing {
        match state.current_field {
            ProjectField::StartDate | ProjectField::EndDate => {
                "Enter - Save field | Left/Right - Switch date part | Esc - Cancel editing"
                    .to_string()
            }
            _ => "Enter - Save field | Esc - Cancel editing".to_string(),
        }
    } else {
        format!("Enter - Edit field | Up/Down - Navigate fields | {save_label} | Esc - Cancel")
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState, area: Rect) {
    let field_names = [
        "Project Name",
        "Contract / SO ID",
        "Start Date",
        "End Date",
        "TFP",
        "BOC FP",
    ];

    let end_date_str = match state.draft.end_date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "Not set".to_string(),
    };

    let field_values = [
        state.draft.project_name.clone(),
        state.draft.contract_id.clone(),
        state.draft.start_date.format("%Y-%m-%d").to_string(),
        end_date_str,
        state.draft.tfp.clone(),
        state.draft.boc_fp.clone(),
    ];

    let items: Vec<ListItem> = field_names
        .iter()
        .zip(field_values.iter())
        .enumerate()
        .map(|(i, (name, value))| {
            let content = if i == state.current_field as usize && state.editing {
                let displayed_value = if i == ProjectField::StartDate as usize {
                    state.start_date_state.display()
                } else if i == ProjectField::EndDate as usize {
                    state.end_date_state.display()
                } else {
                    format!("{value}|")
                };

                Spans::from(vec![
                    Span::styled(format!("{name}: "), Style::default().fg(Color::Yellow)),
                    Span::styled(displayed_value, Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if i == state.current_field as usize {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{name}: "), style),
                    Span::raw(value.clone()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"))
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState) -> Result<Option<ProjectWizardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(ProjectWizardAction::Cancel));
                }
            }
            KeyCode::Enter => {
                state.toggle_editing();
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                if state.is_valid() {
                    let draft = state.draft.clone();
                    return Ok(Some(match &state.editing_id {
                        Some(id) => ProjectWizardAction::Update(id.clone(), draft),
                        None => ProjectWizardAction::Create(draft),
                    }));
                }
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn filled_wizard() -> ProjectWizardState {
        let mut state = ProjectWizardState::new();
        state.draft.project_name = "IBCP".into();
        state.draft.contract_id = "C-98765".into();
        state.draft.end_date = NaiveDate::from_ymd_opt(2030, 1, 1);
        state.draft.tfp = "Project Lead".into();
        state.draft.boc_fp = "Client Manager".into();
        state
    }

    #[test]
    fn blank_wizard_is_not_savable() {
        assert!(!ProjectWizardState::new().is_valid());
        assert!(filled_wizard().is_valid());
    }

    #[test]
    fn typing_fills_the_selected_text_field() {
        let mut state = ProjectWizardState::new();
        state.toggle_editing();
        for c in "IBCP".chars() {
            state.edit_current_field(KeyCode::Char(c));
        }
        state.edit_current_field(KeyCode::Backspace);
        assert_eq!(state.draft.project_name, "IBC");
    }

    #[test]
    fn editing_the_end_date_sets_it() {
        let mut state = ProjectWizardState::new();
        assert!(state.draft.end_date.is_none());

        state.current_field = ProjectField::EndDate;
        state.toggle_editing();
        for c in "2030".chars() {
            state.edit_current_field(KeyCode::Char(c));
        }
        assert!(state.draft.end_date.is_some());
    }

    #[test]
    fn from_existing_keeps_the_record_id() {
        let project = Project::new(filled_wizard().draft.clone());
        let state = ProjectWizardState::from_existing(&project);
        assert!(state.is_edit());
        assert_eq!(state.draft, project.draft());
    }

    #[test]
    fn field_navigation_wraps_both_ways() {
        let mut state = ProjectWizardState::new();
        state.previous_field();
        assert!(state.current_field == ProjectField::BocFp);
        state.next_field();
        assert!(state.current_field == ProjectField::Name);
    }
}
