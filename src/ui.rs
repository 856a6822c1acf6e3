use crate::storage::Storage;
use crate::store::TaskStore;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use std::io;

const MENU_ITEMS: [&str; 6] = [
    "1. Add Task",
    "2. View Tasks",
    "3. Toggle Task Completion",
    "4. Edit Task",
    "5. Delete Task",
    "6. Exit",
];

/// What the status line is doing: idle in the menu, or collecting one line
/// of input for a pending action.
enum Mode {
    Menu,
    Prompt { kind: Prompt, buffer: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    AddDescription,
    ToggleId,
    EditId,
    EditDescription { id: u32 },
    DeleteId,
}

impl Prompt {
    fn label(&self) -> &'static str {
        match self {
            Prompt::AddDescription => "Enter the task description",
            Prompt::ToggleId => "Enter the ID of the task you want to toggle",
            Prompt::EditId => "Enter the ID of the task you want to update",
            Prompt::EditDescription { .. } => "Enter the new description",
            Prompt::DeleteId => "Enter the task ID to delete",
        }
    }

    fn cancel_message(&self) -> &'static str {
        match self {
            Prompt::AddDescription => "Task addition cancelled.",
            Prompt::ToggleId => "Toggle cancelled.",
            Prompt::EditId | Prompt::EditDescription { .. } => "Update cancelled.",
            Prompt::DeleteId => "Deletion cancelled.",
        }
    }
}

/// Outcome of activating a menu entry.
enum Step {
    Stay,
    Ask(Prompt),
    Quit,
}

/// Outcome of submitting a prompt: either a result message, or a follow-up
/// prompt (editing asks for the id first, then the new description).
enum Submit {
    Message(String),
    Next(Prompt),
}

pub fn run_app<B: Backend, S: Storage>(
    terminal: &mut Terminal<B>,
    store: &mut TaskStore<S>,
) -> io::Result<()> {
    let mut mode = Mode::Menu;
    let mut selected: usize = 0;
    let mut message = String::from("Welcome to Task Keeper.");

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(1),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(f.area());

            let title = Paragraph::new(Line::from(vec![
                Span::styled(
                    " Task Keeper ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}", Local::now().format("%Y-%m-%d"))),
            ]));
            f.render_widget(title, chunks[0]);

            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[1]);

            let menu_items: Vec<ListItem> = MENU_ITEMS
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let style = if i == selected && matches!(mode, Mode::Menu) {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Span::styled(*item, style))
                })
                .collect();
            let menu =
                List::new(menu_items).block(Block::default().title("Menu").borders(Borders::ALL));
            f.render_widget(menu, body[0]);

            let task_items: Vec<ListItem> = match store.list() {
                Some(tasks) => tasks
                    .map(|t| {
                        ListItem::new(Line::from(vec![
                            Span::raw(format!("{}. ", t.id)),
                            Span::styled(&t.description, Style::default().fg(Color::White)),
                            Span::raw(format!(" [{}]", t.status_label())),
                        ]))
                    })
                    .collect(),
                None => vec![ListItem::new(Span::raw("No tasks available."))],
            };
            let tasks =
                List::new(task_items).block(Block::default().title("Tasks").borders(Borders::ALL));
            f.render_widget(tasks, body[1]);

            let status = match &mode {
                Mode::Prompt { kind, buffer } => format!("{}: {buffer}_", kind.label()),
                Mode::Menu => message.clone(),
            };
            let status =
                Paragraph::new(status).block(Block::default().title("Status").borders(Borders::ALL));
            f.render_widget(status, chunks[2]);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match mode {
                Mode::Menu => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Up => selected = selected.saturating_sub(1),
                    KeyCode::Down => {
                        if selected < MENU_ITEMS.len() - 1 {
                            selected += 1;
                        }
                    }
                    KeyCode::Enter => match activate(selected, store, &mut message) {
                        Step::Stay => {}
                        Step::Ask(kind) => {
                            mode = Mode::Prompt {
                                kind,
                                buffer: String::new(),
                            }
                        }
                        Step::Quit => return Ok(()),
                    },
                    KeyCode::Char(c @ '1'..='6') => {
                        selected = c as usize - '1' as usize;
                        match activate(selected, store, &mut message) {
                            Step::Stay => {}
                            Step::Ask(kind) => {
                                mode = Mode::Prompt {
                                    kind,
                                    buffer: String::new(),
                                }
                            }
                            Step::Quit => return Ok(()),
                        }
                    }
                    _ => {}
                },
                Mode::Prompt {
                    kind,
                    ref mut buffer,
                } => match key.code {
                    KeyCode::Esc => {
                        message = kind.cancel_message().to_string();
                        mode = Mode::Menu;
                    }
                    KeyCode::Backspace => {
                        buffer.pop();
                    }
                    KeyCode::Char(c) => buffer.push(c),
                    KeyCode::Enter => {
                        let input = buffer.trim().to_string();
                        match submit(kind, &input, store) {
                            Submit::Message(msg) => {
                                message = msg;
                                mode = Mode::Menu;
                            }
                            Submit::Next(next) => {
                                mode = Mode::Prompt {
                                    kind: next,
                                    buffer: String::new(),
                                }
                            }
                        }
                    }
                    _ => {}
                },
            }
        }
    }
}

/// Turn a menu selection into the next step. Actions that need an existing
/// task are gated here, before any prompt is shown.
fn activate<S: Storage>(index: usize, store: &TaskStore<S>, message: &mut String) -> Step {
    match index {
        0 => Step::Ask(Prompt::AddDescription),
        1 => {
            *message = match store.len() {
                0 => "No tasks available.".to_string(),
                n => format!("{n} task(s) listed."),
            };
            Step::Stay
        }
        2 if store.is_empty() => {
            *message = "No tasks available to toggle.".to_string();
            Step::Stay
        }
        2 => Step::Ask(Prompt::ToggleId),
        3 if store.is_empty() => {
            *message = "No tasks available to update.".to_string();
            Step::Stay
        }
        3 => Step::Ask(Prompt::EditId),
        4 if store.is_empty() => {
            *message = "No tasks available to delete.".to_string();
            Step::Stay
        }
        4 => Step::Ask(Prompt::DeleteId),
        _ => Step::Quit,
    }
}

/// Validate one line of input and dispatch it to the store, producing the
/// message shown on the status line.
fn submit<S: Storage>(kind: Prompt, input: &str, store: &mut TaskStore<S>) -> Submit {
    match kind {
        Prompt::AddDescription => match store.add(input) {
            Some(_) => Submit::Message(format!("Task added: \"{input}\"")),
            None => Submit::Message("Description cannot be empty.".to_string()),
        },
        Prompt::ToggleId => match parse_id(input) {
            Some(id) => match store.toggle(id) {
                Some(true) => Submit::Message(format!("Task ID {id} marked as Completed.")),
                Some(false) => Submit::Message(format!("Task ID {id} marked as Not Completed.")),
                None => Submit::Message(format!("Task with ID {id} not found.")),
            },
            None => Submit::Message("Please enter a valid numerical ID.".to_string()),
        },
        Prompt::EditId => match parse_id(input) {
            Some(id) => Submit::Next(Prompt::EditDescription { id }),
            None => Submit::Message("Please enter a valid numerical ID.".to_string()),
        },
        Prompt::EditDescription { id } => {
            if input.is_empty() {
                Submit::Message("Description cannot be empty.".to_string())
            } else if store.update(id, input) {
                Submit::Message(format!("Task ID {id} updated successfully."))
            } else {
                Submit::Message(format!("Task with ID {id} not found."))
            }
        }
        Prompt::DeleteId => match parse_id(input) {
            Some(id) => {
                if store.delete(id) {
                    Submit::Message(format!("Task ID {id} deleted successfully."))
                } else {
                    Submit::Message(format!("Task with ID {id} not found."))
                }
            }
            None => Submit::Message("Please enter a valid numerical ID.".to_string()),
        },
    }
}

fn parse_id(input: &str) -> Option<u32> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;

    fn store_in(dir: &tempfile::TempDir) -> TaskStore<FileStorage> {
        TaskStore::load(FileStorage::new(dir.path().to_path_buf()))
    }

    fn message(submit: Submit) -> String {
        match submit {
            Submit::Message(msg) => msg,
            Submit::Next(_) => panic!("expected a message"),
        }
    }

    #[test]
    fn empty_store_gates_id_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut msg = String::new();
        assert!(matches!(activate(2, &store, &mut msg), Step::Stay));
        assert_eq!(msg, "No tasks available to toggle.");
        assert!(matches!(activate(3, &store, &mut msg), Step::Stay));
        assert_eq!(msg, "No tasks available to update.");
        assert!(matches!(activate(4, &store, &mut msg), Step::Stay));
        assert_eq!(msg, "No tasks available to delete.");
    }

    #[test]
    fn view_reports_no_tasks_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut msg = String::new();
        assert!(matches!(activate(1, &store, &mut msg), Step::Stay));
        assert_eq!(msg, "No tasks available.");
    }

    #[test]
    fn add_reports_the_new_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let msg = message(submit(Prompt::AddDescription, "Buy milk", &mut store));
        assert_eq!(msg, "Task added: \"Buy milk\"");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn blank_description_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let msg = message(submit(Prompt::AddDescription, "", &mut store));
        assert_eq!(msg, "Description cannot be empty.");
        assert!(store.is_empty());
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("Buy milk");
        let msg = message(submit(Prompt::ToggleId, "abc", &mut store));
        assert_eq!(msg, "Please enter a valid numerical ID.");
    }

    #[test]
    fn toggle_reports_the_new_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("Buy milk");
        let msg = message(submit(Prompt::ToggleId, "1", &mut store));
        assert_eq!(msg, "Task ID 1 marked as Completed.");
        let msg = message(submit(Prompt::ToggleId, "1", &mut store));
        assert_eq!(msg, "Task ID 1 marked as Not Completed.");
    }

    #[test]
    fn unknown_id_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("Buy milk");
        let msg = message(submit(Prompt::DeleteId, "9", &mut store));
        assert_eq!(msg, "Task with ID 9 not found.");
    }

    #[test]
    fn edit_asks_for_the_description_next() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("Buy milk");
        match submit(Prompt::EditId, "1", &mut store) {
            Submit::Next(Prompt::EditDescription { id }) => assert_eq!(id, 1),
            _ => panic!("expected the description prompt"),
        }
        let msg = message(submit(
            Prompt::EditDescription { id: 1 },
            "Buy oat milk",
            &mut store,
        ));
        assert_eq!(msg, "Task ID 1 updated successfully.");
    }

    #[test]
    fn cancel_messages_match_the_pending_action() {
        assert_eq!(Prompt::AddDescription.cancel_message(), "Task addition cancelled.");
        assert_eq!(Prompt::ToggleId.cancel_message(), "Toggle cancelled.");
        assert_eq!(Prompt::EditId.cancel_message(), "Update cancelled.");
        assert_eq!(Prompt::DeleteId.cancel_message(), "Deletion cancelled.");
    }
}
