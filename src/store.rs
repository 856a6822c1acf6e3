use crate::id::IdAllocator;
use crate::storage::Storage;
use crate::task::Task;
use tracing::{error, warn};

const TASKS_KEY: &str = "tasks.json";

/// Owns the task collection. Every successful mutation rewrites the whole
/// persisted collection, so the saved state always mirrors memory.
pub struct TaskStore<S> {
    storage: S,
    allocator: IdAllocator,
    tasks: Vec<Task>,
}

impl<S: Storage> TaskStore<S> {
    /// Load the persisted collection. Missing data yields an empty store;
    /// unreadable data is logged and dropped rather than treated as fatal.
    pub fn load(storage: S) -> Self {
        let allocator = IdAllocator::load(&storage);
        let tasks = match storage.read(TASKS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!("error parsing saved tasks ({err}); starting with an empty task list");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("error reading saved tasks ({err}); starting with an empty task list");
                Vec::new()
            }
        };
        Self {
            storage,
            allocator,
            tasks,
        }
    }

    /// Append a task with a freshly allocated id. Blank descriptions are
    /// rejected without touching the collection or storage.
    pub fn add(&mut self, description: &str) -> Option<u32> {
        let description = description.trim();
        if description.is_empty() {
            return None;
        }
        let id = self.allocator.next(&self.storage);
        self.tasks.push(Task::new(id, description.to_string()));
        self.save();
        Some(id)
    }

    /// Tasks in insertion order; `None` when there is nothing to show.
    pub fn list(&self) -> Option<impl Iterator<Item = &Task>> {
        if self.tasks.is_empty() {
            None
        } else {
            Some(self.tasks.iter())
        }
    }

    /// Flip completion, returning the new state, or `None` if the id is
    /// unknown. Persists only when a task was actually flipped.
    pub fn toggle(&mut self, id: u32) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.save();
        Some(completed)
    }

    /// Replace a task's description. Blank input is rejected without
    /// mutation; persists only when the task exists.
    pub fn update(&mut self, id: u32, description: &str) -> bool {
        let description = description.trim();
        if description.is_empty() {
            return false;
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.description = description.to_string();
                self.save();
                true
            }
            None => false,
        }
    }

    /// Remove the task with the given id; persists only if something was
    /// removed.
    pub fn delete(&mut self, id: u32) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() < before {
            self.save();
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.tasks) {
            Ok(json) => json,
            Err(err) => {
                error!("failed to serialize tasks: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.write(TASKS_KEY, &json) {
            error!("failed to save tasks: {err}");
        }
    }
}
