// Task store: authoritative in-memory state with write-through persistence

use crate::categories;
use crate::filter::{FilterPatch, TaskFilters, filtered_view};
use crate::kv::KeyValueStore;
use crate::models::{NewTask, Task, TaskPatch};
use crate::persistence;
use crate::state::{Action, TaskState, reduce};
use crate::stats::TaskStats;
use eyre::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Owns the task state and the storage it is persisted to
///
/// Every mutation goes through [`reduce`]. When the resulting task
/// collection differs from the previous one it is saved, including when it
/// becomes empty.
pub struct Store<K: KeyValueStore> {
    kv: K,
    state: TaskState,
}

impl<K: KeyValueStore> Store<K> {
    /// Open a store over `kv`, hydrating it from previously saved tasks
    ///
    /// Unreadable stored data is logged and treated as an empty collection.
    pub fn open(kv: K) -> Self {
        let tasks = persistence::load_tasks(&kv);
        info!(count = tasks.len(), "Opened task store");

        let state = reduce(&TaskState::default(), Action::Load(tasks));
        Self { kv, state }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the entire collection
    pub fn load(&mut self, tasks: Vec<Task>) {
        self.dispatch(Action::Load(tasks));
    }

    /// Append a new task, returning its id
    ///
    /// Returns `None` without touching the collection when the title or
    /// category is blank; callers validate before submitting.
    pub fn add(&mut self, data: NewTask) -> Option<String> {
        if let Err(e) = data.validate() {
            debug!(error = %e, "add: ignoring invalid task");
            return None;
        }

        let task = Task::from_new(data);
        let id = task.id.clone();
        debug!(id = %id, title = %task.title, "add");
        self.dispatch(Action::Add(task));
        Some(id)
    }

    pub fn edit(&mut self, id: &str, patch: TaskPatch) {
        self.dispatch(Action::Edit {
            id: id.to_string(),
            patch,
        });
    }

    pub fn delete(&mut self, id: &str) {
        self.dispatch(Action::Delete(id.to_string()));
    }

    pub fn toggle(&mut self, id: &str) {
        self.dispatch(Action::Toggle(id.to_string()));
    }

    /// Merge into the current filters; stats are unaffected
    pub fn set_filters(&mut self, patch: FilterPatch) {
        self.dispatch(Action::SetFilters(patch));
    }

    pub fn reset_filters(&mut self) {
        self.set_filters(FilterPatch::reset());
    }

    fn dispatch(&mut self, action: Action) {
        let touches_tasks = action.touches_tasks();
        let next = reduce(&self.state, action);

        if touches_tasks {
            if next.tasks == self.state.tasks {
                debug!("dispatch: task collection unchanged");
            } else {
                persistence::save_tasks(&mut self.kv, &next.tasks);
            }
        }

        self.state = next;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|task| task.id == id)
    }

    pub fn filters(&self) -> &TaskFilters {
        &self.state.filters
    }

    pub fn stats(&self) -> &TaskStats {
        &self.state.stats
    }

    /// Tasks matching the current filters, in collection order
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        filtered_view(&self.state.tasks, &self.state.filters)
    }

    /// Categories used by at least one task
    pub fn categories(&self) -> Vec<String> {
        categories::task_categories(&self.state.tasks)
    }

    /// Default categories plus every category in use
    pub fn known_categories(&self) -> Vec<String> {
        categories::known_categories(&self.state.tasks)
    }

    /// Resolve a full id or a unique id prefix
    pub fn resolve_id(&self, prefix: &str) -> Option<String> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(task) = self.get(prefix) {
            return Some(task.id.clone());
        }

        let mut matches = self.state.tasks.iter().filter(|task| task.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task.id.clone()),
            _ => None,
        }
    }

    /// Export the full, unfiltered collection into `dir`
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        persistence::export_tasks(&self.state.tasks, dir)
    }

    pub fn into_inner(self) -> K {
        self.kv
    }
}
