// Reducer-style state transitions

use crate::filter::{FilterPatch, TaskFilters};
use crate::models::{Task, TaskPatch};
use crate::stats::{TaskStats, compute_stats};

/// Whole application state, replaced wholesale on every transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    pub tasks: Vec<Task>,
    pub filters: TaskFilters,
    pub stats: TaskStats,
}

/// Transitions accepted by [`reduce`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the whole collection
    Load(Vec<Task>),
    /// Append a fully built task
    Add(Task),
    Edit { id: String, patch: TaskPatch },
    Delete(String),
    Toggle(String),
    SetFilters(FilterPatch),
}

impl Action {
    /// True if the action can change the task collection
    pub fn touches_tasks(&self) -> bool {
        !matches!(self, Action::SetFilters(_))
    }
}

/// Produce the next state; unknown ids leave the collection as it was
pub fn reduce(state: &TaskState, action: Action) -> TaskState {
    let tasks = match action {
        Action::Load(tasks) => tasks,
        Action::Add(task) => {
            let mut tasks = state.tasks.clone();
            tasks.push(task);
            tasks
        }
        Action::Edit { id, patch } => state
            .tasks
            .iter()
            .map(|task| if task.id == id { task.apply(&patch) } else { task.clone() })
            .collect(),
        Action::Delete(id) => state.tasks.iter().filter(|task| task.id != id).cloned().collect(),
        Action::Toggle(id) => state
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    Task {
                        is_done: !task.is_done,
                        ..task.clone()
                    }
                } else {
                    task.clone()
                }
            })
            .collect(),
        Action::SetFilters(patch) => {
            return TaskState {
                filters: state.filters.merge(&patch),
                ..state.clone()
            };
        }
    };

    let stats = compute_stats(&tasks);
    TaskState {
        tasks,
        filters: state.filters.clone(),
        stats,
    }
}
