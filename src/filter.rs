// View filtering for tasks

use crate::models::{Priority, Task};
use std::str::FromStr;

/// Active view selection: which tasks are displayed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub category: CategoryFilter,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
}

impl TaskFilters {
    /// True if any selector narrows the view
    pub fn is_active(&self) -> bool {
        self.category != CategoryFilter::All || self.status != StatusFilter::All || self.priority != PriorityFilter::All
    }

    /// Shallow merge of the selectors present in `patch`
    pub fn merge(&self, patch: &FilterPatch) -> TaskFilters {
        TaskFilters {
            category: patch.category.clone().unwrap_or_else(|| self.category.clone()),
            status: patch.status.unwrap_or(self.status),
            priority: patch.priority.unwrap_or(self.priority),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.category.matches(task) && self.status.matches(task) && self.priority.matches(task)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => task.category == *category,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.is_done,
            StatusFilter::Pending => !task.is_done,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == priority,
        }
    }
}

/// Partial filter update; absent selectors keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub category: Option<CategoryFilter>,
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
}

impl FilterPatch {
    /// Patch that sets every selector back to `All`
    pub fn reset() -> Self {
        Self {
            category: Some(CategoryFilter::All),
            status: Some(StatusFilter::All),
            priority: Some(PriorityFilter::All),
        }
    }

    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Tasks that pass every selector, in collection order
pub fn filtered_view<'a>(tasks: &'a [Task], filters: &TaskFilters) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filters.matches(task)).collect()
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err("category cannot be empty".to_string()),
            "all" => Ok(CategoryFilter::All),
            other => Ok(CategoryFilter::Only(other.to_string())),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            other => Err(format!("invalid status '{}' (expected all, completed or pending)", other)),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        s.parse().map(PriorityFilter::Only)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Completed => write!(f, "completed"),
            StatusFilter::Pending => write!(f, "pending"),
        }
    }
}

impl std::fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityFilter::All => write!(f, "all"),
            PriorityFilter::Only(p) => write!(f, "{}", p),
        }
    }
}
