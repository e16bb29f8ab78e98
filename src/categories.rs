// Category sets derived from the task collection

use crate::models::Task;

/// Categories offered even before any task uses them
pub const DEFAULT_CATEGORIES: [&str; 6] = ["Work", "Personal", "Studies", "Home", "Health", "Shopping"];

/// Distinct categories used by `tasks`, in order of first appearance
pub fn task_categories(tasks: &[Task]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for task in tasks {
        if !seen.contains(&task.category) {
            seen.push(task.category.clone());
        }
    }
    seen
}

/// Defaults followed by any observed category not already listed
pub fn known_categories(tasks: &[Task]) -> Vec<String> {
    let mut all: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for category in task_categories(tasks) {
        if !all.contains(&category) {
            all.push(category);
        }
    }
    all
}
