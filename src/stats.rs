// Aggregate counts over the task collection

use crate::models::{Priority, Task};
use serde::Serialize;
use std::collections::BTreeMap;

/// Derived counts; recomputed whenever the collection changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub by_category: BTreeMap<String, usize>,
    /// Always holds all three priorities, even at zero
    pub by_priority: BTreeMap<Priority, usize>,
}

impl Default for TaskStats {
    fn default() -> Self {
        Self {
            total: 0,
            completed: 0,
            pending: 0,
            by_category: BTreeMap::new(),
            by_priority: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
        }
    }
}

impl TaskStats {
    /// Share of completed tasks, rounded to the nearest whole percent
    pub fn completion_percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: &str) -> usize {
        self.by_category.get(category).copied().unwrap_or(0)
    }
}

/// Single pass over `tasks`
pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats::default();

    for task in tasks {
        if task.is_done {
            stats.completed += 1;
        } else {
            stats.pending += 1;
        }
        *stats.by_category.entry(task.category.clone()).or_insert(0) += 1;
        *stats.by_priority.entry(task.priority).or_insert(0) += 1;
    }

    stats.total = tasks.len();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(category: &str, priority: Priority, done: bool) -> Task {
        Task {
            id: crate::models::new_id(),
            title: "t".to_string(),
            description: String::new(),
            priority,
            category: category.to_string(),
            is_done: done,
            created_at: Utc::now(),
        }
    }

    fn assert_invariants(tasks: &[Task]) {
        let stats = compute_stats(tasks);
        assert_eq!(stats.total, tasks.len());
        assert_eq!(stats.completed + stats.pending, tasks.len());
        assert_eq!(stats.by_category.values().sum::<usize>(), tasks.len());
        assert_eq!(stats.by_priority.values().sum::<usize>(), tasks.len());
        assert_eq!(stats.by_priority.len(), 3);
    }

    #[test]
    fn test_empty_collection() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.priority_count(Priority::High), 0);
        assert!(stats.by_category.is_empty());
        assert_eq!(stats.completion_percentage(), 0);
        assert_invariants(&[]);
    }

    #[test]
    fn test_counts() {
        let tasks = vec![
            task("Work", Priority::High, true),
            task("Work", Priority::Low, false),
            task("Home", Priority::Low, false),
            task("Health", Priority::Medium, true),
        ];

        let stats = compute_stats(&tasks);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.category_count("Work"), 2);
        assert_eq!(stats.category_count("Home"), 1);
        assert_eq!(stats.category_count("Shopping"), 0);
        assert_eq!(stats.priority_count(Priority::Low), 2);
        assert_eq!(stats.priority_count(Priority::Medium), 1);
        assert_invariants(&tasks);
    }

    #[test]
    fn test_invariants_over_varied_collections() {
        let categories = ["Work", "Home", "Studies"];
        let mut tasks = Vec::new();
        for i in 0..30 {
            tasks.push(task(categories[i % 3], Priority::ALL[i % 2], i % 5 == 0));
            assert_invariants(&tasks);
        }
        // Low never used but still present
        assert_eq!(compute_stats(&tasks).priority_count(Priority::Low), 0);
    }

    #[test]
    fn test_completion_percentage_rounds() {
        let tasks = vec![
            task("Work", Priority::High, true),
            task("Work", Priority::High, false),
            task("Work", Priority::High, false),
        ];
        assert_eq!(compute_stats(&tasks).completion_percentage(), 33);

        let tasks = vec![task("Work", Priority::High, true), task("Work", Priority::High, true)];
        assert_eq!(compute_stats(&tasks).completion_percentage(), 100);
    }

    #[test]
    fn test_json_shape() {
        let stats = compute_stats(&[task("Work", Priority::High, false)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["byCategory"]["Work"], 1);
        assert_eq!(json["byPriority"]["high"], 1);
        assert_eq!(json["byPriority"]["low"], 0);
    }
}
