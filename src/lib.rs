// FocusFlow - Single-user task manager with filtering, stats and export

pub mod categories;
pub mod config;
pub mod filter;
pub mod kv;
pub mod models;
pub mod persistence;
pub mod state;
pub mod stats;
pub mod store;

// Re-export main types for convenience
pub use categories::{DEFAULT_CATEGORIES, known_categories, task_categories};
pub use config::Config;
pub use filter::{CategoryFilter, FilterPatch, PriorityFilter, StatusFilter, TaskFilters, filtered_view};
pub use kv::{FileKv, KeyValueStore, MemoryKv};
pub use models::{NewTask, Priority, Task, TaskPatch};
pub use state::{Action, TaskState, reduce};
pub use stats::{TaskStats, compute_stats};
pub use store::Store;
