use std::collections::HashMap;

use common::task::{Task, TaskId};

/// Tasks of one phase that nobody currently holds.
///
/// Selection order is unspecified, tasks within a phase are interchangeable.
#[derive(Debug, Default)]
pub struct TaskPool {
    tasks: HashMap<TaskId, Task>,
}

impl TaskPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a task (back) into the pool.
    pub fn insert(&mut self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    /// Remove and return any pending task.
    pub fn take_any(&mut self) -> Option<Task> {
        let id = *self.tasks.keys().next()?;
        self.tasks.remove(&id)
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.tasks.contains_key(&task_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<Task> for TaskPool {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut pool = TaskPool::new();
        iter.into_iter().for_each(|task| pool.insert(task));
        pool
    }
}
