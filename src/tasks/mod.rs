pub mod runner;

use crate::manifest::Manifest;

pub use runner::{ShellRunner, TaskError, TaskRunner};

/// Ordered shell commands declared for one hook label.
///
/// Execution order is declaration order. An empty list is a valid,
/// deliberate no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList(Vec<String>);

impl TaskList {
    pub fn new(commands: Vec<String>) -> Self {
        TaskList(commands)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resolve the tasks declared for `label`.
///
/// Looks at the top level first, then inside the `prehook` block. Returns
/// `None` when the label is not declared anywhere, which means there is no
/// work for this hook.
pub fn resolve(manifest: &Manifest, label: &str) -> Option<TaskList> {
    let tasks = manifest.entry(label).map(|spec| TaskList::new(spec.to_list()));
    tracing::debug!(label, ?tasks, "resolved tasks");
    tasks
}
