//! Task label interning.
//!
//! Labels are mapped to dense integer IDs in first-observed order, which is
//! the stable order every tie-break in the pipeline falls back on.

use rustc_hash::FxHashMap;

/// Interned task ID (u32 for compact storage and fast hashing).
pub type TaskId = u32;

/// Maps task labels to dense IDs and back.
#[derive(Debug, Clone)]
pub struct TaskIdInterner {
    to_int: FxHashMap<String, TaskId>,
    from_int: Vec<String>,
}

impl TaskIdInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Intern a label, returning its ID.
    pub fn intern(&mut self, label: &str) -> TaskId {
        if let Some(&id) = self.to_int.get(label) {
            return id;
        }
        let id = self.from_int.len() as TaskId;
        self.from_int.push(label.to_string());
        self.to_int.insert(label.to_string(), id);
        id
    }

    #[inline]
    pub fn get(&self, label: &str) -> Option<TaskId> {
        self.to_int.get(label).copied()
    }

    #[inline]
    pub fn resolve(&self, id: TaskId) -> Option<&str> {
        self.from_int.get(id as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

impl Default for TaskIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
